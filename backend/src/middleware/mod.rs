//! Request middleware.
//!
//! Purpose: wrap every request with body logging and permissive CORS
//! handling. Each layer can be switched off independently when the
//! application is assembled.

pub mod cors;
pub mod request_log;

pub use cors::Cors;
pub use request_log::RequestLog;
