//! HTTP inbound adapter exposing REST endpoints.

pub mod app;
pub mod error;
pub mod greeting;
pub mod posts;
pub mod state;

pub use error::ApiResult;
