//! Backend library modules.

pub mod domain;
pub mod environment;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
pub mod telemetry;
