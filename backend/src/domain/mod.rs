//! Domain primitives and ports.
//!
//! Purpose: define the post entity, the transport-agnostic error type, and the
//! repository port the HTTP adapter depends on. Keep framework and database
//! types out of this module.
//!
//! Public surface:
//! - Error (alias to `error::Error`): failure with a stable code.
//! - ErrorCode (alias to `error::ErrorCode`): failure category.
//! - Post / PostId (aliases to `post::*`): the persisted entity.

pub mod error;
pub mod ports;
pub mod post;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::post::{Post, PostId};
