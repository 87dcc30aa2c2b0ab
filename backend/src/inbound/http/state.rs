//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the repository port and remain testable without I/O.

use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use serde::Serialize;

use crate::domain::Error;
use crate::domain::ports::PostRepository;
use crate::inbound::http::error::{ApiError, ApiResult, StatusPolicy};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::ports::InMemoryPostRepository;
/// use backend::inbound::http::error::StatusPolicy;
/// use backend::inbound::http::state::HttpState;
///
/// let state = HttpState::new(Arc::new(InMemoryPostRepository::new()), StatusPolicy::Flat);
/// assert_eq!(state.status_policy(), StatusPolicy::Flat);
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Resource manager for posts.
    pub posts: Arc<dyn PostRepository>,
    status_policy: StatusPolicy,
}

impl HttpState {
    /// Bundle a repository with the status policy used for its failures.
    pub fn new(posts: Arc<dyn PostRepository>, status_policy: StatusPolicy) -> Self {
        Self {
            posts,
            status_policy,
        }
    }

    /// Status policy applied to every failure raised by handlers.
    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Turn a failure into the error response for this application.
    pub fn reject(&self, error: impl Into<Error>) -> ApiError {
        self.status_policy.reject(error)
    }

    /// Encode `value` as the JSON body of a response with `status`.
    ///
    /// # Errors
    ///
    /// Returns an internal error when `value` cannot be serialised.
    pub fn json<T: Serialize>(&self, status: StatusCode, value: &T) -> ApiResult<HttpResponse> {
        let body = serde_json::to_vec(value)
            .map_err(|err| self.reject(Error::internal(err.to_string())))?;
        Ok(HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(body))
    }
}
