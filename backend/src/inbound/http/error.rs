//! HTTP adapter mapping for domain errors.
//!
//! Every failure leaves the service as `{"error": "<message>"}`. Which status
//! accompanies it is decided by the configured [`StatusPolicy`]: the flat
//! policy answers 500 for everything, the differentiated policy separates
//! client mistakes and missing posts from storage failures.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Plain-text body used when even the error payload cannot be encoded.
pub const ENCODE_FAILURE_BODY: &str = "Could not encode error response body";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Rule mapping domain error codes to HTTP status codes.
///
/// Names are matched case-insensitively when deserialising.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum StatusPolicy {
    /// Every failure is reported as 500 Internal Server Error.
    #[default]
    Flat,
    /// Invalid input is 400, missing posts are 404, everything else is 500.
    Differentiated,
}

impl StatusPolicy {
    /// Status code this policy assigns to `code`.
    pub fn status_for(self, code: ErrorCode) -> StatusCode {
        match self {
            Self::Flat => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Differentiated => match code {
                ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorCode::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Resolve a domain failure into a response-ready error.
    pub fn reject(self, error: impl Into<Error>) -> ApiError {
        let error = error.into();
        ApiError {
            status: self.status_for(error.code()),
            error,
        }
    }
}

/// Raised when a status policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status policy `{0}`; expected `flat` or `differentiated`")]
pub struct UnknownStatusPolicy(String);

impl std::str::FromStr for StatusPolicy {
    type Err = UnknownStatusPolicy;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "differentiated" => Ok(Self::Differentiated),
            _ => Err(UnknownStatusPolicy(raw.to_owned())),
        }
    }
}

impl TryFrom<String> for StatusPolicy {
    type Error = UnknownStatusPolicy;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Wire shape of every error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Domain error paired with the status chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    error: Error,
}

impl ApiError {
    /// Underlying domain error.
    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        write_error(self.status, self.error.message())
    }
}

/// Write `{"error": message}` with `status`.
///
/// Falls back to a 500 plain-text body if the payload cannot be encoded.
pub fn write_error(status: StatusCode, message: &str) -> HttpResponse {
    encode_error(status, message, |payload| serde_json::to_vec(payload))
}

fn encode_error<F>(status: StatusCode, message: &str, encode: F) -> HttpResponse
where
    F: FnOnce(&ErrorResponse) -> serde_json::Result<Vec<u8>>,
{
    let payload = ErrorResponse {
        error: message.to_owned(),
    };
    match encode(&payload) {
        Ok(bytes) => HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(bytes),
        Err(err) => {
            error!(error = %err, "could not encode error response body");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body(ENCODE_FAILURE_BODY)
        }
    }
}

#[cfg(test)]
mod tests;
