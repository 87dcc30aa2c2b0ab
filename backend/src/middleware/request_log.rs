//! Request logging middleware.
//!
//! The request body is read into memory exactly once as a [`BufferedBody`].
//! Those bytes feed the `url hit` log event and are then handed back to the
//! request as a fresh payload, so extractors further down decode the same
//! bytes the log recorded. Bodies larger than the configured limit are
//! refused before they are fully buffered.

use std::borrow::Cow;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::PayloadError;
use actix_web::http::header::ContentType;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::StreamExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info};

/// Plain-text body returned when the request body cannot be read.
pub const READ_FAILURE_BODY: &str = "Could not read request body";

/// Default cap on buffered bodies; matches the JSON extractor limit.
pub const DEFAULT_BODY_LIMIT: usize = 2_097_152;

/// Failures while capturing a request body.
#[derive(Debug, thiserror::Error)]
pub enum BodyReadError {
    /// The payload stream failed.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The body grew past the configured limit.
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// A request body captured in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedBody(Bytes);

impl BufferedBody {
    /// Drain `payload` into memory, refusing more than `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BodyReadError::Payload`] for the first stream failure and
    /// [`BodyReadError::TooLarge`] once the limit is exceeded.
    pub async fn read(mut payload: Payload, limit: usize) -> Result<Self, BodyReadError> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = payload.next().await {
            let chunk = chunk?;
            if buffer.len() + chunk.len() > limit {
                return Err(BodyReadError::TooLarge { limit });
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(Self(buffer.freeze()))
    }

    /// Raw captured bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    /// Captured bytes as text for logging; invalid UTF-8 is replaced.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Turn the captured bytes into a payload readable from the start.
    pub fn into_payload(self) -> Payload {
        let (_sender, mut payload) = actix_http::h1::Payload::create(true);
        payload.unread_data(self.0);
        payload.into()
    }
}

/// Middleware logging the URL and body of every request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::RequestLog;
///
/// let app = App::new().wrap(RequestLog::default().with_limit(64 * 1024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLog {
    limit: usize,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self {
            limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl RequestLog {
    /// Replace the maximum number of body bytes buffered per request.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware {
            service: Rc::new(service),
            limit: self.limit,
        }))
    }
}

/// Service wrapper produced by [`RequestLog`].
pub struct RequestLogMiddleware<S> {
    service: Rc<S>,
    limit: usize,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limit = self.limit;
        Box::pin(async move {
            let method = req.method().clone();
            let url = req.uri().to_string();
            let body = match BufferedBody::read(req.take_payload(), limit).await {
                Ok(body) => body,
                Err(err) => {
                    error!(
                        method = %method,
                        url = %url,
                        error = %err,
                        "could not read request body"
                    );
                    let response = HttpResponse::InternalServerError()
                        .content_type(ContentType::plaintext())
                        .body(READ_FAILURE_BODY);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            info!(method = %method, url = %url, body = %body.as_text(), "url hit");
            req.set_payload(body.into_payload());

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
