//! Route table and application assembly.
//!
//! [`configure`] registers the handlers together with the extractor settings
//! that route decode and path failures through the error responder.
//! [`build_app`] adds the optional middleware chain on top.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Condition;
use actix_web::{App, web};

use crate::domain::Error;
use crate::inbound::http::greeting::{hello, ping, reflection};
use crate::inbound::http::posts::{create_post, delete_post, get_post, update_post};
use crate::inbound::http::state::HttpState;
use crate::middleware::{Cors, RequestLog};

/// Switches for the optional middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppOptions {
    /// Log every request URL and body.
    pub request_logging: bool,
    /// Inject permissive CORS headers and answer preflight requests.
    pub cors: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            request_logging: true,
            cors: true,
        }
    }
}

/// Register routes, shared state and extractor error handling.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use backend::domain::ports::InMemoryPostRepository;
/// use backend::inbound::http::app::configure;
/// use backend::inbound::http::error::StatusPolicy;
/// use backend::inbound::http::state::HttpState;
///
/// let state = web::Data::new(HttpState::new(
///     Arc::new(InMemoryPostRepository::new()),
///     StatusPolicy::Flat,
/// ));
/// let _app = App::new().configure(|cfg| configure(cfg, state));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<HttpState>) {
    let policy = state.status_policy();

    // Clients are not required to send a JSON content type.
    let json_config = web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(move |err, _req| {
            policy.reject(Error::invalid_input(err.to_string())).into()
        });
    let path_config = web::PathConfig::default().error_handler(move |err, _req| {
        policy.reject(Error::invalid_input(err.to_string())).into()
    });

    cfg.app_data(state)
        .app_data(json_config)
        .app_data(path_config)
        .service(hello)
        .service(ping)
        .service(reflection)
        .service(create_post)
        .service(get_post)
        .service(update_post)
        .service(delete_post);
}

/// Assemble the application: routes wrapped by request logging, then CORS.
pub fn build_app(
    state: web::Data<HttpState>,
    options: AppOptions,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .configure(|cfg| configure(cfg, state))
        .wrap(Condition::new(
            options.request_logging,
            RequestLog::default(),
        ))
        .wrap(Condition::new(options.cors, Cors))
}
