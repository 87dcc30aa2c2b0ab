//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use tracing::info;

use backend::domain::ports::PostRepository;
use backend::inbound::http::app::build_app;
use backend::inbound::http::state::HttpState;

/// Construct the HTTP server serving `posts` with the given configuration.
///
/// The repository is shared by every worker; each worker builds its own
/// middleware chain.
///
/// # Errors
/// Returns [`std::io::Error`] if the listener cannot bind.
pub fn create_server(
    posts: Arc<dyn PostRepository>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        options,
        status_policy,
    } = config;
    let http_state = web::Data::new(HttpState::new(posts, status_policy));

    let server = HttpServer::new(move || build_app(http_state.clone(), options))
        .bind(bind_addr)?
        .run();

    info!(
        addr = %bind_addr,
        request_logging = options.request_logging,
        cors = options.cors,
        "server listening"
    );
    Ok(server)
}
