//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::inbound::http::app::AppOptions;
use backend::inbound::http::error::StatusPolicy;
use backend::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) options: AppOptions,
    pub(crate) status_policy: StatusPolicy,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` with the
    /// default middleware and status policy.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            options: AppOptions::default(),
            status_policy: StatusPolicy::default(),
        }
    }

    /// Derive the configuration from loaded application settings, listening
    /// on all interfaces.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], settings.port())))
            .with_options(settings.app_options())
            .with_status_policy(settings.status_policy())
    }

    /// Replace the middleware switches.
    #[must_use]
    pub fn with_options(mut self, options: AppOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the status policy applied to handler failures.
    #[must_use]
    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }
}
