//! Runtime settings loaded via OrthoConfig.
//!
//! Two groups are read independently: `APP_*` for the HTTP listener and
//! logging, `DATABASE_*` for the PostgreSQL connection. Each group carries a
//! defaulted port so it loads even when none of its variables are set.

use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::app::AppOptions;
use crate::inbound::http::error::StatusPolicy;

const DEFAULT_LOG_DIR: &str = ".";
const DEFAULT_DATABASE_HOST: &str = "localhost";
const DEFAULT_DATABASE_USER: &str = "postgres";
const DEFAULT_DATABASE_NAME: &str = "postgres";

/// HTTP listener, logging and middleware settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppSettings {
    /// Listener port, bound on all interfaces.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Directory receiving the JSON log file.
    pub log_dir: Option<PathBuf>,
    /// Log the URL and body of every request.
    pub request_logging: Option<bool>,
    /// Attach CORS headers and answer preflight requests.
    pub cors: Option<bool>,
    /// How error codes map onto HTTP statuses.
    pub error_statuses: Option<StatusPolicy>,
}

impl AppSettings {
    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the configured log directory, falling back to the working
    /// directory.
    pub fn log_dir(&self) -> &Path {
        self.log_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_LOG_DIR))
    }

    /// Return the configured status policy, falling back to
    /// [`StatusPolicy::Flat`].
    pub fn status_policy(&self) -> StatusPolicy {
        self.error_statuses.unwrap_or_default()
    }

    /// Whether request logging is enabled, defaulting to on.
    pub fn request_logging(&self) -> bool {
        self.request_logging.unwrap_or(true)
    }

    /// Whether CORS handling is enabled, defaulting to on.
    pub fn cors(&self) -> bool {
        self.cors.unwrap_or(true)
    }

    /// Middleware switches derived from these settings.
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            request_logging: self.request_logging(),
            cors: self.cors(),
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DATABASE")]
pub struct DatabaseSettings {
    /// Database host name.
    pub host: Option<String>,
    /// Database port.
    #[ortho_config(default = 5432)]
    pub port: u16,
    /// Role used to connect.
    pub user: Option<String>,
    /// Database name.
    pub name: Option<String>,
}

impl DatabaseSettings {
    /// Return the configured host, falling back to `localhost`.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_DATABASE_HOST)
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the configured role, falling back to `postgres`.
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_DATABASE_USER)
    }

    /// Return the configured database name, falling back to `postgres`.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_DATABASE_NAME)
    }

    /// Connection URL in the form `postgres://user@host:port/name`.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user(),
            self.host(),
            self.port(),
            self.name()
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const APP_VARS: [&str; 5] = [
        "APP_PORT",
        "APP_LOG_DIR",
        "APP_REQUEST_LOGGING",
        "APP_CORS",
        "APP_ERROR_STATUSES",
    ];
    const DATABASE_VARS: [&str; 4] = [
        "DATABASE_HOST",
        "DATABASE_PORT",
        "DATABASE_USER",
        "DATABASE_NAME",
    ];

    fn load_app() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("posts-api")]).expect("app settings load")
    }

    fn load_database() -> DatabaseSettings {
        DatabaseSettings::load_from_iter([OsString::from("posts-api")])
            .expect("database settings load")
    }

    #[rstest]
    fn app_defaults_are_used_when_missing() {
        let _guard = lock_env(APP_VARS.map(|name| (name, None::<String>)));

        let settings = load_app();
        assert_eq!(settings.port(), 8080);
        assert_eq!(settings.log_dir(), Path::new("."));
        assert_eq!(settings.status_policy(), StatusPolicy::Flat);
        assert!(settings.request_logging());
        assert!(settings.cors());
        assert_eq!(
            settings.app_options(),
            AppOptions {
                request_logging: true,
                cors: true,
            }
        );
    }

    #[rstest]
    #[case("APP_REQUEST_LOGGING", false, true)]
    #[case("APP_CORS", true, false)]
    fn one_toggle_can_be_switched_off(
        #[case] variable: &'static str,
        #[case] request_logging: bool,
        #[case] cors: bool,
    ) {
        let _guard = lock_env(APP_VARS.map(|name| {
            let value = (name == variable).then(|| "false".to_owned());
            (name, value)
        }));

        let options = load_app().app_options();
        assert_eq!(options, AppOptions { request_logging, cors });
    }

    #[rstest]
    fn error_statuses_ignore_case() {
        let _guard = lock_env(APP_VARS.map(|name| {
            let value = (name == "APP_ERROR_STATUSES").then(|| "Differentiated".to_owned());
            (name, value)
        }));

        assert_eq!(load_app().status_policy(), StatusPolicy::Differentiated);
    }

    #[rstest]
    fn app_environment_overrides_are_respected() {
        let _guard = lock_env([
            ("APP_PORT", Some("9090".to_owned())),
            ("APP_LOG_DIR", Some("/var/log/posts".to_owned())),
            ("APP_REQUEST_LOGGING", Some("false".to_owned())),
            ("APP_CORS", Some("false".to_owned())),
            ("APP_ERROR_STATUSES", Some("differentiated".to_owned())),
        ]);

        let settings = load_app();
        assert_eq!(settings.port(), 9090);
        assert_eq!(settings.log_dir(), Path::new("/var/log/posts"));
        assert_eq!(settings.status_policy(), StatusPolicy::Differentiated);
        assert_eq!(
            settings.app_options(),
            AppOptions {
                request_logging: false,
                cors: false,
            }
        );
    }

    #[rstest]
    fn database_defaults_build_local_url() {
        let _guard = lock_env(DATABASE_VARS.map(|name| (name, None::<String>)));

        let settings = load_database();
        assert_eq!(settings.port(), 5432);
        assert_eq!(
            settings.database_url(),
            "postgres://postgres@localhost:5432/postgres"
        );
    }

    #[rstest]
    fn both_groups_load_with_nothing_set() {
        let _guard = lock_env(
            APP_VARS
                .into_iter()
                .chain(DATABASE_VARS)
                .map(|name| (name, None::<String>)),
        );

        assert_eq!(load_app().port(), 8080);
        assert_eq!(load_database().host(), "localhost");
    }

    #[rstest]
    fn database_environment_overrides_are_respected() {
        let _guard = lock_env([
            ("DATABASE_HOST", Some("db.internal".to_owned())),
            ("DATABASE_PORT", Some("6543".to_owned())),
            ("DATABASE_USER", Some("writer".to_owned())),
            ("DATABASE_NAME", Some("blog".to_owned())),
        ]);

        let settings = load_database();
        assert_eq!(settings.host(), "db.internal");
        assert_eq!(settings.port(), 6543);
        assert_eq!(settings.database_url(), "postgres://writer@db.internal:6543/blog");
    }
}
