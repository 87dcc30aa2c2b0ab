//! Structured logging setup.
//!
//! Events are formatted as JSON and written twice: to stdout and appended to
//! `posts-api.log` inside the configured log directory. `RUST_LOG` selects
//! the level, defaulting to `info`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Name of the log file created inside the log directory.
pub const LOG_FILE_NAME: &str = "posts-api.log";

/// Failures while installing the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The log file could not be opened for appending.
    #[error("could not open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A global subscriber is already installed.
    #[error("could not install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Location of the log file within `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

fn open_log_file(log_dir: &Path) -> Result<File, TelemetryError> {
    let path = log_file_path(log_dir);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| TelemetryError::OpenLogFile { path, source })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn subscriber(log_file: File) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json())
        .with(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
}

/// Install the global subscriber writing to stdout and `log_dir`.
///
/// # Errors
///
/// Returns [`TelemetryError::OpenLogFile`] when the log file cannot be
/// opened and [`TelemetryError::Install`] when a subscriber is already set.
pub fn init(log_dir: &Path) -> Result<(), TelemetryError> {
    let log_file = open_log_file(log_dir)?;
    subscriber(log_file).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;
    use tracing::info;

    #[rstest]
    fn events_are_appended_to_log_file_as_json() {
        let _guard = lock_env([("RUST_LOG", None::<String>)]);
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(log_file_path(dir.path()), "earlier line\n").expect("seed log file");

        let log_file = open_log_file(dir.path()).expect("open log file");
        tracing::subscriber::with_default(subscriber(log_file), || {
            info!(url = "/posts", body = "{}", "url hit");
        });

        let contents =
            std::fs::read_to_string(log_file_path(dir.path())).expect("read log file");
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("earlier line"));
        let event: serde_json::Value =
            serde_json::from_str(lines.next().expect("event line")).expect("json event");
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "url hit");
        assert_eq!(event["fields"]["url"], "/posts");
        assert_eq!(event["fields"]["body"], "{}");
    }

    #[rstest]
    fn missing_log_dir_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        let err = init(&missing).expect_err("missing dir");
        assert!(matches!(err, TelemetryError::OpenLogFile { .. }));
        assert!(err.to_string().contains(LOG_FILE_NAME));
    }
}
