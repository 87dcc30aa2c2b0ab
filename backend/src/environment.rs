//! Pre-flight environment checks run before the server starts.
//!
//! The check reads `APP_PORT`, `APP_LOG_DIR` and `DATABASE_HOST`, confirms
//! the port parses, the database host accepts TCP connections and the log
//! directory exists. Every problem found is reported, not only the first.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Variables that must be present and non-empty.
pub const REQUIRED_VARIABLES: [&str; 3] = ["APP_PORT", "APP_LOG_DIR", "DATABASE_HOST"];

/// Upper bound on the database reachability probe.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Port tried when `DATABASE_PORT` is unset or not a number.
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

/// A single failed environment check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentProblem {
    /// A required variable is unset or empty.
    #[error("{name} could not be found")]
    Missing { name: &'static str },
    /// `APP_PORT` is not a valid port number.
    #[error("{value} is not a valid APP_PORT")]
    InvalidPort { value: String },
    /// The database host refused or timed out the TCP probe.
    #[error("Could not connect to {host}")]
    Unreachable { host: String },
    /// The log directory is absent.
    #[error("{} log dir does not exist", .dir.display())]
    MissingLogDir { dir: PathBuf },
    /// The log directory could not be inspected.
    #[error("Could not stat log dir {message}")]
    LogDirStat { message: String },
}

/// Values confirmed by [`validate_environment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEnvironment {
    /// Parsed `APP_PORT`.
    pub port: u16,
    /// Existing `APP_LOG_DIR`.
    pub log_dir: PathBuf,
    /// Reachable `DATABASE_HOST`.
    pub database_host: String,
}

/// Read a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Database port read through `lookup`, falling back to
/// [`DEFAULT_DATABASE_PORT`].
pub fn database_port<F>(lookup: &F) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    lookup("DATABASE_PORT")
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_DATABASE_PORT)
}

/// Check the environment exposed by `lookup`.
///
/// Missing variables are reported together and end the check early. The
/// remaining checks all run and their problems are collected.
///
/// # Errors
///
/// Returns every [`EnvironmentProblem`] found.
///
/// # Examples
/// ```
/// use backend::environment::validate_environment;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let problems = validate_environment(|_| None, 5432).await.unwrap_err();
/// assert_eq!(problems.len(), 3);
/// assert_eq!(problems[0].to_string(), "APP_PORT could not be found");
/// # });
/// ```
pub async fn validate_environment<F>(
    lookup: F,
    database_port: u16,
) -> Result<ValidatedEnvironment, Vec<EnvironmentProblem>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = Vec::with_capacity(REQUIRED_VARIABLES.len());
    let mut problems = Vec::new();
    for name in REQUIRED_VARIABLES {
        match lookup(name).filter(|value| !value.is_empty()) {
            Some(value) => values.push(value),
            None => problems.push(EnvironmentProblem::Missing { name }),
        }
    }
    let [raw_port, log_dir, host] = match <[String; 3]>::try_from(values) {
        Ok(values) if problems.is_empty() => values,
        _ => return Err(problems),
    };

    let port = match raw_port.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            problems.push(EnvironmentProblem::InvalidPort { value: raw_port });
            None
        }
    };

    if !database_reachable(&host, database_port).await {
        problems.push(EnvironmentProblem::Unreachable { host: host.clone() });
    }

    let log_dir = PathBuf::from(log_dir);
    if let Err(err) = std::fs::metadata(&log_dir) {
        problems.push(if err.kind() == ErrorKind::NotFound {
            EnvironmentProblem::MissingLogDir {
                dir: log_dir.clone(),
            }
        } else {
            EnvironmentProblem::LogDirStat {
                message: err.to_string(),
            }
        });
    }

    match port {
        Some(port) if problems.is_empty() => Ok(ValidatedEnvironment {
            port,
            log_dir,
            database_host: host,
        }),
        _ => Err(problems),
    }
}

async fn database_reachable(host: &str, port: u16) -> bool {
    match timeout(CONNECT_TIMEOUT, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(err)) => {
            debug!(host, port, error = %err, "database probe failed");
            false
        }
        Err(_) => {
            debug!(host, port, "database probe timed out");
            false
        }
    }
}
