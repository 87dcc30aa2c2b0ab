//! Check that the environment is ready for the posts API to start.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;

use backend::environment::{database_port, process_env, validate_environment};
use clap::Parser;
use tokio::runtime::Builder;

/// `validate-environment` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "validate-environment",
    about = "Report missing variables, an unreachable database or a missing log directory",
    version
)]
struct CliArgs {
    /// Port probed on `DATABASE_HOST`; defaults to `DATABASE_PORT` or 5432.
    #[arg(long = "database-port", value_name = "port")]
    database_port: Option<u16>,
}

fn main() -> io::Result<ExitCode> {
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;

    let port = args
        .database_port
        .unwrap_or_else(|| database_port(&process_env));
    match runtime.block_on(validate_environment(process_env, port)) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(problems) => {
            for problem in problems {
                eprintln!("{problem}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
