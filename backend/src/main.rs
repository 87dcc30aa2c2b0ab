//! Backend entry-point: checks the environment, then serves the posts API.

mod server;

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};

use backend::environment::{database_port, process_env, validate_environment};
use backend::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
use backend::settings::{AppSettings, DatabaseSettings};
use backend::telemetry;
use server::{ServerConfig, create_server};

const PROGRAM_NAME: &str = "posts-api";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    if let Err(problems) = validate_environment(process_env, database_port(&process_env)).await {
        for problem in problems {
            eprintln!("{problem}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let settings = AppSettings::load_from_iter([OsString::from(PROGRAM_NAME)])
        .map_err(|err| eyre!("could not load app settings: {err}"))?;
    let database = DatabaseSettings::load_from_iter([OsString::from(PROGRAM_NAME)])
        .map_err(|err| eyre!("could not load database settings: {err}"))?;
    if let Err(e) = telemetry::init(settings.log_dir()) {
        warn!(error = %e, "tracing init failed");
    }

    let pool = DbPool::new(PoolConfig::new(database.database_url()))
        .await
        .wrap_err("could not create database pool")?;
    info!(host = database.host(), port = database.port(), "database pool ready");

    let server = create_server(
        Arc::new(DieselPostRepository::new(pool)),
        ServerConfig::from_settings(&settings),
    )
    .wrap_err("could not start server")?;
    server.await.wrap_err("server terminated with an error")?;
    Ok(ExitCode::SUCCESS)
}
