//! HTTP server entry point.

use anyhow::{Context, Result};
use clap::Parser;
use clinic_core::{default_log_level, ClinicConfig, DEFAULT_DB_FILE_NAME};
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clinic-http")]
#[command(author, version, about = "Clinic & lab records JSON API", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "CLINIC_DB_PATH", default_value = DEFAULT_DB_FILE_NAME)]
    db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CLINIC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; file logging is off when unset
    #[arg(long, env = "CLINIC_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "CLINIC_BIND", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ClinicConfig::new(cli.db_path)
        .with_log_level(cli.log_level.unwrap_or_else(|| default_log_level().to_string()));
    if let Some(log_dir) = cli.log_dir {
        config = config.with_log_dir(log_dir);
    }

    config
        .init_server_logging()
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    // Migrate once up front so a bad database fails at startup.
    drop(
        config
            .open_db()
            .with_context(|| format!("failed to open database {}", config.db_path().display()))?,
    );

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(
        "event=http_start module=http status=ok bind={} version={}",
        cli.bind,
        clinic_core::core_version()
    );

    axum::serve(listener, clinic_http::router(config))
        .await
        .context("server error")?;
    Ok(())
}
