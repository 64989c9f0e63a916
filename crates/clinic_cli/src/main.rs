//! Interactive console for the clinic records system.

mod menu;
mod prompt;
mod table;

use anyhow::{Context, Result};
use clap::Parser;
use clinic_core::{default_log_level, ClinicConfig, ClinicService, DEFAULT_DB_FILE_NAME};
use log::info;
use menu::Console;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(author, version, about = "Clinic & lab records console", long_about = None)]
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
}

impl Cli {
    fn into_config(self) -> ClinicConfig {
        let mut config = ClinicConfig::new(self.db_path)
            .with_log_level(self.log_level.unwrap_or_else(|| default_log_level().to_string()));
        if let Some(log_dir) = self.log_dir {
            config = config.with_log_dir(log_dir);
        }
        config
    }
}

fn main() -> Result<()> {
    let config = Cli::parse().into_config();

    config
        .init_logging()
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let conn = config
        .open_db()
        .with_context(|| format!("failed to open database {}", config.db_path().display()))?;
    let service = ClinicService::try_new(&conn).context("database schema is not ready")?;
    info!("event=cli_start module=cli status=ok version={}", clinic_core::core_version());

    let stdin = io::stdin();
    Console::new(&service, stdin.lock(), io::stdout())
        .run()
        .context("console i/o failed")?;

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_local_database_without_file_logging() {
        let cli = Cli::try_parse_from(["clinic"]).unwrap();
        let config = cli.into_config();
        if std::env::var_os("CLINIC_DB_PATH").is_none() {
            assert_eq!(config.db_path(), std::path::Path::new(DEFAULT_DB_FILE_NAME));
        }
        if std::env::var_os("CLINIC_LOG_DIR").is_none() {
            assert_eq!(config.log_dir, None);
        }
    }

    #[test]
    fn cli_flags_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "clinic",
            "--db-path",
            "records.sqlite3",
            "--log-level",
            "debug",
            "--log-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = cli.into_config();

        assert_eq!(config.db_path(), std::path::Path::new("records.sqlite3"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir.as_deref(), Some(dir.path()));
    }
}
