//! Explicit runtime configuration for the clinic store.
//!
//! # Responsibility
//! - Carry the database path and logging settings from process startup to
//!   the data-access layer.
//!
//! # Invariants
//! - There is no process-global database path; every connection is opened
//!   from a `ClinicConfig` value.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging, init_server_logging};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// File name used when no database path is supplied.
pub const DEFAULT_DB_FILE_NAME: &str = "clinic.sqlite3";

/// Runtime configuration shared by the console and HTTP front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicConfig {
    /// SQLite database file; created on first open.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl ClinicConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Opens a migrated connection to the configured database file.
    pub fn open_db(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled by configuration.
    pub fn init_logging(&self) -> Result<bool, String> {
        self.start_logging(init_logging)
    }

    /// Like [`ClinicConfig::init_logging`], also echoing warnings to stderr.
    pub fn init_server_logging(&self) -> Result<bool, String> {
        self.start_logging(init_server_logging)
    }

    fn start_logging(
        &self,
        init: fn(&str, &Path) -> Result<(), String>,
    ) -> Result<bool, String> {
        let Some(log_dir) = self.log_dir.as_deref() else {
            return Ok(false);
        };
        init(&self.log_level, log_dir)?;
        Ok(true)
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_default_file_without_logging() {
        let config = ClinicConfig::default();
        assert_eq!(config.db_path(), Path::new(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.init_logging(), Ok(false));
        assert_eq!(config.init_server_logging(), Ok(false));
    }

    #[test]
    fn open_db_creates_file_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClinicConfig::new(dir.path().join("nested.sqlite3"));

        let conn = config.open_db().unwrap();
        drop(conn);

        assert!(config.db_path().exists());
    }
}
