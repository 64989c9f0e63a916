//! Rolling file logs for the clinic binaries.
//!
//! # Responsibility
//! - Start one `flexi_logger` backend per process.
//! - Keep log lines metadata-only (row ids, error codes). Patient names and
//!   clinical free text never reach the log files.
//!
//! # Invariants
//! - Repeating initialization with identical settings is a no-op.
//! - Changing level, directory or echo mode after start is an error.
//! - Initialization reports failures as `Err`, it never panics.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "clinic";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 7;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Supported log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown log level `{other}`; use trace, debug, info, warn or error"
            )),
        }
    }
}

/// Whether log records are also mirrored to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEcho {
    /// Files only; keeps the interactive console clean.
    FileOnly,
    /// Warnings and errors are echoed to stderr as well.
    StderrWarnings,
}

impl LogEcho {
    fn duplicate(self) -> Duplicate {
        match self {
            Self::FileOnly => Duplicate::None,
            Self::StderrWarnings => Duplicate::Warn,
        }
    }
}

struct ActiveLogger {
    level: LogLevel,
    log_dir: PathBuf,
    echo: LogEcho,
    _handle: LoggerHandle,
}

/// Starts file logging for the console front end.
///
/// `log_dir` may be relative; it is resolved against the working directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    start(level.parse()?, log_dir, LogEcho::FileOnly)
}

/// Starts file logging for the HTTP server, echoing warnings to stderr.
pub fn init_server_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    start(level.parse()?, log_dir, LogEcho::StderrWarnings)
}

fn start(level: LogLevel, log_dir: &Path, echo: LogEcho) -> Result<(), String> {
    let log_dir = resolve_log_dir(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| spawn_logger(level, &log_dir, echo))?;
    if active.log_dir != log_dir || active.level != level || active.echo != echo {
        return Err(format!(
            "logging is already running (level={}, dir={}, echo={:?}); cannot switch to level={}, dir={}, echo={:?}",
            active.level,
            active.log_dir.display(),
            active.echo,
            level,
            log_dir.display(),
            echo
        ));
    }
    Ok(())
}

fn spawn_logger(level: LogLevel, log_dir: &Path, echo: LogEcho) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|err| format!("cannot create log directory {}: {err}", log_dir.display()))?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| format!("cannot parse log spec `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .duplicate_to_stderr(echo.duplicate())
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok level={} echo={:?} os={} version={}",
        level,
        echo,
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        echo,
        _handle: handle,
    })
}

/// Returns the running level and directory, or `None` before initialization.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        LogLevel::Debug.as_str()
    } else {
        LogLevel::Info.as_str()
    }
}

fn resolve_log_dir(log_dir: &Path) -> Result<PathBuf, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log directory must not be empty".to_string());
    }
    if log_dir.is_absolute() {
        return Ok(log_dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(log_dir))
        .map_err(|err| format!("cannot resolve log directory {}: {err}", log_dir.display()))
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_string());
        error!(
            "event=panic module=logging status=error location={} payload={}",
            location,
            sanitize_message(&payload, PANIC_PAYLOAD_LIMIT)
        );
        chained(panic_info);
    }));
}

/// Flattens to one line and caps at `max_chars`, marking cuts with `...`.
pub(crate) fn sanitize_message(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
