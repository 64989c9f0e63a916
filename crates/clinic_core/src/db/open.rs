//! Connection bootstrap.
//!
//! # Invariants
//! - Returned connections enforce foreign keys and wait on locks instead of
//!   failing immediately.
//! - File databases run in WAL mode so the HTTP server's per-request
//!   connections can read while another request writes.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const LOCK_WAIT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens (creating if needed) the database file at `path`, migrated to the
/// latest schema.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open(Target::File(path.as_ref()))
}

/// Opens a private in-memory database, migrated to the latest schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open(Target::Memory)
}

fn open(target: Target<'_>) -> DbResult<Connection> {
    let started = Instant::now();
    let result: DbResult<Connection> = target
        .connect()
        .map_err(Into::into)
        .and_then(|mut conn| configure(&mut conn, target).map(|()| conn));

    let elapsed_ms = started.elapsed().as_millis();
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            target.label(),
            elapsed_ms
        ),
        Err(err) => warn!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            target.label(),
            elapsed_ms,
            err
        ),
    }
    result
}

fn configure(conn: &mut Connection, target: Target<'_>) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(LOCK_WAIT)?;
    if let Target::File(_) = target {
        // journal_mode answers with the resulting mode, so it must be queried.
        let _mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get(0)
        })?;
    }
    apply_migrations(conn)
}
