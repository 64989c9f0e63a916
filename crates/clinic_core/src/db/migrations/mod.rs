//! Ordered schema migrations tracked through `PRAGMA user_version`.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per step.
//! - Each step runs in its own transaction together with its version bump.
//! - Steps use `IF NOT EXISTS`, so tables left by an unversioned build are
//!   adopted rather than rejected.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Step {
        version: 2,
        name: "listing_indexes",
        sql: include_str!("0002_listing_indexes.sql"),
    },
];

/// Schema version this build migrates to.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Brings the connection's schema up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a
///   newer build.
/// - [`DbError::Migration`] naming the step whose SQL failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    for step in STEPS.iter().filter(|step| step.version > from) {
        let tx = conn.transaction()?;
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                source,
            })?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
    }
    Ok(())
}

/// Reads `PRAGMA user_version`; `0` for a fresh or unversioned file.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
