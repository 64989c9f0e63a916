//! Connection readiness checks and column codecs shared by repositories.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::validation::{
    format_date, format_time, format_timestamp, parse_date, parse_time, parse_timestamp,
};
use crate::repo::error::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, Row};
use std::collections::HashSet;

/// Checks that `conn` is migrated and that `table` carries `columns`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let present = column_names(conn, table)?;
    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }
    match columns
        .iter()
        .copied()
        .find(|column| !present.contains(*column))
    {
        Some(column) => Err(RepoError::MissingRequiredColumn { table, column }),
        None => Ok(()),
    }
}

/// Fails with `ReferenceNotFound` when `table` has no row with `id`.
pub(crate) fn ensure_row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::ReferenceNotFound { table, id });
    }
    Ok(())
}

/// Empty when the table does not exist.
fn column_names(conn: &Connection, table: &str) -> RepoResult<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let mut rows = stmt.query([table])?;
    let mut names = HashSet::new();
    while let Some(row) = rows.next()? {
        names.insert(row.get::<_, String>(0)?);
    }
    Ok(names)
}

pub(crate) fn date_to_db(value: NaiveDate) -> String {
    format_date(value)
}

pub(crate) fn time_to_db(value: NaiveTime) -> String {
    format_time(value)
}

pub(crate) fn timestamp_to_db(value: NaiveDateTime) -> String {
    format_timestamp(value)
}

pub(crate) fn read_date(row: &Row<'_>, column: &'static str) -> RepoResult<NaiveDate> {
    let text: String = row.get(column)?;
    parse_date(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in column {column}")))
}

pub(crate) fn read_time(row: &Row<'_>, column: &'static str) -> RepoResult<NaiveTime> {
    let text: String = row.get(column)?;
    parse_time(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid time `{text}` in column {column}")))
}

pub(crate) fn read_timestamp(row: &Row<'_>, column: &'static str) -> RepoResult<NaiveDateTime> {
    let text: String = row.get(column)?;
    parse_timestamp(&text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{text}` in column {column}"))
    })
}

pub(crate) fn read_optional_timestamp(
    row: &Row<'_>,
    column: &'static str,
) -> RepoResult<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => parse_timestamp(&text).map(Some).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid timestamp `{text}` in column {column}"))
        }),
        None => Ok(None),
    }
}

pub(crate) fn read_bool(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in column {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
