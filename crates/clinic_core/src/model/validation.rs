//! Field validation and text encodings shared by clinic records.
//!
//! # Responsibility
//! - Reject empty required text, negative/non-finite numbers and malformed
//!   calendar values before they reach SQL.
//! - Own the on-disk text formats for dates, times and timestamps.
//!
//! # Invariants
//! - Dates are stored as `YYYY-MM-DD`, times as `HH:MM` (24h) and timestamps
//!   as `YYYY-MM-DDTHH:MM:SS` with second precision.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Validation failure for clinic record input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// Numeric field must be `>= 0`.
    NegativeValue { field: &'static str, value: f64 },
    /// Numeric field is NaN or infinite.
    NotFinite(&'static str),
    /// Value does not match `YYYY-MM-DD`.
    InvalidDate(String),
    /// Value does not match `HH:MM` (24h).
    InvalidTime(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::NegativeValue { field, value } => {
                write!(f, "{field} must be >= 0, got {value}")
            }
            Self::NotFinite(field) => write!(f, "{field} must be a finite number"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTime(value) => {
                write!(f, "invalid time `{value}`; expected HH:MM (24h)")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects empty or whitespace-only required text.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Rejects negative or non-finite amounts.
pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(())
}

/// Rejects negative integer fields such as age.
pub fn require_non_negative_int(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeValue {
            field,
            value: value as f64,
        });
    }
    Ok(())
}

/// Trims optional text; blank values become `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Parses a 24h `HH:MM` clock time.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .map_err(|_| ValidationError::InvalidTime(trimmed.to_string()))
}

pub fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn format_time(value: NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// Current local time truncated to whole seconds.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
