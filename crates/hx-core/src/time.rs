//! Timestamp helpers used by rule conditions.
//!
//! Timestamps arrive as ISO 8601 strings from the health-data integration. Parsing
//! failures are reported as [`TimeError::MalformedTimestamp`] instead of flowing into
//! comparisons as NaN.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use thiserror::Error;

/// Errors from timestamp parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The value is not an ISO 8601 timestamp.
    #[error("malformed timestamp {value:?}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parse an ISO 8601 timestamp into UTC.
///
/// Accepts RFC 3339 (`2025-01-10T03:30:00Z`, `2025-01-10T05:30:00+02:00`, fractional
/// seconds allowed). A timestamp without an offset is taken to be UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimeError> {
    let value = value.trim();
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| TimeError::MalformedTimestamp {
                value: value.to_string(),
                source: rfc_err,
            }),
    }
}

/// Minutes elapsed from `start` to `end`.
///
/// Negative when `end` precedes `start`; callers that need ordering must check it.
pub fn minutes_between(start: &str, end: &str) -> Result<f64, TimeError> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    #[expect(
        clippy::cast_precision_loss,
        reason = "sleep spans are far below f64's exact integer range"
    )]
    let millis = (end - start).num_milliseconds() as f64;
    Ok(millis / 60_000.0)
}

/// Hour of day in `[0, 23]`, evaluated in UTC.
pub fn hour_of_day(iso_time: &str) -> Result<u32, TimeError> {
    parse_timestamp(iso_time).map(|dt| dt.hour())
}
