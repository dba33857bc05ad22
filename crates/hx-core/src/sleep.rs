//! Sleep session facts.

use serde::{Deserialize, Serialize};

use crate::source::SleepSource;
use crate::time::{TimeError, minutes_between, parse_timestamp};
use crate::types::ValidationError;

/// One night of sleep as delivered by the health-data integration.
///
/// Timestamps are kept as the ISO 8601 strings the integration produced; rules parse
/// them on demand and report malformed values as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    pub sleep_start: String,
    pub sleep_end: String,
    /// Sleep time excluding wake interruptions.
    pub total_sleep_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rem_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rem_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_sleep_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_sleep_minutes: Option<u32>,
    pub source: SleepSource,
}

impl SleepSession {
    /// Total sleep in hours.
    pub fn total_sleep_hours(&self) -> f64 {
        f64::from(self.total_sleep_minutes) / 60.0
    }

    /// Check the ordering invariants of the fact.
    ///
    /// - `sleepEnd` must be after `sleepStart`
    /// - `remEnd` must be after `remStart` when both are present
    ///
    /// A `totalSleepMinutes` larger than the sleep span is logged, not rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let span = ordered_span(
            ("sleepStart", &self.sleep_start),
            ("sleepEnd", &self.sleep_end),
        )?;

        if let (Some(rem_start), Some(rem_end)) = (&self.rem_start, &self.rem_end) {
            ordered_span(("remStart", rem_start), ("remEnd", rem_end))?;
        } else {
            for (field, value) in [("remStart", &self.rem_start), ("remEnd", &self.rem_end)] {
                if let Some(value) = value {
                    check_timestamp(field, value)?;
                }
            }
        }

        if f64::from(self.total_sleep_minutes) > span {
            tracing::warn!(
                total_sleep_minutes = self.total_sleep_minutes,
                span_minutes = span,
                "total sleep exceeds the session span"
            );
        }

        Ok(())
    }
}

fn check_timestamp(field: &'static str, value: &str) -> Result<(), ValidationError> {
    parse_timestamp(value)
        .map(|_| ())
        .map_err(|err| malformed(field, err))
}

/// Minutes from `start` to `end`, requiring `end` to be strictly later.
fn ordered_span(
    (start_field, start): (&'static str, &str),
    (end_field, end): (&'static str, &str),
) -> Result<f64, ValidationError> {
    check_timestamp(start_field, start)?;
    check_timestamp(end_field, end)?;
    let span = minutes_between(start, end).map_err(|err| malformed(end_field, err))?;
    if span <= 0.0 {
        return Err(ValidationError::OutOfOrder {
            start_field,
            start: start.to_string(),
            end_field,
            end: end.to_string(),
        });
    }
    Ok(span)
}

fn malformed(field: &'static str, err: TimeError) -> ValidationError {
    match err {
        TimeError::MalformedTimestamp { value, .. } => {
            ValidationError::MalformedTimestamp { field, value }
        }
    }
}
