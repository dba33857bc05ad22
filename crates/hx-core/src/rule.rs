//! Rule definitions: a named predicate over a sleep session plus a fixed outcome.

use thiserror::Error;

use crate::sleep::SleepSession;
use crate::symptom::Symptom;
use crate::time::{TimeError, hour_of_day};
use crate::types::{RuleId, ValidationError};

/// Why a rule condition could not be decided for a fact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// The rule needs a field the fact does not carry.
    #[error("{field} is required but missing")]
    MissingField { field: &'static str },

    /// A timestamp field could not be parsed.
    #[error("{field} could not be read")]
    Timestamp {
        field: &'static str,
        #[source]
        source: TimeError,
    },
}

/// A rule predicate.
///
/// Plain function pointers keep conditions free of captured state, so a rule
/// cannot mutate anything between evaluations.
pub type Condition = fn(&SleepSession) -> Result<bool, ConditionError>;

/// One diagnostic heuristic.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: RuleId,
    /// Diagnostic-only description.
    pub description: String,
    pub condition: Condition,
    /// Emitted verbatim when the condition holds.
    pub outcome: Symptom,
}

impl Rule {
    pub fn new(
        id: &str,
        description: impl Into<String>,
        condition: Condition,
        outcome: Symptom,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: RuleId::new(id)?,
            description: description.into(),
            condition,
            outcome,
        })
    }

    /// Run the condition against `fact`.
    pub fn matches(&self, fact: &SleepSession) -> Result<bool, ConditionError> {
        (self.condition)(fact)
    }
}

/// Unwrap an optional fact field a condition depends on.
pub fn require<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ConditionError> {
    value.ok_or(ConditionError::MissingField { field })
}

/// UTC hour of an optional timestamp field.
pub fn hour_of(field: &'static str, value: Option<&str>) -> Result<u32, ConditionError> {
    let value = require(field, value)?;
    hour_of_day(value).map_err(|source| ConditionError::Timestamp { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SleepSource;
    use crate::symptom::{Severity, SymptomCode};

    fn session(rem_start: Option<&str>) -> SleepSession {
        SleepSession {
            sleep_start: "2025-01-09T23:00:00Z".to_string(),
            sleep_end: "2025-01-10T06:00:00Z".to_string(),
            total_sleep_minutes: 300,
            rem_start: rem_start.map(String::from),
            rem_end: None,
            deep_sleep_minutes: None,
            light_sleep_minutes: None,
            source: SleepSource::Manual,
        }
    }

    #[test]
    fn hour_of_reports_missing_field() {
        let err = hour_of("remStart", None).unwrap_err();
        assert_eq!(err, ConditionError::MissingField { field: "remStart" });
        assert_eq!(err.to_string(), "remStart is required but missing");
    }

    #[test]
    fn hour_of_reports_malformed_timestamp() {
        let err = hour_of("remStart", Some("05:00")).unwrap_err();
        assert!(matches!(err, ConditionError::Timestamp { field: "remStart", .. }));
    }

    #[test]
    fn matches_invokes_condition() {
        let rule = Rule::new(
            "RULE_HAS_REM",
            "REM recorded",
            |s| Ok(s.rem_start.is_some()),
            Symptom::new(SymptomCode::Foggy, Severity::Low, "test"),
        )
        .unwrap();

        assert!(rule.matches(&session(Some("2025-01-10T02:00:00Z"))).unwrap());
        assert!(!rule.matches(&session(None)).unwrap());
    }

    #[test]
    fn rule_rejects_empty_id() {
        let result = Rule::new(
            "",
            "nothing",
            |_| Ok(false),
            Symptom::new(SymptomCode::Foggy, Severity::Low, "test"),
        );
        assert!(result.is_err());
    }
}
