//! Short night with a late first REM cycle.

use crate::rule::{ConditionError, Rule, hour_of};
use crate::sleep::SleepSession;
use crate::symptom::{Severity, Symptom, SymptomCode};
use crate::types::RuleId;

pub const RULE_ID: &str = "RULE_TIRED_LOW_SLEEP_LATE_REM";

/// Nights shorter than this many hours count as low sleep.
const MIN_SLEEP_HOURS: f64 = 6.0;

/// A first REM cycle starting at or after this UTC hour counts as delayed.
const LATE_REM_HOUR: u32 = 4;

/// Sleep under six hours and REM starting at 04:00 or later.
pub fn rule() -> Rule {
    Rule {
        id: RuleId::new(RULE_ID).expect("rule ID constant is never empty"),
        description: "Sleep < 6h and REM starts late".to_string(),
        condition,
        outcome: Symptom::new(
            SymptomCode::Tired,
            Severity::High,
            "Less than 6 hours of sleep and delayed REM cycle",
        ),
    }
}

fn condition(sleep: &SleepSession) -> Result<bool, ConditionError> {
    let total_sleep_hours = sleep.total_sleep_hours();

    // A present remStart is parsed even on long nights.
    let rem_start_hour = match sleep.rem_start.as_deref() {
        Some(rem_start) => hour_of("remStart", Some(rem_start))?,
        None if total_sleep_hours >= MIN_SLEEP_HOURS => {
            tracing::debug!(total_sleep_hours, "enough sleep, no REM onset recorded");
            return Ok(false);
        }
        None => return Err(ConditionError::MissingField { field: "remStart" }),
    };
    tracing::debug!(total_sleep_hours, rem_start_hour, "evaluated tired rule");

    Ok(total_sleep_hours < MIN_SLEEP_HOURS && rem_start_hour >= LATE_REM_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SleepSource;

    fn session(total_sleep_minutes: u32, rem_start: Option<&str>) -> SleepSession {
        SleepSession {
            sleep_start: "2025-01-10T00:00:00Z".to_string(),
            sleep_end: "2025-01-10T07:00:00Z".to_string(),
            total_sleep_minutes,
            rem_start: rem_start.map(String::from),
            rem_end: None,
            deep_sleep_minutes: None,
            light_sleep_minutes: None,
            source: SleepSource::AppleHealth,
        }
    }

    #[test]
    fn fires_for_short_sleep_and_late_rem() {
        let rule = rule();
        assert!(rule.matches(&session(300, Some("2025-01-10T05:00:00Z"))).unwrap());
        assert!(rule.matches(&session(359, Some("2025-01-10T04:00:00Z"))).unwrap());
        assert!(rule.matches(&session(0, Some("2025-01-10T23:10:00Z"))).unwrap());
    }

    #[test]
    fn does_not_fire_for_early_rem() {
        let rule = rule();
        assert!(!rule.matches(&session(320, Some("2025-01-10T03:30:00Z"))).unwrap());
        assert!(!rule.matches(&session(100, Some("2025-01-10T03:59:59Z"))).unwrap());
    }

    #[test]
    fn does_not_fire_for_six_hours_or_more() {
        let rule = rule();
        assert!(!rule.matches(&session(360, Some("2025-01-10T05:00:00Z"))).unwrap());
        assert!(!rule.matches(&session(480, Some("2025-01-10T06:00:00Z"))).unwrap());
    }

    #[test]
    fn long_night_without_rem_is_not_an_error() {
        assert!(!rule().matches(&session(420, None)).unwrap());
    }

    #[test]
    fn long_night_with_bad_rem_is_an_error() {
        let err = rule().matches(&session(420, Some("garbage"))).unwrap_err();
        assert!(matches!(err, ConditionError::Timestamp { field: "remStart", .. }));
    }

    #[test]
    fn short_night_without_rem_is_an_error() {
        let err = rule().matches(&session(300, None)).unwrap_err();
        assert_eq!(err, ConditionError::MissingField { field: "remStart" });
    }

    #[test]
    fn short_night_with_bad_rem_is_an_error() {
        let err = rule().matches(&session(300, Some("5am"))).unwrap_err();
        assert!(matches!(err, ConditionError::Timestamp { field: "remStart", .. }));
    }

    #[test]
    fn outcome_is_tired_high() {
        let rule = rule();
        assert_eq!(rule.id.as_str(), "RULE_TIRED_LOW_SLEEP_LATE_REM");
        assert_eq!(rule.outcome.code, SymptomCode::Tired);
        assert_eq!(rule.outcome.severity, Severity::High);
        assert_eq!(
            rule.outcome.reason,
            "Less than 6 hours of sleep and delayed REM cycle"
        );
    }
}
