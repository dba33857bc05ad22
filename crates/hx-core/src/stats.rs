//! Per-user symptom history and scoring of evaluation results.
//!
//! Counters are maintained by an external analytics service. This crate only reads
//! them.

use serde::{Deserialize, Serialize};

use crate::engine::EvaluationResult;
use crate::scoring::{confidence_score, final_probability, user_probability};
use crate::symptom::SymptomCode;
use crate::types::{Probability, UserId, ValidationError};

/// Running trigger/confirmation counters for one user and symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSymptomStats {
    pub user_id: UserId,
    pub symptom: SymptomCode,
    /// Times the rule fired for this user.
    pub triggered_count: u32,
    /// Times the user said the symptom was real.
    pub confirmed_count: u32,
}

impl UserSymptomStats {
    pub fn confidence(&self) -> Probability {
        confidence_score(f64::from(self.triggered_count))
    }

    /// Fails if the counters report more confirmations than triggers.
    pub fn user_probability(&self) -> Result<Probability, ValidationError> {
        user_probability(
            f64::from(self.confirmed_count),
            f64::from(self.triggered_count),
        )
    }

    /// All three scores at once.
    pub fn scores(&self, population: Probability) -> Result<SymptomScores, ValidationError> {
        let user = self.user_probability()?;
        Ok(SymptomScores {
            confidence: self.confidence(),
            user_probability: user,
            final_probability: final_probability(population, user),
        })
    }
}

/// Calibrated values attached to a triggered symptom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomScores {
    pub confidence: Probability,
    pub user_probability: Probability,
    pub final_probability: Probability,
}

/// An evaluation result with the user's scores, when history exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    #[serde(flatten)]
    pub result: EvaluationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<SymptomScores>,
}

/// Attach `user`'s scores to each result whose symptom appears in `stats`.
///
/// Records of other users are skipped, and two records for the same user and
/// symptom are rejected. `population` supplies the base rate for a symptom.
/// Results keep their order.
pub fn score_results(
    results: Vec<EvaluationResult>,
    stats: &[UserSymptomStats],
    user: &UserId,
    population: impl Fn(SymptomCode) -> Probability,
) -> Result<Vec<ScoredResult>, ValidationError> {
    results
        .into_iter()
        .map(|result| {
            let code = result.symptom.code;
            let mut records = stats
                .iter()
                .filter(|s| &s.user_id == user && s.symptom == code);
            let record = records.next();
            if records.next().is_some() {
                return Err(ValidationError::DuplicateHistory {
                    user: user.to_string(),
                    symptom: code.as_str(),
                });
            }
            let scores = record.map(|s| s.scores(population(code))).transpose()?;
            Ok(ScoredResult { result, scores })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symptom::{Severity, Symptom};
    use crate::types::RuleId;
    use chrono::{TimeZone, Utc};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn stats_for(id: &str, triggered: u32, confirmed: u32) -> UserSymptomStats {
        UserSymptomStats {
            user_id: user(id),
            symptom: SymptomCode::Tired,
            triggered_count: triggered,
            confirmed_count: confirmed,
        }
    }

    fn stats(triggered: u32, confirmed: u32) -> UserSymptomStats {
        stats_for("user_001", triggered, confirmed)
    }

    fn result(code: SymptomCode) -> EvaluationResult {
        EvaluationResult {
            rule_id: RuleId::new("RULE_X").unwrap(),
            symptom: Symptom::new(code, Severity::High, "reason"),
            triggered_at: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
        }
    }

    fn half(_: SymptomCode) -> Probability {
        Probability::new(0.5).unwrap()
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact rational results")]
    fn scores_for_five_of_ten() {
        let scores = stats(10, 5).scores(Probability::new(0.5).unwrap()).unwrap();
        assert_eq!(scores.user_probability.value(), 0.5);
        assert_eq!(scores.final_probability.value(), 0.5);
        assert!((scores.confidence.value() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn empty_counters_score_as_no_history() {
        let s = stats(0, 0);
        assert!((s.confidence().value() - 0.4).abs() < 1e-12);
        assert!((s.user_probability().unwrap().value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn inconsistent_counters_are_rejected() {
        assert!(stats(2, 3).user_probability().is_err());
        assert!(stats(2, 3).scores(Probability::ONE).is_err());
    }

    #[test]
    fn score_results_attaches_matching_stats_only() {
        let results = vec![result(SymptomCode::Tired), result(SymptomCode::Foggy)];
        let scored = score_results(results, &[stats(10, 5)], &user("user_001"), half).unwrap();

        assert_eq!(scored.len(), 2);
        assert!(scored[0].scores.is_some());
        assert_eq!(scored[1].scores, None);
    }

    #[test]
    fn score_results_picks_the_requested_user() {
        let history = [stats_for("alice", 40, 0), stats_for("bob", 40, 40)];

        let bob = score_results(vec![result(SymptomCode::Tired)], &history, &user("bob"), half)
            .unwrap();
        let bob_scores = bob[0].scores.unwrap();
        assert!(bob_scores.user_probability.value() > 0.95);

        let alice = score_results(vec![result(SymptomCode::Tired)], &history, &user("alice"), half)
            .unwrap();
        assert!(alice[0].scores.unwrap().user_probability.value() < 0.05);
    }

    #[test]
    fn score_results_skips_other_users() {
        let scored = score_results(
            vec![result(SymptomCode::Tired)],
            &[stats_for("alice", 10, 5)],
            &user("carol"),
            half,
        )
        .unwrap();
        assert_eq!(scored[0].scores, None);
    }

    #[test]
    fn score_results_rejects_duplicate_records() {
        let history = [stats(10, 5), stats(3, 1)];
        let err = score_results(vec![result(SymptomCode::Tired)], &history, &user("user_001"), half)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "history holds more than one TIRED record for user user_001"
        );
    }

    #[test]
    fn score_results_uses_population_per_symptom() {
        let scored = score_results(
            vec![result(SymptomCode::Tired)],
            &[stats(0, 0)],
            &user("user_001"),
            |code| {
                if code == SymptomCode::Tired {
                    Probability::ONE
                } else {
                    Probability::ZERO
                }
            },
        )
        .unwrap();

        let final_p = scored[0].scores.unwrap().final_probability.value();
        assert!((final_p - 0.8).abs() < 1e-12);
    }

    #[test]
    fn stats_deserialize_camel_case() {
        let json = r#"{"userId":"user_001","symptom":"TIRED","triggeredCount":4,"confirmedCount":1}"#;
        let parsed: UserSymptomStats = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, stats(4, 1));
    }

    #[test]
    fn stats_accept_lower_case_symptom() {
        let json = r#"{"userId":"user_001","symptom":"tired","triggeredCount":4,"confirmedCount":1}"#;
        let parsed: UserSymptomStats = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.symptom, SymptomCode::Tired);
    }

    #[test]
    fn scored_result_flattens_evaluation_fields() {
        let scored =
            score_results(vec![result(SymptomCode::Tired)], &[stats(10, 5)], &user("user_001"), half)
                .unwrap();
        let json = serde_json::to_value(&scored[0]).unwrap();
        assert_eq!(json["ruleId"], "RULE_X");
        assert_eq!(json["scores"]["userProbability"], 0.5);
    }
}
