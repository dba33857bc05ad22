//! Core domain logic for the health tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Rules: pure predicates over a sleep session that diagnose symptoms
//! - Evaluation: running an immutable rule registry against a fact
//! - Scoring: confidence and blended probabilities from a user's symptom history
//! - Recordings: folding wearable stage lists into sleep session facts

mod engine;
pub mod recording;
pub mod rule;
pub mod rules;
pub mod scoring;
mod sleep;
pub mod source;
mod stats;
pub mod symptom;
pub mod time;
pub mod types;

pub use engine::{
    EvaluationError, EvaluationResult, RegistryError, RuleRegistry, RuleRegistryBuilder,
    evaluate_rules, standard_registry,
};
pub use recording::{RecordingError, SleepRecording};
pub use rule::{ConditionError, Rule};
pub use scoring::{confidence, final_probability, user_probability};
pub use sleep::SleepSession;
pub use source::SleepSource;
pub use stats::{ScoredResult, SymptomScores, UserSymptomStats, score_results};
pub use symptom::{Severity, Symptom, SymptomCode};
pub use types::{Probability, RuleId, UserId, ValidationError};
