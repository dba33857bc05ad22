//! Rule registry and evaluator.
//!
//! A [`RuleRegistry`] is assembled once through [`RuleRegistryBuilder`] and never
//! mutated afterwards. Evaluation runs every rule in registration order and returns
//! one [`EvaluationResult`] per rule whose condition held.
//!
//! A failing condition aborts the whole evaluation. Skipping the rule would make
//! the caller see "no symptoms" for a fact that was never actually checked.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rule::{ConditionError, Rule};
use crate::rules::standard_rules;
use crate::sleep::SleepSession;
use crate::symptom::Symptom;
use crate::types::RuleId;

/// A rule that fired for a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub rule_id: RuleId,
    pub symptom: Symptom,
    /// Wall-clock time of the evaluation, not derived from the fact.
    pub triggered_at: DateTime<Utc>,
}

/// A rule condition failed while evaluating a fact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("rule {rule_id} could not be evaluated")]
pub struct EvaluationError {
    pub rule_id: RuleId,
    #[source]
    pub source: ConditionError,
}

/// Errors from assembling a registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two rules share an ID.
    #[error("duplicate rule ID: {0}")]
    DuplicateRuleId(RuleId),
}

/// Builder for [`RuleRegistry`].
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Rule>,
}

impl RuleRegistryBuilder {
    /// Append a rule. Rules are evaluated in the order they are added.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Finish the registry, rejecting duplicate rule IDs.
    pub fn build(self) -> Result<RuleRegistry, RegistryError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(RegistryError::DuplicateRuleId(rule.id.clone()));
            }
        }
        Ok(RuleRegistry { rules: self.rules })
    }
}

/// An immutable, ordered set of rules.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// Registry holding the shipped rule set.
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    /// Registered rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against `fact`, stamping results with the current time.
    pub fn evaluate(&self, fact: &SleepSession) -> Result<Vec<EvaluationResult>, EvaluationError> {
        self.evaluate_at(fact, Utc::now())
    }

    /// Evaluate every rule against `fact`, stamping results with `now`.
    ///
    /// Results follow registration order. The first failing condition is returned
    /// as an error and no partial results are produced.
    pub fn evaluate_at(
        &self,
        fact: &SleepSession,
        now: DateTime<Utc>,
    ) -> Result<Vec<EvaluationResult>, EvaluationError> {
        let mut results = Vec::new();

        for rule in &self.rules {
            let fired = rule.matches(fact).map_err(|source| EvaluationError {
                rule_id: rule.id.clone(),
                source,
            })?;

            if fired {
                tracing::debug!(rule_id = %rule.id, symptom = %rule.outcome.code, "rule fired");
                results.push(EvaluationResult {
                    rule_id: rule.id.clone(),
                    symptom: rule.outcome.clone(),
                    triggered_at: now,
                });
            }
        }

        Ok(results)
    }

    /// Evaluate independent facts in parallel.
    ///
    /// Returns one outcome per fact, in input order. A failure for one fact does not
    /// affect the others.
    pub fn evaluate_batch(
        &self,
        facts: &[SleepSession],
    ) -> Vec<Result<Vec<EvaluationResult>, EvaluationError>> {
        facts.par_iter().map(|fact| self.evaluate(fact)).collect()
    }
}

static STANDARD_REGISTRY: LazyLock<RuleRegistry> = LazyLock::new(RuleRegistry::standard);

/// Evaluate `fact` against the process-wide standard registry.
pub fn evaluate_rules(fact: &SleepSession) -> Result<Vec<EvaluationResult>, EvaluationError> {
    STANDARD_REGISTRY.evaluate(fact)
}

/// The process-wide standard registry.
pub fn standard_registry() -> &'static RuleRegistry {
    &STANDARD_REGISTRY
}
