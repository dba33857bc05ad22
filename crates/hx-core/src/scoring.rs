//! Confidence scoring and probability blending.
//!
//! All functions are pure. Count inputs are `f64` because upstream analytics report
//! plain numbers; they are rejected when negative or non-finite.

use crate::types::{Probability, ValidationError};

/// Confidence reported for a symptom that has never triggered.
pub const CONFIDENCE_FLOOR: f64 = 0.4;

/// Confidence gained per trigger.
pub const CONFIDENCE_STEP: f64 = 0.02;

/// Confidence never exceeds this value.
pub const CONFIDENCE_CEILING: f64 = 0.95;

/// Weight of the population base rate in [`final_probability`].
pub const POPULATION_WEIGHT: f64 = 0.6;

/// Weight of the user's own history in [`final_probability`].
pub const USER_WEIGHT: f64 = 0.4;

/// Confidence from the number of times a rule has fired for a user.
///
/// `min(0.95, 0.4 + 0.02 * triggered_count)`: 0.4 with no history, reaching the
/// ceiling from 27.5 triggers on.
pub fn confidence(triggered_count: f64) -> Result<Probability, ValidationError> {
    let triggered_count = count("triggered count", triggered_count)?;
    Ok(confidence_score(triggered_count))
}

pub(crate) fn confidence_score(triggered_count: f64) -> Probability {
    let raw = CONFIDENCE_STEP.mul_add(triggered_count, CONFIDENCE_FLOOR);
    Probability::clamped(raw.min(CONFIDENCE_CEILING))
}

/// Laplace-smoothed rate at which a user confirms a triggered symptom.
///
/// `(confirmed + 1) / (triggered + 2)`, which is 0.5 with no history and never
/// reaches 0 or 1.
pub fn user_probability(
    confirmed_count: f64,
    triggered_count: f64,
) -> Result<Probability, ValidationError> {
    let confirmed = count("confirmed count", confirmed_count)?;
    let triggered = count("triggered count", triggered_count)?;
    if confirmed > triggered {
        return Err(ValidationError::ConfirmedExceedsTriggered {
            confirmed,
            triggered,
        });
    }
    Ok(Probability::clamped((confirmed + 1.0) / (triggered + 2.0)))
}

/// Blend the population base rate with the user's own rate.
pub fn final_probability(population: Probability, user: Probability) -> Probability {
    let blended = POPULATION_WEIGHT.mul_add(population.value(), USER_WEIGHT * user.value());
    Probability::clamped(blended)
}

fn count(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeCount { field, value });
    }
    Ok(value)
}
