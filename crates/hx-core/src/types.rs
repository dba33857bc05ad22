//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types and scoring inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The probability value was out of range.
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    /// A count was negative.
    #[error("{field} cannot be negative, got {value}")]
    NegativeCount { field: &'static str, value: f64 },

    /// A numeric input was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// More confirmations than triggers were reported.
    #[error("confirmed count {confirmed} exceeds triggered count {triggered}")]
    ConfirmedExceedsTriggered { confirmed: f64, triggered: f64 },

    /// Invalid enumeration value.
    #[error("invalid {field}: {value}")]
    InvalidVariant { field: &'static str, value: String },

    /// Two timestamps of a fact are out of order.
    #[error("{end_field} ({end}) must be after {start_field} ({start})")]
    OutOfOrder {
        start_field: &'static str,
        start: String,
        end_field: &'static str,
        end: String,
    },

    /// A timestamp of a fact could not be parsed.
    #[error("{field} is not a valid timestamp: {value}")]
    MalformedTimestamp { field: &'static str, value: String },

    /// Symptom history holds two records for one user and symptom.
    #[error("history holds more than one {symptom} record for user {user}")]
    DuplicateHistory { user: String, symptom: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated rule identifier.
    ///
    /// Rule IDs are stable, upper-case names such as `RULE_TIRED_LOW_SLEEP_LATE_REM`.
    /// Uniqueness is enforced when a registry is built.
    RuleId, "rule ID"
);

define_string_id!(
    /// A validated user identifier, as issued by the external account service.
    UserId, "user ID"
);

/// A probability in the range \[0.0, 1.0\].
///
/// Returned by every scoring function. Construction through [`Probability::new`]
/// rejects NaN and out-of-range values; [`Probability::clamped`] is for values that
/// are in range by construction but may drift by floating-point error.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Certainty.
    pub const ONE: Self = Self(1.0);

    /// Impossibility.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new probability after validation.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        Self::named("probability", value)
    }

    /// Like [`Probability::new`], reporting `field` in the error.
    pub fn named(field: &'static str, value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::ProbabilityOutOfRange { field, value });
        }
        Ok(Self(value))
    }

    /// Creates a probability, clamping to \[0.0, 1.0\].
    ///
    /// NaN values become 0.0.
    #[must_use]
    pub const fn clamped(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Self(0.0)
        } else if value > 1.0 {
            Self(1.0)
        } else {
            Self(value)
        }
    }

    /// Returns the inner f64 value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

impl Serialize for Probability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
