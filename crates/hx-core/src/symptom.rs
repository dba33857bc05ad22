//! Symptom outcomes attached to rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Symptom identifiers a rule can diagnose.
///
/// Parsing is case-insensitive everywhere: config keys, CLI input and JSON records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymptomCode {
    Tired,
    Irritable,
    Foggy,
}

impl SymptomCode {
    /// String representation used on the wire and in config keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tired => "TIRED",
            Self::Irritable => "IRRITABLE",
            Self::Foggy => "FOGGY",
        }
    }
}

impl fmt::Display for SymptomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SymptomCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TIRED" => Ok(Self::Tired),
            "IRRITABLE" => Ok(Self::Irritable),
            "FOGGY" => Ok(Self::Foggy),
            _ => Err(ValidationError::InvalidVariant {
                field: "symptom code",
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for SymptomCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SymptomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Severity of a diagnosed symptom, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A coded diagnostic outcome, copied verbatim into each evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub code: SymptomCode,
    pub severity: Severity,
    /// Human-readable explanation.
    pub reason: String,
}

impl Symptom {
    pub fn new(code: SymptomCode, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            reason: reason.into(),
        }
    }
}
