//! Sleep data origin as the single source of truth for source tag strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ValidationError;

/// Where a sleep session was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepSource {
    AppleHealth,
    GoogleFit,
    Fitbit,
    Manual,
}

impl SleepSource {
    /// All sources, in declaration order.
    pub const ALL: [Self; 4] = [Self::AppleHealth, Self::GoogleFit, Self::Fitbit, Self::Manual];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AppleHealth => "APPLE_HEALTH",
            Self::GoogleFit => "GOOGLE_FIT",
            Self::Fitbit => "FITBIT",
            Self::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for SleepSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SleepSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "APPLE_HEALTH" | "HEALTHKIT" => Ok(Self::AppleHealth),
            "GOOGLE_FIT" => Ok(Self::GoogleFit),
            "FITBIT" => Ok(Self::Fitbit),
            "MANUAL" => Ok(Self::Manual),
            _ => Err(ValidationError::InvalidVariant {
                field: "sleep source",
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for SleepSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SleepSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in SleepSource::ALL {
            let s = variant.to_string();
            let parsed: SleepSource = s.parse().expect("should parse");
            assert_eq!(parsed, variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn cli_spellings_parse() {
        assert_eq!("apple-health".parse::<SleepSource>().unwrap(), SleepSource::AppleHealth);
        assert_eq!("healthkit".parse::<SleepSource>().unwrap(), SleepSource::AppleHealth);
        assert_eq!("google_fit".parse::<SleepSource>().unwrap(), SleepSource::GoogleFit);
    }

    #[test]
    fn unknown_source_errors() {
        let err = "garmin".parse::<SleepSource>().unwrap_err();
        assert_eq!(err.to_string(), "invalid sleep source: garmin");
    }

    #[test]
    fn serializes_as_upper_case_code() {
        let json = serde_json::to_string(&SleepSource::GoogleFit).unwrap();
        assert_eq!(json, "\"GOOGLE_FIT\"");
        assert!(serde_json::from_str::<SleepSource>("\"OURA\"").is_err());
    }
}
