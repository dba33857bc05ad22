//! Configuration loading and management.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use hx_core::{Probability, SymptomCode, ValidationError};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base-rate probability for symptoms without a specific entry.
    pub population_probability: f64,

    /// Per-symptom base rates, keyed by symptom code (e.g. `TIRED = 0.3`).
    #[serde(default)]
    pub population: BTreeMap<String, f64>,

    /// JSON file of user symptom statistics used to score triggered symptoms.
    #[serde(default)]
    pub history_path: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("population_probability", &self.population_probability)
            .field("population", &self.population)
            .field("history_path", &self.history_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_probability: 0.5,
            population: BTreeMap::new(),
            history_path: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (HX_*)
        figment = figment.merge(Env::prefixed("HX_"));

        figment.extract()
    }

    /// Validate the configured probabilities and resolve them per symptom.
    pub fn base_rates(&self) -> Result<BaseRates, ValidationError> {
        let default = Probability::named("population_probability", self.population_probability)?;
        let mut by_symptom = BTreeMap::new();
        for (code, value) in &self.population {
            let code: SymptomCode = code.parse()?;
            by_symptom.insert(code, Probability::named("population", *value)?);
        }
        Ok(BaseRates {
            default,
            by_symptom,
        })
    }
}

/// Population base rates resolved from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaseRates {
    pub default: Probability,
    pub by_symptom: BTreeMap<SymptomCode, Probability>,
}

impl BaseRates {
    /// Base rate for `code`, falling back to the default.
    pub fn get(&self, code: SymptomCode) -> Probability {
        self.by_symptom.get(&code).copied().unwrap_or(self.default)
    }
}

/// Returns the platform-specific config directory for hx.
///
/// On Linux: `~/.config/hx`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hx"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_hx() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "hx");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.base_rates().is_ok());
        assert!(config.history_path.is_none());
    }

    #[test]
    fn test_base_rates_prefer_specific_entry() {
        let mut config = Config::default();
        config.population.insert("tired".to_string(), 0.3);

        let rates = config.base_rates().unwrap();
        let tired = rates.get(SymptomCode::Tired);
        let foggy = rates.get(SymptomCode::Foggy);
        assert!((tired.value() - 0.3).abs() < f64::EPSILON);
        assert!((foggy.value() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = Config {
            population_probability: 1.2,
            ..Config::default()
        };
        assert!(config.base_rates().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_symptom_key() {
        let mut config = Config::default();
        config.population.insert("HEADACHE".to_string(), 0.2);
        assert!(config.base_rates().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "population_probability = 0.25\nhistory_path = \"/tmp/history.json\"\n\n[population]\nTIRED = 0.4\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert!((config.population_probability - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.history_path, Some(PathBuf::from("/tmp/history.json")));
        assert_eq!(config.population.get("TIRED"), Some(&0.4));
    }
}
