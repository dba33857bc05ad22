//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_json_reports_missing_file() {
        let err = read_json::<serde_json::Value>(Path::new("/nonexistent/hx.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read /nonexistent/hx.json"));
    }

    #[test]
    fn read_json_reports_parse_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
