//! Rules command for listing the registered rules.

use std::io::Write;

use anyhow::Result;
use hx_core::{RuleRegistry, Symptom};
use serde::Serialize;

/// Serializable view of a rule; conditions are code and are not shown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleEntry<'a> {
    id: &'a str,
    description: &'a str,
    outcome: &'a Symptom,
}

pub fn run<W: Write>(writer: &mut W, registry: &RuleRegistry, json: bool) -> Result<()> {
    let entries: Vec<RuleEntry<'_>> = registry
        .rules()
        .iter()
        .map(|rule| RuleEntry {
            id: rule.id.as_str(),
            description: &rule.description,
            outcome: &rule.outcome,
        })
        .collect();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No rules registered.")?;
        return Ok(());
    }

    let id_width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0);
    for entry in &entries {
        let outcome = format!("{}/{}", entry.outcome.code, entry.outcome.severity);
        writeln!(
            writer,
            "{:<id_width$}  {:<14}  {}",
            entry.id, outcome, entry.description
        )?;
    }

    Ok(())
}
