//! Score command: confidence and probabilities from raw counts.

use std::io::Write;

use anyhow::{Context, Result};
use hx_core::{Probability, SymptomScores, confidence, final_probability, user_probability};

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    triggered: f64,
    confirmed: f64,
    population: Option<f64>,
    json: bool,
) -> Result<()> {
    let population = match population {
        Some(value) => {
            Probability::named("population", value).context("invalid population probability")?
        }
        None => {
            config
                .base_rates()
                .context("invalid configuration")?
                .default
        }
    };

    let confidence = confidence(triggered).context("invalid triggered count")?;
    let user = user_probability(confirmed, triggered).context("invalid confirmation counts")?;
    let scores = SymptomScores {
        confidence,
        user_probability: user,
        final_probability: final_probability(population, user),
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&scores)?)?;
    } else {
        writeln!(writer, "Confidence:        {}", scores.confidence)?;
        writeln!(writer, "User probability:  {}", scores.user_probability)?;
        writeln!(
            writer,
            "Final probability: {} (population {population})",
            scores.final_probability
        )?;
    }

    Ok(())
}
