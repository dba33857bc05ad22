//! Evaluate command.
//!
//! Loads one sleep session, runs the standard rule registry against it, and prints
//! the triggered symptoms. When a history file is configured, each symptom the user
//! has history for is scored.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use hx_core::{
    ScoredResult, SleepRecording, SleepSession, SleepSource, UserId, UserSymptomStats,
    score_results, standard_registry,
};

use super::util::read_json;
use crate::Config;

/// How the input file is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A `SleepSession` object.
    Session,
    /// A wearable stage-list recording, tagged with the given source.
    Recording(SleepSource),
}

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    path: &Path,
    format: InputFormat,
    user: Option<&UserId>,
    json: bool,
) -> Result<()> {
    run_at(writer, config, path, format, user, json, Utc::now())
}

/// Like [`run`], stamping results with `now`.
///
/// `user` selects whose history scores the results; a recording's own `userId` is
/// used when it is `None`.
pub fn run_at<W: Write>(
    writer: &mut W,
    config: &Config,
    path: &Path,
    format: InputFormat,
    user: Option<&UserId>,
    json: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let rates = config.base_rates().context("invalid configuration")?;
    let (session, recorded_user) = load_session(path, format)?;
    session.validate().context("invalid sleep session")?;

    let results = standard_registry()
        .evaluate_at(&session, now)
        .context("could not evaluate sleep data")?;
    tracing::debug!(triggered = results.len(), "evaluation finished");

    let scored = match &config.history_path {
        Some(history_path) => {
            let Some(user) = user.or(recorded_user.as_ref()) else {
                bail!("symptom history is configured but no user was given (use --user)");
            };
            let history = read_json::<Vec<UserSymptomStats>>(history_path)
                .context("failed to load symptom history")?;
            score_results(results, &history, user, |code| rates.get(code))
                .context("symptom history is inconsistent")?
        }
        None => results
            .into_iter()
            .map(|result| ScoredResult {
                result,
                scores: None,
            })
            .collect(),
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&scored)?)?;
    } else {
        write_text(writer, &session, &scored)?;
    }

    Ok(())
}

fn load_session(path: &Path, format: InputFormat) -> Result<(SleepSession, Option<UserId>)> {
    match format {
        InputFormat::Session => Ok((read_json(path)?, None)),
        InputFormat::Recording(source) => {
            let recording: SleepRecording = read_json(path)?;
            let user = recording
                .user_id
                .as_deref()
                .map(UserId::new)
                .transpose()
                .context("invalid userId in sleep recording")?;
            let session = recording
                .into_session(source)
                .context("failed to convert sleep recording")?;
            Ok((session, user))
        }
    }
}

fn write_text<W: Write>(
    writer: &mut W,
    session: &SleepSession,
    scored: &[ScoredResult],
) -> Result<()> {
    writeln!(
        writer,
        "Sleep session {} -> {} ({}, {} min asleep)",
        session.sleep_start, session.sleep_end, session.source, session.total_sleep_minutes
    )?;

    if scored.is_empty() {
        writeln!(writer, "No symptoms detected.")?;
        return Ok(());
    }

    writeln!(writer, "Symptoms:")?;
    for entry in scored {
        let result = &entry.result;
        writeln!(
            writer,
            "- {} ({}) via {}: {}",
            result.symptom.code, result.symptom.severity, result.rule_id, result.symptom.reason
        )?;
        if let Some(scores) = &entry.scores {
            writeln!(
                writer,
                "  confidence {}, user probability {}, final probability {}",
                scores.confidence, scores.user_probability, scores.final_probability
            )?;
        }
    }

    Ok(())
}
