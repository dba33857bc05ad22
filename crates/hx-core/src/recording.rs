//! Conversion of wearable stage-list exports into sleep session facts.
//!
//! Wearables report a night as a sequence of typed stages. Rules work on the
//! summarized [`SleepSession`], so the stage list is folded into REM boundaries and
//! per-stage durations here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sleep::SleepSession;
use crate::source::SleepSource;
use crate::time::{TimeError, parse_timestamp};

/// Errors from converting a recording.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordingError {
    /// A stage timestamp could not be parsed.
    #[error("stage {index} has a malformed timestamp")]
    Timestamp {
        index: usize,
        #[source]
        source: TimeError,
    },

    /// A stage ends before it starts.
    #[error("stage {index} ends before it starts ({start} > {end})")]
    NegativeStage {
        index: usize,
        start: String,
        end: String,
    },
}

/// Sleep stage kinds reported by wearables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Light,
    Deep,
    Rem,
    Awake,
}

/// One contiguous stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepStage {
    #[serde(rename = "type")]
    pub kind: StageKind,
    pub start: String,
    pub end: String,
}

/// A night as exported by a wearable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecording {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub total_sleep_minutes: u32,
    #[serde(default)]
    pub stages: Vec<SleepStage>,
}

impl SleepRecording {
    /// Summarize the recording as a fact.
    ///
    /// REM bounds span from the earliest REM stage start to the latest REM stage end.
    /// Deep and light minutes are summed per kind and rounded; kinds with no stage
    /// stay absent.
    pub fn into_session(self, source: SleepSource) -> Result<SleepSession, RecordingError> {
        let mut rem_start: Option<(DateTime<Utc>, &str)> = None;
        let mut rem_end: Option<(DateTime<Utc>, &str)> = None;
        let mut deep_seconds: Option<i64> = None;
        let mut light_seconds: Option<i64> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            let (start, end) = stage_bounds(index, stage)?;
            let seconds = (end - start).num_seconds();
            match stage.kind {
                StageKind::Rem => {
                    if rem_start.is_none_or(|(earliest, _)| start < earliest) {
                        rem_start = Some((start, &stage.start));
                    }
                    if rem_end.is_none_or(|(latest, _)| end > latest) {
                        rem_end = Some((end, &stage.end));
                    }
                }
                StageKind::Deep => *deep_seconds.get_or_insert(0) += seconds,
                StageKind::Light => *light_seconds.get_or_insert(0) += seconds,
                StageKind::Awake => {}
            }
        }

        tracing::debug!(
            stages = self.stages.len(),
            has_rem = rem_start.is_some(),
            "converted sleep recording"
        );

        let rem_start = rem_start.map(|(_, raw)| raw.to_string());
        let rem_end = rem_end.map(|(_, raw)| raw.to_string());

        Ok(SleepSession {
            sleep_start: self.start_time,
            sleep_end: self.end_time,
            total_sleep_minutes: self.total_sleep_minutes,
            rem_start,
            rem_end,
            deep_sleep_minutes: deep_seconds.map(whole_minutes),
            light_sleep_minutes: light_seconds.map(whole_minutes),
            source,
        })
    }
}

fn stage_bounds(
    index: usize,
    stage: &SleepStage,
) -> Result<(DateTime<Utc>, DateTime<Utc>), RecordingError> {
    let parse = |value: &str| {
        parse_timestamp(value).map_err(|source| RecordingError::Timestamp { index, source })
    };
    let (start, end) = (parse(&stage.start)?, parse(&stage.end)?);
    if end < start {
        return Err(RecordingError::NegativeStage {
            index,
            start: stage.start.clone(),
            end: stage.end.clone(),
        });
    }
    Ok((start, end))
}

/// Seconds to minutes, rounding half up.
fn whole_minutes(seconds: i64) -> u32 {
    u32::try_from((seconds + 30) / 60).unwrap_or(u32::MAX)
}
