//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hx_core::{SleepSource, UserId};

/// Health tracker.
///
/// Evaluates sleep sessions against symptom rules and scores the results
/// against a user's confirmation history.
#[derive(Debug, Parser)]
#[command(name = "hx", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate a sleep session against the symptom rules.
    Evaluate {
        /// JSON file holding a sleep session (or a recording with --recording).
        file: PathBuf,

        /// Treat the file as a wearable stage-list recording.
        #[arg(long)]
        recording: bool,

        /// Source tag for a converted recording.
        #[arg(long, default_value = "MANUAL", requires = "recording")]
        source: SleepSource,

        /// User whose symptom history scores the results (defaults to the recording's userId).
        #[arg(long)]
        user: Option<UserId>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compute confidence and probabilities from trigger/confirmation counts.
    Score {
        /// Times the rule fired for the user.
        #[arg(long, allow_negative_numbers = true)]
        triggered: f64,

        /// Times the user confirmed the symptom.
        #[arg(long, allow_negative_numbers = true)]
        confirmed: f64,

        /// Population base rate (defaults to the configured value).
        #[arg(long, allow_negative_numbers = true)]
        population: Option<f64>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the registered rules.
    Rules {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
