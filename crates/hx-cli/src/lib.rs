//! Health tracker CLI library.
//!
//! This crate provides the CLI interface for the health tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{BaseRates, Config};
