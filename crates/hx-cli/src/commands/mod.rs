//! CLI subcommand implementations.

pub mod evaluate;
pub mod rules;
pub mod score;
mod util;
