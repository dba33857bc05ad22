use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hx_cli::commands::evaluate::InputFormat;
use hx_cli::commands::{evaluate, rules, score};
use hx_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Evaluate {
            file,
            recording,
            source,
            user,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let format = if *recording {
                InputFormat::Recording(*source)
            } else {
                InputFormat::Session
            };
            evaluate::run(&mut stdout, &config, file, format, user.as_ref(), *json)?;
        }
        Some(Commands::Score {
            triggered,
            confirmed,
            population,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            score::run(
                &mut stdout,
                &config,
                *triggered,
                *confirmed,
                *population,
                *json,
            )?;
        }
        Some(Commands::Rules { json }) => {
            rules::run(&mut stdout, hx_core::standard_registry(), *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
