//! # Rolling Report Binary
//!
//! Reads a season snapshot, computes rolling differentials and writes the
//! ranking table for the dashboard.

use anyhow::{Context, Result};
use clap::Parser;
use rolling_engine::cli::{Cli, CliHandler};
use rolling_engine::logging::initialize_logging_with_config;
use rolling_engine::EngineConfig;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration before logging so the configured format applies
    let config = EngineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging_with_config(&config.logging)?;

    tracing::info!("Starting rolling-report v{}", env!("CARGO_PKG_VERSION"));

    CliHandler::new(config).handle_command(cli.command)
}
