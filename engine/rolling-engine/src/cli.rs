//! # Command Line Interface
//!
//! Runs the normalizer and engine over a local snapshot file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use event_normalizer::{PlayerId, Snapshot};
use tracing::info;

use crate::config::EngineConfig;
use crate::report::Report;
use crate::run_pipeline;

/// Rolling wOBA vs xwOBA report generator
#[derive(Parser)]
#[command(name = "rolling-report")]
#[command(about = "Rolling wOBA vs xwOBA differentials for qualified batters")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the ranking table and write it as JSON
    Run {
        /// Snapshot JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Output JSON file
        #[arg(short, long, default_value = "player_data.json")]
        output: PathBuf,
        /// Override window sizes, e.g. 50,100,150
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        windows: Vec<i64>,
    },
    /// Print one batter's rolling series as JSON
    Series {
        /// Snapshot JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Batter ID
        #[arg(long)]
        player: PlayerId,
        /// Window size
        #[arg(long)]
        window: usize,
    },
    /// Write the default configuration to a TOML file
    InitConfig {
        #[arg(long, default_value = "rolling.toml")]
        path: PathBuf,
    },
}

/// CLI handler
pub struct CliHandler {
    config: EngineConfig,
}

impl CliHandler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Handle CLI commands
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run { input, output, windows } => self.run(&input, &output, windows),
            Commands::Series { input, player, window } => self.series(&input, player, window),
            Commands::InitConfig { path } => {
                EngineConfig::default()
                    .save_to_file(&path)
                    .with_context(|| format!("Failed to write configuration to {path:?}"))?;
                println!("Wrote default configuration to {}", path.display());
                Ok(())
            }
        }
    }

    fn run(&self, input: &Path, output: &Path, windows: Vec<i64>) -> Result<()> {
        let mut config = self.config.clone();
        if !windows.is_empty() {
            config.windows.sizes = windows;
        }
        config.validate().context("Invalid configuration")?;

        let snapshot = Snapshot::load_from_file(input)
            .with_context(|| format!("Failed to load snapshot {input:?}"))?;
        let result = run_pipeline(&snapshot, &config)?;

        let generated_at = chrono::Utc::now();
        let report =
            Report::build(&result.season, &result.ingest, &result.output, &config, generated_at);
        report
            .write_to_file(output)
            .with_context(|| format!("Failed to write report {output:?}"))?;

        info!(
            "Season {}: {} players, windows {:?}",
            report.season, report.total_players, report.rolling_windows
        );
        Ok(())
    }

    fn series(&self, input: &Path, player: PlayerId, window: usize) -> Result<()> {
        let snapshot = Snapshot::load_from_file(input)
            .with_context(|| format!("Failed to load snapshot {input:?}"))?;
        let result = run_pipeline(&snapshot, &self.config)?;

        let series = result.output.time_series(player, window)?;
        println!("{}", serde_json::to_string_pretty(series)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolling.toml");

        let mut loaded = EngineConfig::default();
        loaded.windows.sizes = vec![30];
        loaded.logging.format = "json".to_string();
        let command = Commands::InitConfig { path: path.clone() };
        CliHandler::new(loaded).handle_command(command).unwrap();

        let written = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(written.windows.sizes, vec![50, 100, 250]);
        assert_eq!(written.logging.format, "pretty");
    }
}
