//! # Configuration Management
//!
//! Layered configuration for the rolling engine: built-in defaults, then an
//! optional TOML file, then `ROLLING_*` environment overrides
//! (e.g. `ROLLING_WINDOWS__SIZES=50,100,150`).

use std::path::Path;

use config::{Config, Environment, File};
use event_normalizer::NormalizationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::window::WindowSizes;

/// Main configuration for the rolling engine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Window sizes and ranking order
    pub windows: WindowConfig,
    /// Qualification and null handling, handed to the normalizer
    pub qualification: NormalizationConfig,
    /// Report shaping
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Trailing window lengths in plate appearances. Signed so that a bad
    /// value reaches validation instead of failing deserialization.
    pub sizes: Vec<i64>,
    /// Windows tried in order when picking a batter's ranking differential
    pub ranking_preference: Vec<usize>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { sizes: vec![50, 100, 250], ranking_preference: vec![100, 50, 250] }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number of evenly spaced points kept in each trend line
    pub trend_points: usize,
    /// Decimal places in the report
    pub round_decimals: u32,
    /// Leave expanding (not yet full) windows out of trend lines
    pub only_full_windows_in_trend: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { trend_points: 20, round_decimals: 3, only_full_windows_in_trend: false }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// `ROLLING_*` variables, with comma-separated window lists
fn environment() -> Environment {
    Environment::with_prefix("ROLLING")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("windows.sizes")
        .with_list_parse_key("windows.ranking_preference")
}

impl EngineConfig {
    /// Load defaults, an optional TOML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(path, environment())
    }

    fn load_layers(path: Option<&Path>, env: Environment) -> Result<Self> {
        // Missing keys fall back to serde defaults. Defaults are not a source
        // because config merges arrays element by element.
        let mut builder = Config::builder();

        if let Some(path) = path {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file layered over the defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations that would silently produce meaningless output
    pub fn validate(&self) -> Result<()> {
        self.window_sizes()?;

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(EngineError::InvalidConfig(format!("Invalid log level: {other}"))),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" => {}
            other => {
                return Err(EngineError::InvalidConfig(format!("Invalid log format: {other}")))
            }
        }

        if self.output.round_decimals > 12 {
            return Err(EngineError::InvalidConfig(format!(
                "round_decimals must be at most 12, got {}",
                self.output.round_decimals
            )));
        }

        Ok(())
    }

    /// Validated window sizes
    pub fn window_sizes(&self) -> Result<WindowSizes> {
        WindowSizes::new(&self.windows.sizes)
    }

    /// Ranking order restricted to configured windows; configured windows
    /// missing from the preference list are appended in ascending order.
    pub fn ranking_order(&self, windows: &WindowSizes) -> Vec<usize> {
        let mut order: Vec<usize> = Vec::with_capacity(windows.len());
        for &window in &self.windows.ranking_preference {
            if windows.contains(window) && !order.contains(&window) {
                order.push(window);
            } else if !windows.contains(window) {
                tracing::debug!(
                    "Ranking preference {} is not a configured window, skipping",
                    window
                );
            }
        }
        for &window in windows.as_slice() {
            if !order.contains(&window) {
                order.push(window);
            }
        }
        order
    }
}
