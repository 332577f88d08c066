//! Error types for the Rolling Differential Engine

use event_normalizer::{NormalizeError, PlayerId};
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the Rolling Differential Engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fatal at startup: the engine refuses to run
    #[error("Invalid window configuration: {0}")]
    InvalidWindowConfiguration(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Player not found: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Window size {window} is not configured")]
    UnknownWindow { window: usize },

    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Config loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
