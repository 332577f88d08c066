//! Error types for the Event Normalizer

use thiserror::Error;

/// Result type for normalizer operations
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Errors that can occur while reading or normalizing a snapshot
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A record lacks a field the rolling computation needs. Recoverable:
    /// the record is dropped and counted in the ingest report.
    #[error("Record {index} is missing required field '{field}'")]
    MissingData { index: usize, field: &'static str },

    #[error("Record {index} has a non-finite value in '{field}'")]
    NonFiniteValue { index: usize, field: &'static str },

    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NormalizeError {
    /// Whether the error only affects a single record
    pub fn is_record_level(&self) -> bool {
        matches!(self, NormalizeError::MissingData { .. } | NormalizeError::NonFiniteValue { .. })
    }
}
