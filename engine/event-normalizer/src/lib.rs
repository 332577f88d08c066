//! Event Normalizer
//!
//! Converts a raw Statcast season snapshot into clean, chronologically ordered
//! plate-appearance sequences for every qualified batter. Malformed records are
//! rejected at ingestion and counted, never propagated into the rolling engine.

pub mod error;
pub mod identity;
pub mod normalizer;
pub mod types;

pub use error::{NormalizeError, Result};
pub use normalizer::{EventNormalizer, ExpectedFallback, IngestReport, NormalizationConfig};
pub use types::*;
