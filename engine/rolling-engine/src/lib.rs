//! # Rolling Differential Engine
//!
//! Computes, for every qualified batter, trailing rolling means of realized
//! wOBA and expected wOBA at several plate-appearance window sizes, their
//! difference, and full-season aggregates. The ranking table built from the
//! latest differentials surfaces batters whose results trail their contact
//! quality.
//!
//! Each run is a pure function of an immutable [`Snapshot`]: no caches, no
//! state carried between runs.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod report;
pub mod trend;
pub mod window;


pub use config::EngineConfig;
pub use engine::RollingEngine;
pub use error::{EngineError, Result};
pub use models::{EngineOutput, PlayerResult, RollingWindowResult, SeasonAggregate};
pub use ranking::{rank_by_window, RankedDiff, RankingRow};
pub use report::Report;
pub use window::{rolling_series, RollingAccumulator, WindowSizes};

pub use event_normalizer::{
    EventNormalizer, IngestReport, NormalizedSeason, PlayerId, Snapshot,
};

/// Everything one run produces before it is shaped into a report
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub season: NormalizedSeason,
    pub ingest: IngestReport,
    pub output: EngineOutput,
}

/// Normalize a snapshot and run the engine over it. The window configuration
/// is validated first, so a bad window list fails before any work is done.
pub fn run_pipeline(snapshot: &Snapshot, config: &EngineConfig) -> Result<PipelineOutput> {
    let engine = RollingEngine::from_config(config)?;
    let normalizer = EventNormalizer::new(config.qualification.clone());

    let (season, ingest) = normalizer.normalize(snapshot);
    let output = engine.compute(&season);

    Ok(PipelineOutput { season, ingest, output })
}
