//! # Report
//!
//! The document handed to the presentation layer. Rounding happens here and
//! only here; engine values stay at full precision.

use std::path::Path;

use chrono::{DateTime, Utc};
use event_normalizer::{IngestReport, NormalizedSeason};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{EngineOutput, SeasonAggregate};
use crate::ranking::{build_ranking, RankingRow};
use crate::trend::TrendOptions;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub season: i32,
    pub total_players: usize,
    pub min_pa: u32,
    pub rolling_windows: Vec<usize>,
    pub ingest: IngestReport,
    pub players: Vec<RankingRow>,
}

impl Report {
    /// Assemble the ranking table and round it for display
    pub fn build(
        season: &NormalizedSeason,
        ingest: &IngestReport,
        output: &EngineOutput,
        config: &EngineConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let order = config.ranking_order(&output.windows);
        let mut players =
            build_ranking(season, output, &order, TrendOptions::from(&config.output));

        let decimals = config.output.round_decimals;
        for row in &mut players {
            round_row(row, decimals);
        }

        Self {
            generated_at,
            season: output.season,
            total_players: players.len(),
            min_pa: season.min_plate_appearances,
            rolling_windows: output.windows.as_slice().to_vec(),
            ingest: ingest.clone(),
            players,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.to_json_pretty()?)?;
        tracing::info!("Saved {} players to {:?}", self.total_players, path.as_ref());
        Ok(())
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn round_opt(value: &mut Option<f64>, decimals: u32) {
    if let Some(v) = value.as_mut() {
        *v = round_to(*v, decimals);
    }
}

fn round_season(season: &mut SeasonAggregate, decimals: u32) {
    round_opt(&mut season.realized_mean, decimals);
    round_opt(&mut season.expected_mean, decimals);
    round_opt(&mut season.diff, decimals);
}

fn round_row(row: &mut RankingRow, decimals: u32) {
    round_opt(&mut row.diff_rolling_oba, decimals);
    round_season(&mut row.season, decimals);

    for summary in row.windows.values_mut() {
        round_opt(&mut summary.rolling_realized, decimals);
        round_opt(&mut summary.rolling_expected, decimals);
        round_opt(&mut summary.diff_rolling_oba, decimals);
        for point in &mut summary.trend {
            round_opt(&mut point.rolling_realized, decimals);
            round_opt(&mut point.rolling_expected, decimals);
            round_opt(&mut point.diff_rolling_oba, decimals);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(-0.0456, 3), -0.046);
        assert_eq!(round_to(0.4, 0), 0.0);
    }
}
