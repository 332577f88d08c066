//! # Ranking
//!
//! Orders qualified batters by their latest rolling differential, most
//! negative (most underestimated) first. Ties and missing values are resolved
//! by player id so the table is identical on every run.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use event_normalizer::{NormalizedPlayer, NormalizedSeason, PlayerId};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::models::{EngineOutput, PlayerResult, SeasonAggregate};
use crate::report::round_to;
use crate::trend::{sample_trend, TrendOptions, TrendPoint};

/// A batter's ranking differential for one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedDiff {
    pub player_id: PlayerId,
    pub diff_rolling_oba: Option<f64>,
}

/// Decimal places at which two differentials rank as a tie. Running sums
/// carry rounding residue that depends on each batter's earlier events.
pub const RANKING_DECIMALS: u32 = 9;

fn ranking_key(diff: Option<f64>) -> Option<f64> {
    // Adding 0.0 folds -0.0 into 0.0 so total_cmp sees them as equal
    diff.map(|d| round_to(d, RANKING_DECIMALS) + 0.0)
}

/// Ascending by differential, undefined values last, then by player id
pub fn compare_diffs(a: (Option<f64>, PlayerId), b: (Option<f64>, PlayerId)) -> Ordering {
    let by_value = match (ranking_key(a.0), ranking_key(b.0)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_value.then(a.1.cmp(&b.1))
}

/// Rank every batter in the engine output by the latest differential of one window
pub fn rank_by_window(output: &EngineOutput, window: usize) -> Result<Vec<RankedDiff>> {
    if !output.windows.contains(window) {
        return Err(EngineError::UnknownWindow { window });
    }

    let mut ranked: Vec<RankedDiff> = output
        .players
        .iter()
        .map(|(&player_id, result)| RankedDiff {
            player_id,
            diff_rolling_oba: result.latest_diff(window),
        })
        .collect();

    ranked.sort_by(|a, b| {
        compare_diffs((a.diff_rolling_oba, a.player_id), (b.diff_rolling_oba, b.player_id))
    });
    Ok(ranked)
}

/// Whether a batter had enough usable events to be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Computed,
    NoQualifyingEvents,
}

/// Where a row's ranking differential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RankingSource {
    Window { window: usize },
    /// Engine season means
    Season,
    /// Published season differential, used when no events were usable
    PublishedSeason,
    Unavailable,
}

/// Latest rolling values for one window, with a trend line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub rolling_realized: Option<f64>,
    pub rolling_expected: Option<f64>,
    #[serde(rename = "diff_rolling_OBA")]
    pub diff_rolling_oba: Option<f64>,
    pub span: usize,
    pub is_full: bool,
    pub trend: Vec<TrendPoint>,
}

/// One row of the ranking table handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: String,
    pub status: PlayerStatus,
    pub season_pa: u32,
    pub total_pa_events: usize,
    pub season: SeasonAggregate,
    pub windows: BTreeMap<usize, WindowSummary>,
    #[serde(rename = "diff_rolling_OBA")]
    pub diff_rolling_oba: Option<f64>,
    pub ranking_source: RankingSource,
}

/// Build the full ranking table. `ranking_order` lists the windows tried,
/// in order, for each batter's ranking differential.
pub fn build_ranking(
    season: &NormalizedSeason,
    output: &EngineOutput,
    ranking_order: &[usize],
    trend: TrendOptions,
) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = season
        .players
        .iter()
        .map(|(player_id, player)| match output.players.get(player_id) {
            Some(result) => computed_row(result, ranking_order, trend),
            None => no_data_row(player),
        })
        .collect();

    rows.sort_by(|a, b| {
        compare_diffs((a.diff_rolling_oba, a.player_id), (b.diff_rolling_oba, b.player_id))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }

    tracing::info!("Ranked {} batters", rows.len());
    rows
}

fn computed_row(result: &PlayerResult, ranking_order: &[usize], trend: TrendOptions) -> RankingRow {
    let windows: BTreeMap<usize, WindowSummary> = result
        .windows
        .iter()
        .filter_map(|(&window, series)| {
            let latest = series.last()?;
            Some((
                window,
                WindowSummary {
                    rolling_realized: latest.rolling_realized,
                    rolling_expected: latest.rolling_expected,
                    diff_rolling_oba: latest.diff_rolling_oba,
                    span: latest.span,
                    is_full: latest.is_full(),
                    trend: sample_trend(series, trend),
                },
            ))
        })
        .collect();

    let from_window = ranking_order
        .iter()
        .find_map(|&w| result.latest_diff(w).map(|d| (d, RankingSource::Window { window: w })));

    let (diff, source) = match from_window {
        Some((d, source)) => (Some(d), source),
        None => match result.season.diff {
            Some(d) => (Some(d), RankingSource::Season),
            None => published_fallback(&result.season),
        },
    };

    RankingRow {
        rank: 0,
        player_id: result.meta.player_id,
        name: result.meta.name.clone(),
        team: result.meta.team.clone(),
        position: result.meta.position.clone(),
        status: PlayerStatus::Computed,
        season_pa: result.season_pa,
        total_pa_events: result.season.plate_appearances,
        season: result.season.clone(),
        windows,
        diff_rolling_oba: diff,
        ranking_source: source,
    }
}

fn no_data_row(player: &NormalizedPlayer) -> RankingRow {
    let season = SeasonAggregate::from_events(
        &player.events,
        player.statcast.clone(),
        player.expected_stats.clone(),
    );
    let (diff, source) = published_fallback(&season);

    RankingRow {
        rank: 0,
        player_id: player.meta.player_id,
        name: player.meta.name.clone(),
        team: player.meta.team.clone(),
        position: player.meta.position.clone(),
        status: PlayerStatus::NoQualifyingEvents,
        season_pa: player.season_pa,
        total_pa_events: 0,
        season,
        windows: BTreeMap::new(),
        diff_rolling_oba: diff,
        ranking_source: source,
    }
}

fn published_fallback(season: &SeasonAggregate) -> (Option<f64>, RankingSource) {
    match season.expected_stats.season_diff {
        Some(d) => (Some(d), RankingSource::PublishedSeason),
        None => (None, RankingSource::Unavailable),
    }
}
