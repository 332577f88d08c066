use std::collections::BTreeMap;

use chrono::NaiveDate;
use event_normalizer::{
    ExpectedStatsLine, PlateAppearanceEvent, PlayerId, PlayerMeta, StatcastSummary,
};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::window::{SideSum, WindowSizes};

/// Rolling values for one batter, one window size, at one plate appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingWindowResult {
    pub sequence_index: usize,
    pub game_date: NaiveDate,
    /// Configured window size W
    pub window: usize,
    /// Events currently inside the window, `min(i + 1, W)`
    pub span: usize,
    /// Events in the window with a realized value
    pub realized_count: usize,
    /// Events in the window with an expected value
    pub expected_count: usize,
    pub rolling_realized: Option<f64>,
    pub rolling_expected: Option<f64>,
    /// Realized minus expected; negative means the batter is underperforming
    #[serde(rename = "diff_rolling_OBA")]
    pub diff_rolling_oba: Option<f64>,
}

impl RollingWindowResult {
    /// True once the window holds W events (no longer expanding)
    pub fn is_full(&self) -> bool {
        self.span == self.window
    }
}

/// Full-season means plus pass-through season metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAggregate {
    pub plate_appearances: usize,
    pub realized_count: usize,
    pub expected_count: usize,
    pub realized_mean: Option<f64>,
    pub expected_mean: Option<f64>,
    pub diff: Option<f64>,
    pub statcast: StatcastSummary,
    pub expected_stats: ExpectedStatsLine,
}

impl SeasonAggregate {
    /// Season means, accumulated in sequence order so they agree exactly with
    /// a rolling window as long as the season.
    pub fn from_events(
        events: &[PlateAppearanceEvent],
        statcast: StatcastSummary,
        expected_stats: ExpectedStatsLine,
    ) -> Self {
        let mut realized = SideSum::default();
        let mut expected = SideSum::default();
        for event in events {
            realized.add(event.realized_value);
            expected.add(event.expected_value);
        }

        let realized_mean = realized.mean();
        let expected_mean = expected.mean();

        Self {
            plate_appearances: events.len(),
            realized_count: realized.count(),
            expected_count: expected.count(),
            realized_mean,
            expected_mean,
            diff: realized_mean.zip(expected_mean).map(|(r, e)| r - e),
            statcast,
            expected_stats,
        }
    }
}

/// Engine result for one batter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerResult {
    pub meta: PlayerMeta,
    pub season_pa: u32,
    pub season: SeasonAggregate,
    /// Rolling series keyed by window size, one entry per plate appearance
    pub windows: BTreeMap<usize, Vec<RollingWindowResult>>,
}

impl PlayerResult {
    pub fn series(&self, window: usize) -> Option<&[RollingWindowResult]> {
        self.windows.get(&window).map(Vec::as_slice)
    }

    /// Most recent rolling point for a window
    pub fn latest(&self, window: usize) -> Option<&RollingWindowResult> {
        self.windows.get(&window).and_then(|series| series.last())
    }

    pub fn latest_diff(&self, window: usize) -> Option<f64> {
        self.latest(window).and_then(|r| r.diff_rolling_oba)
    }
}

/// Engine output for a whole season
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineOutput {
    pub season: i32,
    pub windows: WindowSizes,
    pub players: BTreeMap<PlayerId, PlayerResult>,
    /// Qualified batters with no usable events; absent from `players`
    pub no_data: Vec<PlayerId>,
}

impl EngineOutput {
    pub fn player(&self, player_id: PlayerId) -> Result<&PlayerResult> {
        self.players.get(&player_id).ok_or(EngineError::UnknownPlayer(player_id))
    }

    /// Ordered rolling series for one batter and one configured window
    pub fn time_series(
        &self,
        player_id: PlayerId,
        window: usize,
    ) -> Result<&[RollingWindowResult]> {
        if !self.windows.contains(window) {
            return Err(EngineError::UnknownWindow { window });
        }
        self.player(player_id)?.series(window).ok_or(EngineError::UnknownWindow { window })
    }

    pub fn total_points(&self) -> usize {
        self.players.values().flat_map(|p| p.windows.values()).map(Vec::len).sum()
    }
}
