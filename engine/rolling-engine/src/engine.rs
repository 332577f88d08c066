use std::collections::BTreeMap;

use event_normalizer::{NormalizedPlayer, NormalizedSeason, PlayerId};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{EngineOutput, PlayerResult, SeasonAggregate};
use crate::window::{rolling_series, WindowSizes};

/// Rolling Differential Engine
///
/// Stateless between runs: every call recomputes from the normalized input.
/// Batters are independent, so they are processed in parallel; results are
/// collected into ordered maps and never depend on scheduling.
#[derive(Debug, Clone)]
pub struct RollingEngine {
    windows: WindowSizes,
}

impl RollingEngine {
    pub fn new(windows: WindowSizes) -> Self {
        Self { windows }
    }

    /// Build an engine from configuration, failing on a bad window list
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.window_sizes()?))
    }

    pub fn windows(&self) -> &WindowSizes {
        &self.windows
    }

    /// Compute rolling series and season aggregates for every batter
    pub fn compute(&self, season: &NormalizedSeason) -> EngineOutput {
        info!(
            "Computing rolling windows {:?} for {} batters ({} events)",
            self.windows.as_slice(),
            season.players.len(),
            season.total_events()
        );

        let players: BTreeMap<PlayerId, PlayerResult> = season
            .players
            .par_iter()
            .filter_map(|(&player_id, player)| {
                self.compute_player(player).map(|result| (player_id, result))
            })
            .collect();

        let no_data: Vec<PlayerId> = season
            .players
            .iter()
            .filter(|(_, player)| player.has_no_events())
            .map(|(&player_id, _)| player_id)
            .collect();

        let output =
            EngineOutput { season: season.season, windows: self.windows.clone(), players, no_data };

        info!(
            "✅ Rolling computation complete: {} batters, {} rolling points, {} without data",
            output.players.len(),
            output.total_points(),
            output.no_data.len()
        );

        output
    }

    /// Compute one batter. Returns `None` when the batter has no usable events.
    pub fn compute_player(&self, player: &NormalizedPlayer) -> Option<PlayerResult> {
        if player.has_no_events() {
            return None;
        }

        let windows = self
            .windows
            .iter()
            .map(|window| (window, rolling_series(&player.events, window)))
            .collect();

        let season = SeasonAggregate::from_events(
            &player.events,
            player.statcast.clone(),
            player.expected_stats.clone(),
        );

        debug!(
            "Player {} ({}): {} events, season diff {:?}",
            player.meta.player_id,
            player.meta.name,
            player.events.len(),
            season.diff
        );

        Some(PlayerResult {
            meta: player.meta.clone(),
            season_pa: player.season_pa,
            season,
            windows,
        })
    }
}
