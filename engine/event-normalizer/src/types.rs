use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// MLBAM batter identifier
pub type PlayerId = u32;

/// One plate-appearance-ending pitch as delivered by the data source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlateAppearance {
    /// Batter ID
    pub player_id: Option<PlayerId>,
    /// Game date (YYYY-MM-DD)
    pub game_date: Option<NaiveDate>,
    /// At-bat number within the game
    pub at_bat_number: Option<u32>,
    /// Realized wOBA weight of the outcome
    pub woba_value: Option<f64>,
    /// wOBA denominator contribution (0 for events wOBA ignores)
    pub woba_denom: Option<f64>,
    /// Statcast expected wOBA from exit velocity and launch angle
    pub estimated_woba_using_speedangle: Option<f64>,
    /// Home team abbreviation
    pub home_team: Option<String>,
    /// Away team abbreviation
    pub away_team: Option<String>,
    /// "Top" or "Bot"
    pub inning_topbot: Option<String>,
}

/// Season expected-statistics row for one batter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    /// Name as published upstream, usually "Last, First"
    #[serde(alias = "last_name, first_name")]
    pub name: Option<String>,
    pub team: Option<String>,
    pub position: Option<String>,
    /// Season plate appearances
    pub pa: Option<u32>,
    pub ba: Option<f64>,
    pub woba: Option<f64>,
    pub est_woba: Option<f64>,
    pub est_ba: Option<f64>,
    pub est_slg: Option<f64>,
    /// Upstream differential, expected minus actual
    pub est_woba_minus_woba_diff: Option<f64>,
}

/// Season exit-velocity and barrel row for one batter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattedBallProfile {
    pub player_id: PlayerId,
    pub avg_hit_speed: Option<f64>,
    pub max_hit_speed: Option<f64>,
    pub avg_hit_angle: Option<f64>,
    /// Share of batted balls at 95+ mph
    pub ev95percent: Option<f64>,
    pub brl_percent: Option<f64>,
}

/// Immutable input for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub season: i32,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub events: Vec<RawPlateAppearance>,
    #[serde(default)]
    pub batted_ball: Vec<BattedBallProfile>,
}

impl Snapshot {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a snapshot from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::info!("Loading snapshot from: {:?}", path.as_ref());
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded season {}: {} player rows, {} events, {} batted-ball rows",
            snapshot.season,
            snapshot.players.len(),
            snapshot.events.len(),
            snapshot.batted_ball.len()
        );
        Ok(snapshot)
    }
}

/// A validated plate appearance in a batter's ordered season sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateAppearanceEvent {
    /// Position in the filtered sequence, 0-based and gap-free
    pub sequence_index: usize,
    pub game_date: NaiveDate,
    pub at_bat_number: u32,
    pub realized_value: Option<f64>,
    pub expected_value: Option<f64>,
}

/// Display attributes; opaque to the rolling engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMeta {
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: String,
}

/// Statcast batted-ball metrics passed straight through to the output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatcastSummary {
    pub avg_exit_velocity: Option<f64>,
    pub max_exit_velocity: Option<f64>,
    pub avg_launch_angle: Option<f64>,
    pub hard_hit_pct: Option<f64>,
    pub barrel_pct: Option<f64>,
}

impl From<&BattedBallProfile> for StatcastSummary {
    fn from(profile: &BattedBallProfile) -> Self {
        Self {
            avg_exit_velocity: profile.avg_hit_speed,
            max_exit_velocity: profile.max_hit_speed,
            avg_launch_angle: profile.avg_hit_angle,
            hard_hit_pct: profile.ev95percent,
            barrel_pct: profile.brl_percent,
        }
    }
}

/// Published season expected stats, passed through to the output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedStatsLine {
    pub batting_avg: Option<f64>,
    pub woba: Option<f64>,
    pub xwoba: Option<f64>,
    pub xba: Option<f64>,
    pub xslg: Option<f64>,
    /// Actual minus expected (sign flipped from the upstream column)
    pub season_diff: Option<f64>,
}

impl From<&PlayerRecord> for ExpectedStatsLine {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            batting_avg: record.ba,
            woba: record.woba,
            xwoba: record.est_woba,
            xba: record.est_ba,
            xslg: record.est_slg,
            season_diff: record.est_woba_minus_woba_diff.map(|d| -d),
        }
    }
}

/// A qualified batter and his ordered event sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPlayer {
    pub meta: PlayerMeta,
    /// Season-to-date plate appearances used for qualification
    pub season_pa: u32,
    pub events: Vec<PlateAppearanceEvent>,
    pub expected_stats: ExpectedStatsLine,
    pub statcast: StatcastSummary,
}

impl NormalizedPlayer {
    /// True when every event was filtered away
    pub fn has_no_events(&self) -> bool {
        self.events.is_empty()
    }
}

/// Normalizer output for a whole season
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeason {
    pub season: i32,
    pub min_plate_appearances: u32,
    pub players: BTreeMap<PlayerId, NormalizedPlayer>,
}

impl NormalizedSeason {
    pub fn player(&self, player_id: PlayerId) -> Option<&NormalizedPlayer> {
        self.players.get(&player_id)
    }

    pub fn total_events(&self) -> usize {
        self.players.values().map(|p| p.events.len()).sum()
    }
}
