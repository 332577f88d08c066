// Event normalization for the rolling engine

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NormalizeError, Result};
use crate::identity::{batting_team, display_name, UNKNOWN_TEAM};
use crate::types::{
    ExpectedStatsLine, NormalizedPlayer, NormalizedSeason, PlateAppearanceEvent,
    PlayerId, PlayerMeta, PlayerRecord, RawPlateAppearance, Snapshot, StatcastSummary,
};

/// What to use as the expected value when Statcast did not model an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedFallback {
    /// Leave the expected side empty; it does not count toward expected means
    #[default]
    Exclude,
    /// Substitute the realized value (strikeouts, walks and HBP have no batted-ball model)
    Realized,
}

/// Normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Minimum season plate appearances for a batter to qualify
    pub min_plate_appearances: u32,

    /// Expected-side handling for unmodeled events
    pub expected_fallback: ExpectedFallback,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self { min_plate_appearances: 50, expected_fallback: ExpectedFallback::Exclude }
    }
}

/// Counters describing what happened to the input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub records_seen: usize,
    pub records_rejected: usize,
    pub fully_null_dropped: usize,
    pub players_seen: usize,
    pub players_qualified: usize,
    /// Qualified batters left with no usable events
    pub players_without_events: Vec<PlayerId>,
    /// Qualified batters missing a name or team upstream
    pub unknown_metadata: Vec<PlayerId>,
}

/// A record that passed field validation, still in input order
#[derive(Debug, Clone)]
struct ValidatedRecord<'a> {
    player_id: PlayerId,
    game_date: NaiveDate,
    at_bat_number: u32,
    realized: Option<f64>,
    expected: Option<f64>,
    raw: &'a RawPlateAppearance,
}

impl ValidatedRecord<'_> {
    fn is_fully_null(&self) -> bool {
        self.realized.is_none() && self.expected.is_none()
    }
}

/// Event normalizer for converting raw snapshot records into per-batter sequences
pub struct EventNormalizer {
    config: NormalizationConfig,
}

impl EventNormalizer {
    pub fn new(config: NormalizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    /// Normalize a full snapshot. Per-record problems are logged and counted,
    /// never returned, so one bad row cannot abort the batch.
    pub fn normalize(&self, snapshot: &Snapshot) -> (NormalizedSeason, IngestReport) {
        let mut report = IngestReport { records_seen: snapshot.events.len(), ..Default::default() };

        let records = index_by_player(&snapshot.players, |r| r.player_id, "player");
        let profiles = index_by_player(&snapshot.batted_ball, |p| p.player_id, "batted-ball");

        let mut grouped: BTreeMap<PlayerId, Vec<ValidatedRecord<'_>>> = BTreeMap::new();
        for (index, raw) in snapshot.events.iter().enumerate() {
            match self.validate(index, raw) {
                Ok(record) => grouped.entry(record.player_id).or_default().push(record),
                Err(e) => {
                    debug!("Rejected record: {}", e);
                    report.records_rejected += 1;
                }
            }
        }

        if report.records_rejected > 0 {
            warn!(
                "Rejected {} of {} raw records with missing or invalid fields",
                report.records_rejected, report.records_seen
            );
        }

        let mut player_ids: Vec<PlayerId> = records.keys().copied().collect();
        player_ids.extend(grouped.keys().copied());
        player_ids.sort_unstable();
        player_ids.dedup();
        report.players_seen = player_ids.len();

        let mut players = BTreeMap::new();
        for player_id in player_ids {
            let record = records.get(&player_id).copied();
            let mut sequence = grouped.remove(&player_id).unwrap_or_default();

            let season_pa = record
                .and_then(|r| r.pa)
                .unwrap_or_else(|| u32::try_from(sequence.len()).unwrap_or(u32::MAX));
            if season_pa < self.config.min_plate_appearances {
                debug!(
                    "Player {} not qualified: {} PA < {}",
                    player_id, season_pa, self.config.min_plate_appearances
                );
                continue;
            }
            report.players_qualified += 1;

            // Stable: equal keys keep input order
            sequence.sort_by_key(|r| (r.game_date, r.at_bat_number));

            let meta = self.build_meta(player_id, record, &sequence, &mut report);

            let before = sequence.len();
            let events: Vec<PlateAppearanceEvent> = sequence
                .iter()
                .filter(|r| !r.is_fully_null())
                .enumerate()
                .map(|(sequence_index, r)| PlateAppearanceEvent {
                    sequence_index,
                    game_date: r.game_date,
                    at_bat_number: r.at_bat_number,
                    realized_value: r.realized,
                    expected_value: r.expected,
                })
                .collect();
            report.fully_null_dropped += before - events.len();

            if events.is_empty() {
                info!("Player {} ({}) qualifies but has no usable events", player_id, meta.name);
                report.players_without_events.push(player_id);
            }

            players.insert(
                player_id,
                NormalizedPlayer {
                    meta,
                    season_pa,
                    events,
                    expected_stats: record.map(ExpectedStatsLine::from).unwrap_or_default(),
                    statcast: profiles
                        .get(&player_id)
                        .map(|p| StatcastSummary::from(*p))
                        .unwrap_or_default(),
                },
            );
        }

        let season = NormalizedSeason {
            season: snapshot.season,
            min_plate_appearances: self.config.min_plate_appearances,
            players,
        };

        info!(
            "Season {}: {} of {} batters qualified, {} events kept, {} fully-null dropped",
            season.season,
            report.players_qualified,
            report.players_seen,
            season.total_events(),
            report.fully_null_dropped
        );

        (season, report)
    }

    fn validate<'a>(
        &self,
        index: usize,
        raw: &'a RawPlateAppearance,
    ) -> Result<ValidatedRecord<'a>> {
        let player_id =
            raw.player_id.ok_or(NormalizeError::MissingData { index, field: "player_id" })?;
        let game_date =
            raw.game_date.ok_or(NormalizeError::MissingData { index, field: "game_date" })?;
        let at_bat_number = raw
            .at_bat_number
            .ok_or(NormalizeError::MissingData { index, field: "at_bat_number" })?;

        let woba_value = finite(index, "woba_value", raw.woba_value)?;
        let woba_denom = finite(index, "woba_denom", raw.woba_denom)?;
        let estimated =
            finite(index, "estimated_woba_using_speedangle", raw.estimated_woba_using_speedangle)?;

        let realized = match woba_denom {
            Some(denom) if denom == 0.0 => None,
            _ => woba_value,
        };
        let expected = match self.config.expected_fallback {
            ExpectedFallback::Exclude => estimated,
            ExpectedFallback::Realized => estimated.or(realized),
        };

        Ok(ValidatedRecord { player_id, game_date, at_bat_number, realized, expected, raw })
    }

    fn build_meta(
        &self,
        player_id: PlayerId,
        record: Option<&PlayerRecord>,
        sequence: &[ValidatedRecord<'_>],
        report: &mut IngestReport,
    ) -> PlayerMeta {
        let recorded_team = record
            .and_then(|r| r.team.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let team =
            recorded_team.or_else(|| sequence.iter().rev().find_map(|r| batting_team(r.raw)));

        let name = record.and_then(|r| r.name.as_deref()).filter(|n| !n.trim().is_empty());
        if name.is_none() || team.is_none() {
            warn!("Player {} is missing display metadata, using placeholders", player_id);
            report.unknown_metadata.push(player_id);
        }

        PlayerMeta {
            player_id,
            name: display_name(name),
            team: team.unwrap_or(UNKNOWN_TEAM).to_string(),
            position: record
                .and_then(|r| r.position.clone())
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
        }
    }
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new(NormalizationConfig::default())
    }
}

fn finite(index: usize, field: &'static str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(NormalizeError::NonFiniteValue { index, field }),
        other => Ok(other),
    }
}

/// First row per player wins; duplicates are logged
fn index_by_player<'a, T>(
    rows: &'a [T],
    key: impl Fn(&T) -> PlayerId,
    kind: &str,
) -> BTreeMap<PlayerId, &'a T> {
    let mut map = BTreeMap::new();
    for row in rows {
        let id = key(row);
        if map.contains_key(&id) {
            warn!("Duplicate {} row for player {}, keeping the first", kind, id);
            continue;
        }
        map.insert(id, row);
    }
    map
}
