//! End-to-end run: snapshot file in, report out

use chrono::{NaiveDate, TimeZone, Utc};
use event_normalizer::{BattedBallProfile, PlayerRecord, RawPlateAppearance, Snapshot};
use rolling_engine::{run_pipeline, EngineConfig, Report};

fn plate_appearance(
    player_id: u32,
    day: u32,
    ab: u32,
    woba: f64,
    xwoba: Option<f64>,
) -> RawPlateAppearance {
    RawPlateAppearance {
        player_id: Some(player_id),
        game_date: NaiveDate::from_ymd_opt(2025, 6, day),
        at_bat_number: Some(ab),
        woba_value: Some(woba),
        woba_denom: Some(1.0),
        estimated_woba_using_speedangle: xwoba,
        home_team: Some("LAD".to_string()),
        away_team: Some("SD".to_string()),
        inning_topbot: Some("Top".to_string()),
    }
}

fn snapshot() -> Snapshot {
    let mut events = Vec::new();
    for i in 0..30u32 {
        let day = i / 4 + 1;
        // Unlucky: hard contact, poor results
        let woba = if i % 3 == 0 { 0.9 } else { 0.0 };
        events.push(plate_appearance(100, day, i % 4 + 1, woba, Some(0.6)));
        // Lucky: weak contact, good results
        let xwoba = if i % 2 == 0 { Some(0.2) } else { None };
        events.push(plate_appearance(200, day, i % 4 + 10, 0.7, xwoba));
    }
    // Below the qualification threshold
    events.push(plate_appearance(300, 1, 1, 2.0, Some(1.9)));

    Snapshot {
        season: 2025,
        players: vec![
            PlayerRecord {
                player_id: 100,
                name: Some("Unlucky, Sam".to_string()),
                pa: Some(30),
                est_woba_minus_woba_diff: Some(0.25),
                ..Default::default()
            },
            PlayerRecord {
                player_id: 200,
                name: Some("Lucky, Lou".to_string()),
                team: Some("LAD".to_string()),
                pa: Some(30),
                ..Default::default()
            },
            PlayerRecord {
                player_id: 400,
                name: Some("Bench, Ben".to_string()),
                pa: Some(40),
                est_woba_minus_woba_diff: Some(0.01),
                ..Default::default()
            },
        ],
        events,
        batted_ball: vec![BattedBallProfile {
            player_id: 100,
            avg_hit_speed: Some(94.5),
            brl_percent: Some(15.0),
            ..Default::default()
        }],
    }
}

fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.windows.sizes = vec![5, 10, 25];
    config.windows.ranking_preference = vec![10, 5];
    config.qualification.min_plate_appearances = 20;
    config.output.trend_points = 4;
    config
}

#[test]
fn test_snapshot_file_to_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshot.json");
    std::fs::write(&input, serde_json::to_string(&snapshot()).unwrap()).unwrap();

    let loaded = Snapshot::load_from_file(&input).unwrap();
    let config = config();
    let result = run_pipeline(&loaded, &config).unwrap();

    assert_eq!(result.ingest.players_seen, 4);
    assert_eq!(result.ingest.players_qualified, 3);
    assert!(result.season.player(300).is_none());
    assert_eq!(result.output.no_data, vec![400]);

    let generated_at = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
    let report =
        Report::build(&result.season, &result.ingest, &result.output, &config, generated_at);

    assert_eq!(report.total_players, 3);
    assert_eq!(report.min_pa, 20);
    assert_eq!(report.rolling_windows, vec![5, 10, 25]);

    let ids: Vec<u32> = report.players.iter().map(|p| p.player_id).collect();
    assert_eq!(ids, vec![100, 400, 200]);

    let unlucky = &report.players[0];
    assert_eq!(unlucky.name, "Sam Unlucky");
    assert_eq!(unlucky.team, "SD");
    assert_eq!(unlucky.season.statcast.avg_exit_velocity, Some(94.5));
    assert_eq!(unlucky.windows[&10].trend.len(), 4);
    assert!(unlucky.diff_rolling_oba.unwrap() < 0.0);

    let lucky = &report.players[2];
    assert_eq!(lucky.team, "LAD");
    assert!(lucky.windows[&25].is_full);
    assert!(lucky.season.expected_count < lucky.season.realized_count);

    let output = dir.path().join("player_data.json");
    report.write_to_file(&output).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["total_players"], 3);
    assert!(written["players"][0]["diff_rolling_OBA"].is_number());
}

#[test]
fn test_two_runs_are_byte_identical() {
    let snapshot = snapshot();
    let config = config();
    let generated_at = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();

    let render = || {
        let result = run_pipeline(&snapshot, &config).unwrap();
        Report::build(&result.season, &result.ingest, &result.output, &config, generated_at)
            .to_json_pretty()
            .unwrap()
    };

    assert_eq!(render(), render());
}
