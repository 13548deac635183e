use std::io::Cursor;

use af_app::{ReplayOptions, list_sessions, load_session, replay_lines, summarize_session};
use af_config::DashboardConfig;
use af_controls::ControlMode;

const FEED: &str = r#"
# evening, soil drying out
{"temp": 26.1, "humidity": 70, "soil_hum": 520, "sun": 610, "light": 0, "pump": 0}
{"temp": 25.4, "humidity": 72, "soil_hum": 410, "sun": 280, "light": 0, "pump": 0}
null
{"temp": 24.9, "humidity": 74, "soil_hum": 250, "sun": 120, "light": 1, "pump": 0}
not json
{"temp": 24.0, "humidity": 75, "soil_hum": 640, "sun": 90, "light": 1, "pump": 1}
"#;

#[test]
fn replay_counts_and_commands() {
    let options = ReplayOptions {
        mode: Some(ControlMode::Auto),
        ..ReplayOptions::default()
    };
    let mut notices = Vec::new();
    let report = replay_lines(
        &DashboardConfig::default(),
        Cursor::new(FEED),
        &options,
        Some(&mut |n| notices.push(n.clone())),
    )
    .unwrap();

    assert_eq!(report.readings, 4);
    assert_eq!(report.empty_pushes, 1);
    assert_eq!(report.ingress_errors, 1);

    // mode write, light on, pump on, pump off
    assert_eq!(report.commands.len(), 4);
    assert!(report.commands.iter().all(|c| c.ok));
    assert!(report.store.light);
    assert!(!report.store.pump);
    assert_eq!(report.store.control_mode, ControlMode::Auto);

    assert_eq!(report.view.data_points, 4);
    assert!(report.view.link.connected);
    assert!(!report.view.link.stale);
    assert!(notices.iter().any(|n| n.message.contains("dry soil")));
}

#[test]
fn recorded_session_can_be_reloaded() {
    let dir = std::env::temp_dir().join("af_app_replay_sessions");
    let _ = std::fs::remove_dir_all(&dir);

    let options = ReplayOptions {
        mode: Some(ControlMode::Auto),
        fail_writes: 0,
        record_dir: Some(dir.clone()),
    };
    let report = replay_lines(&DashboardConfig::default(), Cursor::new(FEED), &options, None).unwrap();
    let session_id = report.session_id.unwrap();

    let sessions = list_sessions(&dir).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, session_id);
    assert_eq!(sessions[0].reading_count, 4);

    let (manifest, readings, commands) = load_session(&dir, &session_id).unwrap();
    assert_eq!(manifest.final_mode, ControlMode::Auto);
    assert_eq!(readings.len(), 4);

    let summary = summarize_session(&readings, &commands);
    let temp = summary.summary.temperature.unwrap();
    assert!((temp.mean - 25.1).abs() < 1e-9);
    assert_eq!(summary.commands, 4);
    assert_eq!(summary.failed_commands, 0);
}

#[test]
fn unknown_session_is_reported() {
    let dir = std::env::temp_dir().join("af_app_replay_missing");
    let _ = std::fs::remove_dir_all(&dir);
    let err = load_session(&dir, "nope").unwrap_err();
    assert!(matches!(err, af_app::AppError::SessionNotFound(_)));
}

#[test]
fn replay_keeps_every_command_beyond_the_display_log() {
    let config = DashboardConfig {
        history: af_config::HistoryDef {
            command_log: 1,
            ..af_config::HistoryDef::default()
        },
        ..DashboardConfig::default()
    };
    let options = ReplayOptions {
        mode: Some(ControlMode::Auto),
        ..ReplayOptions::default()
    };
    let report = replay_lines(&config, Cursor::new(FEED), &options, None).unwrap();
    assert_eq!(report.commands.len(), 4);
}
