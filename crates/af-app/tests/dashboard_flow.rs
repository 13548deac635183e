//! End-to-end dashboard behavior against an in-memory store.

use af_app::{Dashboard, NoticeLevel};
use af_config::DashboardConfig;
use af_controls::{Actuator, ControlError, ControlMode, MemorySink};
use af_app::AppError;
use serde_json::json;

fn dashboard() -> Dashboard {
    Dashboard::new(&DashboardConfig::default()).unwrap()
}

#[test]
fn history_is_bounded_by_config() {
    let config = DashboardConfig {
        history: af_config::HistoryDef {
            capacity: 3,
            ..af_config::HistoryDef::default()
        },
        ..DashboardConfig::default()
    };
    let mut dash = Dashboard::new(&config).unwrap();
    for t in 0..10 {
        dash.on_snapshot(&json!({ "temp": t }), format!("t{t}"));
    }
    assert_eq!(dash.history().len(), 3);
    let stats = dash.summary().temperature.unwrap();
    assert_eq!(stats.mean, 8.0);
    assert_eq!(stats.min, 7.0);
    assert_eq!(stats.max, 9.0);
}

#[test]
fn light_hysteresis_through_store() {
    let mut dash = dashboard();
    let mut sink = MemorySink::new();
    dash.set_mode(ControlMode::Auto, "t0", &mut sink).unwrap();

    let out = dash
        .process_snapshot(&json!({ "sun": 250, "soil_hum": 450, "light": 0 }), "t1", &mut sink)
        .unwrap();
    assert_eq!(out.decision.unwrap().command.light, Some(true));
    assert!(sink.state.light);

    let out = dash
        .process_snapshot(&json!({ "sun": 450, "soil_hum": 450, "light": 1 }), "t2", &mut sink)
        .unwrap();
    assert!(out.decision.is_none());

    let out = dash
        .process_snapshot(&json!({ "sun": 550, "soil_hum": 450, "light": "1" }), "t3", &mut sink)
        .unwrap();
    assert_eq!(out.decision.unwrap().command.light, Some(false));
    assert!(!sink.state.light);
}

#[test]
fn manual_mode_only_writes_on_toggle() {
    let mut dash = dashboard();
    let mut sink = MemorySink::new();

    for (sun, soil) in [(0, 0), (1023, 1023), (100, 900)] {
        let out = dash
            .process_snapshot(&json!({ "sun": sun, "soil_hum": soil }), "t", &mut sink)
            .unwrap();
        assert!(out.decision.is_none());
    }
    assert!(sink.writes.is_empty());

    dash.toggle(Actuator::Pump, true, "t", &mut sink).unwrap();
    assert_eq!(sink.writes.len(), 1);
    assert!(sink.state.pump);
    assert!(dash.actuators().pump);
}

#[test]
fn failed_toggle_reverts_local_state() {
    let mut dash = dashboard();
    let mut sink = MemorySink::new();
    sink.fail_next(1);

    let err = dash.toggle(Actuator::Light, true, "t", &mut sink).unwrap_err();
    assert!(matches!(err, AppError::Control(ControlError::CommandWrite(_))));
    assert!(!dash.actuators().light);
    assert!(!dash.command_log()[0].ok);

    let notices = dash.drain_notices();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
}

#[test]
fn toggle_in_auto_is_refused() {
    let mut dash = dashboard();
    let mut sink = MemorySink::new();
    dash.set_mode(ControlMode::Auto, "t", &mut sink).unwrap();

    let err = dash.toggle(Actuator::Light, true, "t", &mut sink).unwrap_err();
    assert!(matches!(
        err,
        AppError::Control(ControlError::ToggleInAutoMode { .. })
    ));
    assert_eq!(sink.writes.len(), 1, "only the mode write reached the store");
}

#[test]
fn failed_auto_write_is_reported_and_retried_next_reading() {
    let mut dash = dashboard();
    let mut sink = MemorySink::new();
    dash.set_mode(ControlMode::Auto, "t0", &mut sink).unwrap();
    dash.drain_notices();
    sink.fail_next(1);

    let dry = json!({ "sun": 800, "soil_hum": 120, "pump": 0 });
    dash.process_snapshot(&dry, "t1", &mut sink).unwrap();
    assert!(!sink.state.pump);
    assert!(!dash.actuators().pump);
    assert!(
        dash.drain_notices()
            .iter()
            .any(|n| n.level == NoticeLevel::Error)
    );

    let out = dash.process_snapshot(&dry, "t2", &mut sink).unwrap();
    assert_eq!(out.decision.unwrap().command.pump, Some(true));
    assert!(sink.state.pump);

    let log = dash.command_log();
    assert_eq!(log.len(), 3);
    assert!(log[0].ok && !log[1].ok && log[2].ok);
}

#[test]
fn assessment_tracks_latest_reading() {
    let mut dash = dashboard();
    dash.on_snapshot(&json!({ "temp": 25, "humidity": 60, "soil_hum": 1.2 }), "t1");
    assert!(dash.assessment().unwrap().warnings().is_empty());

    dash.on_snapshot(&json!({ "temp": 35, "humidity": 60, "soil_hum": 1.2 }), "t2");
    let warnings = dash.assessment().unwrap().warnings();
    assert_eq!(warnings, vec![af_telemetry::Metric::Temperature]);
}
