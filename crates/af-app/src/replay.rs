//! Replay a recorded stream of store snapshots through a [`Dashboard`].
//!
//! Input is JSON lines: one pushed snapshot per line, `null` for an empty
//! push. Blank lines and lines starting with `#` are skipped. A line that is
//! not valid JSON is treated as a failed read from the store.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use af_config::DashboardConfig;
use af_controls::{ControlMode, MemorySink, StoreState};
use af_records::{CommandRecord, SessionManifest, SessionStore, new_session_id, now_rfc3339};
use af_telemetry::{Reading, TelemetryError, ingress_timestamp};
use serde_json::Value;

use crate::dashboard::{Dashboard, DashboardView};
use crate::error::{AppError, AppResult};
use crate::notice::Notice;

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Mode to switch to before the first snapshot.
    pub mode: Option<ControlMode>,
    /// Number of leading store writes that fail.
    pub fail_writes: usize,
    /// Save the replay as a session under this directory.
    pub record_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub readings: usize,
    pub empty_pushes: usize,
    pub ingress_errors: usize,
    pub commands: Vec<CommandRecord>,
    pub store: StoreState,
    pub view: DashboardView,
    pub session_id: Option<String>,
}

pub fn replay_file(
    config: &DashboardConfig,
    path: &Path,
    options: &ReplayOptions,
    on_notice: Option<&mut dyn FnMut(&Notice)>,
) -> AppResult<ReplayReport> {
    let file = std::fs::File::open(path).map_err(|e| AppError::InputRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    replay_lines(config, std::io::BufReader::new(file), options, on_notice)
}

pub fn replay_lines<R: BufRead>(
    config: &DashboardConfig,
    input: R,
    options: &ReplayOptions,
    mut on_notice: Option<&mut dyn FnMut(&Notice)>,
) -> AppResult<ReplayReport> {
    let started_at = now_rfc3339();
    let mut dash = Dashboard::new(config)?;
    let mut sink = MemorySink::new();
    sink.fail_next(options.fail_writes);

    let mut recorded: Vec<Reading> = Vec::new();
    let mut commands: Vec<CommandRecord> = Vec::new();
    let mut empty_pushes = 0;
    let mut ingress_errors = 0;

    dash.on_connection(true);
    if let Some(mode) = options.mode
        && let Err(err) = dash.set_mode(mode, clock(), &mut sink)
    {
        tracing::warn!(%err, "could not publish initial mode");
    }
    forward(&mut dash, &mut commands, &mut on_notice);

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => match dash.process_snapshot(&value, clock(), &mut sink) {
                Some(_) => {
                    if let Some(reading) = dash.history().latest() {
                        recorded.push(reading.clone());
                    }
                }
                None => empty_pushes += 1,
            },
            Err(e) => {
                ingress_errors += 1;
                let err = TelemetryError::ingress(format!("line {}: {e}", index + 1));
                dash.on_ingress_error(&err);
            }
        }
        forward(&mut dash, &mut commands, &mut on_notice);
    }

    tracing::info!(
        readings = recorded.len(),
        empty_pushes,
        ingress_errors,
        "replay finished"
    );

    let session_id = match &options.record_dir {
        Some(dir) => Some(record_session(
            config,
            dir,
            &dash,
            &recorded,
            &commands,
            started_at,
        )?),
        None => None,
    };

    Ok(ReplayReport {
        readings: recorded.len(),
        empty_pushes,
        ingress_errors,
        commands,
        store: sink.state,
        view: dash.view(),
        session_id,
    })
}

fn record_session(
    config: &DashboardConfig,
    dir: &Path,
    dash: &Dashboard,
    readings: &[Reading],
    commands: &[CommandRecord],
    started_at: String,
) -> AppResult<String> {
    let store = SessionStore::new(dir.to_path_buf())?;
    let manifest = SessionManifest {
        session_id: new_session_id(),
        name: config.name.clone(),
        started_at,
        ended_at: now_rfc3339(),
        reading_count: readings.len(),
        final_mode: dash.mode(),
        engine: dash.engine().stats(),
    };
    store.save_session(&manifest, readings, commands)?;
    tracing::info!(session_id = %manifest.session_id, "session recorded");
    Ok(manifest.session_id)
}

/// Move the dashboard's pending commands and notices out to the replay.
fn forward(
    dash: &mut Dashboard,
    commands: &mut Vec<CommandRecord>,
    on_notice: &mut Option<&mut dyn FnMut(&Notice)>,
) {
    commands.extend(dash.drain_commands());
    for notice in dash.drain_notices() {
        if let Some(cb) = on_notice.as_deref_mut() {
            cb(&notice);
        }
    }
}

fn clock() -> String {
    ingress_timestamp(&chrono::Local::now())
}
