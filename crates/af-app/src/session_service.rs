//! Listing and inspecting recorded sessions.

use std::path::Path;

use af_records::{CommandRecord, SessionManifest, SessionStore};
use af_telemetry::{Metric, Reading, Summary, stats};

use crate::error::AppResult;

/// Whole-session statistics (not limited to the history window).
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub summary: Summary,
    pub time_range: Option<(String, String)>,
    pub commands: usize,
    pub failed_commands: usize,
}

pub fn list_sessions(root: &Path) -> AppResult<Vec<SessionManifest>> {
    let store = SessionStore::new(root.to_path_buf())?;
    Ok(store.list_sessions()?)
}

pub fn load_session(
    root: &Path,
    session_id: &str,
) -> AppResult<(SessionManifest, Vec<Reading>, Vec<CommandRecord>)> {
    let store = SessionStore::new(root.to_path_buf())?;
    let manifest = store.load_manifest(session_id)?;
    let readings = store.load_readings(session_id)?;
    let commands = store.load_commands(session_id)?;
    Ok((manifest, readings, commands))
}

pub fn summarize_session(readings: &[Reading], commands: &[CommandRecord]) -> SessionSummary {
    let over = |metric: Metric| stats(readings.iter().map(|r| r.value(metric)));
    let time_range = match (readings.first(), readings.last()) {
        (Some(first), Some(last)) => Some((first.timestamp.clone(), last.timestamp.clone())),
        _ => None,
    };

    SessionSummary {
        summary: Summary {
            temperature: over(Metric::Temperature),
            humidity: over(Metric::Humidity),
            soil_moisture: over(Metric::SoilMoisture),
            samples: readings.len(),
        },
        time_range,
        commands: commands.len(),
        failed_commands: commands.iter().filter(|c| !c.ok).count(),
    }
}
