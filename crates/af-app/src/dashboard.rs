//! Dashboard service: one owner for history, analytics and auto-control.
//!
//! The dashboard is driven by ingress events (`on_snapshot`, `on_reading`,
//! `on_ingress_error`, `on_connection`) and by user actions (`set_mode`,
//! `toggle`). Auto-mode commands are handed to the caller, which writes them
//! and reports back through `on_command_result`; `process_snapshot` does both
//! steps for a synchronous sink.

use std::collections::VecDeque;

use af_config::DashboardConfig;
use chrono::{DateTime, TimeDelta, Utc};
use af_controls::{
    Actuator, ActuatorCommand, ActuatorState, AutoControlEngine, AutoDecision, CommandSink,
    CommandWriteError, ControlMode, EngineStats,
};
use af_records::{CommandOrigin, CommandRecord};
use af_telemetry::{
    Assessment, NormalBands, Reading, SampleHistory, Summary, TelemetryError, assess,
    decode_snapshot, summarize,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::notice::Notice;

/// Connection to the realtime store as last reported by ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LinkStatus {
    pub connected: bool,
    /// Set after an ingress error until the next reading arrives.
    pub stale: bool,
}

/// What happened to one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingOutcome {
    /// Auto-mode command to write, if any.
    pub decision: Option<AutoDecision>,
    /// Mode change picked up from the store along with this reading.
    pub remote_mode: Option<ControlMode>,
}

/// Read-only snapshot for display consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub mode: ControlMode,
    pub actuators: ActuatorState,
    pub latest: Option<Reading>,
    pub summary: Summary,
    pub assessment: Option<Assessment>,
    pub data_points: usize,
    pub link: LinkStatus,
    pub last_update: Option<String>,
    pub in_flight: bool,
    pub engine: EngineStats,
    /// Time since the dashboard was created, as `"1h 2m 3s"`.
    pub uptime: String,
}

/// Undrained notices kept before the oldest are dropped.
pub const NOTICE_BACKLOG: usize = 64;

/// A soil band topping out at or below this is on a volt scale.
const SOIL_VOLT_BAND_MAX: f64 = 5.0;
/// Soil readings above this are raw ADC counts.
const SOIL_COUNT_READING_MIN: f64 = 100.0;

#[derive(Debug, Clone)]
struct PendingAuto {
    timestamp: String,
    command: ActuatorCommand,
}

pub struct Dashboard {
    bands: NormalBands,
    soil_scale_flagged: bool,
    history: SampleHistory,
    engine: AutoControlEngine,
    link: LinkStatus,
    last_update: Option<String>,
    pending: Option<PendingAuto>,
    notices: VecDeque<Notice>,
    command_log: VecDeque<CommandRecord>,
    command_log_capacity: usize,
    started_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> AppResult<Self> {
        let history = SampleHistory::new(config.history.capacity)?;
        let mut engine = AutoControlEngine::new(config.auto)?;
        engine.set_mode(config.initial_mode);
        Ok(Self {
            bands: config.bands,
            soil_scale_flagged: false,
            history,
            engine,
            link: LinkStatus::default(),
            last_update: None,
            pending: None,
            notices: VecDeque::new(),
            command_log: VecDeque::new(),
            command_log_capacity: config.history.command_log,
            started_at: Utc::now(),
        })
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.history)
    }

    /// Status of the latest reading against the normal bands.
    pub fn assessment(&self) -> Option<Assessment> {
        self.history.latest().map(|r| assess(r, &self.bands))
    }

    pub fn mode(&self) -> ControlMode {
        self.engine.mode()
    }

    pub fn actuators(&self) -> ActuatorState {
        self.engine.actuators()
    }

    pub fn engine(&self) -> &AutoControlEngine {
        &self.engine
    }

    pub fn link(&self) -> LinkStatus {
        self.link
    }

    /// Most recent command writes, oldest first, bounded by
    /// `history.command_log`.
    pub fn command_log(&self) -> &VecDeque<CommandRecord> {
        &self.command_log
    }

    /// Take all command records logged since the last call.
    pub fn drain_commands(&mut self) -> Vec<CommandRecord> {
        self.command_log.drain(..).collect()
    }

    /// Take all notices raised since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time elapsed between creation and `now`, never negative.
    pub fn uptime(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.started_at).max(TimeDelta::zero())
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            mode: self.mode(),
            actuators: self.actuators(),
            latest: self.history.latest().cloned(),
            summary: self.summary(),
            assessment: self.assessment(),
            data_points: self.history.len(),
            link: self.link,
            last_update: self.last_update.clone(),
            in_flight: self.engine.in_flight(),
            engine: self.engine.stats(),
            uptime: format_uptime(self.uptime(Utc::now())),
        }
    }

    /// Decode a pushed store snapshot and process it.
    ///
    /// Returns `None` for an empty push. A `controlMode` in the snapshot that
    /// differs from the local mode is adopted before the reading is evaluated.
    pub fn on_snapshot(&mut self, value: &Value, timestamp: impl Into<String>) -> Option<ReadingOutcome> {
        let snapshot = decode_snapshot(value, timestamp)?;

        let remote_mode = match snapshot.control_mode.as_deref().map(str::parse::<ControlMode>) {
            Some(Ok(mode)) if mode != self.engine.mode() => {
                self.engine.set_mode(mode);
                self.notify(mode_notice(mode));
                tracing::info!(%mode, "control mode synced from store");
                Some(mode)
            }
            Some(Err(err)) => {
                tracing::warn!(%err, "ignoring control mode from store");
                None
            }
            _ => None,
        };

        let mut outcome = self.on_reading(snapshot.reading);
        outcome.remote_mode = remote_mode;
        Some(outcome)
    }

    /// Record a reading and run auto-control on it.
    pub fn on_reading(&mut self, reading: Reading) -> ReadingOutcome {
        self.link.stale = false;
        self.last_update = Some(reading.timestamp.clone());
        self.check_soil_scale(reading.soil_moisture);

        let decision = self.engine.on_reading(&reading);
        if let Some(decision) = &decision {
            for reason in &decision.reasons {
                self.notify(Notice::info(reason.message()));
            }
            tracing::info!(command = %decision.command, "auto-control command issued");
            self.pending = Some(PendingAuto {
                timestamp: reading.timestamp.clone(),
                command: decision.command,
            });
        }

        self.history.append(reading);

        ReadingOutcome {
            decision,
            remote_mode: None,
        }
    }

    /// Report how the outstanding auto-mode write ended.
    pub fn on_command_result(&mut self, result: Result<(), CommandWriteError>) {
        if let Some(pending) = self.pending.take() {
            self.log_command(CommandRecord {
                timestamp: pending.timestamp,
                origin: CommandOrigin::Auto,
                command: pending.command,
                ok: result.is_ok(),
                error: result.as_ref().err().map(ToString::to_string),
            });
        }

        if let Err(err) = self.engine.on_command_result(result) {
            tracing::warn!(%err, "auto-control write failed");
            self.notify(Notice::error(format!("Auto-control update failed: {err}")));
        }
    }

    /// Process a snapshot and write any resulting command through `sink`.
    pub fn process_snapshot<S: CommandSink + ?Sized>(
        &mut self,
        value: &Value,
        timestamp: impl Into<String>,
        sink: &mut S,
    ) -> Option<ReadingOutcome> {
        let outcome = self.on_snapshot(value, timestamp)?;
        if let Some(decision) = &outcome.decision {
            let result = sink.write(&decision.command);
            self.on_command_result(result);
        }
        Some(outcome)
    }

    /// The subscription failed; keep showing the last known state.
    pub fn on_ingress_error(&mut self, err: &TelemetryError) {
        tracing::warn!(%err, "telemetry ingress failed");
        self.link.stale = true;
        self.notify(Notice::error("Error loading data"));
    }

    pub fn on_connection(&mut self, connected: bool) {
        if self.link.connected == connected {
            return;
        }
        self.link.connected = connected;
        if connected {
            tracing::info!("store connected");
            self.notify(Notice::success("Connected"));
        } else {
            tracing::warn!("store disconnected");
            self.notify(Notice::warning("Disconnected"));
        }
    }

    /// Switch control mode locally and publish it to the store.
    ///
    /// The local mode changes even if the write fails; the failure is
    /// reported and returned.
    pub fn set_mode<S: CommandSink + ?Sized>(
        &mut self,
        mode: ControlMode,
        timestamp: impl Into<String>,
        sink: &mut S,
    ) -> AppResult<()> {
        self.engine.set_mode(mode);
        self.notify(mode_notice(mode));

        let command = ActuatorCommand::mode(mode);
        let result = sink.write(&command);
        self.log_direct(timestamp.into(), CommandOrigin::Mode, command, &result);

        if let Err(err) = result {
            self.notify(Notice::error(format!("Failed to publish {mode} mode")));
            return Err(af_controls::ControlError::CommandWrite(err).into());
        }
        Ok(())
    }

    /// User toggle of one actuator.
    ///
    /// Refused in auto mode. On write failure the local state is reverted.
    pub fn toggle<S: CommandSink + ?Sized>(
        &mut self,
        actuator: Actuator,
        on: bool,
        timestamp: impl Into<String>,
        sink: &mut S,
    ) -> AppResult<()> {
        let command = match self.engine.request_toggle(actuator, on) {
            Ok(command) => command,
            Err(err) => {
                self.notify(Notice::warning(err.to_string()));
                return Err(err.into());
            }
        };

        let result = sink.write(&command);
        self.log_direct(timestamp.into(), CommandOrigin::Manual, command, &result);

        match self.engine.on_command_result(result) {
            Ok(()) => {
                let state = if on { "ON" } else { "OFF" };
                self.notify(Notice::success(format!("{} turned {state}", capitalized(actuator))));
                Ok(())
            }
            Err(err) => {
                self.notify(Notice::error(format!("Failed to update {actuator}")));
                Err(err.into())
            }
        }
    }

    fn log_direct(
        &mut self,
        timestamp: String,
        origin: CommandOrigin,
        command: ActuatorCommand,
        result: &Result<(), CommandWriteError>,
    ) {
        self.log_command(CommandRecord {
            timestamp,
            origin,
            command,
            ok: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
        });
    }

    /// Flag, once, a volt-scale soil band fed with count-scale readings.
    fn check_soil_scale(&mut self, soil_moisture: f64) {
        let band = self.bands.soil_moisture;
        if self.soil_scale_flagged
            || band.max > SOIL_VOLT_BAND_MAX
            || soil_moisture <= SOIL_COUNT_READING_MIN
        {
            return;
        }
        self.soil_scale_flagged = true;
        tracing::warn!(
            band_min = band.min,
            band_max = band.max,
            soil_moisture,
            "soil band is on a volt scale but readings are raw counts; set bands.soil_moisture in counts"
        );
        self.notify(Notice::warning(format!(
            "Soil moisture band {}-{} does not match readings in raw counts",
            band.min, band.max
        )));
    }

    fn log_command(&mut self, record: CommandRecord) {
        push_bounded(&mut self.command_log, self.command_log_capacity, record);
    }

    fn notify(&mut self, notice: Notice) {
        push_bounded(&mut self.notices, NOTICE_BACKLOG, notice);
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, capacity: usize, item: T) {
    while queue.len() >= capacity.max(1) {
        queue.pop_front();
    }
    queue.push_back(item);
}

/// Render a duration as `"{h}h {m}m {s}s"`.
pub fn format_uptime(uptime: TimeDelta) -> String {
    let secs = uptime.num_seconds().max(0);
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn mode_notice(mode: ControlMode) -> Notice {
    match mode {
        ControlMode::Manual => Notice::info("Manual mode activated"),
        ControlMode::Auto => Notice::info("Auto mode activated"),
    }
}

fn capitalized(actuator: Actuator) -> &'static str {
    match actuator {
        Actuator::Light => "Light",
        Actuator::Pump => "Pump",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_controls::MemorySink;
    use serde_json::json;

    fn dashboard() -> Dashboard {
        Dashboard::new(&DashboardConfig::default()).unwrap()
    }

    #[test]
    fn readings_are_recorded_even_when_guard_drops_them() {
        let mut dash = dashboard();
        let mut sink = MemorySink::new();
        dash.set_mode(ControlMode::Auto, "t0", &mut sink).unwrap();

        let dark = json!({ "temp": 25, "sun": 250, "soil_hum": 450, "light": 0, "pump": 0 });
        let first = dash.on_snapshot(&dark, "t1").unwrap();
        assert!(first.decision.is_some());

        let second = dash.on_snapshot(&dark, "t2").unwrap();
        assert!(second.decision.is_none());
        assert_eq!(dash.history().len(), 2);

        dash.on_command_result(Ok(()));
        assert!(!dash.engine().in_flight());
        assert_eq!(dash.command_log().back().unwrap().origin, CommandOrigin::Auto);
    }

    #[test]
    fn remote_mode_is_adopted() {
        let mut dash = dashboard();
        let outcome = dash
            .on_snapshot(&json!({ "controlMode": "auto", "sun": 100 }), "t")
            .unwrap();
        assert_eq!(outcome.remote_mode, Some(ControlMode::Auto));
        assert_eq!(dash.mode(), ControlMode::Auto);
        // Evaluated in the new mode straight away.
        assert!(outcome.decision.is_some());
    }

    #[test]
    fn unknown_remote_mode_is_ignored() {
        let mut dash = dashboard();
        let outcome = dash
            .on_snapshot(&json!({ "controlMode": "scheduled" }), "t")
            .unwrap();
        assert!(outcome.remote_mode.is_none());
        assert_eq!(dash.mode(), ControlMode::Manual);
    }

    #[test]
    fn ingress_error_marks_stale_until_next_reading() {
        let mut dash = dashboard();
        dash.on_snapshot(&json!({ "temp": 22 }), "t1");
        dash.on_ingress_error(&TelemetryError::ingress("permission denied"));
        assert!(dash.link().stale);
        assert_eq!(dash.history().len(), 1);
        assert_eq!(dash.drain_notices().last().unwrap(), &Notice::error("Error loading data"));

        dash.on_snapshot(&json!({ "temp": 23 }), "t2");
        assert!(!dash.link().stale);
    }

    #[test]
    fn connection_changes_raise_notices_once() {
        let mut dash = dashboard();
        dash.on_connection(true);
        dash.on_connection(true);
        dash.on_connection(false);
        let notices = dash.drain_notices();
        assert_eq!(notices.len(), 2);
        assert!(!dash.link().connected);
    }

    #[test]
    fn command_log_and_notices_stay_bounded() {
        let config = DashboardConfig {
            history: af_config::HistoryDef {
                command_log: 8,
                ..af_config::HistoryDef::default()
            },
            ..DashboardConfig::default()
        };
        let mut dash = Dashboard::new(&config).unwrap();
        let mut sink = MemorySink::new();

        for i in 0..10_000 {
            dash.toggle(Actuator::Light, i % 2 == 0, format!("t{i}"), &mut sink)
                .unwrap();
        }

        assert_eq!(dash.command_log().len(), 8);
        assert_eq!(dash.command_log().back().unwrap().timestamp, "t9999");
        assert_eq!(dash.command_log().front().unwrap().timestamp, "t9992");
        assert_eq!(dash.drain_notices().len(), NOTICE_BACKLOG);
        assert!(dash.drain_notices().is_empty());

        assert_eq!(dash.drain_commands().len(), 8);
        assert!(dash.command_log().is_empty());
    }

    #[test]
    fn volt_scale_soil_band_is_flagged_once() {
        let mut dash = dashboard();
        dash.on_snapshot(&json!({ "soil_hum": 450 }), "t1");
        dash.on_snapshot(&json!({ "soil_hum": 470 }), "t2");
        let flagged: Vec<_> = dash
            .drain_notices()
            .into_iter()
            .filter(|n| n.message.contains("Soil moisture band"))
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].level, crate::notice::NoticeLevel::Warning);
    }

    #[test]
    fn count_scale_soil_band_is_not_flagged() {
        let mut config = DashboardConfig::default();
        config.bands.soil_moisture = af_telemetry::Band { min: 300.0, max: 600.0 };
        let mut dash = Dashboard::new(&config).unwrap();
        dash.on_snapshot(&json!({ "soil_hum": 450 }), "t1");
        assert!(dash.drain_notices().is_empty());
        let warnings = dash.assessment().unwrap().warnings();
        assert!(!warnings.contains(&af_telemetry::Metric::SoilMoisture));
    }

    #[test]
    fn uptime_counts_from_creation() {
        let dash = dashboard();
        let later = dash.started_at() + TimeDelta::seconds(3723);
        assert_eq!(format_uptime(dash.uptime(later)), "1h 2m 3s");
        let earlier = dash.started_at() - TimeDelta::seconds(5);
        assert_eq!(dash.uptime(earlier), TimeDelta::zero());
        assert_eq!(format_uptime(TimeDelta::zero()), "0h 0m 0s");
    }

    #[test]
    fn view_reports_no_data_before_first_reading() {
        let view = dashboard().view();
        assert!(view.latest.is_none());
        assert!(view.summary.temperature.is_none());
        assert!(view.assessment.is_none());
        assert_eq!(view.data_points, 0);
    }
}
