//! Auto-control engine.
//!
//! The engine owns the control mode, the last known actuator state and the
//! single outstanding command write. It never writes anything itself:
//! [`AutoControlEngine::on_reading`] and [`AutoControlEngine::request_toggle`]
//! hand back the command to send, and the adapter reports the outcome through
//! [`AutoControlEngine::on_command_result`].
//!
//! While a write is outstanding the engine refuses to evaluate new readings.
//! A dropped reading is not queued; the first reading after the result comes
//! back is evaluated against whatever state it reports.

use af_telemetry::Reading;
use serde::{Deserialize, Serialize};

use crate::actuator::{Actuator, ActuatorCommand, ActuatorState};
use crate::error::{ControlError, ControlResult};
use crate::hysteresis::AutoThresholds;
use crate::mode::ControlMode;
use crate::sink::CommandWriteError;

/// Why auto mode changed an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    LowSunlight,
    SufficientSunlight,
    DrySoil,
    SufficientMoisture,
}

impl Reason {
    pub fn actuator(self) -> Actuator {
        match self {
            Reason::LowSunlight | Reason::SufficientSunlight => Actuator::Light,
            Reason::DrySoil | Reason::SufficientMoisture => Actuator::Pump,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Reason::LowSunlight => "Auto: light turned ON (low sunlight)",
            Reason::SufficientSunlight => "Auto: light turned OFF (sufficient sunlight)",
            Reason::DrySoil => "Auto: pump turned ON (dry soil)",
            Reason::SufficientMoisture => "Auto: pump turned OFF (sufficient moisture)",
        }
    }
}

/// One batched auto-mode command and the rules that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoDecision {
    pub command: ActuatorCommand,
    pub reasons: Vec<Reason>,
}

/// Counters for display and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineStats {
    /// Readings evaluated in auto mode.
    pub evaluated: u64,
    /// Auto-mode readings dropped because a write was outstanding.
    pub skipped_in_flight: u64,
    /// Commands handed out (auto and manual).
    pub commands_issued: u64,
    /// Writes reported as failed.
    pub write_failures: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingWrite {
    command: ActuatorCommand,
    previous: ActuatorState,
}

#[derive(Debug, Clone)]
pub struct AutoControlEngine {
    thresholds: AutoThresholds,
    mode: ControlMode,
    actuators: ActuatorState,
    pending: Option<PendingWrite>,
    stats: EngineStats,
}

impl AutoControlEngine {
    /// Create an engine in manual mode with both actuators off.
    ///
    /// # Errors
    ///
    /// Returns error if either hysteresis rule is invalid.
    pub fn new(thresholds: AutoThresholds) -> ControlResult<Self> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            mode: ControlMode::Manual,
            actuators: ActuatorState::default(),
            pending: None,
            stats: EngineStats::default(),
        })
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Change the control mode. Returns `true` if it changed.
    pub fn set_mode(&mut self, mode: ControlMode) -> bool {
        if self.mode == mode {
            return false;
        }
        tracing::debug!(from = %self.mode, to = %mode, "control mode changed");
        self.mode = mode;
        true
    }

    pub fn thresholds(&self) -> &AutoThresholds {
        &self.thresholds
    }

    pub fn actuators(&self) -> ActuatorState {
        self.actuators
    }

    /// `true` while a command write has not been resolved.
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Apply both rules to `reading` given `state`, without side effects.
    pub fn evaluate(&self, reading: &Reading, state: ActuatorState) -> Option<AutoDecision> {
        let mut command = ActuatorCommand::default();
        let mut reasons = Vec::new();

        if let Some(on) = self.thresholds.light.decide(reading.sunlight, state.light) {
            command.light = Some(on);
            reasons.push(if on {
                Reason::LowSunlight
            } else {
                Reason::SufficientSunlight
            });
        }
        if let Some(on) = self.thresholds.pump.decide(reading.soil_moisture, state.pump) {
            command.pump = Some(on);
            reasons.push(if on {
                Reason::DrySoil
            } else {
                Reason::SufficientMoisture
            });
        }

        if command.is_empty() {
            None
        } else {
            Some(AutoDecision { command, reasons })
        }
    }

    /// React to a new reading.
    ///
    /// The reading's actuator flags become the known state. In auto mode with
    /// no write outstanding, the rules are evaluated; a resulting command is
    /// applied optimistically and latches the in-flight guard until
    /// [`on_command_result`](Self::on_command_result) is called.
    pub fn on_reading(&mut self, reading: &Reading) -> Option<AutoDecision> {
        self.actuators = ActuatorState::observed(reading);

        if self.mode != ControlMode::Auto {
            return None;
        }
        if self.pending.is_some() {
            self.stats.skipped_in_flight += 1;
            tracing::debug!(timestamp = %reading.timestamp, "write in flight, reading not evaluated");
            return None;
        }

        self.stats.evaluated += 1;
        let decision = self.evaluate(reading, self.actuators)?;
        tracing::debug!(command = %decision.command, "auto-control decision");
        self.begin_write(decision.command);
        Some(decision)
    }

    /// Start a user toggle and return the command to write.
    ///
    /// # Errors
    ///
    /// Refused in auto mode, and while another write is outstanding.
    pub fn request_toggle(&mut self, actuator: Actuator, on: bool) -> ControlResult<ActuatorCommand> {
        if self.mode == ControlMode::Auto {
            return Err(ControlError::ToggleInAutoMode { actuator });
        }
        if self.pending.is_some() {
            return Err(ControlError::WriteInFlight);
        }
        let command = ActuatorCommand::set(actuator, on);
        self.begin_write(command);
        Ok(command)
    }

    /// Resolve the outstanding write.
    ///
    /// Clears the in-flight guard. On failure the optimistic state is rolled
    /// back and the write error is returned for reporting. A result with no
    /// write outstanding is ignored.
    pub fn on_command_result(&mut self, result: Result<(), CommandWriteError>) -> ControlResult<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stats.write_failures += 1;
                self.actuators.revert(&pending.command, &pending.previous);
                tracing::debug!(command = %pending.command, "write failed, state rolled back");
                Err(ControlError::CommandWrite(err))
            }
        }
    }

    fn begin_write(&mut self, command: ActuatorCommand) {
        let previous = self.actuators;
        self.actuators.apply(&command);
        self.pending = Some(PendingWrite { command, previous });
        self.stats.commands_issued += 1;
    }
}

impl Default for AutoControlEngine {
    fn default() -> Self {
        Self {
            thresholds: AutoThresholds::default(),
            mode: ControlMode::Manual,
            actuators: ActuatorState::default(),
            pending: None,
            stats: EngineStats::default(),
        }
    }
}
