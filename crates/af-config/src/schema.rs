//! Configuration schema definitions.

use af_controls::{AutoThresholds, ControlMode};
use af_telemetry::{DEFAULT_CAPACITY, NormalBands};
use serde::{Deserialize, Serialize};

/// Config format version written by this release.
pub const LATEST_VERSION: u32 = 1;

/// Dashboard configuration. Every section may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "latest_version")]
    pub version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub history: HistoryDef,
    /// Advisory normal ranges, in the units the store reports.
    #[serde(default)]
    pub bands: NormalBands,
    /// Auto-mode hysteresis rules (raw ADC counts).
    #[serde(default)]
    pub auto: AutoThresholds,
    /// Mode the dashboard starts in before the store reports one.
    #[serde(default)]
    pub initial_mode: ControlMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            name: default_name(),
            history: HistoryDef::default(),
            bands: NormalBands::default(),
            auto: AutoThresholds::default(),
            initial_mode: ControlMode::default(),
        }
    }
}

/// Default number of command writes the dashboard keeps for display.
pub const DEFAULT_COMMAND_LOG: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryDef {
    /// Readings kept for charts and analytics.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Command writes kept in the dashboard log.
    #[serde(default = "default_command_log")]
    pub command_log: usize,
}

impl Default for HistoryDef {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            command_log: DEFAULT_COMMAND_LOG,
        }
    }
}

fn latest_version() -> u32 {
    LATEST_VERSION
}

fn default_name() -> String {
    "greenhouse".to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_command_log() -> usize {
    DEFAULT_COMMAND_LOG
}
