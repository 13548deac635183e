//! Control mode selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Who decides actuator state.
///
/// Switching to `Auto` starts threshold evaluation on the next reading; it does
/// not touch the actuators by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Manual,
    Auto,
}

impl ControlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Manual => "manual",
            ControlMode::Auto => "auto",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlMode {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(ControlMode::Manual),
            "auto" => Ok(ControlMode::Auto),
            _ => Err(ControlError::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}
