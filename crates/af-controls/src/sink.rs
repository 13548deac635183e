//! Boundary to the store that receives actuator writes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actuator::ActuatorCommand;
use crate::mode::ControlMode;

/// A write to the store failed.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Command write failed: {message}")]
pub struct CommandWriteError {
    pub message: String,
}

impl CommandWriteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Accepts partial state updates for the realtime store.
pub trait CommandSink {
    /// Merge `command` into the remote state. Unset fields stay untouched.
    fn write(&mut self, command: &ActuatorCommand) -> Result<(), CommandWriteError>;
}

/// Remote state as seen by [`MemorySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreState {
    pub light: bool,
    pub pump: bool,
    pub control_mode: ControlMode,
}

/// In-memory sink that merges writes into a [`StoreState`].
///
/// Can be told to fail the next `n` writes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub state: StoreState,
    pub writes: Vec<ActuatorCommand>,
    fail_next: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }
}

impl CommandSink for MemorySink {
    fn write(&mut self, command: &ActuatorCommand) -> Result<(), CommandWriteError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(CommandWriteError::new("store rejected the update"));
        }
        if let Some(on) = command.light {
            self.state.light = on;
        }
        if let Some(on) = command.pump {
            self.state.pump = on;
        }
        if let Some(mode) = command.control_mode {
            self.state.control_mode = mode;
        }
        self.writes.push(*command);
        Ok(())
    }
}
