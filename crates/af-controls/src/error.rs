//! Error types for control operations.

use thiserror::Error;

use crate::actuator::Actuator;
use crate::sink::CommandWriteError;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Manual toggles are refused while auto mode owns the actuators.
    #[error("Switch to manual mode to control the {actuator}")]
    ToggleInAutoMode { actuator: Actuator },

    /// Another command write has not completed yet.
    #[error("A command write is still in flight")]
    WriteInFlight,

    /// Unknown control mode name.
    #[error("Unknown control mode: {value}")]
    UnknownMode { value: String },

    /// The command sink rejected a write.
    #[error(transparent)]
    CommandWrite(#[from] CommandWriteError),
}
