//! Error types for telemetry operations.

use thiserror::Error;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised at the telemetry boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelemetryError {
    /// The realtime subscription failed or a read was rejected.
    #[error("Ingress error: {message}")]
    Ingress { message: String },

    /// History capacity must hold at least one reading.
    #[error("Invalid history capacity: {capacity}")]
    InvalidCapacity { capacity: usize },

    /// A normal-range band is empty, inverted or non-finite.
    #[error("Invalid band for {what}: [{min}, {max}]")]
    InvalidBand {
        what: &'static str,
        min: f64,
        max: f64,
    },
}

impl TelemetryError {
    pub fn ingress(message: impl Into<String>) -> Self {
        Self::Ingress {
            message: message.into(),
        }
    }
}
