//! Error types for the af-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read input file: {path}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Control error: {0}")]
    Control(#[from] af_controls::ControlError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] af_telemetry::TelemetryError),

    #[error("Records error: {0}")]
    Records(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for af-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<af_config::ConfigError> for AppError {
    fn from(err: af_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<af_records::RecordsError> for AppError {
    fn from(err: af_records::RecordsError) -> Self {
        match err {
            af_records::RecordsError::SessionNotFound { session_id } => {
                AppError::SessionNotFound(session_id)
            }
            af_records::RecordsError::InvalidSessionId { session_id } => {
                AppError::InvalidInput(format!("invalid session id {session_id:?}"))
            }
            other => AppError::Records(other.to_string()),
        }
    }
}
