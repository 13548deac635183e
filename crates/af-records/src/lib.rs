//! af-records: recorded dashboard sessions on disk.

pub mod store;
pub mod types;

pub use store::SessionStore;
pub use types::*;

pub type RecordsResult<T> = Result<T, RecordsError>;

#[derive(thiserror::Error, Debug)]
pub enum RecordsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Invalid session id: {session_id:?}")]
    InvalidSessionId { session_id: String },
}
