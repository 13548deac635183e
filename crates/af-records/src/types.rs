//! Session data types.

use af_controls::{ActuatorCommand, ControlMode, EngineStats};
use serde::{Deserialize, Serialize};

pub type SessionId = String;

/// Fresh random session identifier.
pub fn new_session_id() -> SessionId {
    uuid::Uuid::new_v4().to_string()
}

/// RFC 3339 timestamp for manifests.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionManifest {
    pub session_id: SessionId,
    pub name: String,
    pub started_at: String,
    pub ended_at: String,
    pub reading_count: usize,
    pub final_mode: ControlMode,
    #[serde(default)]
    pub engine: EngineStats,
}

/// Where a command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandOrigin {
    Auto,
    Manual,
    Mode,
}

/// One attempted store write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Timestamp of the reading (or action) that triggered the write.
    pub timestamp: String,
    pub origin: CommandOrigin,
    pub command: ActuatorCommand,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
