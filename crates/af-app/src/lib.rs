//! Shared application service layer for agriflow.
//!
//! This crate wires the telemetry history, analytics and auto-control engine
//! into a single [`Dashboard`] driven by ingress events, and provides the
//! replay and session services used by the CLI.

pub mod dashboard;
pub mod error;
pub mod notice;
pub mod replay;
pub mod session_service;

// Re-export key types for convenience
pub use dashboard::{
    Dashboard, DashboardView, LinkStatus, NOTICE_BACKLOG, ReadingOutcome, format_uptime,
};
pub use error::{AppError, AppResult};
pub use notice::{Notice, NoticeLevel};
pub use replay::{ReplayOptions, ReplayReport, replay_file, replay_lines};
pub use session_service::{SessionSummary, list_sessions, load_session, summarize_session};
