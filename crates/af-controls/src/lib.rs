//! Actuator control for agriflow.
//!
//! This crate decides when the light and the pump should change state. It is
//! sans-IO: the [`AutoControlEngine`] returns commands and is told how their
//! writes ended, while an adapter owning a [`CommandSink`] does the writing.
//!
//! # Architecture
//!
//! - [`ControlMode`] selects between user-driven and threshold-driven control
//! - [`Hysteresis`] rules turn one sensor value into an on/off decision
//! - [`AutoControlEngine`] batches rule outputs into one [`ActuatorCommand`]
//!   per reading and holds an in-flight guard while that write is outstanding
//! - [`CommandSink`] is the boundary to the realtime store

pub mod actuator;
pub mod engine;
pub mod error;
pub mod hysteresis;
pub mod mode;
pub mod sink;

pub use actuator::{Actuator, ActuatorCommand, ActuatorState};
pub use engine::{AutoControlEngine, AutoDecision, EngineStats, Reason};
pub use error::{ControlError, ControlResult};
pub use hysteresis::{AutoThresholds, Hysteresis};
pub use mode::ControlMode;
pub use sink::{CommandSink, CommandWriteError, MemorySink, StoreState};
