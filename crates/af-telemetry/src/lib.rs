//! Telemetry primitives for agriflow.
//!
//! Sensor readings enter through the wire boundary ([`wire`]), where the
//! store's loose field types are normalized once into a [`Reading`]. Readings
//! are kept in a bounded FIFO [`SampleHistory`] and summarized on demand by
//! the [`analytics`] module.
//!
//! Nothing in this crate performs I/O.

pub mod analytics;
pub mod error;
pub mod history;
pub mod reading;
pub mod wire;

pub use analytics::{
    Assessment, Band, MetricStats, NormalBands, Status, Summary, assess, classify, stats,
    summarize,
};
pub use error::{TelemetryError, TelemetryResult};
pub use history::{DEFAULT_CAPACITY, SampleHistory};
pub use reading::{Metric, Reading};
pub use wire::{Snapshot, decode_snapshot, ingress_timestamp, is_truthy};
