//! Bounded FIFO history of readings.

use std::collections::VecDeque;

use crate::error::{TelemetryError, TelemetryResult};
use crate::reading::{Metric, Reading};

/// Number of readings kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 20;

/// Fixed-capacity history, oldest reading first.
///
/// `len() <= capacity()` always holds. Appending past capacity drops the
/// oldest reading before the new one is stored.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: VecDeque<Reading>,
    capacity: usize,
}

impl SampleHistory {
    /// Create an empty history.
    ///
    /// # Errors
    ///
    /// Returns error if `capacity` is zero.
    pub fn new(capacity: usize) -> TelemetryResult<Self> {
        if capacity == 0 {
            return Err(TelemetryError::InvalidCapacity { capacity });
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a reading, evicting from the head when full.
    pub fn append(&mut self, reading: Reading) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(reading);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended reading.
    pub fn latest(&self) -> Option<&Reading> {
        self.samples.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.samples.iter()
    }

    /// Values of one metric, oldest to newest (chart series).
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.samples.iter().map(|r| r.value(metric)).collect()
    }

    /// Timestamps, oldest to newest (chart labels).
    pub fn timestamps(&self) -> Vec<&str> {
        self.samples.iter().map(|r| r.timestamp.as_str()).collect()
    }

    pub fn to_vec(&self) -> Vec<Reading> {
        self.samples.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
