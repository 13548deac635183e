//! Derived statistics and normal-range status over the history.
//!
//! Everything here is advisory display data. Auto-control uses its own
//! thresholds and never reads a [`Status`].

use serde::{Deserialize, Serialize};

use crate::error::{TelemetryError, TelemetryResult};
use crate::history::SampleHistory;
use crate::reading::{Metric, Reading};

/// Mean and range of one metric over the current history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Per-metric statistics. `None` means no data yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub temperature: Option<MetricStats>,
    pub humidity: Option<MetricStats>,
    pub soil_moisture: Option<MetricStats>,
    /// Number of readings the summary was computed over.
    pub samples: usize,
}

impl Summary {
    pub fn get(&self, metric: Metric) -> Option<MetricStats> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::SoilMoisture => self.soil_moisture,
            Metric::Sunlight => None,
        }
    }
}

/// Mean, min and max of a value stream; `None` when empty.
pub fn stats<I>(values: I) -> Option<MetricStats>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return None;
    }
    Some(MetricStats {
        mean: sum / count as f64,
        min,
        max,
        count,
    })
}

/// Summarize every tracked metric over `history`.
pub fn summarize(history: &SampleHistory) -> Summary {
    let over = |metric: Metric| stats(history.iter().map(|r| r.value(metric)));
    Summary {
        temperature: over(Metric::Temperature),
        humidity: over(Metric::Humidity),
        soil_moisture: over(Metric::SoilMoisture),
        samples: history.len(),
    }
}

/// Inclusive normal range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    /// Create a band.
    ///
    /// # Errors
    ///
    /// Returns error if either bound is non-finite or `min > max`.
    pub fn new(what: &'static str, min: f64, max: f64) -> TelemetryResult<Self> {
        let band = Self { min, max };
        band.validate(what)?;
        Ok(band)
    }

    pub fn validate(&self, what: &'static str) -> TelemetryResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(TelemetryError::InvalidBand {
                what,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Normal,
    Warning,
}

/// Boundaries count as normal. NaN is a warning.
pub fn classify(value: f64, band: &Band) -> Status {
    if band.contains(value) {
        Status::Normal
    } else {
        Status::Warning
    }
}

/// Normal ranges for the tracked metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalBands {
    pub temperature: Band,
    pub humidity: Band,
    pub soil_moisture: Band,
}

impl Default for NormalBands {
    fn default() -> Self {
        Self {
            temperature: Band {
                min: 20.0,
                max: 32.0,
            },
            humidity: Band {
                min: 40.0,
                max: 80.0,
            },
            soil_moisture: Band { min: 0.5, max: 2.5 },
        }
    }
}

impl NormalBands {
    pub fn get(&self, metric: Metric) -> Option<&Band> {
        match metric {
            Metric::Temperature => Some(&self.temperature),
            Metric::Humidity => Some(&self.humidity),
            Metric::SoilMoisture => Some(&self.soil_moisture),
            Metric::Sunlight => None,
        }
    }

    pub fn validate(&self) -> TelemetryResult<()> {
        self.temperature.validate("temperature")?;
        self.humidity.validate("humidity")?;
        self.soil_moisture.validate("soil_moisture")
    }
}

/// Status of the latest reading per tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub temperature: Status,
    pub humidity: Status,
    pub soil_moisture: Status,
}

impl Assessment {
    pub fn get(&self, metric: Metric) -> Option<Status> {
        match metric {
            Metric::Temperature => Some(self.temperature),
            Metric::Humidity => Some(self.humidity),
            Metric::SoilMoisture => Some(self.soil_moisture),
            Metric::Sunlight => None,
        }
    }

    /// Tracked metrics currently outside their band.
    pub fn warnings(&self) -> Vec<Metric> {
        Metric::TRACKED
            .into_iter()
            .filter(|m| self.get(*m) == Some(Status::Warning))
            .collect()
    }
}

pub fn assess(reading: &Reading, bands: &NormalBands) -> Assessment {
    Assessment {
        temperature: classify(reading.temperature, &bands.temperature),
        humidity: classify(reading.humidity, &bands.humidity),
        soil_moisture: classify(reading.soil_moisture, &bands.soil_moisture),
    }
}
