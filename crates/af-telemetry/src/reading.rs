//! Sensor reading and metric identifiers.

use serde::{Deserialize, Serialize};

/// One timestamped telemetry sample.
///
/// Produced at ingress for every pushed snapshot and never mutated afterwards.
/// Soil moisture and sunlight are raw ADC counts (0-1023) as reported by the
/// field controller; temperature is in degrees Celsius and humidity in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub sunlight: f64,
    pub timestamp: String,
    pub light_on: bool,
    pub pump_on: bool,
}

impl Reading {
    /// Value of a single metric.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::SoilMoisture => self.soil_moisture,
            Metric::Sunlight => self.sunlight,
        }
    }
}

/// Numeric channels carried by a [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    SoilMoisture,
    Sunlight,
}

impl Metric {
    /// Metrics that are aggregated and checked against a normal band.
    pub const TRACKED: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::SoilMoisture];

    /// Key used by the realtime store.
    pub fn wire_key(self) -> &'static str {
        match self {
            Metric::Temperature => "temp",
            Metric::Humidity => "humidity",
            Metric::SoilMoisture => "soil_hum",
            Metric::Sunlight => "sun",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::SoilMoisture => "Soil Moisture",
            Metric::Sunlight => "Sunlight",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
pub(crate) fn sample(temperature: f64) -> Reading {
    Reading {
        temperature,
        humidity: 60.0,
        soil_moisture: 450.0,
        sunlight: 400.0,
        timestamp: "12:00:00".to_string(),
        light_on: false,
        pump_on: false,
    }
}
