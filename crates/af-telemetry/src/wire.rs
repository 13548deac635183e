//! Ingress boundary: realtime-store snapshot to [`Reading`].
//!
//! The store is loosely typed. Numbers may arrive as JSON numbers or numeric
//! strings, and actuator flags as `true`, `1` or `"1"`. Everything is
//! normalized here so the rest of the system only sees `f64` and `bool`.

use af_core::{finite_or_zero, parse_lenient};
use chrono::{DateTime, TimeZone};
use serde_json::{Map, Value};

use crate::reading::{Metric, Reading};

/// Decoded store snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub reading: Reading,
    /// Raw `controlMode` value, if the store carried one.
    pub control_mode: Option<String>,
}

/// Decode one pushed snapshot.
///
/// Returns `None` for an empty push (`null` or a non-object root), which the
/// store emits when the path has no data. Missing or malformed numeric fields
/// become `0.0`.
pub fn decode_snapshot(value: &Value, timestamp: impl Into<String>) -> Option<Snapshot> {
    let obj = value.as_object()?;

    let reading = Reading {
        temperature: number(obj, Metric::Temperature.wire_key()),
        humidity: number(obj, Metric::Humidity.wire_key()),
        soil_moisture: number(obj, Metric::SoilMoisture.wire_key()),
        sunlight: number(obj, Metric::Sunlight.wire_key()),
        timestamp: timestamp.into(),
        light_on: obj.get("light").is_some_and(is_truthy),
        pump_on: obj.get("pump").is_some_and(is_truthy),
    };

    let control_mode = obj
        .get("controlMode")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(Snapshot {
        reading,
        control_mode,
    })
}

/// `true`, `1` and `"1"` mean "on"; anything else is "off".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s == "1",
        _ => false,
    }
}

/// Wall-clock label attached to a reading when it arrives.
pub fn ingress_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M:%S").to_string()
}

fn number(obj: &Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64().map(finite_or_zero).unwrap_or(0.0),
        Some(Value::String(s)) => parse_lenient(s),
        _ => 0.0,
    }
}
