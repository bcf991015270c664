//! Source-record normalization
//!
//! Sensor API records and local-cache records disagree on field names
//! (`avg_size` vs `avgSize` vs `size`) and sometimes carry numbers as
//! strings. This module is the single place those shapes are reconciled:
//! a [`RawMeasurement`] deserializes from any of them and `normalize()`
//! emits the canonical [`Measurement`]. Unusable numeric fields map to 0,
//! which the statistics engine then filters out.
//!
//! [`Measurement`]: crate::session::Measurement

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::session::Measurement;

/// A measurement as it arrives from any source, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeasurement {
    /// Reading time; defaults to now when the source omits it
    #[serde(default, alias = "time", alias = "ts")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Average pellet size; sources use avg_size, avgSize, or size
    #[serde(default, alias = "avgSize", alias = "size", alias = "avg")]
    pub avg_size: Option<Value>,

    /// Smallest pellet in the sample
    #[serde(default, alias = "minSize", alias = "min")]
    pub min_size: Option<Value>,

    /// Largest pellet in the sample
    #[serde(default, alias = "maxSize", alias = "max")]
    pub max_size: Option<Value>,

    /// Pellet count; sources use pellet_count, pelletCount, or count
    #[serde(default, alias = "pelletCount", alias = "count", alias = "pellets")]
    pub pellet_count: Option<Value>,
}

impl RawMeasurement {
    /// Map this record into the canonical measurement shape
    ///
    /// Sizes that are missing or non-numeric become 0.0 (excluded by the
    /// engine's filters); optional bounds are kept only when finite and
    /// positive; counts clamp at zero.
    pub fn normalize(self) -> Measurement {
        Measurement {
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            avg_size: coerce_f64(self.avg_size.as_ref()).unwrap_or(0.0),
            min_size: coerce_f64(self.min_size.as_ref()).filter(|s| *s > 0.0),
            max_size: coerce_f64(self.max_size.as_ref()).filter(|s| *s > 0.0),
            pellet_count: coerce_count(self.pellet_count.as_ref()),
        }
    }
}

/// Coerce a JSON value into a finite f64
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coerce a JSON value into a pellet count, clamping negatives to zero
fn coerce_count(value: Option<&Value>) -> u32 {
    coerce_f64(value)
        .map(|v| v.max(0.0).round() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_shape_normalizes() {
        let json = r#"{
            "timestamp": "2026-03-04T10:15:00Z",
            "avg_size": 10.2,
            "min_size": 9.8,
            "max_size": 10.6,
            "pellet_count": 42
        }"#;
        let raw: RawMeasurement = serde_json::from_str(json).unwrap();
        let m = raw.normalize();

        assert_eq!(m.avg_size, 10.2);
        assert_eq!(m.min_size, Some(9.8));
        assert_eq!(m.max_size, Some(10.6));
        assert_eq!(m.pellet_count, 42);
        assert_eq!(m.timestamp.to_rfc3339(), "2026-03-04T10:15:00+00:00");
    }

    #[test]
    fn test_cache_shape_normalizes() {
        // Local-cache records: camelCase, numbers as strings, no bounds
        let json = r#"{"time": "2026-03-04T10:15:03Z", "size": "10.4", "count": "38"}"#;
        let raw: RawMeasurement = serde_json::from_str(json).unwrap();
        let m = raw.normalize();

        assert_eq!(m.avg_size, 10.4);
        assert_eq!(m.min_size, None);
        assert_eq!(m.max_size, None);
        assert_eq!(m.pellet_count, 38);
    }

    #[test]
    fn test_camel_case_aliases() {
        let json = r#"{"avgSize": 9.7, "minSize": 9.1, "maxSize": 10.3, "pelletCount": 55}"#;
        let raw: RawMeasurement = serde_json::from_str(json).unwrap();
        let m = raw.normalize();

        assert_eq!(m.avg_size, 9.7);
        assert_eq!(m.min_size, Some(9.1));
        assert_eq!(m.pellet_count, 55);
    }

    #[test]
    fn test_garbage_fields_become_zero() {
        let json = r#"{"avgSize": "n/a", "count": null}"#;
        let raw: RawMeasurement = serde_json::from_str(json).unwrap();
        let m = raw.normalize();

        assert_eq!(m.avg_size, 0.0);
        assert_eq!(m.pellet_count, 0);
        assert!(!m.has_usable_size());
    }

    #[test]
    fn test_missing_fields_default() {
        let raw: RawMeasurement = serde_json::from_str("{}").unwrap();
        let m = raw.normalize();

        assert_eq!(m.avg_size, 0.0);
        assert_eq!(m.min_size, None);
        assert_eq!(m.pellet_count, 0);
    }

    #[test]
    fn test_negative_count_clamps_to_zero() {
        let json = r#"{"size": 10.0, "count": -7}"#;
        let raw: RawMeasurement = serde_json::from_str(json).unwrap();
        assert_eq!(raw.normalize().pellet_count, 0);
    }

    #[test]
    fn test_zero_bounds_dropped() {
        // Caches store absent bounds as zeros; they must not survive as bounds
        let json = r#"{"size": 10.0, "min": 0, "max": 0}"#;
        let raw: RawMeasurement = serde_json::from_str(json).unwrap();
        let m = raw.normalize();

        assert_eq!(m.min_size, None);
        assert_eq!(m.max_size, None);
    }
}
