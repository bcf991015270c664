//! Core data types for the pelletmon session model
//!
//! This module defines the fundamental types used throughout the service:
//! - `Measurement`: One sampled reading of pellet sizes and count
//! - `Session`: A bounded measurement-collection period for one operator
//! - `SessionStatus`: The two-state session lifecycle
//! - `SessionSummary`: Aggregates cached when a session is sealed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats;

/// A single pellet measurement
///
/// Represents one sampled reading within a session, produced by the sensor
/// feed roughly every three seconds. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
    /// Average pellet size across the sample, in millimeters
    pub avg_size: f64,
    /// Smallest pellet in the sample, if the sensor reports it
    #[serde(default)]
    pub min_size: Option<f64>,
    /// Largest pellet in the sample, if the sensor reports it
    #[serde(default)]
    pub max_size: Option<f64>,
    /// Number of pellets counted in the sample
    pub pellet_count: u32,
}

impl Measurement {
    /// Create a measurement stamped with the current time
    pub fn new(avg_size: f64, min_size: Option<f64>, max_size: Option<f64>, pellet_count: u32) -> Self {
        Self {
            timestamp: Utc::now(),
            avg_size,
            min_size,
            max_size,
            pellet_count,
        }
    }

    /// Create a measurement with a specific timestamp
    pub fn with_timestamp(
        timestamp: DateTime<Utc>,
        avg_size: f64,
        min_size: Option<f64>,
        max_size: Option<f64>,
        pellet_count: u32,
    ) -> Self {
        Self {
            timestamp,
            avg_size,
            min_size,
            max_size,
            pellet_count,
        }
    }

    /// Whether the average size is a usable, positive, finite number
    pub fn has_usable_size(&self) -> bool {
        self.avg_size.is_finite() && self.avg_size > 0.0
    }
}

/// Session lifecycle status
///
/// A session makes exactly one transition: Active → Completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting measurements
    Active,
    /// Sealed; end time set, summary cached
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Aggregates computed once when a session is sealed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    /// Mean pellet size over the session, mm (2 decimals)
    pub avg_size: f64,
    /// Sum of every measurement's pellet count
    pub total_pellets: u64,
    /// Number of measurements recorded
    pub measurement_count: usize,
    /// Composite quality score, 0-100
    pub quality_score: u8,
}

/// One bounded measurement-collection period for one operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: uuid::Uuid,
    /// Operator running the session
    pub operator_id: String,
    /// When the session started
    pub start_time: DateTime<Utc>,
    /// When the session was sealed; None while active
    pub end_time: Option<DateTime<Utc>>,
    /// Lifecycle status
    pub status: SessionStatus,
    /// Measurements ordered by timestamp ascending
    pub measurements: Vec<Measurement>,
    /// Aggregates cached at seal time; None while active
    #[serde(default)]
    pub summary: Option<SessionSummary>,
}

impl Session {
    /// Create a new active session with an empty measurement list
    pub fn new(operator_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            operator_id: operator_id.into(),
            start_time: Utc::now(),
            end_time: None,
            status: SessionStatus::Active,
            measurements: Vec::new(),
            summary: None,
        }
    }

    /// Whether the session is still accepting measurements
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Total pellets: always the sum of measurement counts
    pub fn total_pellets(&self) -> u64 {
        self.measurements
            .iter()
            .map(|m| m.pellet_count as u64)
            .sum()
    }

    /// Session duration in seconds
    ///
    /// Uses the seal time for completed sessions and the current time for
    /// active ones, so production rate can be reported live.
    pub fn duration_secs(&self) -> f64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        let millis = (end - self.start_time).num_milliseconds();
        (millis.max(0) as f64) / 1000.0
    }

    /// Timestamp of the last accepted measurement, if any
    pub fn last_measurement_time(&self) -> Option<DateTime<Utc>> {
        self.measurements.last().map(|m| m.timestamp)
    }

    /// Seal the session: set end time, cache the summary
    ///
    /// Callers must check the status first; sealing an already-completed
    /// session is a lifecycle violation handled by the store.
    pub(crate) fn seal(&mut self) -> SessionSummary {
        self.end_time = Some(Utc::now());
        self.status = SessionStatus::Completed;

        let summary = SessionSummary {
            avg_size: stats::aggregate_sizes(&self.measurements).avg,
            total_pellets: self.total_pellets(),
            measurement_count: self.measurements.len(),
            quality_score: stats::quality_score(&self.measurements),
        };
        self.summary = Some(summary.clone());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_measurement_creation() {
        let m = Measurement::new(10.2, Some(9.8), Some(10.6), 42);
        assert_eq!(m.avg_size, 10.2);
        assert_eq!(m.pellet_count, 42);
        assert!(m.has_usable_size());
    }

    #[test]
    fn test_measurement_usable_size() {
        assert!(!Measurement::new(0.0, None, None, 5).has_usable_size());
        assert!(!Measurement::new(-2.0, None, None, 5).has_usable_size());
        assert!(!Measurement::new(f64::NAN, None, None, 5).has_usable_size());
        assert!(Measurement::new(0.1, None, None, 5).has_usable_size());
    }

    #[test]
    fn test_measurement_serialization() {
        let m = Measurement::new(9.5, None, None, 12);
        let json = serde_json::to_string(&m).unwrap();
        let restored: Measurement = serde_json::from_str(&json).unwrap();

        assert_eq!(m.avg_size, restored.avg_size);
        assert_eq!(m.pellet_count, restored.pellet_count);
        assert_eq!(m.min_size, restored.min_size);
    }

    #[test]
    fn test_session_starts_empty_and_active() {
        let session = Session::new("operator-1");
        assert!(session.is_active());
        assert!(session.measurements.is_empty());
        assert!(session.end_time.is_none());
        assert!(session.summary.is_none());
        assert_eq!(session.total_pellets(), 0);
    }

    #[test]
    fn test_total_pellets_is_sum_of_counts() {
        let mut session = Session::new("operator-1");
        session.measurements.push(Measurement::new(10.0, None, None, 40));
        session.measurements.push(Measurement::new(10.1, None, None, 35));
        session.measurements.push(Measurement::new(9.9, None, None, 0));

        assert_eq!(session.total_pellets(), 75);
    }

    #[test]
    fn test_seal_sets_status_and_summary() {
        let mut session = Session::new("operator-1");
        for _ in 0..3 {
            session.measurements.push(Measurement::new(10.0, None, None, 30));
        }

        let summary = session.seal();

        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.end_time.is_some());
        assert_eq!(summary.total_pellets, 90);
        assert_eq!(summary.measurement_count, 3);
        assert_eq!(summary.avg_size, 10.0);
        assert_eq!(session.summary, Some(summary));
    }

    #[test]
    fn test_duration_uses_seal_time_when_completed() {
        let mut session = Session::new("operator-1");
        session.start_time = Utc::now() - Duration::seconds(120);
        session.end_time = Some(session.start_time + Duration::seconds(60));
        session.status = SessionStatus::Completed;

        let secs = session.duration_secs();
        assert!((secs - 60.0).abs() < 0.5, "got {}", secs);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Active.to_string(), "active");
        assert_eq!(SessionStatus::Completed.to_string(), "completed");
    }
}
