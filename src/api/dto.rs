//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Session, SessionSummary};
use crate::stats::{QualityBreakdown, RollingTrend, SizeAggregate, TrendPoint};

// ============================================
// SESSION DTOs
// ============================================

/// Create session request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Operator running the session
    pub operator_id: String,
}

/// Session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session ID
    pub id: Uuid,
    /// Operator running the session
    pub operator_id: String,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time; absent while active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Lifecycle status
    pub status: String,
    /// Measurements recorded so far
    pub measurement_count: usize,
    /// Sum of all measurement pellet counts
    pub total_pellets: u64,
    /// Aggregates cached at seal time; absent while active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

impl SessionResponse {
    /// Convert a session snapshot into its wire shape
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id,
            operator_id: session.operator_id.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status.to_string(),
            measurement_count: session.measurements.len(),
            total_pellets: session.total_pellets(),
            summary: session.summary.clone(),
        }
    }
}

/// List sessions response
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    /// Sessions, newest first
    pub sessions: Vec<SessionResponse>,
    /// Total count
    pub total: usize,
}

/// Stop session response
#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    /// Sealed session
    pub id: Uuid,
    /// Status: "completed"
    pub status: String,
    /// Aggregates cached at seal time
    pub summary: SessionSummary,
}

// ============================================
// MEASUREMENT DTOs
// ============================================

/// Append measurement response
#[derive(Debug, Serialize)]
pub struct AppendMeasurementResponse {
    /// Status: "ok"
    pub status: String,
    /// Session the measurement was appended to
    pub session_id: Uuid,
    /// Measurements recorded so far
    pub measurement_count: usize,
}

// ============================================
// STATS DTOs
// ============================================

/// Session statistics response
#[derive(Debug, Serialize)]
pub struct SessionStatsResponse {
    /// Session ID
    pub session_id: Uuid,
    /// Lifecycle status
    pub status: String,
    /// Avg/min/max pellet size (mm, 2 decimals)
    pub sizes: SizeAggregate,
    /// Quality factors and composite score
    pub quality: QualityBreakdown,
    /// Sum of all measurement pellet counts
    pub total_pellets: u64,
    /// Measurements recorded
    pub measurement_count: usize,
    /// Session duration in seconds (live for active sessions)
    pub duration_secs: f64,
    /// Pellets per minute (1 decimal)
    pub production_rate: f64,
    /// Measurements per minute (2 decimals)
    pub measurement_frequency: f64,
}

/// Histogram query parameters
#[derive(Debug, Deserialize)]
pub struct HistogramParams {
    /// Comma-separated ascending bucket edges (mm); default edges if absent
    #[serde(default)]
    pub edges: Option<String>,
}

/// Histogram response
#[derive(Debug, Serialize)]
pub struct HistogramResponse {
    /// Bucket edges used
    pub edges: Vec<f64>,
    /// Count per bucket, same order as edges
    pub counts: Vec<usize>,
    /// Measurements that fell inside some bucket
    pub bucketed: usize,
}

/// Trend query parameters
#[derive(Debug, Deserialize)]
pub struct TrendParams {
    /// Window size; default 20
    #[serde(default)]
    pub window: Option<usize>,
    /// Left-pad with zero triples to the window width (for fixed chart axes)
    #[serde(default)]
    pub pad: Option<bool>,
}

/// Trend response
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    /// Chart points, oldest first
    pub points: Vec<TrendPoint>,
    /// Rolling trend indicator over the session tail
    pub rolling: RollingTrend,
    /// Window size used
    pub window: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Number of sessions in the store
    pub sessions: usize,
    /// Active WebSocket connections
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
