//! Statistics Routes
//!
//! Derived-statistics endpoints over a session's measurements.
//!
//! - GET /api/v1/sessions/:id/stats - Aggregates, quality, rates
//! - GET /api/v1/sessions/:id/histogram - Size distribution
//! - GET /api/v1/sessions/:id/trend - Trend series + rolling trend

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{
    HistogramParams, HistogramResponse, SessionStatsResponse, TrendParams, TrendResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::stats;

/// Default trend window, measurements
const DEFAULT_TREND_WINDOW: usize = 20;

/// GET /api/v1/sessions/:id/stats
///
/// Full derived statistics for one session. Works on active sessions
/// (duration runs live) and completed ones alike.
pub async fn session_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionStatsResponse>> {
    let session = state.store.get_session(id).await?;

    let duration_secs = session.duration_secs();
    let total_pellets = session.total_pellets();

    Ok(Json(SessionStatsResponse {
        session_id: session.id,
        status: session.status.to_string(),
        sizes: stats::aggregate_sizes(&session.measurements),
        quality: stats::quality_breakdown(&session.measurements),
        total_pellets,
        measurement_count: session.measurements.len(),
        duration_secs,
        production_rate: stats::production_rate(total_pellets, duration_secs),
        measurement_frequency: stats::measurement_frequency(
            session.measurements.len(),
            duration_secs,
        ),
    }))
}

/// GET /api/v1/sessions/:id/histogram
///
/// Size distribution over the session. Custom bucket edges come as a
/// comma-separated ascending list in the `edges` query parameter.
pub async fn session_histogram(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<HistogramParams>,
) -> ApiResult<Json<HistogramResponse>> {
    let edges = match params.edges {
        Some(raw) => parse_edges(&raw)?,
        None => stats::DEFAULT_BIN_EDGES.to_vec(),
    };

    let measurements = state.store.measurements(id).await?;
    let counts = stats::size_distribution(&measurements, &edges);
    let bucketed = counts.iter().sum();

    Ok(Json(HistogramResponse {
        edges,
        counts,
        bucketed,
    }))
}

/// GET /api/v1/sessions/:id/trend
///
/// The most recent measurements as chart triples, plus the rolling trend
/// indicator. `pad=true` left-pads with zero triples for fixed chart axes.
pub async fn session_trend(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<TrendParams>,
) -> ApiResult<Json<TrendResponse>> {
    let window = params.window.unwrap_or(DEFAULT_TREND_WINDOW);
    if window == 0 {
        return Err(ApiError::Validation(
            "Trend window must be at least 1".to_string(),
        ));
    }

    let measurements = state.store.measurements(id).await?;

    let mut points = stats::trend_series(&measurements, window);
    if params.pad.unwrap_or(false) {
        points = stats::pad_series(points, window);
    }

    Ok(Json(TrendResponse {
        points,
        rolling: stats::rolling_trend(&measurements),
        window,
    }))
}

/// Parse comma-separated bucket edges
fn parse_edges(raw: &str) -> ApiResult<Vec<f64>> {
    let edges: Vec<f64> = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ApiError::Validation(format!("Invalid histogram edges: {}", raw)))?;

    if edges.len() < 2 {
        return Err(ApiError::Validation(
            "Histogram needs at least two edges".to_string(),
        ));
    }

    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ApiError::Validation(
            "Histogram edges must be strictly ascending".to_string(),
        ));
    }

    Ok(edges)
}
