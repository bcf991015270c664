//! Session Routes
//!
//! Session lifecycle and measurement-append endpoints.
//!
//! - POST /api/v1/sessions - Start a session
//! - GET /api/v1/sessions - List sessions
//! - GET /api/v1/sessions/:id - Session detail
//! - POST /api/v1/sessions/:id/stop - Seal a session
//! - POST /api/v1/sessions/:id/measurements - Append a measurement

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{
    AppendMeasurementResponse, CreateSessionRequest, SessionListResponse, SessionResponse,
    StopSessionResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::ingest::RawMeasurement;
use crate::websocket::WsEvent;

/// POST /api/v1/sessions
///
/// Start a new measurement session for an operator.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    validate_operator_id(&req.operator_id)?;

    let id = state.store.create_session(&req.operator_id).await;
    let session = state.store.get_session(id).await?;

    tracing::info!(session_id = %id, operator = %req.operator_id, "Created session");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from_session(&session)),
    ))
}

/// GET /api/v1/sessions
///
/// List all sessions, newest first.
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SessionListResponse>> {
    let sessions = state.store.list_sessions().await;

    let responses: Vec<SessionResponse> =
        sessions.iter().map(SessionResponse::from_session).collect();

    Ok(Json(SessionListResponse {
        total: responses.len(),
        sessions: responses,
    }))
}

/// GET /api/v1/sessions/:id
///
/// Get a specific session.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.store.get_session(id).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// POST /api/v1/sessions/:id/stop
///
/// Seal a session: sets the end time, caches the summary, and notifies
/// WebSocket subscribers. A session can only be sealed once.
pub async fn stop_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StopSessionResponse>> {
    let summary = state.store.complete_session(id).await?;

    state
        .ws_hub
        .publish(WsEvent::session_completed(id, summary.clone()));

    Ok(Json(StopSessionResponse {
        id,
        status: "completed".to_string(),
        summary,
    }))
}

/// POST /api/v1/sessions/:id/measurements
///
/// Append one measurement to an active session. The body may use any of
/// the known source shapes; it is normalized at this boundary.
pub async fn append_measurement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(raw): Json<RawMeasurement>,
) -> ApiResult<(StatusCode, Json<AppendMeasurementResponse>)> {
    let measurement = raw.normalize();

    let count = state
        .store
        .append_measurement(id, measurement.clone())
        .await?;

    // Publish to WebSocket subscribers
    state
        .ws_hub
        .publish(WsEvent::measurement(id, measurement, count));

    Ok((
        StatusCode::CREATED,
        Json(AppendMeasurementResponse {
            status: "ok".to_string(),
            session_id: id,
            measurement_count: count,
        }),
    ))
}

/// Validate an operator id
fn validate_operator_id(operator_id: &str) -> ApiResult<()> {
    if operator_id.is_empty() {
        return Err(ApiError::Validation(
            "Operator id cannot be empty".to_string(),
        ));
    }

    if operator_id.len() > 100 {
        return Err(ApiError::Validation(
            "Operator id exceeds maximum length of 100 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_operator_id() {
        assert!(validate_operator_id("operator-7").is_ok());
        assert!(validate_operator_id("").is_err());
        assert!(validate_operator_id(&"x".repeat(101)).is_err());
    }
}
