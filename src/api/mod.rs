//! Pelletmon REST API
//!
//! HTTP API layer for pelletmon, built with Axum.
//!
//! # Endpoints
//!
//! ## Sessions
//! - `POST /api/v1/sessions` - Start a session
//! - `GET /api/v1/sessions` - List sessions
//! - `GET /api/v1/sessions/:id` - Session detail
//! - `POST /api/v1/sessions/:id/stop` - Seal a session
//! - `POST /api/v1/sessions/:id/measurements` - Append a measurement
//!
//! ## Statistics
//! - `GET /api/v1/sessions/:id/stats` - Aggregates, quality score, rates
//! - `GET /api/v1/sessions/:id/histogram` - Size distribution
//! - `GET /api/v1/sessions/:id/trend` - Trend series + rolling trend
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Real-time streaming connection
//!
//! # Example
//!
//! ```rust,ignore
//! use pelletmon::api::{serve, ApiConfig, AppState};
//! use pelletmon::session::SessionStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SessionStore::new());
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;

    let api_routes = Router::new()
        // Session routes
        .route("/sessions", post(routes::sessions::create_session))
        .route("/sessions", get(routes::sessions::list_sessions))
        .route("/sessions/:id", get(routes::sessions::get_session))
        .route("/sessions/:id/stop", post(routes::sessions::stop_session))
        .route(
            "/sessions/:id/measurements",
            post(routes::sessions::append_measurement),
        )
        // Statistics routes
        .route("/sessions/:id/stats", get(routes::stats::session_stats))
        .route(
            "/sessions/:id/histogram",
            get(routes::stats::session_histogram),
        )
        .route("/sessions/:id/trend", get(routes::stats::session_trend))
        .layer(DefaultBodyLimit::max(body_limit))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Pelletmon API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Pelletmon API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = Arc::new(SessionStore::new());
        let state = AppState::new(store, ApiConfig::default());
        build_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_sessions_empty() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_create_session() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sessions")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"operator_id": "operator-7"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["operator_id"], "operator-7");
        assert_eq!(json["status"], "active");
        assert_eq!(json["measurement_count"], 0);
    }

    #[tokio::test]
    async fn test_create_session_empty_operator_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sessions")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"operator_id": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sessions/00000000-0000-0000-0000-000000000000/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_measurement_flow() {
        let store = Arc::new(SessionStore::new());
        let state = AppState::new(Arc::clone(&store), ApiConfig::default());
        let app = build_router(state);

        let id = store.create_session("operator-7").await;

        // Append one measurement in API shape
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/sessions/{}/measurements", id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"avg_size": 10.2, "min_size": 9.8, "max_size": 10.6, "pellet_count": 42}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Append one in cache shape - same boundary normalizes it
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/sessions/{}/measurements", id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"size": "9.8", "count": "38"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Stats over both measurements
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{}/stats", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["measurement_count"], 2);
        assert_eq!(json["total_pellets"], 80);
        assert_eq!(json["sizes"]["avg"], 10.0);

        // Seal, then appending is a conflict
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/sessions/{}/stop", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/sessions/{}/measurements", id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"avg_size": 10.0, "pellet_count": 40}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_histogram_rejects_bad_edges() {
        let store = Arc::new(SessionStore::new());
        let state = AppState::new(Arc::clone(&store), ApiConfig::default());
        let app = build_router(state);

        let id = store.create_session("operator-7").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{}/histogram?edges=5,1", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
