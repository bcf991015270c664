//! # Pelletmon
//!
//! Pellet production monitoring - session tracking, quality scoring, and
//! live statistics for pellet measurement lines.
//!
//! ## Features
//!
//! - **Session tracking**: bounded measurement sessions per operator
//! - **Statistics engine**: pure aggregate/quality/trend computations
//! - **Normalized ingestion**: one boundary for heterogeneous source shapes
//! - **REST API**: session and statistics endpoints built with Axum
//! - **Real-time**: WebSocket support for live dashboards
//!
//! ## Modules
//!
//! - [`session`]: Measurement/session model and the in-memory store
//! - [`stats`]: The statistics engine (aggregates, quality score, trends)
//! - [`ingest`]: Record normalization and CSV import
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Live streaming to dashboard clients
//! - [`feed`]: Simulated sensor feed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pelletmon::session::{Measurement, SessionStore};
//! use pelletmon::stats;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SessionStore::new();
//!
//!     // Start a session and record a reading
//!     let id = store.create_session("operator-7").await;
//!     store
//!         .append_measurement(id, Measurement::new(10.2, Some(9.8), Some(10.6), 42))
//!         .await?;
//!
//!     // Derived statistics are pure functions over the measurements
//!     let session = store.get_session(id).await?;
//!     let sizes = stats::aggregate_sizes(&session.measurements);
//!     let quality = stats::quality_score(&session.measurements);
//!
//!     println!("avg {:.2} mm, quality {}", sizes.avg, quality);
//!
//!     // Seal the session; aggregates are cached on the session
//!     let summary = store.complete_session(id).await?;
//!     println!("total pellets: {}", summary.total_pellets);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod feed;
pub mod ingest;
pub mod session;
pub mod stats;
pub mod websocket;

// Re-export top-level types for convenience
pub use session::{
    Measurement, Session, SessionError, SessionResult, SessionStatus, SessionStore, SessionSummary,
};

pub use stats::{
    aggregate_sizes, measurement_frequency, pad_series, production_rate, quality_breakdown,
    quality_score, rolling_trend, size_distribution, trend_series, QualityBreakdown, RollingTrend,
    SizeAggregate, TrendDirection, TrendPoint, DEFAULT_BIN_EDGES,
};

pub use ingest::{CsvImportResult, CsvImporter, IngestError, RawMeasurement};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent,
};

pub use config::{
    Config, ConfigError, ApiConfig as ConfigApiConfig, FeedConfig, LoggingConfig,
};

pub use feed::SensorFeed;
