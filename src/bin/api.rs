//! Pelletmon API Server
//!
//! Run with: cargo run --bin pelletmon-api
//!
//! # Configuration
//!
//! Environment variables:
//! - `PELLETMON_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `PELLETMON_API_PORT`: Port to listen on (default: 8086)
//! - `PELLETMON_FEED_ENABLED`: Start a simulated sensor session (default: false)
//! - `PELLETMON_FEED_INTERVAL_MS`: Simulated sampling tick (default: 3000)
//! - `RUST_LOG`: Log level (default: info)

use pelletmon::api::{serve, ApiConfig, AppState};
use pelletmon::config::Config;
use pelletmon::feed::SensorFeed;
use pelletmon::session::SessionStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pelletmon=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pelletmon API server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file + environment overrides)
    let config = Config::load_default();
    let api_config = ApiConfig::new(config.api.host.clone(), config.api.port);

    // Shared session store
    let store = Arc::new(SessionStore::new());
    let state = AppState::new(Arc::clone(&store), api_config.clone());

    // Optionally run a simulated sensor session for dashboard development
    if config.feed.enabled {
        let session_id = store.create_session("simulated-sensor").await;
        tracing::info!(
            session_id = %session_id,
            interval_ms = config.feed.tick_interval_ms,
            "Simulated sensor feed enabled"
        );

        SensorFeed::new(Arc::clone(&store), config.feed.clone())
            .with_hub(Arc::clone(&state.ws_hub))
            .start_background_feed(session_id);
    }

    // Run server
    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Pelletmon API server stopped");
    Ok(())
}
