//! Pelletmon demo run
//!
//! Runs one simulated measurement session end to end and reports its
//! statistics through tracing.

use pelletmon::config::FeedConfig;
use pelletmon::feed::SensorFeed;
use pelletmon::session::SessionStore;
use pelletmon::stats;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pelletmon=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Pelletmon v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(SessionStore::new());
    let session_id = store.create_session("demo-operator").await;

    // Fast ticks so the demo finishes quickly
    let config = FeedConfig {
        enabled: true,
        tick_interval_ms: 50,
        ..FeedConfig::default()
    };
    let feed = SensorFeed::new(Arc::clone(&store), config);

    tracing::info!(session_id = %session_id, "Writing demo measurements...");
    let handle = feed.start_background_feed(session_id);

    // Let the feed collect a full sample
    tokio::time::sleep(std::time::Duration::from_millis(20 * 50 + 100)).await;

    // Report live statistics before sealing
    report_statistics(&store, session_id).await?;

    // Seal the session; the feed stops on its own
    let summary = store.complete_session(session_id).await?;
    let _ = handle.await;

    tracing::info!(
        total_pellets = summary.total_pellets,
        measurements = summary.measurement_count,
        quality = summary.quality_score,
        "Demo session sealed"
    );

    Ok(())
}

async fn report_statistics(
    store: &SessionStore,
    session_id: uuid::Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = store.get_session(session_id).await?;
    let measurements = &session.measurements;

    let sizes = stats::aggregate_sizes(measurements);
    let quality = stats::quality_breakdown(measurements);
    let duration = session.duration_secs();

    tracing::info!(
        "Sizes: {} readings, avg={:.2}mm, min={:.2}mm, max={:.2}mm",
        measurements.len(),
        sizes.avg,
        sizes.min,
        sizes.max
    );

    tracing::info!(
        "Quality {}: compliance={:.0} consistency={:.0} targeting={:.0} completeness={:.0}",
        quality.score,
        quality.size_compliance,
        quality.consistency,
        quality.targeting,
        quality.completeness
    );

    tracing::info!(
        "Rates: {:.1} pellets/min, {:.2} measurements/min",
        stats::production_rate(session.total_pellets(), duration),
        stats::measurement_frequency(measurements.len(), duration)
    );

    let histogram = stats::size_distribution(measurements, &stats::DEFAULT_BIN_EDGES);
    tracing::info!("Size distribution: {:?}", histogram);

    let trend = stats::rolling_trend(measurements);
    tracing::info!(
        "Trend: {:?} ({:+.2}%)",
        trend.direction,
        trend.percent_change
    );

    Ok(())
}
