//! Simulated sensor feed
//!
//! Drives a session the way the production line sensor does: one
//! measurement per sampling tick (about every three seconds), appended to
//! the session store and published to WebSocket subscribers. Used for
//! demos and local dashboard development; a real sensor gateway would
//! replace only this module.

use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::session::{Measurement, SessionError, SessionStore};
use crate::websocket::{ConnectionHub, WsEvent};

/// Simulated sensor feed for one session
pub struct SensorFeed {
    store: Arc<SessionStore>,
    hub: Option<Arc<ConnectionHub>>,
    config: FeedConfig,
}

impl SensorFeed {
    /// Create a feed writing through the given store
    pub fn new(store: Arc<SessionStore>, config: FeedConfig) -> Self {
        Self {
            store,
            hub: None,
            config,
        }
    }

    /// Also publish each measurement to WebSocket subscribers
    pub fn with_hub(mut self, hub: Arc<ConnectionHub>) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Produce one simulated measurement
    pub fn next_measurement(&self) -> Measurement {
        let avg = self.config.mean_size_mm + (rand_simple() - 0.5) * self.config.size_jitter_mm;
        let spread = 0.2 + rand_simple() * 0.6;
        let count_jitter = (rand_simple() * 10.0) as u32;

        Measurement::new(
            round_size(avg),
            Some(round_size(avg - spread)),
            Some(round_size(avg + spread)),
            self.config.pellets_per_tick + count_jitter,
        )
    }

    /// Start the background tick loop for a session
    ///
    /// The task appends one measurement per tick and stops on its own when
    /// the session is sealed or removed.
    pub fn start_background_feed(self, session_id: Uuid) -> JoinHandle<()> {
        let interval = std::time::Duration::from_millis(self.config.tick_interval_ms.max(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick fires immediately; skip it so the session gets a
            // full interval before its first measurement
            ticker.tick().await;

            tracing::info!(
                session_id = %session_id,
                interval_ms = interval.as_millis() as u64,
                "Sensor feed started"
            );

            loop {
                ticker.tick().await;

                let measurement = self.next_measurement();
                match self
                    .store
                    .append_measurement(session_id, measurement.clone())
                    .await
                {
                    Ok(count) => {
                        if let Some(hub) = &self.hub {
                            hub.publish(WsEvent::measurement(session_id, measurement, count));
                        }
                    }
                    Err(SessionError::SessionCompleted(_))
                    | Err(SessionError::SessionNotFound(_)) => {
                        tracing::info!(session_id = %session_id, "Sensor feed stopped");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(session_id = %session_id, error = %e, "Feed append failed");
                    }
                }
            }
        })
    }
}

fn round_size(value: f64) -> f64 {
    (value.max(0.1) * 100.0).round() / 100.0
}

/// Simple random number generator (0.0 to 1.0)
fn rand_simple() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}
