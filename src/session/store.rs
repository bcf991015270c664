//! In-memory session registry
//!
//! The store owns every session and is the single writer for session state.
//! UI handlers, the API layer, and the sensor feed all go through it, so
//! there is no hidden module-level state anywhere else. Wrapped in an Arc
//! by callers and safe to share across tasks.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{SessionError, SessionResult};
use super::types::{Measurement, Session, SessionSummary};

/// Thread-safe registry of measurement sessions
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a new session for an operator, returning its id
    pub async fn create_session(&self, operator_id: impl Into<String>) -> Uuid {
        let session = Session::new(operator_id);
        let id = session.id;

        self.sessions.write().await.insert(id, session);

        tracing::info!(session_id = %id, "Session started");
        id
    }

    /// Append a measurement to an active session
    ///
    /// Rejects appends to sealed sessions and measurements whose timestamp
    /// precedes the last accepted one, keeping the ascending-order invariant.
    pub async fn append_measurement(
        &self,
        id: Uuid,
        measurement: Measurement,
    ) -> SessionResult<usize> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(SessionError::SessionNotFound(id))?;

        if !session.is_active() {
            return Err(SessionError::SessionCompleted(id));
        }

        if let Some(last) = session.last_measurement_time() {
            if measurement.timestamp < last {
                return Err(SessionError::OutOfOrderMeasurement {
                    session: id,
                    timestamp: measurement.timestamp.to_rfc3339(),
                    last: last.to_rfc3339(),
                });
            }
        }

        session.measurements.push(measurement);
        Ok(session.measurements.len())
    }

    /// Seal a session: set end time, compute and cache the summary
    pub async fn complete_session(&self, id: Uuid) -> SessionResult<SessionSummary> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(SessionError::SessionNotFound(id))?;

        if !session.is_active() {
            return Err(SessionError::SessionCompleted(id));
        }

        let summary = session.seal();

        tracing::info!(
            session_id = %id,
            measurements = summary.measurement_count,
            total_pellets = summary.total_pellets,
            quality = summary.quality_score,
            "Session completed"
        );

        Ok(summary)
    }

    /// Get a snapshot of a session
    pub async fn get_session(&self, id: Uuid) -> SessionResult<Session> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// Get a snapshot of a session's measurements
    pub async fn measurements(&self, id: Uuid) -> SessionResult<Vec<Measurement>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|s| s.measurements.clone())
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// List all sessions, newest first
    pub async fn list_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    /// Number of sessions in the store
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
