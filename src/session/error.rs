//! Session layer error types
//!
//! Defines all errors that can occur in the session lifecycle.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the session store
#[derive(Error, Debug)]
pub enum SessionError {
    /// Requested session does not exist
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Operation requires an active session but the session is sealed
    #[error("Session {0} is already completed")]
    SessionCompleted(Uuid),

    /// Measurement timestamp precedes the last accepted measurement
    #[error("Out-of-order measurement for session {session}: {timestamp} precedes {last}")]
    OutOfOrderMeasurement {
        session: Uuid,
        timestamp: String,
        last: String,
    },
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
