//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! clients (dashboards) and the pelletmon server.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Measurement, SessionSummary};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for real-time updates
    Subscribe {
        /// List of topics to subscribe to (e.g., "sessions.<id>", "sessions.*")
        topics: Vec<String>,
    },
    /// Unsubscribe from topics
    Unsubscribe {
        /// List of topics to unsubscribe from
        topics: Vec<String>,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A measurement was appended to a session
    Measurement {
        /// Session the measurement belongs to
        session_id: Uuid,
        /// The appended measurement
        measurement: Measurement,
        /// Measurements recorded so far in the session
        measurement_count: usize,
    },
    /// A session was sealed
    SessionCompleted {
        /// Sealed session
        session_id: Uuid,
        /// Aggregates cached at seal time
        summary: SessionSummary,
    },
    /// Subscription confirmed
    Subscribed {
        /// Topics successfully subscribed to
        topics: Vec<String>,
    },
    /// Unsubscription confirmed
    Unsubscribed {
        /// Topics successfully unsubscribed from
        topics: Vec<String>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to (e.g., "sessions.<id>")
    pub topic: String,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    /// Create a measurement event for a session's subscribers
    pub fn measurement(session_id: Uuid, measurement: Measurement, measurement_count: usize) -> Self {
        Self {
            topic: format!("sessions.{}", session_id),
            message: ServerMessage::Measurement {
                session_id,
                measurement,
                measurement_count,
            },
        }
    }

    /// Create a session-completed event
    pub fn session_completed(session_id: Uuid, summary: SessionSummary) -> Self {
        Self {
            topic: format!("sessions.{}", session_id),
            message: ServerMessage::SessionCompleted {
                session_id,
                summary,
            },
        }
    }

    /// Create a system event
    pub fn system(message: &str) -> Self {
        Self {
            topic: "system".to_string(),
            message: ServerMessage::Error {
                message: message.to_string(),
            },
        }
    }
}
