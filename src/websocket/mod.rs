//! WebSocket Real-Time Streaming
//!
//! Provides real-time session updates to dashboard clients via WebSocket.
//!
//! ## Architecture
//!
//! ```text
//! Append/Feed → WsEvent → ConnectionHub → subscribed dashboard clients
//! ```
//!
//! Clients connect at `/ws`, then subscribe to topics:
//! - `sessions.{id}` — one session's live measurements
//! - `sessions.*` — every session
//! - `system` — service events
//!
//! - **messages**: Client/server message types
//! - **hub**: Connection registry and topic pub/sub
//! - **handler**: Axum upgrade handler and connection lifecycle

pub mod handler;
pub mod hub;
pub mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, WsEvent};
