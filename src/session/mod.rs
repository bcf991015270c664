//! Pelletmon Session Model
//!
//! This module provides the measurement-session domain model:
//!
//! - **types**: Core data structures (Measurement, Session, SessionSummary)
//! - **store**: In-memory session registry shared by the API and the feed
//! - **error**: Error types
//!
//! # Lifecycle
//!
//! ```text
//! create → Active ── append measurement* ──→ complete → Completed (sealed)
//! ```
//!
//! A session is created empty, accumulates measurements in timestamp order
//! while Active, and is sealed exactly once. Sealing sets the end time and
//! caches the session's aggregate summary.
//!
//! # Example
//!
//! ```rust,no_run
//! use pelletmon::session::{Measurement, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SessionStore::new();
//!
//!     let id = store.create_session("operator-7").await;
//!     store
//!         .append_measurement(id, Measurement::new(10.2, Some(9.8), Some(10.6), 42))
//!         .await?;
//!
//!     let summary = store.complete_session(id).await?;
//!     println!("session quality: {}", summary.quality_score);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{SessionError, SessionResult};
pub use store::SessionStore;
pub use types::{Measurement, Session, SessionStatus, SessionSummary};
