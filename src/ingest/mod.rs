//! Measurement ingestion
//!
//! Everything that turns outside data into canonical [`Measurement`]s:
//!
//! - **normalize**: one tolerant-deserialization boundary for the
//!   heterogeneous record shapes produced by the sensor API and local
//!   caches. Downstream code never duck-types fields.
//! - **csv_import**: file import of measurement logs with flexible
//!   column mapping.
//!
//! [`Measurement`]: crate::session::Measurement

pub mod csv_import;
pub mod normalize;

pub use csv_import::{CsvImportResult, CsvImporter};
pub use normalize::RawMeasurement;

use thiserror::Error;

/// Errors that can occur during ingestion
#[derive(Error, Debug)]
pub enum IngestError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),
}
