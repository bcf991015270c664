//! Pelletmon Statistics Engine
//!
//! Pure, synchronous functions that take a session's measurement slice and
//! produce derived metrics. No shared state, no side effects: every
//! operation is total over well-typed input and safe to call concurrently.
//! Malformed sizes (zero, negative, non-finite) are filtered out before
//! aggregation, and zero valid measurements yield zero-valued results, so
//! callers never need null checks.
//!
//! - **engine**: aggregates, quality score, production rate, frequency
//! - **histogram**: size-distribution bucketing for distribution charts
//! - **trend**: chart trend series and the rolling trend indicator

pub mod engine;
pub mod histogram;
pub mod trend;

// Re-export commonly used types and operations
pub use engine::{
    aggregate_sizes, measurement_frequency, production_rate, quality_breakdown, quality_score,
    QualityBreakdown, SizeAggregate, TARGET_BAND_MM, TARGET_SIZE_MM,
};
pub use histogram::{size_distribution, DEFAULT_BIN_EDGES};
pub use trend::{pad_series, rolling_trend, trend_series, RollingTrend, TrendDirection, TrendPoint};
