//! Aggregate statistics and the session quality score
//!
//! Every function here is pure: input slice in, numbers out. Sizes that
//! are zero, negative, or non-finite are excluded before any aggregation.

use serde::Serialize;

use crate::session::Measurement;

/// Target pellet size, millimeters
pub const TARGET_SIZE_MM: f64 = 10.0;

/// Inclusive in-spec size band, millimeters
pub const TARGET_BAND_MM: (f64, f64) = (8.0, 12.0);

/// Factor weights for the composite quality score
const WEIGHT_COMPLIANCE: f64 = 0.40;
const WEIGHT_CONSISTENCY: f64 = 0.35;
const WEIGHT_TARGETING: f64 = 0.15;
const WEIGHT_COMPLETENESS: f64 = 0.10;

/// Standard deviation (mm) at which the consistency score reaches zero
const CONSISTENCY_SIGMA_LIMIT: f64 = 3.0;

/// Mean deviation from target (mm) at which the targeting score reaches zero
const TARGETING_DEVIATION_LIMIT: f64 = 5.0;

/// Measurement count at which the completeness score saturates
const COMPLETENESS_SAMPLE_TARGET: f64 = 15.0;

/// Aggregate size statistics over a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeAggregate {
    /// Mean pellet size, mm (2 decimals)
    pub avg: f64,
    /// Smallest observed size, mm (2 decimals)
    pub min: f64,
    /// Largest observed size, mm (2 decimals)
    pub max: f64,
}

impl SizeAggregate {
    const ZERO: SizeAggregate = SizeAggregate {
        avg: 0.0,
        min: 0.0,
        max: 0.0,
    };
}

/// Per-factor scores behind the composite quality score
///
/// Each factor is on the 0-100 scale before weighting; the dashboard shows
/// them individually next to the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityBreakdown {
    /// Share of measurements inside the in-spec band
    pub size_compliance: f64,
    /// Penalizes spread of sizes across the session
    pub consistency: f64,
    /// Penalizes mean drift away from the target size
    pub targeting: f64,
    /// Rewards sessions with enough samples to be meaningful
    pub completeness: f64,
    /// Weighted composite, rounded and clamped to 0-100
    pub score: u8,
}

/// Round to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn usable(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// Average sizes of a session's measurements, filtered to usable values
fn usable_sizes(measurements: &[Measurement]) -> Vec<f64> {
    measurements
        .iter()
        .map(|m| m.avg_size)
        .filter(|s| usable(*s))
        .collect()
}

/// Aggregate avg/min/max pellet size over a measurement slice
///
/// Only measurements with a usable average size participate. Min and max
/// prefer the explicit per-measurement bounds when the sensor reported
/// them; otherwise that measurement contributes its average size.
/// Returns all zeros when nothing is usable.
pub fn aggregate_sizes(measurements: &[Measurement]) -> SizeAggregate {
    let included: Vec<&Measurement> = measurements
        .iter()
        .filter(|m| usable(m.avg_size))
        .collect();

    if included.is_empty() {
        return SizeAggregate::ZERO;
    }

    let sum: f64 = included.iter().map(|m| m.avg_size).sum();
    let avg = sum / included.len() as f64;

    let min = included
        .iter()
        .map(|m| m.min_size.filter(|s| usable(*s)).unwrap_or(m.avg_size))
        .fold(f64::INFINITY, f64::min);
    let max = included
        .iter()
        .map(|m| m.max_size.filter(|s| usable(*s)).unwrap_or(m.avg_size))
        .fold(f64::NEG_INFINITY, f64::max);

    SizeAggregate {
        avg: round2(avg),
        min: round2(min),
        max: round2(max),
    }
}

/// Population standard deviation
fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Compute the per-factor quality breakdown for a session
///
/// Factors:
/// 1. Size compliance: % of usable sizes inside [8, 12] mm
/// 2. Consistency: 100 − (σ/3)·100, where σ is the population standard
///    deviation; defaults to 100 below 2 samples
/// 3. Targeting: 100 − (|μ − 10|/5)·100
/// 4. Completeness: (count/15)·100, saturating at 15 measurements
///
/// Each factor is clamped to 0-100 before weighting.
pub fn quality_breakdown(measurements: &[Measurement]) -> QualityBreakdown {
    if measurements.is_empty() {
        return QualityBreakdown {
            size_compliance: 0.0,
            consistency: 0.0,
            targeting: 0.0,
            completeness: 0.0,
            score: 0,
        };
    }

    let sizes = usable_sizes(measurements);

    let size_compliance = if sizes.is_empty() {
        0.0
    } else {
        let in_band = sizes
            .iter()
            .filter(|s| **s >= TARGET_BAND_MM.0 && **s <= TARGET_BAND_MM.1)
            .count();
        clamp_score(in_band as f64 / sizes.len() as f64 * 100.0)
    };

    let consistency = if sizes.len() < 2 {
        100.0
    } else {
        let sigma = population_std_dev(&sizes);
        clamp_score(100.0 - (sigma / CONSISTENCY_SIGMA_LIMIT) * 100.0)
    };

    let targeting = if sizes.is_empty() {
        0.0
    } else {
        let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
        let deviation = (mean - TARGET_SIZE_MM).abs();
        clamp_score(100.0 - (deviation / TARGETING_DEVIATION_LIMIT) * 100.0)
    };

    let completeness = clamp_score(
        measurements.len() as f64 / COMPLETENESS_SAMPLE_TARGET * 100.0,
    );

    let weighted = size_compliance * WEIGHT_COMPLIANCE
        + consistency * WEIGHT_CONSISTENCY
        + targeting * WEIGHT_TARGETING
        + completeness * WEIGHT_COMPLETENESS;

    QualityBreakdown {
        size_compliance: round2(size_compliance),
        consistency: round2(consistency),
        targeting: round2(targeting),
        completeness: round2(completeness),
        score: clamp_score(weighted.round()) as u8,
    }
}

/// Composite quality score for a session, 0-100
pub fn quality_score(measurements: &[Measurement]) -> u8 {
    quality_breakdown(measurements).score
}

/// Pellets produced per minute of session duration (1 decimal)
///
/// Zero when the duration is not positive.
pub fn production_rate(total_pellets: u64, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    round1(total_pellets as f64 / (duration_secs / 60.0))
}

/// Measurements recorded per minute of session duration (2 decimals)
///
/// Zero when the duration is not positive.
pub fn measurement_frequency(measurement_count: usize, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    round2(measurement_count as f64 / (duration_secs / 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(avg: f64) -> Measurement {
        Measurement::new(avg, None, None, 10)
    }

    fn m_bounds(avg: f64, min: f64, max: f64) -> Measurement {
        Measurement::new(avg, Some(min), Some(max), 10)
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate_sizes(&[]);
        assert_eq!(agg, SizeAggregate { avg: 0.0, min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_aggregate_two_values() {
        let agg = aggregate_sizes(&[m(5.0), m(7.0)]);
        assert_eq!(agg.avg, 6.0);
        assert_eq!(agg.min, 5.0);
        assert_eq!(agg.max, 7.0);
    }

    #[test]
    fn test_aggregate_filters_unusable_sizes() {
        let agg = aggregate_sizes(&[m(0.0), m(-4.0), m(f64::NAN), m(9.0)]);
        assert_eq!(agg.avg, 9.0);
        assert_eq!(agg.min, 9.0);
        assert_eq!(agg.max, 9.0);
    }

    #[test]
    fn test_aggregate_all_unusable_returns_zeros() {
        let agg = aggregate_sizes(&[m(0.0), m(f64::INFINITY)]);
        assert_eq!(agg, SizeAggregate { avg: 0.0, min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_aggregate_prefers_explicit_bounds() {
        let agg = aggregate_sizes(&[m_bounds(10.0, 9.2, 11.3), m_bounds(10.4, 9.5, 10.9)]);
        assert_eq!(agg.min, 9.2);
        assert_eq!(agg.max, 11.3);
        assert_eq!(agg.avg, 10.2);
    }

    #[test]
    fn test_aggregate_falls_back_when_bounds_unusable() {
        // Zeroed bounds come from cache records that never carried them
        let agg = aggregate_sizes(&[m_bounds(10.0, 0.0, 0.0), m(8.0)]);
        assert_eq!(agg.min, 8.0);
        assert_eq!(agg.max, 10.0);
    }

    #[test]
    fn test_min_avg_max_ordering_holds() {
        let sets: Vec<Vec<Measurement>> = vec![
            vec![m(8.1), m(9.7), m(11.2), m(10.4)],
            vec![m_bounds(10.0, 8.0, 12.0), m(10.0)],
            vec![m(5.0)],
        ];
        for set in sets {
            let agg = aggregate_sizes(&set);
            assert!(agg.min <= agg.avg + 0.01, "{:?}", agg);
            assert!(agg.avg <= agg.max + 0.01, "{:?}", agg);
        }
    }

    #[test]
    fn test_quality_score_empty() {
        assert_eq!(quality_score(&[]), 0);
    }

    #[test]
    fn test_quality_score_perfect_session() {
        // 15 measurements at exactly the target with zero variance
        let measurements: Vec<Measurement> = (0..15).map(|_| m(10.0)).collect();
        let breakdown = quality_breakdown(&measurements);

        assert_eq!(breakdown.size_compliance, 100.0);
        assert_eq!(breakdown.consistency, 100.0);
        assert_eq!(breakdown.targeting, 100.0);
        assert_eq!(breakdown.completeness, 100.0);
        assert_eq!(breakdown.score, 100);
    }

    #[test]
    fn test_quality_score_single_out_of_spec_measurement() {
        // One 20 mm measurement: compliance 0, targeting clamps to 0,
        // consistency defaults to 100, completeness 1/15
        let breakdown = quality_breakdown(&[m(20.0)]);

        assert_eq!(breakdown.size_compliance, 0.0);
        assert_eq!(breakdown.consistency, 100.0);
        assert_eq!(breakdown.targeting, 0.0);
        assert!((breakdown.completeness - 6.67).abs() < 0.01);
        assert_eq!(breakdown.score, 36);
    }

    #[test]
    fn test_quality_band_edges_are_inclusive() {
        let breakdown = quality_breakdown(&[m(8.0), m(12.0)]);
        assert_eq!(breakdown.size_compliance, 100.0);
    }

    #[test]
    fn test_consistency_penalizes_spread() {
        // σ of {7, 13} is 3 → consistency bottoms out at 0
        let breakdown = quality_breakdown(&[m(7.0), m(13.0)]);
        assert_eq!(breakdown.consistency, 0.0);

        // Tighter spread scores higher
        let tight = quality_breakdown(&[m(9.9), m(10.1)]);
        assert!(tight.consistency > 90.0);
    }

    #[test]
    fn test_completeness_saturates_at_fifteen() {
        let many: Vec<Measurement> = (0..40).map(|_| m(10.0)).collect();
        assert_eq!(quality_breakdown(&many).completeness, 100.0);

        let few: Vec<Measurement> = (0..3).map(|_| m(10.0)).collect();
        assert_eq!(quality_breakdown(&few).completeness, 20.0);
    }

    #[test]
    fn test_production_rate() {
        assert_eq!(production_rate(120, 60.0), 2.0);
        assert_eq!(production_rate(90, 120.0), 45.0);
        assert_eq!(production_rate(100, 0.0), 0.0);
        assert_eq!(production_rate(100, -5.0), 0.0);
    }

    #[test]
    fn test_measurement_frequency() {
        assert_eq!(measurement_frequency(20, 60.0), 20.0);
        assert_eq!(measurement_frequency(1, 180.0), 0.33);
        assert_eq!(measurement_frequency(5, 0.0), 0.0);
    }

    #[test]
    fn test_operations_are_idempotent() {
        let measurements: Vec<Measurement> =
            vec![m(8.4), m(10.1), m(11.9), m(9.3), m(10.7)];

        assert_eq!(aggregate_sizes(&measurements), aggregate_sizes(&measurements));
        assert_eq!(quality_breakdown(&measurements), quality_breakdown(&measurements));
        assert_eq!(production_rate(500, 300.0), production_rate(500, 300.0));
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[4.2]), 0.0);
        assert!((population_std_dev(&[2.0, 4.0]) - 1.0).abs() < 1e-9);
        assert!((population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-9);
    }
}
