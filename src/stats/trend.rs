//! Trend series and the rolling trend indicator
//!
//! The trend series feeds the dashboard's line chart: the most recent
//! window of (avg, min, max) triples in chronological order. The rolling
//! trend compares the last five measurements against the five before them
//! to drive the up/down/stable indicator.

use serde::Serialize;

use super::engine::round2;
use crate::session::Measurement;

/// Number of measurements in each rolling-trend comparison window
const ROLLING_WINDOW: usize = 5;

/// Minimum mean difference (mm) before a trend counts as a move
const STABLE_THRESHOLD_MM: f64 = 0.01;

/// One chart point: the size triple of a single measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl TrendPoint {
    const ZERO: TrendPoint = TrendPoint {
        avg: 0.0,
        min: 0.0,
        max: 0.0,
    };

    fn from_measurement(m: &Measurement) -> Self {
        Self {
            avg: m.avg_size,
            min: m.min_size.unwrap_or(m.avg_size),
            max: m.max_size.unwrap_or(m.avg_size),
        }
    }
}

/// Direction of the rolling trend indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Rolling trend: direction plus relative change of the window means
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingTrend {
    pub direction: TrendDirection,
    /// Change of the recent-window mean relative to the previous window,
    /// percent (2 decimals)
    pub percent_change: f64,
}

impl RollingTrend {
    const STABLE: RollingTrend = RollingTrend {
        direction: TrendDirection::Stable,
        percent_change: 0.0,
    };
}

/// The most recent `window` measurements as chart triples
///
/// Returned unpadded, oldest first. Callers that need fixed-width chart
/// axes pad with [`pad_series`].
pub fn trend_series(measurements: &[Measurement], window: usize) -> Vec<TrendPoint> {
    let start = measurements.len().saturating_sub(window);
    measurements[start..]
        .iter()
        .map(TrendPoint::from_measurement)
        .collect()
}

/// Left-pad a series with zero triples up to `width`
///
/// Series already at or beyond `width` are returned unchanged.
pub fn pad_series(points: Vec<TrendPoint>, width: usize) -> Vec<TrendPoint> {
    if points.len() >= width {
        return points;
    }
    let mut padded = vec![TrendPoint::ZERO; width - points.len()];
    padded.extend(points);
    padded
}

/// Rolling trend over the session's tail
///
/// Compares the mean avg size of the last five measurements against the
/// mean of the five before them. Fewer than ten measurements, or a zero
/// previous-window mean, yields Stable/0. A mean difference under 0.01 mm
/// also reads as Stable.
pub fn rolling_trend(measurements: &[Measurement]) -> RollingTrend {
    if measurements.len() < ROLLING_WINDOW * 2 {
        return RollingTrend::STABLE;
    }

    let recent = &measurements[measurements.len() - ROLLING_WINDOW..];
    let previous =
        &measurements[measurements.len() - ROLLING_WINDOW * 2..measurements.len() - ROLLING_WINDOW];

    let recent_mean = mean_avg_size(recent);
    let previous_mean = mean_avg_size(previous);

    if previous_mean == 0.0 {
        return RollingTrend::STABLE;
    }

    let diff = recent_mean - previous_mean;
    let direction = if diff.abs() < STABLE_THRESHOLD_MM {
        TrendDirection::Stable
    } else if diff > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    RollingTrend {
        direction,
        percent_change: round2(diff / previous_mean * 100.0),
    }
}

fn mean_avg_size(measurements: &[Measurement]) -> f64 {
    if measurements.is_empty() {
        return 0.0;
    }
    measurements.iter().map(|m| m.avg_size).sum::<f64>() / measurements.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(avg: f64) -> Measurement {
        Measurement::new(avg, Some(avg - 0.5), Some(avg + 0.5), 10)
    }

    fn series(values: &[f64]) -> Vec<Measurement> {
        values.iter().map(|v| m(*v)).collect()
    }

    #[test]
    fn test_trend_series_takes_most_recent_window() {
        let measurements = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let points = trend_series(&measurements, 3);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].avg, 3.0);
        assert_eq!(points[2].avg, 5.0);
    }

    #[test]
    fn test_trend_series_shorter_than_window_is_unpadded() {
        let measurements = series(&[9.0, 10.0]);
        let points = trend_series(&measurements, 20);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_trend_point_falls_back_to_avg_without_bounds() {
        let measurement = Measurement::new(10.0, None, None, 5);
        let points = trend_series(&[measurement], 20);
        assert_eq!(points[0], TrendPoint { avg: 10.0, min: 10.0, max: 10.0 });
    }

    #[test]
    fn test_pad_series_left_pads_with_zeros() {
        let padded = pad_series(vec![TrendPoint { avg: 10.0, min: 9.5, max: 10.5 }], 4);

        assert_eq!(padded.len(), 4);
        assert_eq!(padded[0], TrendPoint { avg: 0.0, min: 0.0, max: 0.0 });
        assert_eq!(padded[3].avg, 10.0);
    }

    #[test]
    fn test_pad_series_noop_at_width() {
        let points: Vec<TrendPoint> = trend_series(&series(&[1.0, 2.0, 3.0]), 3);
        assert_eq!(pad_series(points.clone(), 3), points);
    }

    #[test]
    fn test_rolling_trend_needs_ten_measurements() {
        let measurements = series(&[10.0; 9]);
        let trend = rolling_trend(&measurements);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.percent_change, 0.0);
    }

    #[test]
    fn test_rolling_trend_up() {
        // Previous window mean 10.0, recent window mean 11.0
        let mut values = vec![10.0; 5];
        values.extend_from_slice(&[11.0; 5]);
        let trend = rolling_trend(&series(&values));

        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percent_change, 10.0);
    }

    #[test]
    fn test_rolling_trend_down() {
        let mut values = vec![10.0; 5];
        values.extend_from_slice(&[9.0; 5]);
        let trend = rolling_trend(&series(&values));

        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.percent_change, -10.0);
    }

    #[test]
    fn test_rolling_trend_tiny_change_is_stable() {
        let mut values = vec![10.0; 5];
        values.extend_from_slice(&[10.005; 5]);
        let trend = rolling_trend(&series(&values));

        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_rolling_trend_uses_last_two_windows_only() {
        // Old noise before the two comparison windows must not matter
        let mut values = vec![3.0, 99.0, 1.0];
        values.extend_from_slice(&[10.0; 5]);
        values.extend_from_slice(&[12.0; 5]);
        let trend = rolling_trend(&series(&values));

        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percent_change, 20.0);
    }
}
