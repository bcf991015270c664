//! Size-distribution histogram
//!
//! Buckets measurement sizes into half-open intervals for distribution
//! charts. Purely a counting operation.

use crate::session::Measurement;

/// Default bucket boundaries, millimeters
///
/// Eleven edges define ten buckets; the band around the 8-12 mm target is
/// split wider than the undersize range.
pub const DEFAULT_BIN_EDGES: [f64; 11] =
    [0.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 12.0, 15.0];

/// Count measurements per half-open bucket `[edges[i], edges[i+1])`
///
/// `edges` must be ascending; a value equal to a bucket's lower bound
/// belongs to that bucket. Values outside every bucket (and unusable
/// sizes) are dropped. Returns one count per bucket, `edges.len() - 1`
/// entries, in edge order.
pub fn size_distribution(measurements: &[Measurement], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }

    let mut counts = vec![0usize; edges.len() - 1];

    for m in measurements {
        let size = m.avg_size;
        if !size.is_finite() {
            continue;
        }
        if let Some(bucket) = bucket_index(size, edges) {
            counts[bucket] += 1;
        }
    }

    counts
}

/// First bucket whose half-open interval contains the value
fn bucket_index(value: f64, edges: &[f64]) -> Option<usize> {
    edges
        .windows(2)
        .position(|edge| value >= edge[0] && value < edge[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(avg: f64) -> Measurement {
        Measurement::new(avg, None, None, 1)
    }

    #[test]
    fn test_default_edges_are_ascending() {
        assert!(DEFAULT_BIN_EDGES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_all_sample_values_bucketed() {
        // 1 → [0,2), 2.5 → [2,3), 9 twice → [8,10), 14 → [12,15)
        let measurements = vec![m(1.0), m(2.5), m(9.0), m(9.0), m(14.0)];
        let counts = size_distribution(&measurements, &DEFAULT_BIN_EDGES);

        assert_eq!(counts.len(), DEFAULT_BIN_EDGES.len() - 1);
        assert_eq!(counts.iter().sum::<usize>(), 5);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[7], 2);
        assert_eq!(counts[9], 1);
    }

    #[test]
    fn test_lower_edge_belongs_to_its_bucket() {
        // Exactly 8.0 lands in [8,10), not [7,8)
        let counts = size_distribution(&[m(8.0)], &DEFAULT_BIN_EDGES);
        assert_eq!(counts[7], 1);
        assert_eq!(counts[6], 0);
    }

    #[test]
    fn test_values_outside_all_buckets_dropped() {
        let counts = size_distribution(&[m(15.0), m(99.0), m(-1.0)], &DEFAULT_BIN_EDGES);
        assert_eq!(counts.iter().sum::<usize>(), 0);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let counts = size_distribution(&[m(f64::NAN), m(f64::INFINITY)], &DEFAULT_BIN_EDGES);
        assert_eq!(counts.iter().sum::<usize>(), 0);
    }

    #[test]
    fn test_custom_edges() {
        let edges = [0.0, 10.0, 20.0];
        let counts = size_distribution(&[m(5.0), m(10.0), m(19.9)], &edges);
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_degenerate_edges() {
        assert!(size_distribution(&[m(5.0)], &[]).is_empty());
        assert!(size_distribution(&[m(5.0)], &[1.0]).is_empty());
    }
}
