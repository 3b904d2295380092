//! # Planning Report
//!
//! Bundles one planning run into a serializable record: the inputs, the
//! feasibility polygon and every implementable configuration with its
//! metrics, ranked from most to least accurate.

use crate::boundary::build_boundary;
use crate::enumerate::enumerate_implementable;
use crate::{compute_metrics, FeasiblePolygon, Metrics, ParameterSnapshot, Point};
use serde::{Deserialize, Serialize};

/// An implementable configuration together with its metrics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub point: Point,
    pub metrics: Metrics,
}

/// Complete result of one planning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Target interval in seconds
    pub target_time: f64,
    /// Largest counter value
    pub max_value: u64,
    /// Available frequencies, ascending
    pub frequencies: Vec<f64>,
    /// Number of distinct combined scales considered
    pub scale_count: usize,
    /// Boundary of the continuous feasible region
    pub feasible_region: FeasiblePolygon,
    /// Implementable configurations, lowest absolute error first
    pub candidates: Vec<Candidate>,
}

impl PlanReport {
    /// Run the core on `snapshot` and rank the implementable points.
    ///
    /// Ties in absolute error go to the larger counter value (finer
    /// resolution), then to the smaller scale.
    pub fn build(snapshot: &ParameterSnapshot) -> Self {
        let mut candidates: Vec<Candidate> = enumerate_implementable(snapshot)
            .into_iter()
            .map(|point| Candidate {
                point,
                metrics: compute_metrics(&point, snapshot),
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.metrics
                .relative_error
                .abs()
                .total_cmp(&b.metrics.relative_error.abs())
                .then(b.metrics.actual_value.cmp(&a.metrics.actual_value))
                .then(a.point.scale.total_cmp(&b.point.scale))
        });

        PlanReport {
            target_time: snapshot.target_time(),
            max_value: snapshot.max_value(),
            frequencies: snapshot.frequencies().to_vec(),
            scale_count: snapshot.scales().len(),
            feasible_region: build_boundary(snapshot),
            candidates,
        }
    }

    /// The `n` most accurate candidates (fewer if there are not that many).
    pub fn best(&self, n: usize) -> &[Candidate] {
        &self.candidates[..n.min(self.candidates.len())]
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> PlanReport {
        // 1 s at 3 Hz / 7 Hz over scales 1..4
        let snapshot = ParameterSnapshot::new(1.0, 255, vec![3.0, 7.0], vec![1, 2, 3, 4]).unwrap();
        PlanReport::build(&snapshot)
    }

    #[test]
    fn test_candidates_ranked_by_absolute_error() {
        let report = report();
        assert_eq!(report.candidates.len(), 8);

        for pair in report.candidates.windows(2) {
            assert!(
                pair[0].metrics.relative_error.abs() <= pair[1].metrics.relative_error.abs(),
                "candidates out of order"
            );
        }

        // Exact hits come first, the finest one (7 counts) leading
        let first = report.candidates[0];
        assert_eq!(first.metrics.relative_error, 0.0);
        assert_eq!(first.metrics.actual_value, 7);
    }

    #[test]
    fn test_best_truncates() {
        let report = report();
        assert_eq!(report.best(3).len(), 3);
        assert_eq!(report.best(100).len(), report.candidates.len());
        assert!(report.best(0).is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let report = report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"feasible_region\""));

        let parsed: PlanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidates.len(), report.candidates.len());
        assert_eq!(parsed.max_value, 255);
        assert_eq!(parsed.feasible_region.points.len(), report.feasible_region.points.len());
    }

    #[test]
    fn test_empty_report() {
        let snapshot = ParameterSnapshot::new(1.0, 0, vec![1.0], vec![1]).unwrap();
        let report = PlanReport::build(&snapshot);
        assert!(report.candidates.is_empty());
        assert!(report.feasible_region.is_empty());
    }
}
