//! # Implementable Point Enumerator
//!
//! Lists every available (scale, frequency) pair whose rounded counter value
//! lies in `[1, max_value]`.
//!
//! ## Run Structure
//!
//! For a fixed frequency the counter value `t * f / s` only shrinks as the
//! scale grows, and rounding preserves that order. Walking the sorted scale
//! list therefore always finds:
//! 1. zero or more scales whose value is too large,
//! 2. zero or more scales whose value is in range, then
//! 3. zero or more scales whose value rounds to zero.
//!
//! Instead of filtering the whole frequency x scale product, the enumerator
//! binary-searches the start of run 2 and scans forward until it ends.

use crate::metrics::round_half_away;
use crate::{ParameterSnapshot, Point};

/// Enumerate the implementable points of `snapshot`.
///
/// Points are grouped by ascending frequency, then ascending scale.
///
/// # Example
/// ```
/// use timer_planner_lib::{enumerate::enumerate_implementable, ParameterSnapshot};
///
/// let snapshot = ParameterSnapshot::new(1.0, 65_535, vec![1e6], vec![1, 2, 4, 8, 16]).unwrap();
/// let points = enumerate_implementable(&snapshot);
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].scale, 16.0);
/// ```
pub fn enumerate_implementable(snapshot: &ParameterSnapshot) -> Vec<Point> {
    let mut points = Vec::new();
    if snapshot.max_value() == 0 {
        return points;
    }

    for &freq in snapshot.frequencies() {
        let run = implementable_run(snapshot, freq);
        points.extend(run.iter().map(|&scale| Point {
            scale: scale as f64,
            freq,
        }));
    }

    log::debug!(
        "enumerate: {} implementable points from {} frequencies x {} scales",
        points.len(),
        snapshot.frequencies().len(),
        snapshot.scales().len()
    );
    points
}

/// The contiguous slice of scales that are implementable at `freq`.
///
/// The continuous limits are widened by half a count on each side
/// (`round(v) >= 1` iff `v >= 0.5`, `round(v) <= max` iff `v < max + 0.5`),
/// then both ends of the run are trimmed with the actual rounding rule so that
/// floating-point noise near a limit can neither admit nor drop a scale.
fn implementable_run(snapshot: &ParameterSnapshot, freq: f64) -> &[u64] {
    let time = snapshot.target_time();
    let max_value = snapshot.max_value();
    let scales = snapshot.scales();

    // Value = 1 at scale_max, value = max at scale_max / max
    let scale_max = time * freq;
    let scale_low = scale_max / (max_value as f64 + 0.5);
    let scale_high = 2.0 * scale_max;

    let start = scales.partition_point(|&scale| (scale as f64) < scale_low);
    let len = scales[start..]
        .iter()
        .take_while(|&&scale| scale as f64 <= scale_high)
        .count();
    let mut run = &scales[start..start + len];

    let in_range = |scale: u64| {
        let value = round_half_away(time * freq / scale as f64);
        (1..=max_value).contains(&value)
    };
    while let Some((&first, rest)) = run.split_first() {
        if in_range(first) {
            break;
        }
        run = rest;
    }
    while let Some((&last, rest)) = run.split_last() {
        if in_range(last) {
            break;
        }
        run = rest;
    }

    run
}
