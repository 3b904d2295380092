//! # Metric Calculator
//!
//! Converts a (scale, frequency) pair into the numbers an engineer cares
//! about: the counter value to program, the interval it actually produces,
//! and how far that interval is from the target.

use crate::{ParameterSnapshot, Point};
use serde::{Deserialize, Serialize};

/// Derived quantities for one (scale, frequency) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// `target_time * freq / scale`, before rounding
    pub ideal_value: f64,
    /// Counter value after rounding half away from zero
    pub actual_value: u64,
    /// Interval realized by `actual_value`, in seconds
    pub actual_time: f64,
    /// `actual_time / target_time - 1`
    pub relative_error: f64,
}

/// Round to the nearest integer, ties away from zero (`2.5 -> 3`).
///
/// Counter values are never negative, so the float-to-integer cast only
/// saturates for values beyond `u64::MAX`.
pub fn round_half_away(value: f64) -> u64 {
    value.round() as u64
}

/// Compute the metrics of `point` against the snapshot's target time.
///
/// The snapshot guarantees a positive target time; `point` must carry a
/// positive scale and frequency, which holds for every point the core
/// produces.
pub fn compute_metrics(point: &Point, snapshot: &ParameterSnapshot) -> Metrics {
    let target_time = snapshot.target_time();
    let ideal_value = point.ideal_value(target_time);
    let actual_value = round_half_away(ideal_value);
    let actual_time = actual_value as f64 * point.scale / point.freq;

    Metrics {
        ideal_value,
        actual_value,
        actual_time,
        relative_error: actual_time / target_time - 1.0,
    }
}
