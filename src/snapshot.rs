//! # Parameter Snapshot
//!
//! The immutable input record shared by every core computation. A snapshot
//! is validated when it is built, so the boundary builder, the enumerator and
//! the metric calculator can divide by frequencies and scales without
//! checking for zero, and never hand NaN or infinities back to the caller.
//!
//! ## Normalization
//! - **Scales**: sorted ascending and deduplicated; the enumerator relies on
//!   this ordering for its binary search
//! - **Frequencies**: sorted ascending and deduplicated so that duplicate
//!   entries cannot produce duplicate implementable points

use thiserror::Error;

/// Reasons a set of inputs cannot form a snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Target time is zero, negative, NaN or infinite
    #[error("target time must be a positive finite number of seconds, got {0}")]
    TargetTime(f64),

    #[error("at least one frequency is required")]
    NoFrequencies,

    /// A frequency is zero, negative, NaN or infinite
    #[error("frequencies must be positive and finite, got {0}")]
    Frequency(f64),

    #[error("at least one scale factor is required")]
    NoScales,

    #[error("scale factors must be at least 1")]
    ZeroScale,
}

/// Validated inputs for one planning run.
///
/// # Example
/// ```
/// use timer_planner_lib::ParameterSnapshot;
///
/// let snapshot = ParameterSnapshot::new(0.001, 65_535, vec![8e6, 1e6], vec![64, 1, 8, 8]).unwrap();
/// assert_eq!(snapshot.scales(), &[1, 8, 64]);
/// assert_eq!(snapshot.frequencies(), &[1e6, 8e6]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSnapshot {
    target_time: f64,
    max_value: u64,
    frequencies: Vec<f64>,
    scales: Vec<u64>,
}

impl ParameterSnapshot {
    /// Validate and normalize a set of inputs.
    ///
    /// `max_value == 0` is accepted: a zero-width counter has no valid value,
    /// and the core reports that as an empty polygon and an empty point set.
    pub fn new(
        target_time: f64,
        max_value: u64,
        mut frequencies: Vec<f64>,
        mut scales: Vec<u64>,
    ) -> Result<Self, SnapshotError> {
        if !(target_time.is_finite() && target_time > 0.0) {
            return Err(SnapshotError::TargetTime(target_time));
        }

        if frequencies.is_empty() {
            return Err(SnapshotError::NoFrequencies);
        }
        if let Some(&bad) = frequencies
            .iter()
            .find(|freq| !(freq.is_finite() && **freq > 0.0))
        {
            return Err(SnapshotError::Frequency(bad));
        }

        if scales.is_empty() {
            return Err(SnapshotError::NoScales);
        }
        if scales.contains(&0) {
            return Err(SnapshotError::ZeroScale);
        }

        frequencies.sort_by(f64::total_cmp);
        frequencies.dedup();
        scales.sort_unstable();
        scales.dedup();

        Ok(Self {
            target_time,
            max_value,
            frequencies,
            scales,
        })
    }

    /// Build a snapshot for a counter `bits` wide (`max_value = 2^bits - 1`).
    pub fn with_bits(
        target_time: f64,
        bits: u32,
        frequencies: Vec<f64>,
        scales: Vec<u64>,
    ) -> Result<Self, SnapshotError> {
        Self::new(target_time, max_value_for_bits(bits), frequencies, scales)
    }

    /// Desired interval in seconds
    pub fn target_time(&self) -> f64 {
        self.target_time
    }

    /// Largest representable counter value
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// Available frequencies, ascending and unique
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Available combined scale factors, ascending and unique
    pub fn scales(&self) -> &[u64] {
        &self.scales
    }

    /// `(lowest, highest)` available frequency.
    pub fn freq_band(&self) -> (f64, f64) {
        // Non-empty and sorted by construction
        (self.frequencies[0], self.frequencies[self.frequencies.len() - 1])
    }

    /// `(lowest, highest)` available scale.
    pub fn scale_band(&self) -> (u64, u64) {
        (self.scales[0], self.scales[self.scales.len() - 1])
    }
}

/// Largest value of a counter `bits` wide. Widths beyond 64 saturate.
pub fn max_value_for_bits(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
