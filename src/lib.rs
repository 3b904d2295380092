//! # Timer Planner Core Library
//!
//! This library answers one question a firmware engineer keeps asking: which
//! combination of input clock, prescaler/postscaler and counter width can
//! realize a given time interval, and how far off will the rounded counter
//! value land?
//!
//! ## Design Philosophy
//!
//! ### Pure Functions Over Snapshots
//! - **Immutable input**: every computation takes a [`ParameterSnapshot`] that
//!   is validated once, when it is built
//! - **Fresh output**: the feasibility polygon and the implementable point set
//!   are rebuilt from scratch on every call; nothing is cached
//! - **No I/O in the core**: configuration loading and rendering live in their
//!   own modules and only talk to the core through plain data
//!
//! ### Two Views of Feasibility
//! - **Continuous**: [`boundary::build_boundary`] traces the region of
//!   (scale, frequency) space where *some* counter value in `[1, max]` hits
//!   the target time exactly
//! - **Discrete**: [`enumerate::enumerate_implementable`] lists the available
//!   (scale, frequency) pairs whose *rounded* counter value is valid
//!
//! ### Data Flow
//! 1. **Config**: `timer-config.toml` → scale expansion → [`ParameterSnapshot`]
//! 2. **Core**: snapshot → [`FeasiblePolygon`] + implementable [`Point`]s
//! 3. **Output**: ASCII/graphics chart, label lines, or a JSON report
//!
//! ## Core Types
//! - [`Point`]: a (scale, frequency) pair
//! - [`FeasiblePolygon`]: closed boundary of the feasible region
//! - [`ParameterSnapshot`]: validated inputs

use serde::{Deserialize, Serialize};

// Module declarations
pub mod boundary;
pub mod config;
pub mod enumerate;
pub mod labels;
pub mod metrics;
pub mod renderer;
pub mod report;
pub mod snapshot;

pub use metrics::{compute_metrics, Metrics};
pub use snapshot::{ParameterSnapshot, SnapshotError};

/// A (scale, frequency) pair.
///
/// Scales are integers for implementable points but vertices of the
/// feasibility polygon sit at continuous positions, so both fields are `f64`.
/// Counter value, actual time and error are derived on demand through
/// [`compute_metrics`] rather than stored alongside.
///
/// # Example
/// ```
/// use timer_planner_lib::Point;
///
/// let point = Point { scale: 8.0, freq: 16e6 };
/// assert_eq!(point.ideal_value(0.5), 1e6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Combined pre/post scale divisor
    pub scale: f64,
    /// Input clock frequency in Hz
    pub freq: f64,
}

impl Point {
    /// Counter value that would realize `target_time` exactly, before rounding.
    pub fn ideal_value(&self, target_time: f64) -> f64 {
        target_time * self.freq / self.scale
    }
}

/// Closed boundary of the feasible (scale, frequency) region.
///
/// When non-empty the first point is repeated as the last one, so the
/// sequence can be drawn as a single polyline. An empty polygon means no
/// configuration within the given bands can realize the target time; it is
/// a valid result, not an error.
///
/// # Example
/// ```
/// use timer_planner_lib::FeasiblePolygon;
///
/// let polygon = FeasiblePolygon::default();
/// assert!(polygon.is_empty());
/// assert!(polygon.is_closed());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeasiblePolygon {
    /// Vertices in tracing order, first vertex repeated at the end
    pub points: Vec<Point>,
}

impl FeasiblePolygon {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the loop ends where it starts (vacuously true when empty).
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => true,
        }
    }
}
