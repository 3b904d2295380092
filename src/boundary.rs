//! # Feasibility Boundary Builder
//!
//! Traces the boundary of the (scale, frequency) region in which some counter
//! value between 1 and `max_value` realizes the target time exactly.
//!
//! ## Geometry
//!
//! In log-log space the region is the intersection of:
//! - a diagonal band between the **value = 1** line `freq = scale / t` and the
//!   **value = max** line `freq = scale * max / t`, and
//! - the rectangle spanned by the available scale band `[left, right]` and
//!   frequency band `[bottom, top]`.
//!
//! The value = 1 line bounds the region from the lower right, the value = max
//! line from the upper left. Reflecting the rectangle through its centre and
//! negating coordinates swaps the two lines, so one routine traces both
//! halves of the boundary:
//!
//! - **pass 1** (value = 1 side): walks down the left scale edge and along
//!   the bottom frequency edge
//! - **pass 2** (value = max side, negated coordinates): walks up the right
//!   scale edge and along the top frequency edge
//!
//! Each pass emits one to three vertices; the loop is closed by repeating
//! the first vertex.

use crate::{FeasiblePolygon, ParameterSnapshot, Point};

/// Parameters of one tracing pass, expressed in sign-adjusted coordinates.
///
/// In the value = max pass every frequency and scale is negated, which turns
/// "top" into the nearer frequency limit and "right" into the nearer scale
/// limit so the same comparisons apply.
#[derive(Clone, Copy, Debug)]
struct EdgePass {
    sign: f64,
    /// Frequency at which the traced line crosses the near scale edge
    acute_intercept: f64,
    /// Frequency at which the opposite value line crosses the near scale edge
    obtuse_intercept: f64,
    freq_close_limit: f64,
    freq_far_limit: f64,
    scale_close_limit: f64,
    scale_far_limit: f64,
    /// Counter value of the traced line (1 or max)
    grow_ratio: f64,
    /// Counter value of the opposite line (max or 1)
    shrink_ratio: f64,
}

/// Build the closed feasibility polygon for `snapshot`.
///
/// Returns an empty polygon when the value band misses the available
/// rectangle entirely, or when `max_value` is zero.
///
/// # Example
/// ```
/// use timer_planner_lib::{boundary::build_boundary, ParameterSnapshot};
///
/// let snapshot = ParameterSnapshot::new(1.0, 100, vec![10.0, 1000.0], vec![1, 100]).unwrap();
/// let polygon = build_boundary(&snapshot);
/// assert!(polygon.is_closed());
/// assert_eq!(polygon.points.len(), 7);
/// ```
pub fn build_boundary(snapshot: &ParameterSnapshot) -> FeasiblePolygon {
    if snapshot.max_value() == 0 {
        log::debug!("boundary: zero-width counter, no feasible region");
        return FeasiblePolygon::default();
    }

    let [value_pass, max_pass] = edge_passes(snapshot);
    let time = snapshot.target_time();
    let mut points = Vec::with_capacity(7);

    if !trace_edge(&value_pass, time, &mut points) || !trace_edge(&max_pass, time, &mut points) {
        log::debug!("boundary: value band misses the available rectangle");
        return FeasiblePolygon::default();
    }

    // Close the loop
    points.push(points[0]);
    log::debug!("boundary: {} vertices", points.len());

    FeasiblePolygon { points }
}

/// The two symmetric passes: value = 1 side first, then value = max side.
fn edge_passes(snapshot: &ParameterSnapshot) -> [EdgePass; 2] {
    let time = snapshot.target_time();
    let max_value = snapshot.max_value() as f64;
    let (freq_bottom, freq_top) = snapshot.freq_band();
    let (scale_left, scale_right) = snapshot.scale_band();
    let (scale_left, scale_right) = (scale_left as f64, scale_right as f64);

    let freq_sw = scale_left / time;
    let freq_nw = freq_sw * max_value;
    let freq_se = scale_right / time;
    let freq_ne = freq_se * max_value;

    [
        EdgePass {
            sign: 1.0,
            acute_intercept: freq_sw,
            obtuse_intercept: freq_nw,
            freq_close_limit: freq_bottom,
            freq_far_limit: freq_top,
            scale_close_limit: scale_left,
            scale_far_limit: scale_right,
            grow_ratio: 1.0,
            shrink_ratio: max_value,
        },
        EdgePass {
            sign: -1.0,
            acute_intercept: -freq_ne,
            obtuse_intercept: -freq_se,
            freq_close_limit: -freq_top,
            freq_far_limit: -freq_bottom,
            scale_close_limit: -scale_right,
            scale_far_limit: -scale_left,
            grow_ratio: max_value,
            shrink_ratio: 1.0,
        },
    ]
}

/// Append the vertices contributed by one pass to `out`.
///
/// Returns `false` when the traced line passes entirely outside the
/// rectangle, in which case there is no feasible region at all. Comparisons
/// are strict: a line lying exactly on a rectangle edge adds no extra corner.
fn trace_edge(pass: &EdgePass, time: f64, out: &mut Vec<Point>) -> bool {
    let vertex = |freq: f64, scale: f64| Point {
        scale: pass.sign * scale,
        freq: pass.sign * freq,
    };

    if pass.acute_intercept > pass.freq_far_limit {
        return false;
    }

    if pass.acute_intercept < pass.freq_close_limit {
        // Enters through the frequency edge: walk along it
        let mut scale_corner = pass.freq_close_limit * time / pass.shrink_ratio;
        if scale_corner < pass.scale_close_limit {
            scale_corner = pass.scale_close_limit;
            if pass.obtuse_intercept < pass.freq_far_limit {
                // First obtuse corner
                out.push(vertex(pass.obtuse_intercept, pass.scale_close_limit));
            }
        }

        // Square corner
        out.push(vertex(pass.freq_close_limit, scale_corner));
        // Second obtuse corner
        let scale_exit = pass
            .scale_far_limit
            .min(pass.freq_close_limit * time / pass.grow_ratio);
        out.push(vertex(pass.freq_close_limit, scale_exit));
    } else {
        // Both value lines may cross the near scale edge inside the band
        if pass.obtuse_intercept < pass.freq_far_limit {
            out.push(vertex(pass.obtuse_intercept, pass.scale_close_limit));
        }
        // Acute corner
        out.push(vertex(pass.acute_intercept, pass.scale_close_limit));
    }

    true
}
