//! # Feasibility Chart Rendering
//!
//! This module draws the feasibility polygon and the implementable points on
//! log-log axes, either as ASCII art for a terminal or onto any
//! `embedded-graphics` draw target. Three projections of the same data are
//! available, matching the three questions an engineer asks of a timer:
//! which clock for which divider, which counter value for which divider, and
//! which clock for which counter value.

use crate::labels::format_engineering;
use crate::{FeasiblePolygon, ParameterSnapshot, Point};
use embedded_graphics::{
    geometry::Point as PixelPoint,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which pair of quantities to put on the x and y axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Projection {
    /// Scale vs. frequency
    #[default]
    ScaleFreq,
    /// Scale vs. ideal counter value
    ScaleValue,
    /// Ideal counter value vs. frequency
    ValueFreq,
}

/// Unknown projection name on the command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown chart '{0}', expected scale-freq, scale-value or value-freq")]
pub struct ParseProjectionError(String);

impl Projection {
    /// Axis titles as `(x, y)`.
    pub fn axis_titles(&self) -> (&'static str, &'static str) {
        match self {
            Projection::ScaleFreq => ("scale", "freq (Hz)"),
            Projection::ScaleValue => ("scale", "timer value (negated)"),
            Projection::ValueFreq => ("timer value (negated)", "freq (Hz)"),
        }
    }

    /// Chart coordinates of `point`. Counter values are plotted by magnitude.
    pub fn project(&self, point: &Point, target_time: f64) -> (f64, f64) {
        match self {
            Projection::ScaleFreq => (point.scale, point.freq),
            Projection::ScaleValue => (point.scale, point.ideal_value(target_time)),
            Projection::ValueFreq => (point.ideal_value(target_time), point.freq),
        }
    }
}

impl FromStr for Projection {
    type Err = ParseProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scale-freq" => Ok(Projection::ScaleFreq),
            "scale-value" => Ok(Projection::ScaleValue),
            "value-freq" => Ok(Projection::ValueFreq),
            other => Err(ParseProjectionError(other.to_string())),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Projection::ScaleFreq => "scale-freq",
            Projection::ScaleValue => "scale-value",
            Projection::ValueFreq => "value-freq",
        };
        f.write_str(name)
    }
}

/// Log10 extents of the plotted data, padded so single values stay visible.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LogFrame {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl LogFrame {
    /// Frame around every projected point, or `None` when there is nothing
    /// to draw.
    fn fit(coords: impl Iterator<Item = (f64, f64)>) -> Option<Self> {
        let mut frame: Option<LogFrame> = None;
        for (x, y) in coords {
            let (lx, ly) = (x.log10(), y.log10());
            frame = Some(match frame {
                None => LogFrame {
                    min_x: lx,
                    max_x: lx,
                    min_y: ly,
                    max_y: ly,
                },
                Some(f) => LogFrame {
                    min_x: f.min_x.min(lx),
                    max_x: f.max_x.max(lx),
                    min_y: f.min_y.min(ly),
                    max_y: f.max_y.max(ly),
                },
            });
        }

        frame.map(|mut f| {
            // Half a decade either side of a degenerate axis
            if f.max_x - f.min_x < 1e-9 {
                f.min_x -= 0.5;
                f.max_x += 0.5;
            }
            if f.max_y - f.min_y < 1e-9 {
                f.min_y -= 0.5;
                f.max_y += 0.5;
            }
            f
        })
    }

    /// Position of `(x, y)` as fractions of the frame, origin bottom-left.
    fn fraction(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            (x.log10() - self.min_x) / (self.max_x - self.min_x),
            (y.log10() - self.min_y) / (self.max_y - self.min_y),
        )
    }
}

/// Everything a chart needs, already projected.
struct ChartData {
    outline: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
    frame: Option<LogFrame>,
}

impl ChartData {
    fn new(
        polygon: &FeasiblePolygon,
        points: &[Point],
        snapshot: &ParameterSnapshot,
        projection: Projection,
    ) -> Self {
        let time = snapshot.target_time();
        let outline: Vec<_> = polygon
            .points
            .iter()
            .map(|p| projection.project(p, time))
            .collect();
        let points: Vec<_> = points.iter().map(|p| projection.project(p, time)).collect();
        let frame = LogFrame::fit(outline.iter().chain(points.iter()).copied());

        ChartData {
            outline,
            points,
            frame,
        }
    }
}

const ROWS: usize = 24;
const COLUMNS: usize = 72;
const Y_AXIS_WIDTH: usize = 10; // Space for Y-axis labels

/// Render the chart as text.
///
/// The feasibility polygon outline is drawn with `·`, implementable points
/// with `•`. When both are empty a single explanatory line is returned.
pub fn draw_ascii(
    polygon: &FeasiblePolygon,
    points: &[Point],
    snapshot: &ParameterSnapshot,
    projection: Projection,
) -> String {
    let data = ChartData::new(polygon, points, snapshot, projection);
    let Some(frame) = data.frame else {
        return "No feasible configuration for these inputs\n".to_string();
    };

    let to_cell = |coord: (f64, f64)| {
        let (fx, fy) = frame.fraction(coord);
        let column = (fx * (COLUMNS - 1) as f64).round() as usize;
        let row = ((1.0 - fy) * (ROWS - 1) as f64).round() as usize;
        (row.min(ROWS - 1), column.min(COLUMNS - 1))
    };

    let mut grid = vec![vec![' '; COLUMNS]; ROWS];

    // Edges are straight in log-log space, so interpolate there
    for pair in data.outline.windows(2) {
        let (x0, y0) = (pair[0].0.log10(), pair[0].1.log10());
        let (x1, y1) = (pair[1].0.log10(), pair[1].1.log10());
        let steps = 2 * COLUMNS;
        for step in 0..=steps {
            let alpha = step as f64 / steps as f64;
            let x = 10f64.powf(x0 + alpha * (x1 - x0));
            let y = 10f64.powf(y0 + alpha * (y1 - y0));
            let (row, column) = to_cell((x, y));
            grid[row][column] = '·';
        }
    }
    for &coord in &data.points {
        let (row, column) = to_cell(coord);
        grid[row][column] = '•';
    }

    let (x_title, y_title) = projection.axis_titles();
    let mut out = String::new();
    out.push_str(&format!("{} vs {} (log-log)\n", y_title, x_title));

    let y_label = |row: usize| {
        let fy = 1.0 - row as f64 / (ROWS - 1) as f64;
        format_engineering(10f64.powf(frame.min_y + fy * (frame.max_y - frame.min_y)))
    };
    for (row, cells) in grid.into_iter().enumerate() {
        let label = if row == 0 || row == ROWS / 2 || row == ROWS - 1 {
            y_label(row)
        } else {
            String::new()
        };
        out.push_str(&format!("{:>width$} │", label, width = Y_AXIS_WIDTH - 2));
        out.extend(cells);
        out.push('\n');
    }

    out.push_str(&format!(
        "{:>width$} └{}\n",
        "",
        "─".repeat(COLUMNS),
        width = Y_AXIS_WIDTH - 2
    ));
    let left = format_engineering(10f64.powf(frame.min_x));
    let right = format_engineering(10f64.powf(frame.max_x));
    let gap = COLUMNS.saturating_sub(left.len() + right.len());
    out.push_str(&format!(
        "{:>width$}  {}{}{}\n",
        "",
        left,
        " ".repeat(gap),
        right,
        width = Y_AXIS_WIDTH - 2
    ));
    out.push_str(&format!("{:>width$}  {}\n", "", x_title, width = Y_AXIS_WIDTH - 2));

    out
}

/// Render the chart onto a binary-color draw target.
///
/// The plot fills the target's bounding box minus a small margin. The
/// polygon is stroked one pixel wide, implementable points are small filled
/// circles. Nothing but the frame is drawn when there is no data.
pub fn draw_chart<D>(
    polygon: &FeasiblePolygon,
    points: &[Point],
    snapshot: &ParameterSnapshot,
    projection: Projection,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    const MARGIN: i32 = 2;

    let area = display.bounding_box();
    let left = area.top_left.x + MARGIN;
    let top = area.top_left.y + MARGIN;
    let width = area.size.width as i32 - 2 * MARGIN;
    let height = area.size.height as i32 - 2 * MARGIN;
    if width <= 0 || height <= 0 {
        return Ok(());
    }

    Rectangle::new(
        PixelPoint::new(left - 1, top - 1),
        Size::new(width as u32 + 2, height as u32 + 2),
    )
    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
    .draw(display)?;

    let data = ChartData::new(polygon, points, snapshot, projection);
    let Some(frame) = data.frame else {
        return Ok(());
    };

    let to_pixel = |coord: (f64, f64)| {
        let (fx, fy) = frame.fraction(coord);
        PixelPoint::new(
            left + (fx * (width - 1) as f64).round() as i32,
            top + ((1.0 - fy) * (height - 1) as f64).round() as i32,
        )
    };

    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    for pair in data.outline.windows(2) {
        Line::new(to_pixel(pair[0]), to_pixel(pair[1]))
            .into_styled(stroke)
            .draw(display)?;
    }

    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    for &coord in &data.points {
        Circle::with_center(to_pixel(coord), 3)
            .into_styled(fill)
            .draw(display)?;
    }

    Ok(())
}
