//! # Point Labels
//!
//! Number formatting and the label lines shown next to a chart point. Counter
//! values are shown negated: timers are usually preloaded with `-value` and
//! count up to overflow, so that is the number a firmware engineer writes
//! into the register.

use crate::{compute_metrics, ParameterSnapshot, Point};

/// Fraction digits kept by every formatter.
const FRACTION_DIGITS: i32 = 3;

fn round_fraction(value: f64) -> f64 {
    let factor = 10f64.powi(FRACTION_DIGITS);
    (value * factor).round() / factor
}

/// Mantissa/exponent formatting with the exponent a multiple of `step`.
fn format_exponent(value: f64, step: i32) -> String {
    if value == 0.0 {
        return "0E0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let mut exponent = value.abs().log10().floor() as i32;
    exponent -= exponent.rem_euclid(step);
    let mut mantissa = round_fraction(value / 10f64.powi(exponent));

    // log10 can land one ulp below an exact power of ten
    if mantissa.abs() >= 10f64.powi(step) {
        exponent += step;
        mantissa = round_fraction(value / 10f64.powi(exponent));
    }

    format!("{}E{}", mantissa, exponent)
}

/// Engineering notation, exponent a multiple of three (`1.5E6`, `62.5E3`).
pub fn format_engineering(value: f64) -> String {
    format_exponent(value, 3)
}

/// Scientific notation (`-6.25E-5`).
pub fn format_scientific(value: f64) -> String {
    format_exponent(value, 1)
}

/// Plain decimal with thousands separators (`65,535`, `1,234.5`).
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", FRACTION_DIGITS as usize, value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 1);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = integer.chars().all(|c| c == '0') && fraction.is_empty();
    if value < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// Label lines for a vertex of the feasibility polygon.
pub fn feasible_vertex_lines(point: &Point, snapshot: &ParameterSnapshot) -> Vec<String> {
    vec![
        format!("Scale limit: {}", format_grouped(point.scale)),
        format!(
            "Timer limit: {}",
            format_grouped(point.ideal_value(snapshot.target_time()))
        ),
        format!("Freq limit: {}", format_engineering(point.freq)),
    ]
}

/// Label lines for an implementable point.
pub fn implementable_lines(point: &Point, snapshot: &ParameterSnapshot) -> Vec<String> {
    let metrics = compute_metrics(point, snapshot);
    vec![
        format!("f = {} Hz", format_engineering(point.freq)),
        format!("scale = {}", format_grouped(point.scale)),
        format!("tmr_idl = {}", format_grouped(-metrics.ideal_value)),
        format!("tmr_act = {}", format_grouped(-(metrics.actual_value as f64))),
        format!("t_idl = {} s", format_engineering(snapshot.target_time())),
        format!("t_act = {} s", format_engineering(metrics.actual_time)),
        format!("rel_err = {}", format_scientific(metrics.relative_error)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_engineering() {
        assert_eq!(format_engineering(1.5e6), "1.5E6");
        assert_eq!(format_engineering(48e6), "48E6");
        assert_eq!(format_engineering(62_500.0), "62.5E3");
        assert_eq!(format_engineering(0.001), "1E-3");
        assert_eq!(format_engineering(1000.0), "1E3");
        assert_eq!(format_engineering(250e-6), "250E-6");
        assert_eq!(format_engineering(0.0), "0E0");
        assert_eq!(format_engineering(-2e3), "-2E3");
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(0.2), "2E-1");
        assert_eq!(format_scientific(-6.25e-5), "-6.25E-5");
        assert_eq!(format_scientific(12_346.0), "1.235E4");
        assert_eq!(format_scientific(0.0), "0E0");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(65_535.0), "65,535");
        assert_eq!(format_grouped(1_234.5), "1,234.5");
        assert_eq!(format_grouped(-1_000_000.0), "-1,000,000");
        assert_eq!(format_grouped(0.25), "0.25");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(2.0 / 3.0), "0.667");
        assert_eq!(format_grouped(-0.0001), "0");
    }

    #[test]
    fn test_implementable_lines() {
        let snapshot = ParameterSnapshot::new(1.0, 65_535, vec![1e6], vec![16]).unwrap();
        let lines = implementable_lines(&Point { scale: 16.0, freq: 1e6 }, &snapshot);
        assert_eq!(
            lines,
            vec![
                "f = 1E6 Hz",
                "scale = 16",
                "tmr_idl = -62,500",
                "tmr_act = -62,500",
                "t_idl = 1E0 s",
                "t_act = 1E0 s",
                "rel_err = 0E0",
            ]
        );
    }

    #[test]
    fn test_feasible_vertex_lines() {
        let snapshot = ParameterSnapshot::new(1.0, 100, vec![10.0], vec![1]).unwrap();
        let lines = feasible_vertex_lines(&Point { scale: 1.0, freq: 100.0 }, &snapshot);
        assert_eq!(
            lines,
            vec!["Scale limit: 1", "Timer limit: 100", "Freq limit: 100E0"]
        );
    }
}
