//! # Command Line Tests
//!
//! Argument parsing and text output of the binary, without touching the
//! process environment.

use crate::{parse_args, render_text, Options};
use timer_planner_lib::{
    renderer::{draw_ascii, Projection},
    report::PlanReport,
    ParameterSnapshot,
};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn no_arguments_gives_defaults() {
    let options = parse_args(args(&[])).unwrap();
    assert_eq!(options, Options::default());
    assert_eq!(options.config_path, "timer-config.toml");
    assert_eq!(options.top, 10);
}

#[test]
fn all_options_are_parsed() {
    let options = parse_args(args(&[
        "--config",
        "board.toml",
        "--json",
        "--chart",
        "value-freq",
        "--top",
        "3",
        "--verbose",
    ]))
    .unwrap();

    assert_eq!(options.config_path, "board.toml");
    assert!(options.json);
    assert_eq!(options.projection, Projection::ValueFreq);
    assert_eq!(options.top, 3);
    assert!(options.verbose);
    assert!(!options.help);
}

#[test]
fn invalid_arguments_are_rejected() {
    assert!(parse_args(args(&["--bogus"])).is_err());
    assert!(parse_args(args(&["--config"])).is_err());
    assert!(parse_args(args(&["--chart", "pie"])).is_err());
    assert!(parse_args(args(&["--top", "many"])).is_err());
}

#[test]
fn help_flag_is_recognized() {
    assert!(parse_args(args(&["-h"])).unwrap().help);
    assert!(parse_args(args(&["--help"])).unwrap().help);
}

#[test]
fn text_output_lists_best_candidates() {
    let snapshot =
        ParameterSnapshot::new(0.001, 65_535, vec![1e6, 8e6], vec![1, 8, 64]).unwrap();
    let report = PlanReport::build(&snapshot);
    let points: Vec<_> = report.candidates.iter().map(|c| c.point).collect();
    let chart = draw_ascii(
        &report.feasible_region,
        &points,
        &snapshot,
        Projection::ScaleFreq,
    );

    let text = render_text(&report, &snapshot, &chart, 2);
    assert!(text.starts_with(&chart));
    assert!(text.contains("#1\n"));
    assert!(text.contains("#2\n"));
    assert!(!text.contains("#3\n"));
    assert!(text.contains("rel_err = "));
    assert!(!text.contains("No feasible region"));
}

#[test]
fn text_output_reports_missing_region() {
    let snapshot = ParameterSnapshot::new(1.0, 0, vec![1.0], vec![1]).unwrap();
    let report = PlanReport::build(&snapshot);
    let text = render_text(&report, &snapshot, "", 10);
    assert!(text.contains("0 implementable configurations"));
    assert!(text.contains("No feasible region"));
}
