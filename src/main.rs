//! # Timer Planner Application Entry Point
//!
//! This binary wires the configuration loader, the feasibility core and the
//! renderers together. By default it prints an ASCII chart followed by the
//! most accurate timer configurations; `--json` prints the full report
//! instead, for scripts and other tools.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use log::{LevelFilter, Log, Metadata, Record};
use std::env;
use timer_planner_lib::{
    config::{Config, CONFIG_FILE},
    labels::implementable_lines,
    renderer::{draw_ascii, Projection},
    report::PlanReport,
    ParameterSnapshot,
};

const USAGE: &str = "\
Usage: timer-planner [OPTIONS]

Options:
  --config PATH   Configuration file (default: timer-config.toml)
  --json          Print the full report as JSON
  --chart NAME    Chart projection: scale-freq, scale-value or value-freq
  --top N         Number of configurations to list (default: 10)
  --verbose       Print debug diagnostics to stderr
  --help          Show this message";

/// Command line options.
#[derive(Debug, Clone, PartialEq)]
struct Options {
    config_path: String,
    json: bool,
    projection: Projection,
    top: usize,
    verbose: bool,
    help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            config_path: CONFIG_FILE.to_string(),
            json: false,
            projection: Projection::default(),
            top: 10,
            verbose: false,
            help: false,
        }
    }
}

/// Parse arguments (without the program name).
fn parse_args<I>(args: I) -> anyhow::Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                options.config_path = args.next().context("--config needs a path")?;
            }
            "--json" => options.json = true,
            "--chart" => {
                let name = args.next().context("--chart needs a projection name")?;
                options.projection = name.parse()?;
            }
            "--top" => {
                let count = args.next().context("--top needs a number")?;
                options.top = count
                    .parse()
                    .with_context(|| format!("invalid --top value '{}'", count))?;
            }
            "--verbose" => options.verbose = true,
            "--help" | "-h" => options.help = true,
            other => anyhow::bail!("unknown argument '{}'\n\n{}", other, USAGE),
        }
    }

    Ok(options)
}

/// Minimal `log` backend writing to stderr.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) {
    // Only fails if a logger is already installed
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }
}

/// Render the human-readable summary.
fn render_text(
    report: &PlanReport,
    snapshot: &ParameterSnapshot,
    chart: &str,
    top: usize,
) -> String {
    let mut out = String::from(chart);

    out.push_str(&format!(
        "\n{} implementable configurations ({} frequencies x {} scales)\n",
        report.candidates.len(),
        report.frequencies.len(),
        report.scale_count
    ));
    if report.feasible_region.is_empty() {
        out.push_str("No feasible region: no counter value in range can reach the target time\n");
    }

    for (rank, candidate) in report.best(top).iter().enumerate() {
        out.push_str(&format!("\n#{}\n", rank + 1));
        for line in implementable_lines(&candidate.point, snapshot) {
            out.push_str(&format!("  {}\n", line));
        }
    }

    out
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let options = parse_args(env::args().skip(1))?;
    if options.help {
        println!("{}", USAGE);
        return Ok(());
    }
    init_logging(options.verbose);

    let config = Config::load_from_path(&options.config_path);
    let snapshot = config
        .to_snapshot()
        .context("configuration does not describe a usable timer")?;

    let report = PlanReport::build(&snapshot);

    if options.json {
        let json = report.to_json().context("failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    let points: Vec<_> = report.candidates.iter().map(|c| c.point).collect();
    let chart = draw_ascii(
        &report.feasible_region,
        &points,
        &snapshot,
        options.projection,
    );
    print!("{}", render_text(&report, &snapshot, &chart, options.top));

    Ok(())
}
