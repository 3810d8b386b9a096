//! Requisite Run Headless Simulator
//!
//! Runs the runner tick loop without any UI, either replaying a recorded
//! input trace or letting the autopilot play. Uses the exact same `tick()`
//! as the terminal game.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N        Number of runs with incrementing seeds (default: 1)
//!   --seed N        Layout seed of the first run (default: 42)
//!   --ticks N       Tick budget per run (default: 20000)
//!   --level FILE    JSON level file (default: built-in level)
//!   --trace FILE    Replay a recorded trace instead of using the autopilot
//!   --record FILE   Write the first run's trace to FILE
//!   --lookahead N   Autopilot jump distance (default: 60)
//!   --json          Print each run summary as a JSON line
//!   --verbose       Debug logging on stderr
//!   --quiet         Only the final summary line

use requisite_run::build_info::build_label;
use requisite_run::replay::{
    replay_trace, simulate, Autopilot, BatchReport, InputTrace, RunSummary, DEFAULT_FRAME_MS,
};
use requisite_run::LevelConfig;
use std::process::ExitCode;
use tracing::{error, info};

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    runs: u32,
    seed: u64,
    ticks: u64,
    level_path: Option<String>,
    trace_path: Option<String>,
    record_path: Option<String>,
    lookahead: f64,
    json: bool,
    verbose: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 1,
            seed: 42,
            ticks: 20_000,
            level_path: None,
            trace_path: None,
            record_path: None,
            lookahead: Autopilot::default().lookahead,
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}

/// `Ok(None)` means help was printed and the process should exit cleanly.
fn parse_args() -> Result<Option<SimConfig>, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;

    fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| format!("{flag} requires a value"))
    }

    fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
        value(args, i, flag)?
            .parse()
            .map_err(|_| format!("{flag} requires a number"))
    }

    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                config.runs = number(&args, i, "--runs")?;
            }
            "--seed" => {
                i += 1;
                config.seed = number(&args, i, "--seed")?;
            }
            "--ticks" => {
                i += 1;
                config.ticks = number(&args, i, "--ticks")?;
            }
            "--lookahead" => {
                i += 1;
                config.lookahead = number(&args, i, "--lookahead")?;
            }
            "--level" => {
                i += 1;
                config.level_path = Some(value(&args, i, "--level")?.to_string());
            }
            "--trace" => {
                i += 1;
                config.trace_path = Some(value(&args, i, "--trace")?.to_string());
            }
            "--record" => {
                i += 1;
                config.record_path = Some(value(&args, i, "--record")?.to_string());
            }
            "--json" => config.json = true,
            "--verbose" => config.verbose = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Some(config))
}

fn print_usage() {
    eprintln!(
        "Requisite Run Headless Simulator ({})\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 1)\n\
         \x20 --seed N        Layout seed of the first run (default: 42)\n\
         \x20 --ticks N       Tick budget per run (default: 20000)\n\
         \x20 --level FILE    JSON level file (default: built-in level)\n\
         \x20 --trace FILE    Replay a recorded trace instead of using the autopilot\n\
         \x20 --record FILE   Write the first run's trace to FILE\n\
         \x20 --lookahead N   Autopilot jump distance (default: 60)\n\
         \x20 --json          Print each run summary as a JSON line\n\
         \x20 --verbose       Debug logging on stderr\n\
         \x20 --quiet         Only the final summary line\n\
         \x20 --help, -h      Show this help",
        build_label()
    );
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Output ───────────────────────────────────────────────────────────

fn print_run(summary: &RunSummary, json: bool) -> Result<(), String> {
    if json {
        let line = serde_json::to_string(summary).map_err(|e| e.to_string())?;
        println!("{line}");
    } else {
        println!(
            "seed {:>6}  {:<28}  requisites {:>2}/{:<2}  ticks {:>6}  jumps {}",
            summary.seed,
            format!("{:?}", summary.outcome),
            summary.total_collected,
            summary.required,
            summary.ticks,
            summary.trace.jumps.len()
        );
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!(
        "{} runs: {} won ({:.1}%), {} incomplete at gate, {} caught, {} timed out, avg {:.2} requisites, avg {:.0} ticks",
        report.num_runs,
        report.victories,
        report.win_rate() * 100.0,
        report.defeats_at_gate,
        report.caught_by_pursuer,
        report.timed_out,
        report.avg_collected,
        report.avg_ticks
    );
}

// ── Main ─────────────────────────────────────────────────────────────

fn run(config: &SimConfig) -> Result<(), String> {
    let level = match &config.level_path {
        Some(path) => LevelConfig::load(path).map_err(|e| format!("{path}: {e}"))?,
        None => LevelConfig::default(),
    };

    let mut summaries = Vec::with_capacity(config.runs as usize);

    if let Some(path) = &config.trace_path {
        let trace = InputTrace::load(path).map_err(|e| format!("{path}: {e}"))?;
        info!(seed = trace.seed, jumps = trace.jumps.len(), "replaying trace");
        let summary = replay_trace(&level, &trace, config.ticks).map_err(|e| e.to_string())?;
        summaries.push(summary);
    } else {
        for run_idx in 0..config.runs {
            let seed = config.seed.wrapping_add(run_idx as u64);
            let mut pilot = Autopilot {
                lookahead: config.lookahead,
            };
            let summary = simulate(&level, seed, &mut pilot, DEFAULT_FRAME_MS, config.ticks)
                .map_err(|e| e.to_string())?;
            summaries.push(summary);
        }
    }

    if !config.quiet {
        for summary in &summaries {
            print_run(summary, config.json)?;
        }
    }

    if let (Some(path), Some(first)) = (&config.record_path, summaries.first()) {
        first
            .trace
            .save(path)
            .map_err(|e| format!("{path}: {e}"))?;
        info!(path = %path, "trace recorded");
    }

    print_report(&BatchReport::from_runs(&summaries));
    Ok(())
}

fn main() -> ExitCode {
    let config = match parse_args() {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.verbose);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
