//! Integration test: Headless replay
//!
//! Batches of autopilot runs, recorded traces written to disk and played
//! back, and the batch report built from them.

use requisite_run::replay::{
    replay_trace, simulate, Autopilot, BatchReport, Idle, InputTrace, DEFAULT_FRAME_MS,
};
use requisite_run::{LevelConfig, RunOutcome};

#[test]
fn test_same_seed_same_run() {
    let config = LevelConfig::default();

    let a = simulate(&config, 314, &mut Autopilot::default(), DEFAULT_FRAME_MS, 8_000).unwrap();
    let b = simulate(&config, 314, &mut Autopilot::default(), DEFAULT_FRAME_MS, 8_000).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_trace_file_round_trip_replays_run() {
    let config = LevelConfig::default();
    let original = simulate(&config, 21, &mut Autopilot::default(), DEFAULT_FRAME_MS, 8_000).unwrap();

    let path = std::env::temp_dir().join(format!(
        "requisite-run-replay-{}.json",
        std::process::id()
    ));
    original.trace.save(&path).unwrap();
    let trace = InputTrace::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let replayed = replay_trace(&config, &trace, 8_000).unwrap();

    assert_eq!(replayed.outcome, original.outcome);
    assert_eq!(replayed.ticks, original.ticks);
    assert_eq!(replayed.collected_ids, original.collected_ids);
    assert_eq!(replayed.trace.jumps, original.trace.jumps);
}

#[test]
fn test_ineffective_presses_are_not_recorded() {
    let mut config = LevelConfig::default();
    config.obstacles.count = 0;
    config.catalog = Vec::new();
    config.map_length = 900.0;

    // Second press is past the double-jump window, third lands mid-air again
    let trace = InputTrace {
        seed: 1,
        frame_ms: DEFAULT_FRAME_MS,
        jumps: vec![0, 400, 420],
    };
    let summary = replay_trace(&config, &trace, 1_000).unwrap();

    assert_eq!(summary.trace.jumps, vec![0]);
    assert_eq!(summary.outcome, RunOutcome::Victory);
}

#[test]
fn test_batch_report_accounts_for_every_run() {
    let config = LevelConfig::default();
    let summaries: Vec<_> = (0..8)
        .map(|seed| {
            simulate(&config, seed, &mut Autopilot::default(), DEFAULT_FRAME_MS, 8_000).unwrap()
        })
        .collect();

    let report = BatchReport::from_runs(&summaries);

    assert_eq!(report.num_runs, 8);
    assert_eq!(
        report.victories + report.defeats_at_gate + report.caught_by_pursuer + report.timed_out,
        8
    );
    let total_pickups: u32 = report.pickup_counts.values().sum();
    let collected: usize = summaries.iter().map(|s| s.total_collected).sum();
    assert_eq!(total_pickups as usize, collected);
    assert!(report.win_rate() >= 0.0 && report.win_rate() <= 1.0);
}

#[test]
fn test_idle_run_never_outlasts_gate() {
    let config = LevelConfig::default();
    for seed in 0..5 {
        let summary = simulate(&config, seed, &mut Idle, DEFAULT_FRAME_MS, 20_000).unwrap();
        assert!(summary.outcome.is_over());
        assert!(summary.ticks <= config.ticks_to_gate());
    }
}
