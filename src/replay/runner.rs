//! Headless run driver.
//!
//! Steps a run at a fixed frame length, feeding presses from a `JumpPolicy`,
//! and records the presses that took effect so the run can be replayed.

use super::autopilot::{JumpPolicy, TraceInput};
use super::trace::InputTrace;
use crate::run::{request_jump, tick, ConfigError, LevelConfig, RunEvent, RunOutcome, RunState};
use serde::Serialize;
use tracing::debug;

/// What happened in one headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    /// `InProgress` when the tick budget ran out first.
    pub outcome: RunOutcome,
    pub total_collected: usize,
    pub required: usize,
    pub ticks: u64,
    /// Item ids in pickup order.
    pub collected_ids: Vec<String>,
    pub trace: InputTrace,
}

impl RunSummary {
    pub fn won(&self) -> bool {
        self.outcome == RunOutcome::Victory
    }

    pub fn timed_out(&self) -> bool {
        !self.outcome.is_over()
    }
}

/// Drive `run` until it ends or `max_ticks` ticks have been applied.
///
/// Frame `k` spans `[k * frame_ms, (k + 1) * frame_ms)` on the run clock.
pub fn run_with_policy<P: JumpPolicy + ?Sized>(
    run: &mut RunState,
    policy: &mut P,
    seed: u64,
    frame_ms: u64,
    max_ticks: u64,
) -> RunSummary {
    let mut trace = InputTrace::new(seed, frame_ms);
    let mut collected_ids = Vec::new();

    while !run.is_over() && run.tick_count < max_ticks {
        let frame_start = run.tick_count.saturating_mul(frame_ms);
        let frame_end = frame_start.saturating_add(frame_ms);

        for at in policy.presses(run, frame_start, frame_end) {
            if request_jump(run, at).is_some() {
                trace.jumps.push(at);
            }
        }

        let result = tick(run);
        for event in &result.events {
            if let RunEvent::Pickup { item_id, .. } = event {
                collected_ids.push(item_id.clone());
            }
        }
    }

    debug!(seed, ticks = run.tick_count, outcome = ?run.outcome, "headless run complete");

    RunSummary {
        seed,
        outcome: run.outcome,
        total_collected: run.total_collected,
        required: run.required(),
        ticks: run.tick_count,
        collected_ids,
        trace,
    }
}

/// Create a run from `seed` and drive it with `policy`.
pub fn simulate<P: JumpPolicy + ?Sized>(
    config: &LevelConfig,
    seed: u64,
    policy: &mut P,
    frame_ms: u64,
    max_ticks: u64,
) -> Result<RunSummary, ConfigError> {
    let mut run = RunState::seeded(config.clone(), seed)?;
    Ok(run_with_policy(&mut run, policy, seed, frame_ms, max_ticks))
}

/// Re-run a recorded trace against `config`.
pub fn replay_trace(
    config: &LevelConfig,
    trace: &InputTrace,
    max_ticks: u64,
) -> Result<RunSummary, ConfigError> {
    let mut input = TraceInput::new(trace.jumps.clone());
    simulate(config, trace.seed, &mut input, trace.frame_ms, max_ticks)
}
