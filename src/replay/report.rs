//! Aggregate results over a batch of headless runs.

use super::runner::RunSummary;
use crate::run::{DefeatReason, RunOutcome};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregated results from multiple runs.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub num_runs: u32,
    pub victories: u32,
    pub defeats_at_gate: u32,
    pub caught_by_pursuer: u32,
    pub timed_out: u32,

    pub avg_collected: f64,
    pub avg_ticks: f64,

    /// How many runs picked up each item id.
    pub pickup_counts: HashMap<String, u32>,
}

impl BatchReport {
    pub fn from_runs(runs: &[RunSummary]) -> Self {
        let num_runs = runs.len() as u32;
        let count = |outcome: RunOutcome| runs.iter().filter(|r| r.outcome == outcome).count() as u32;

        let mut pickup_counts: HashMap<String, u32> = HashMap::new();
        for id in runs.iter().flat_map(|r| r.collected_ids.iter()) {
            *pickup_counts.entry(id.clone()).or_default() += 1;
        }

        let average = |total: f64| {
            if num_runs == 0 {
                0.0
            } else {
                total / num_runs as f64
            }
        };

        Self {
            num_runs,
            victories: count(RunOutcome::Victory),
            defeats_at_gate: count(RunOutcome::Defeat(DefeatReason::IncompleteAtGate)),
            caught_by_pursuer: count(RunOutcome::Defeat(DefeatReason::CaughtByPursuer)),
            timed_out: count(RunOutcome::InProgress),
            avg_collected: average(runs.iter().map(|r| r.total_collected as f64).sum()),
            avg_ticks: average(runs.iter().map(|r| r.ticks as f64).sum()),
            pickup_counts,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.num_runs == 0 {
            0.0
        } else {
            self.victories as f64 / self.num_runs as f64
        }
    }
}
