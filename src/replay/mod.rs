//! Headless drivers for the runner.
//!
//! Runs the exact same `tick()` as the terminal game without any UI, either
//! playing back a recorded input trace or letting a simple autopilot press
//! jump. Used for replaying logged runs and for level balance checks.

mod autopilot;
mod report;
mod runner;
mod trace;

pub use autopilot::{Autopilot, Idle, JumpPolicy, TraceInput};
pub use report::BatchReport;
pub use runner::{replay_trace, run_with_policy, simulate, RunSummary};
pub use trace::{InputTrace, TraceError, DEFAULT_FRAME_MS, MAX_FRAME_MS};
