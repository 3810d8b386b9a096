//! Requisite Run - side-scrolling runner library.
//!
//! This module exposes the simulation, the headless replay drivers, and
//! build information for the binaries and for testing.

pub mod build_info;
pub mod replay;
pub mod run;

pub use run::{
    create_run, request_jump, reset_run, tick, ConfigError, DefeatReason, JumpKind, LevelConfig,
    MotionState, RunEvent, RunOutcome, RunState, TickResult,
};
