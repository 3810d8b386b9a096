//! Recorded jump input for deterministic replay.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default frame length used by the drivers (~60 FPS).
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Longest frame a trace file may declare.
pub const MAX_FRAME_MS: u64 = 1_000;

/// Everything needed to reproduce a run: the layout seed, the frame length,
/// and every jump press that took effect, in run-clock milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTrace {
    pub seed: u64,
    pub frame_ms: u64,
    pub jumps: Vec<u64>,
}

/// Trace file errors
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("Failed to access trace file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Trace frame length must be positive")]
    ZeroFrame,

    #[error("Trace frame length {0} ms exceeds {max} ms", max = MAX_FRAME_MS)]
    FrameTooLong(u64),
}

impl InputTrace {
    pub fn new(seed: u64, frame_ms: u64) -> Self {
        Self {
            seed,
            frame_ms,
            jumps: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TraceError> {
        let trace: Self = serde_json::from_str(json)?;
        if trace.frame_ms == 0 {
            return Err(TraceError::ZeroFrame);
        }
        if trace.frame_ms > MAX_FRAME_MS {
            return Err(TraceError::FrameTooLong(trace.frame_ms));
        }
        Ok(trace)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
