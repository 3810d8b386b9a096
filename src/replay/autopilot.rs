//! Jump policies: where the presses in a headless run come from.

use crate::run::types::{MotionState, RunState, DOUBLE_JUMP_WINDOW_MS};

/// Decides which jump presses happen during one frame.
pub trait JumpPolicy {
    /// Press timestamps (run clock, ms) in `[frame_start_ms, frame_end_ms)`,
    /// applied in order before the frame's tick.
    fn presses(&mut self, run: &RunState, frame_start_ms: u64, frame_end_ms: u64) -> Vec<u64>;
}

/// Plays back recorded presses.
#[derive(Debug, Clone)]
pub struct TraceInput {
    jumps: Vec<u64>,
    next: usize,
}

impl TraceInput {
    pub fn new(mut jumps: Vec<u64>) -> Self {
        jumps.sort_unstable();
        Self { jumps, next: 0 }
    }
}

impl JumpPolicy for TraceInput {
    fn presses(&mut self, _run: &RunState, _frame_start_ms: u64, frame_end_ms: u64) -> Vec<u64> {
        let start = self.next;
        while self.next < self.jumps.len() && self.jumps[self.next] < frame_end_ms {
            self.next += 1;
        }
        self.jumps[start..self.next].to_vec()
    }
}

/// Never jumps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl JumpPolicy for Idle {
    fn presses(&mut self, _run: &RunState, _frame_start_ms: u64, _frame_end_ms: u64) -> Vec<u64> {
        Vec::new()
    }
}

/// Simple bot: jumps when an obstacle comes within `lookahead` units, and
/// spends the double jump if the obstacle is still in the way mid-flight.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    pub lookahead: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { lookahead: 60.0 }
    }
}

impl Autopilot {
    /// Gap from the player's right edge to the nearest obstacle ahead whose
    /// top is above the player's feet.
    fn nearest_threat(&self, run: &RunState) -> Option<f64> {
        let player = run.player.bounds();
        let feet = run.player.feet();
        run.obstacles
            .iter()
            .filter(|o| o.bounds.y < feet && o.bounds.right() > player.x)
            .map(|o| o.bounds.x - player.right())
            .filter(|gap| *gap >= -player.width)
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl JumpPolicy for Autopilot {
    fn presses(&mut self, run: &RunState, frame_start_ms: u64, _frame_end_ms: u64) -> Vec<u64> {
        let Some(gap) = self.nearest_threat(run) else {
            return Vec::new();
        };
        let player = &run.player;

        let wants_jump = match player.motion {
            MotionState::Grounded => gap <= self.lookahead,
            MotionState::Rising | MotionState::Falling => {
                let in_window = player
                    .last_jump_at_ms
                    .is_some_and(|t| frame_start_ms.saturating_sub(t) < DOUBLE_JUMP_WINDOW_MS);
                player.double_jump_available && in_window && gap <= 0.0
            }
        };

        if wants_jump {
            vec![frame_start_ms]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::types::{Bounds, Obstacle};
    use crate::run::LevelConfig;

    fn empty_run() -> RunState {
        let mut config = LevelConfig::default();
        config.obstacles.count = 0;
        config.catalog = Vec::new();
        RunState::seeded(config, 3).unwrap()
    }

    #[test]
    fn test_trace_input_splits_by_frame() {
        let run = empty_run();
        let mut input = TraceInput::new(vec![40, 5, 16, 15]);

        assert_eq!(input.presses(&run, 0, 16), vec![5, 15]);
        assert_eq!(input.presses(&run, 16, 32), vec![16]);
        assert_eq!(input.presses(&run, 32, 48), vec![40]);
        assert!(input.presses(&run, 48, 64).is_empty());
    }

    #[test]
    fn test_idle_never_presses() {
        let run = empty_run();
        assert!(Idle.presses(&run, 0, 16).is_empty());
    }

    #[test]
    fn test_autopilot_jumps_when_obstacle_close() {
        let mut run = empty_run();
        let top = run.config.obstacle_top();
        let mut pilot = Autopilot { lookahead: 50.0 };

        run.obstacles = vec![Obstacle {
            bounds: Bounds::new(600.0, top, 140.0, 140.0),
        }];
        assert!(pilot.presses(&run, 0, 16).is_empty());

        run.obstacles[0].bounds.x = 540.0;
        assert_eq!(pilot.presses(&run, 32, 48), vec![32]);
    }

    #[test]
    fn test_autopilot_ignores_obstacle_underfoot() {
        let mut run = empty_run();
        let top = run.config.obstacle_top();
        run.obstacles = vec![Obstacle {
            bounds: Bounds::new(380.0, top, 140.0, 140.0),
        }];
        run.player.land_on(top);

        let mut pilot = Autopilot::default();
        assert!(pilot.presses(&run, 0, 16).is_empty());
    }
}
