//! Requisite Run data structures.
//!
//! A side-scrolling runner where the player gathers every enlistment
//! requisite before the finish gate reaches them, while a pursuer waits at
//! the left edge for anyone pushed back by the obstacles.

use super::config::{ConfigError, LevelConfig};
use super::layout::{place_collectibles, place_obstacles};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Player sprite dimensions.
pub const PLAYER_WIDTH: f64 = 100.0;
pub const PLAYER_HEIGHT: f64 = 100.0;

/// Distance from the viewport bottom to the ground line the player runs on.
pub const GROUND_MARGIN: f64 = 30.0;

/// Velocity change per tick while airborne (positive = downward).
pub const GRAVITY: f64 = 1.0;

/// Vertical velocity set by a jump from the ground.
pub const JUMP_IMPULSE: f64 = -13.0;

/// Vertical velocity set by the mid-air second jump.
pub const DOUBLE_JUMP_IMPULSE: f64 = -16.0;

/// Forward nudge applied with the second jump.
pub const DOUBLE_JUMP_BOOST: f64 = 30.0;

/// The second jump only fires this soon after the first one.
pub const DOUBLE_JUMP_WINDOW_MS: u64 = 300;

/// Tolerance above an obstacle top within which a descending player lands.
pub const LANDING_SLACK: f64 = 10.0;

/// Tolerance used when re-checking whether anything still supports the player.
pub const SUPPORT_SLACK: f64 = 5.0;

/// Background moves at this fraction of the scroll speed.
pub const BACKGROUND_PARALLAX: f64 = 0.5;

/// Pickup notices stay visible for this many ticks.
pub const NOTICE_TICKS: u32 = 100;

/// Axis-aligned rectangle in world units (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True if both rectangles share horizontal extent.
    pub fn overlaps_x(&self, other: &Bounds) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Strict overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.overlaps_x(other) && self.y < other.bottom() && self.bottom() > other.y
    }
}

/// Player motion states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    /// Standing on the ground line or on top of an obstacle.
    Grounded,
    /// A jump is in progress.
    Rising,
    /// Unsupported without having jumped (walked off a ledge).
    Falling,
}

impl MotionState {
    pub fn is_airborne(&self) -> bool {
        !matches!(self, Self::Grounded)
    }
}

/// Which jump a request triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpKind {
    Single,
    Double,
}

/// The runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Vertical velocity in units/tick (negative = upward).
    pub velocity_y: f64,
    pub motion: MotionState,
    pub double_jump_available: bool,
    /// Run-clock time of the last jump taken from the ground.
    pub last_jump_at_ms: Option<u64>,
}

impl Player {
    /// A grounded player standing at `x` with its feet on `ground_line`.
    pub fn standing(x: f64, ground_line: f64) -> Self {
        Self {
            x,
            y: ground_line - PLAYER_HEIGHT,
            velocity_y: 0.0,
            motion: MotionState::Grounded,
            double_jump_available: true,
            last_jump_at_ms: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Y coordinate of the player's feet.
    pub fn feet(&self) -> f64 {
        self.y + PLAYER_HEIGHT
    }

    /// Stand on a surface whose top edge is at `surface_top`.
    pub fn land_on(&mut self, surface_top: f64) {
        self.y = surface_top - PLAYER_HEIGHT;
        self.velocity_y = 0.0;
        self.motion = MotionState::Grounded;
        self.double_jump_available = true;
    }
}

/// A fixed-size block the player must jump onto or over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Bounds,
}

/// An item the player must gather before reaching the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: String,
    pub label: String,
    pub bounds: Bounds,
    pub collected: bool,
}

/// How a run ended in defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatReason {
    /// Pushed back to the pursuer at the left edge.
    CaughtByPursuer,
    /// Reached the finish gate missing requisites.
    IncompleteAtGate,
}

/// Run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    InProgress,
    Victory,
    Defeat(DefeatReason),
}

impl RunOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// End-of-run text shown to the player.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InProgress => "",
            Self::Victory => "You made it with every requisite. Welcome aboard!",
            Self::Defeat(DefeatReason::IncompleteAtGate) => {
                "You do not carry every requisite. Try again."
            }
            Self::Defeat(DefeatReason::CaughtByPursuer) => "You were caught by the thief!",
        }
    }
}

/// Floating message shown after a pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub ticks_remaining: u32,
}

/// One playthrough attempt.
#[derive(Debug, Clone)]
pub struct RunState {
    pub config: LevelConfig,
    pub player: Player,
    /// Background offset, wraps back to 0 after one viewport width.
    pub scroll_offset: f64,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub finish_gate: Bounds,
    pub outcome: RunOutcome,
    pub total_collected: usize,
    pub notice: Option<Notice>,
    /// Ticks applied since the run was created or reset.
    pub tick_count: u64,
}

impl RunState {
    /// Validate `config` and lay out a fresh run.
    pub fn new<R: Rng>(config: LevelConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;

        let ground_line = config.ground_line();
        let mut run = Self {
            player: Player::standing(config.player_start_x, ground_line),
            scroll_offset: 0.0,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            finish_gate: config.gate_bounds(),
            outcome: RunOutcome::InProgress,
            total_collected: 0,
            notice: None,
            tick_count: 0,
            config,
        };
        run.seed_layout(rng);
        Ok(run)
    }

    /// Same as `new` with a reproducible layout derived from `seed`.
    pub fn seeded(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(config, &mut rng)
    }

    /// Place obstacles then collectibles. Consumes random draws in that order.
    pub(crate) fn seed_layout<R: Rng>(&mut self, rng: &mut R) {
        self.obstacles = place_obstacles(&self.config, rng);
        self.collectibles = place_collectibles(&self.config, &self.obstacles, rng);
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Number of collectibles needed to win.
    pub fn required(&self) -> usize {
        self.collectibles.len()
    }

    /// Fraction of the requisites gathered so far (1.0 for an empty catalog).
    pub fn progress(&self) -> f64 {
        if self.collectibles.is_empty() {
            1.0
        } else {
            self.total_collected as f64 / self.collectibles.len() as f64
        }
    }

    pub fn has_all_requisites(&self) -> bool {
        self.total_collected == self.collectibles.len()
    }

    pub fn ground_line(&self) -> f64 {
        self.config.ground_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_touching_edges_do_not_overlap() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));

        let c = Bounds::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_bounds_vertical_separation() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let below = Bounds::new(0.0, 10.0, 10.0, 10.0);
        assert!(a.overlaps_x(&below));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_player_standing_on_ground() {
        let player = Player::standing(400.0, 470.0);
        assert_eq!(player.motion, MotionState::Grounded);
        assert!((player.y - 370.0).abs() < f64::EPSILON);
        assert!((player.feet() - 470.0).abs() < f64::EPSILON);
        assert!(player.double_jump_available);
        assert!(player.last_jump_at_ms.is_none());
    }

    #[test]
    fn test_land_on_restores_double_jump() {
        let mut player = Player::standing(400.0, 470.0);
        player.motion = MotionState::Rising;
        player.velocity_y = 4.0;
        player.double_jump_available = false;

        player.land_on(370.0);

        assert_eq!(player.motion, MotionState::Grounded);
        assert!((player.feet() - 370.0).abs() < f64::EPSILON);
        assert!(player.velocity_y.abs() < f64::EPSILON);
        assert!(player.double_jump_available);
    }

    #[test]
    fn test_new_run_defaults() {
        let run = RunState::seeded(LevelConfig::default(), 7).unwrap();
        assert_eq!(run.outcome, RunOutcome::InProgress);
        assert_eq!(run.total_collected, 0);
        assert_eq!(run.required(), 11);
        assert_eq!(run.obstacles.len(), 8);
        assert!(run.notice.is_none());
        assert!((run.player.x - 400.0).abs() < f64::EPSILON);
        assert!((run.finish_gate.x - 6600.0).abs() < f64::EPSILON);
        assert!(!run.is_over());
    }

    #[test]
    fn test_new_run_rejects_invalid_config() {
        let config = LevelConfig {
            speed: 0.0,
            ..LevelConfig::default()
        };
        assert!(RunState::seeded(config, 1).is_err());
    }

    #[test]
    fn test_progress_with_empty_catalog() {
        let config = LevelConfig {
            catalog: Vec::new(),
            ..LevelConfig::default()
        };
        let run = RunState::seeded(config, 1).unwrap();
        assert!(run.has_all_requisites());
        assert!((run.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_outcome_messages() {
        assert!(RunOutcome::InProgress.message().is_empty());
        assert!(RunOutcome::Victory.message().contains("every requisite"));
        assert!(RunOutcome::Defeat(DefeatReason::CaughtByPursuer)
            .message()
            .contains("thief"));
        assert!(RunOutcome::Defeat(DefeatReason::IncompleteAtGate)
            .message()
            .contains("Try again"));
    }
}
