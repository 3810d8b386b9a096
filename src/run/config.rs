//! Level configuration: layout rules, scroll speed, and the requisite catalog.

use super::catalog::{default_catalog, CatalogEntry};
use super::types::{Bounds, GROUND_MARGIN, PLAYER_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Banded obstacle placement: obstacle `i` lands at
/// `first_x + i * spacing + U[0,1) * jitter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleLayout {
    pub count: usize,
    pub first_x: f64,
    pub spacing: f64,
    pub jitter: f64,
    pub width: f64,
    pub height: f64,
    /// Distance from the viewport bottom up to the obstacle's top edge.
    pub elevation: f64,
}

impl Default for ObstacleLayout {
    fn default() -> Self {
        Self {
            count: 8,
            first_x: 800.0,
            spacing: 600.0,
            jitter: 400.0,
            width: 140.0,
            height: 140.0,
            elevation: 130.0,
        }
    }
}

/// Banded collectible placement: item `i` lands at
/// `first_x + i * spacing + U[0,1) * jitter`, on one of the lane heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleLayout {
    pub first_x: f64,
    pub spacing: f64,
    pub jitter: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CollectibleLayout {
    fn default() -> Self {
        Self {
            first_x: 700.0,
            spacing: 500.0,
            jitter: 300.0,
            width: 90.0,
            height: 90.0,
        }
    }
}

/// The finish gate that scrolls in from `map_length`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateLayout {
    pub width: f64,
    pub height: f64,
    /// Distance from the viewport bottom up to the gate's top edge.
    pub elevation: f64,
}

impl Default for GateLayout {
    fn default() -> Self {
        Self {
            width: 130.0,
            height: 130.0,
            elevation: 150.0,
        }
    }
}

/// Everything needed to create a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Starting x of the finish gate.
    pub map_length: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Units scenery moves left per tick.
    pub speed: f64,
    pub player_start_x: f64,
    /// The pursuer catches a player whose x falls to this value or below.
    pub pursuer_threshold: f64,
    /// Top-edge y coordinates a collectible may be placed at.
    pub lane_heights: Vec<f64>,
    pub obstacles: ObstacleLayout,
    pub collectibles: CollectibleLayout,
    pub gate: GateLayout,
    pub catalog: Vec<CatalogEntry>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            map_length: 6600.0,
            viewport_width: 1000.0,
            viewport_height: 500.0,
            speed: 4.0,
            player_start_x: 400.0,
            pursuer_threshold: 10.0,
            lane_heights: vec![350.0, 250.0, 200.0],
            obstacles: ObstacleLayout::default(),
            collectibles: CollectibleLayout::default(),
            gate: GateLayout::default(),
            catalog: default_catalog(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Scroll speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("Viewport must have positive size, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Invalid {0}: sizes must be positive and finite")]
    InvalidSize(&'static str),

    #[error("Finish gate at {map_length} must start ahead of the player at {start_x}")]
    GateBehindPlayer { map_length: f64, start_x: f64 },

    #[error("Pursuer threshold {threshold} must be behind the player start {start_x}")]
    PursuerAhead { threshold: f64, start_x: f64 },

    #[error("At least one lane height is required to place collectibles")]
    NoLanes,

    #[error("Duplicate catalog id: {0}")]
    DuplicateItem(String),

    #[error("Obstacle spacing {spacing} is smaller than jitter plus width ({span})")]
    OverlappingObstacles { spacing: f64, span: f64 },

    #[error("Failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse level file: {0}")]
    Parse(#[from] serde_json::Error),
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl LevelConfig {
    /// Parse a JSON level. Omitted fields keep their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject layouts the simulator cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.speed) {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !positive(self.viewport_width) || !positive(self.viewport_height) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !positive(self.obstacles.width) || !positive(self.obstacles.height) {
            return Err(ConfigError::InvalidSize("obstacle"));
        }
        if !positive(self.collectibles.width) || !positive(self.collectibles.height) {
            return Err(ConfigError::InvalidSize("collectible"));
        }
        if !positive(self.gate.width) || !positive(self.gate.height) {
            return Err(ConfigError::InvalidSize("finish gate"));
        }
        if !self.map_length.is_finite() || self.map_length <= self.player_start_x {
            return Err(ConfigError::GateBehindPlayer {
                map_length: self.map_length,
                start_x: self.player_start_x,
            });
        }
        if !self.pursuer_threshold.is_finite() || self.pursuer_threshold >= self.player_start_x {
            return Err(ConfigError::PursuerAhead {
                threshold: self.pursuer_threshold,
                start_x: self.player_start_x,
            });
        }
        if !self.catalog.is_empty() && self.lane_heights.is_empty() {
            return Err(ConfigError::NoLanes);
        }

        let mut seen = HashSet::new();
        for entry in &self.catalog {
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::DuplicateItem(entry.id.clone()));
            }
        }

        let span = self.obstacles.jitter + self.obstacles.width;
        if self.obstacles.count > 1 && self.obstacles.spacing < span {
            return Err(ConfigError::OverlappingObstacles {
                spacing: self.obstacles.spacing,
                span,
            });
        }

        Ok(())
    }

    /// Y coordinate the player's feet rest on when not on an obstacle.
    pub fn ground_line(&self) -> f64 {
        self.viewport_height - GROUND_MARGIN
    }

    /// Top edge shared by every obstacle.
    pub fn obstacle_top(&self) -> f64 {
        self.viewport_height - self.obstacles.elevation
    }

    /// Initial finish gate rectangle.
    pub fn gate_bounds(&self) -> Bounds {
        Bounds::new(
            self.map_length,
            self.viewport_height - self.gate.elevation,
            self.gate.width,
            self.gate.height,
        )
    }

    /// Ticks until the gate's left edge passes the player's starting right edge.
    pub fn ticks_to_gate(&self) -> u64 {
        let gap = self.map_length - (self.player_start_x + PLAYER_WIDTH);
        ((gap / self.speed).floor() as i64 + 1).max(1) as u64
    }
}
