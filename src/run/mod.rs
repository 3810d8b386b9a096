//! Requisite Run: the side-scrolling runner simulation.
//!
//! The player stays near a fixed column while obstacles, requisites, and the
//! finish gate scroll toward them. Jumping clears obstacles (or lands on
//! them), a quick second press gives a double jump, and being shoved back to
//! the left edge by an obstacle hands the run to the pursuer.

pub mod catalog;
pub mod config;
pub mod layout;
pub mod logic;
pub mod types;

pub use catalog::CatalogEntry;
pub use config::{ConfigError, LevelConfig};
pub use logic::*;
pub use types::*;
