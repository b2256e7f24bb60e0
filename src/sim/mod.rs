//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod config;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Evaluation, evaluate, overlaps};
pub use config::{ConfigError, SimConfig};
pub use obstacles::ObstacleGenerator;
pub use physics::{Advance, advance, jump};
pub use state::{Character, GameEvent, GameState, Obstacle, RunStatus};
pub use tick::{Command, handle_command, tick};
