//! Simulation tuning
//!
//! One immutable value built at session start and read by every component.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning values for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Playfield width (obstacles spawn at this x)
    pub bounds_width: f32,
    /// Playfield height (floor is at this y)
    pub bounds_height: f32,
    /// Fixed horizontal position of the character
    pub character_x: f32,
    /// Vertical position the character starts (and restarts) at
    pub character_start_y: f32,
    /// Side length of the character's square bounding box
    pub character_size: f32,
    pub gravity: f32,
    pub damping: f32,
    pub lift_impulse: f32,
    /// Pixels every obstacle moves left per tick
    pub scroll_speed: f32,
    /// Ticks between obstacle spawns
    pub spawn_interval: u64,
    /// Vertical opening of every obstacle
    pub gap_size: f32,
    pub obstacle_width: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bounds_width: BOUNDS_WIDTH,
            bounds_height: BOUNDS_HEIGHT,
            character_x: CHARACTER_X,
            character_start_y: CHARACTER_START_Y,
            character_size: CHARACTER_SIZE,
            gravity: GRAVITY,
            damping: DAMPING,
            lift_impulse: LIFT_IMPULSE,
            scroll_speed: SCROLL_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            gap_size: GAP_SIZE,
            obstacle_width: OBSTACLE_WIDTH,
        }
    }
}

/// Rejected tuning values
#[derive(Debug)]
pub enum ConfigError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl SimConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a playable field
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if !(self.bounds_width > 0.0) {
            return invalid("bounds_width", "must be positive");
        }
        if !(self.bounds_height > 0.0) {
            return invalid("bounds_height", "must be positive");
        }
        if !(self.character_size > 0.0) || self.character_size > self.bounds_height {
            return invalid("character_size", "must be positive and fit the playfield");
        }
        if !(self.character_start_y >= 0.0)
            || self.character_start_y + self.character_size > self.bounds_height
        {
            return invalid("character_start_y", "character must start inside the playfield");
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid("damping", "must be in (0, 1]");
        }
        if !(self.scroll_speed > 0.0) {
            return invalid("scroll_speed", "must be positive");
        }
        if self.spawn_interval == 0 {
            return invalid("spawn_interval", "must be at least one tick");
        }
        if !(self.obstacle_width > 0.0) {
            return invalid("obstacle_width", "must be positive");
        }
        // Tops reach up to half the height, so a larger gap leaves no bottom segment
        if !(self.gap_size > 0.0) || self.gap_size > self.bounds_height / 2.0 {
            return invalid("gap_size", "must be positive and at most half the height");
        }
        Ok(())
    }

    /// Ticks an obstacle needs to scroll from spawn to fully off-screen
    pub fn crossing_ticks(&self) -> f32 {
        (self.bounds_width + self.obstacle_width) / self.scroll_speed
    }
}
