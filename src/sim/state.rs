//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::obstacles::ObstacleGenerator;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunStatus {
    /// Waiting for the first start command
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Gameplay frozen, state kept as-is
    Paused,
    /// Run ended, waiting for a restart
    GameOver,
}

/// Something the shell may want to react to (sound cue, HUD, storage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh run began (start or restart)
    RunStarted,
    /// Lift impulse applied (also emitted for the jump that restarts a run)
    Jumped,
    /// Character touched an obstacle outside its gap
    Hit,
    /// Character reached the floor
    Fell,
    /// An obstacle was passed
    Scored { score: u64 },
    /// Running -> Paused
    Paused,
    /// Paused -> Running
    Resumed,
    /// Running -> GameOver; emitted once per run
    GameOver {
        score: u64,
        best_score: u64,
        new_best: bool,
    },
}

/// The player-controlled square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner; x never changes during a run
    pub pos: Vec2,
    /// Side length of the bounding box
    pub size: f32,
    /// Vertical velocity (pixels/tick, positive is down)
    pub velocity: f32,
}

impl Character {
    /// Character at its start position, at rest
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pos: Vec2::new(config.character_x, config.character_start_y),
            size: config.character_size,
            velocity: 0.0,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }
}

/// A scrolling pair of columns with a gap between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Height of the upper column, measured from the ceiling
    pub top_height: f32,
    /// Height of the lower column, measured from the floor
    pub bottom_height: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Obstacle {
    /// Build an obstacle whose gap starts `top_height` below the ceiling
    pub fn new(id: u32, x: f32, top_height: f32, config: &SimConfig) -> Self {
        Self {
            id,
            x,
            width: config.obstacle_width,
            top_height,
            bottom_height: config.bounds_height - top_height - config.gap_size,
            passed: false,
        }
    }

    /// Trailing (right) edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// y where the lower column begins
    pub fn gap_bottom(&self, bounds_height: f32) -> f32 {
        bounds_height - self.bottom_height
    }

    /// Fully scrolled past the left edge of the playfield
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning, fixed for the lifetime of the session
    pub config: SimConfig,
    pub character: Character,
    /// Active obstacles in spawn order (x decreasing with age)
    pub obstacles: Vec<Obstacle>,
    /// Ticks since the last reset
    pub frame: u64,
    pub score: u64,
    /// Highest score seen, never decreases
    pub best_score: u64,
    pub status: RunStatus,
    pub generator: ObstacleGenerator,
}

impl GameState {
    /// Create an idle session; `best_score` comes from storage
    ///
    /// `config` must already pass [`SimConfig::validate`].
    pub fn new(config: SimConfig, seed: u64, best_score: u64) -> Self {
        debug_assert!(config.validate().is_ok(), "unvalidated config: {:?}", config);
        Self {
            config,
            character: Character::new(&config),
            obstacles: Vec::new(),
            frame: 0,
            score: 0,
            best_score,
            status: RunStatus::Idle,
            generator: ObstacleGenerator::new(seed),
        }
    }

    /// Replace the run-scoped state wholesale; best score survives
    pub fn reset_run(&mut self) {
        self.character = Character::new(&self.config);
        self.obstacles.clear();
        self.frame = 0;
        self.score = 0;
    }

    /// Nearest obstacle the character has not cleared yet
    pub fn next_obstacle(&self) -> Option<&Obstacle> {
        let left = self.character.left();
        self.obstacles.iter().find(|o| o.right() >= left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_at_start_position() {
        let config = SimConfig::default();
        let state = GameState::new(config, 7, 12);
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.character.pos, Vec2::new(50.0, 150.0));
        assert_eq!(state.character.velocity, 0.0);
        assert_eq!(state.best_score, 12);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_obstacle_segments_fill_height() {
        let config = SimConfig::default();
        let obstacle = Obstacle::new(1, 400.0, 123.5, &config);
        let total = obstacle.top_height + config.gap_size + obstacle.bottom_height;
        assert!((total - config.bounds_height).abs() < 1e-3);
        assert!((obstacle.gap_bottom(config.bounds_height) - 273.5).abs() < 1e-3);
    }

    #[test]
    fn test_reset_run_keeps_best() {
        let mut state = GameState::new(SimConfig::default(), 1, 3);
        state.score = 9;
        state.best_score = 9;
        state.frame = 400;
        state.character.pos.y = 10.0;
        state.character.velocity = 4.0;
        state.obstacles.push(Obstacle::new(1, 100.0, 50.0, &state.config));

        state.reset_run();

        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);
        assert_eq!(state.best_score, 9);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.character, Character::new(&state.config));
    }

    #[test]
    fn test_next_obstacle_skips_cleared() {
        let mut state = GameState::new(SimConfig::default(), 1, 0);
        let config = state.config;
        state.obstacles.push(Obstacle::new(1, 5.0, 50.0, &config)); // right edge 35 < 50
        state.obstacles.push(Obstacle::new(2, 200.0, 80.0, &config));
        assert_eq!(state.next_obstacle().map(|o| o.id), Some(2));
    }
}
