//! Gap Runner - A single-screen gravity arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, run state)
//! - `session`: Drives the simulation from a clock and input commands
//! - `platform`: Clock and render/input shell abstraction
//! - `persistence`: Best score storage
//! - `settings`: Player preferences (sound toggle, volume)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use persistence::{PersistError, ScoreStore};
pub use platform::{Clock, Cue, FrameView, ManualClock, RenderShell};
pub use session::Session;
pub use settings::Settings;
pub use sim::{ConfigError, SimConfig};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const BOUNDS_WIDTH: f32 = 400.0;
    pub const BOUNDS_HEIGHT: f32 = 600.0;

    /// Character defaults - fixed column, starts a quarter of the way down
    pub const CHARACTER_X: f32 = 50.0;
    pub const CHARACTER_START_Y: f32 = 150.0;
    pub const CHARACTER_SIZE: f32 = 30.0;

    /// Downward acceleration added every tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.15;
    /// Velocity multiplier applied after gravity, every tick
    pub const DAMPING: f32 = 0.95;
    /// Velocity set (not added) by a jump; negative is up
    pub const LIFT_IMPULSE: f32 = -5.0;

    /// Obstacle defaults
    pub const SCROLL_SPEED: f32 = 2.0;
    pub const SPAWN_INTERVAL: u64 = 150;
    pub const GAP_SIZE: f32 = 150.0;
    pub const OBSTACLE_WIDTH: f32 = 30.0;
}
