//! Vertical kinematics for the character
//!
//! Linear gravity with per-tick damping. Order matters: gravity is added,
//! then the velocity is damped, then the position moves.

use super::config::SimConfig;
use super::state::Character;

/// Result of integrating one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub character: Character,
    /// The character was clamped to the floor this tick
    pub ground_strike: bool,
}

/// Advance the character by one tick
pub fn advance(character: &Character, config: &SimConfig) -> Advance {
    let mut next = *character;

    next.velocity += config.gravity;
    next.velocity *= config.damping;
    next.pos.y += next.velocity;

    let floor = config.bounds_height - next.size;
    let mut ground_strike = false;
    if next.pos.y + next.size > config.bounds_height {
        next.pos.y = floor;
        next.velocity = 0.0;
        ground_strike = true;
    }

    // Ceiling only stops the climb
    if next.pos.y < 0.0 {
        next.pos.y = 0.0;
        next.velocity = 0.0;
    }

    Advance {
        character: next,
        ground_strike,
    }
}

/// Apply the lift impulse, replacing the current velocity
pub fn jump(character: &mut Character, config: &SimConfig) {
    character.velocity = config.lift_impulse;
}
