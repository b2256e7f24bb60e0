//! Idle/demo mode pilot
//!
//! Keeps the character hovering just above the lower edge of the next gap.
//! A jump rises roughly 40px, well under the 120px of slack a default gap
//! leaves around the character.

use super::state::{GameState, RunStatus};

/// Distance above the lower gap edge at which the pilot flaps
const FLAP_MARGIN: f32 = 15.0;

/// y the character's bottom edge should stay above
pub fn target_floor(state: &GameState) -> f32 {
    let height = state.config.bounds_height;
    match state.next_obstacle() {
        Some(obstacle) => obstacle.gap_bottom(height) - FLAP_MARGIN,
        None => height / 2.0 + state.character.size,
    }
}

/// Whether the pilot would jump before the next tick
pub fn wants_jump(state: &GameState) -> bool {
    state.status == RunStatus::Running && state.character.bottom() > target_floor(state)
}
