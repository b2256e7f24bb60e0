//! Collision detection and scoring
//!
//! Two independent passes over every active obstacle: an axis-aligned
//! overlap test against the columns above and below the gap, and a
//! passed-obstacle test that awards each obstacle's point at most once.

use super::config::SimConfig;
use super::state::{Character, Obstacle};

/// Outcome of evaluating one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// At least one obstacle overlaps the character
    pub collided: bool,
    /// Obstacles passed this tick
    pub score_delta: u64,
    /// Input obstacles with newly passed ones marked
    pub obstacles: Vec<Obstacle>,
}

/// Check whether the character's box overlaps an obstacle's columns
///
/// A character entirely within the gap band never overlaps.
pub fn overlaps(character: &Character, obstacle: &Obstacle, bounds_height: f32) -> bool {
    let horizontal = character.left() < obstacle.right() && character.right() > obstacle.x;
    let above_gap = character.top() < obstacle.top_height;
    let below_gap = character.bottom() > obstacle.gap_bottom(bounds_height);
    horizontal && (above_gap || below_gap)
}

/// Character has fully cleared the obstacle's trailing edge
fn cleared(character: &Character, obstacle: &Obstacle) -> bool {
    character.left() > obstacle.right()
}

/// Run the collision and scoring passes
pub fn evaluate(character: &Character, mut obstacles: Vec<Obstacle>, config: &SimConfig) -> Evaluation {
    // Count every overlap; no early exit
    let hits = obstacles
        .iter()
        .filter(|o| overlaps(character, o, config.bounds_height))
        .count();

    let mut score_delta = 0;
    for obstacle in &mut obstacles {
        if !obstacle.passed && cleared(character, obstacle) {
            obstacle.passed = true;
            score_delta += 1;
        }
    }

    Evaluation {
        collided: hits > 0,
        score_delta,
        obstacles,
    }
}
