//! Fixed timestep simulation tick and run-state machine
//!
//! Idle -> Running on start, Running <-> Paused on pause toggle,
//! Running -> GameOver on a ground strike or hit, GameOver -> Running on jump.

use super::collision::evaluate;
use super::physics::{advance, jump};
use super::state::{GameEvent, GameState, RunStatus};

/// Input commands delivered by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start button: fresh run from any status
    Start,
    /// Flap while running, restart after game over
    Jump,
    /// Pause or resume
    PauseToggle,
}

/// Apply an input command immediately
pub fn handle_command(state: &mut GameState, command: Command) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match (command, state.status) {
        (Command::Start, _) => {
            begin_run(state);
            events.push(GameEvent::RunStarted);
        }

        (Command::Jump, RunStatus::Running) => {
            jump(&mut state.character, &state.config);
            events.push(GameEvent::Jumped);
        }
        (Command::Jump, RunStatus::GameOver) => {
            begin_run(state);
            events.push(GameEvent::Jumped);
            events.push(GameEvent::RunStarted);
        }

        (Command::PauseToggle, RunStatus::Running) => {
            state.status = RunStatus::Paused;
            log::info!("Paused at frame {}", state.frame);
            events.push(GameEvent::Paused);
        }
        (Command::PauseToggle, RunStatus::Paused) => {
            state.status = RunStatus::Running;
            log::info!("Resumed at frame {}", state.frame);
            events.push(GameEvent::Resumed);
        }

        // Jump while idle/paused and pause while idle/game over do nothing
        _ => {}
    }

    events
}

fn begin_run(state: &mut GameState) {
    state.reset_run();
    state.status = RunStatus::Running;
    log::info!("Run started (best score {})", state.best_score);
}

/// Advance the game state by one fixed timestep
///
/// Does nothing unless the run is active.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.status != RunStatus::Running {
        return events;
    }

    let config = state.config;

    // Physics
    let step = advance(&state.character, &config);
    state.character = step.character;
    if step.ground_strike {
        events.push(GameEvent::Fell);
    }

    // Obstacles
    let obstacles = std::mem::take(&mut state.obstacles);
    state.obstacles = state.generator.tick(state.frame, obstacles, &config);

    // Collision and scoring
    let obstacles = std::mem::take(&mut state.obstacles);
    let eval = evaluate(&state.character, obstacles, &config);
    state.obstacles = eval.obstacles;
    if eval.collided {
        events.push(GameEvent::Hit);
    }
    if eval.score_delta > 0 {
        state.score += eval.score_delta;
        events.push(GameEvent::Scored { score: state.score });
    }

    state.frame += 1;

    if step.ground_strike || eval.collided {
        events.push(end_run(state));
    }

    events
}

/// Running -> GameOver edge; best score is settled here and only here
fn end_run(state: &mut GameState) -> GameEvent {
    let new_best = state.score > state.best_score;
    state.best_score = state.best_score.max(state.score);
    state.status = RunStatus::GameOver;

    if new_best {
        log::info!("Game over: new best score {}", state.best_score);
    } else {
        log::info!(
            "Game over: score {} (best {}) after {} ticks",
            state.score,
            state.best_score,
            state.frame
        );
    }

    GameEvent::GameOver {
        score: state.score,
        best_score: state.best_score,
        new_best,
    }
}
