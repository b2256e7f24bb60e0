//! Platform abstraction layer
//!
//! The simulation talks to the outside world through these seams:
//! - `Clock`: self-resubmitting tick schedule (display refresh on web)
//! - `RenderShell`: drawing and sound cues
//!
//! `ManualClock` drives ticks synchronously for tests and headless runs.

use crate::sim::{Character, Obstacle, RunStatus};

/// Sound cues the shell can play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Hit,
    Fall,
}

/// Read-only snapshot handed to the renderer each frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub character: &'a Character,
    pub obstacles: &'a [Obstacle],
    pub score: u64,
    pub best_score: u64,
    pub status: RunStatus,
    pub bounds: (f32, f32),
}

/// Draws frames and plays cues; must never block the tick
pub trait RenderShell {
    fn render(&mut self, view: &FrameView<'_>);
    fn play_cue(&mut self, cue: Cue);
}

/// One-shot tick scheduler
///
/// At most one tick may be pending. `schedule_next` requests exactly one
/// future call to the session's tick entry point; `cancel` drops a pending one.
pub trait Clock {
    fn schedule_next(&mut self);
    fn cancel(&mut self);
}

/// Clock that only records requests; the owner fires ticks by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    pending: bool,
    /// Total ticks requested
    pub scheduled: u64,
    /// Total pending ticks dropped by `cancel`
    pub cancelled: u64,
    /// Requests made while a tick was already pending (two tick streams)
    pub overlaps: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending tick, returning whether there was one
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }
}

impl Clock for ManualClock {
    fn schedule_next(&mut self) {
        if self.pending {
            self.overlaps += 1;
        }
        self.pending = true;
        self.scheduled += 1;
    }

    fn cancel(&mut self) {
        if self.pending {
            self.cancelled += 1;
        }
        self.pending = false;
    }
}
