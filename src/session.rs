//! Session driver
//!
//! Owns the game state and the injected collaborators. Input commands and
//! clock ticks come in; frames, cues and best-score writes go out.
//!
//! Tick stream rules:
//! - every (re)start cancels any pending tick before scheduling a new one
//! - a tick reschedules itself while the run is Running or Paused
//! - GameOver renders once and stops the stream until the next restart

use crate::persistence::ScoreStore;
use crate::platform::{Clock, Cue, FrameView, RenderShell};
use crate::settings::Settings;
use crate::sim::autopilot::wants_jump;
use crate::sim::{
    Command, ConfigError, GameEvent, GameState, RunStatus, SimConfig, handle_command, tick,
};

/// A game session wired to its clock, shell and score store
pub struct Session<C: Clock, R: RenderShell, S: ScoreStore> {
    state: GameState,
    clock: C,
    shell: R,
    store: S,
    settings: Settings,
    /// Demo mode: the pilot flaps before each tick
    autopilot: bool,
}

impl<C: Clock, R: RenderShell, S: ScoreStore> Session<C, R, S> {
    /// Create an idle session, reading the best score once
    ///
    /// Fails without touching the store if `config` is not playable.
    pub fn new(
        config: SimConfig,
        seed: u64,
        clock: C,
        shell: R,
        mut store: S,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let best_score = match store.load_best_score() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not load best score, starting from 0: {}", e);
                0
            }
        };
        log::info!("Session ready (seed {}, best score {})", seed, best_score);

        Ok(Self {
            state: GameState::new(config, seed, best_score),
            clock,
            shell,
            store,
            settings,
            autopilot: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn shell(&self) -> &R {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut R {
        &mut self.shell
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Flip and persist the sound toggle
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        self.settings.save();
        enabled
    }

    /// Apply an input command from the shell
    pub fn handle(&mut self, command: Command) {
        let events = handle_command(&mut self.state, command);
        if events.is_empty() {
            return;
        }
        self.dispatch(&events);

        if events.contains(&GameEvent::RunStarted) {
            self.clock.cancel();
            self.clock.schedule_next();
        }
        self.redraw();
    }

    /// Clock callback: run one tick, draw it, and ask for the next
    pub fn on_tick(&mut self) {
        if self.autopilot && wants_jump(&self.state) {
            let events = handle_command(&mut self.state, Command::Jump);
            self.dispatch(&events);
        }

        let events = tick(&mut self.state);
        self.dispatch(&events);
        self.redraw();

        match self.state.status {
            RunStatus::Running | RunStatus::Paused => self.clock.schedule_next(),
            RunStatus::Idle | RunStatus::GameOver => {}
        }
    }

    /// Hand the current state to the renderer
    pub fn redraw(&mut self) {
        let state = &self.state;
        let view = FrameView {
            character: &state.character,
            obstacles: &state.obstacles,
            score: state.score,
            best_score: state.best_score,
            status: state.status,
            bounds: (state.config.bounds_width, state.config.bounds_height),
        };
        self.shell.render(&view);
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Jumped => self.cue(Cue::Jump),
                GameEvent::Hit => self.cue(Cue::Hit),
                GameEvent::Fell => self.cue(Cue::Fall),
                GameEvent::GameOver { best_score, .. } => {
                    if let Err(e) = self.store.save_best_score(best_score) {
                        log::warn!("Could not save best score {}: {}", best_score, e);
                    }
                }
                GameEvent::RunStarted
                | GameEvent::Scored { .. }
                | GameEvent::Paused
                | GameEvent::Resumed => {}
            }
        }
    }

    fn cue(&mut self, cue: Cue) {
        if self.settings.sound_enabled {
            self.shell.play_cue(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryScoreStore;
    use crate::platform::ManualClock;

    #[derive(Debug, Default)]
    struct RecordingShell {
        /// (status, score, best score) per rendered frame
        frames: Vec<(RunStatus, u64, u64)>,
        cues: Vec<Cue>,
    }

    impl RenderShell for RecordingShell {
        fn render(&mut self, view: &FrameView<'_>) {
            self.frames.push((view.status, view.score, view.best_score));
        }

        fn play_cue(&mut self, cue: Cue) {
            self.cues.push(cue);
        }
    }

    type TestSession = Session<ManualClock, RecordingShell, MemoryScoreStore>;

    fn session_with(store: MemoryScoreStore) -> TestSession {
        Session::new(
            SimConfig::default(),
            9,
            ManualClock::new(),
            RecordingShell::default(),
            store,
            Settings::default(),
        )
        .unwrap()
    }

    /// Fire pending ticks until the stream stops (or the cap is reached)
    fn drain(session: &mut TestSession, cap: usize) -> usize {
        let mut ticks = 0;
        while ticks < cap && session.clock_mut().take() {
            session.on_tick();
            ticks += 1;
        }
        ticks
    }

    fn game_over_frames(session: &TestSession) -> usize {
        session
            .shell()
            .frames
            .iter()
            .filter(|(status, _, _)| *status == RunStatus::GameOver)
            .count()
    }

    #[test]
    fn test_loads_best_score_once() {
        let session = session_with(MemoryScoreStore::with_best(17));
        assert_eq!(session.state().best_score, 17);
        assert_eq!(session.status(), RunStatus::Idle);
        assert!(!session.clock().is_pending());
    }

    #[test]
    fn test_rejects_unplayable_config() {
        let config = SimConfig {
            spawn_interval: 0,
            ..Default::default()
        };
        let result = Session::new(
            config,
            9,
            ManualClock::new(),
            RecordingShell::default(),
            MemoryScoreStore::with_best(4),
            Settings::default(),
        );
        let Err(err) = result else {
            panic!("zero spawn interval accepted");
        };
        assert!(matches!(err, ConfigError::Invalid { field: "spawn_interval", .. }));
    }

    #[test]
    fn test_failed_load_defaults_to_zero() {
        let store = MemoryScoreStore {
            best_score: Some(50),
            fail_loads: true,
            ..Default::default()
        };
        let session = session_with(store);
        assert_eq!(session.state().best_score, 0);
    }

    #[test]
    fn test_start_schedules_single_stream() {
        let mut session = session_with(MemoryScoreStore::default());
        session.handle(Command::Start);
        assert!(session.clock().is_pending());

        // Start again mid-run: old tick cancelled, still one stream
        drain(&mut session, 5);
        session.handle(Command::Start);
        assert_eq!(session.clock().overlaps, 0);
        assert_eq!(session.clock().cancelled, 1);
        assert_eq!(session.state().frame, 0);
    }

    #[test]
    fn test_game_over_persists_once() {
        let mut session = session_with(MemoryScoreStore::with_best(3));
        session.handle(Command::Start);
        let ticks = drain(&mut session, 10_000);
        assert!(ticks < 10_000);
        assert_eq!(session.status(), RunStatus::GameOver);
        assert!(!session.clock().is_pending());
        assert_eq!(session.store().saves, 1);
        assert_eq!(session.store().best_score, Some(3));
        assert_eq!(game_over_frames(&session), 1);

        // Stray callbacks while GameOver neither simulate nor persist
        let frame = session.state().frame;
        session.on_tick();
        session.on_tick();
        assert_eq!(session.state().frame, frame);
        assert_eq!(session.store().saves, 1);
        assert!(!session.clock().is_pending());
    }

    #[test]
    fn test_crash_plays_cue() {
        let mut session = session_with(MemoryScoreStore::default());
        session.handle(Command::Start);
        drain(&mut session, 10_000);
        let cues = &session.shell().cues;
        assert!(cues.contains(&Cue::Hit) || cues.contains(&Cue::Fall));
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = session_with(MemoryScoreStore::default());
        session.set_autopilot(true);
        session.handle(Command::Start);
        drain(&mut session, 500);
        session.set_autopilot(false);
        assert!(session.state().score >= 1);
        drain(&mut session, 10_000);
        assert_eq!(session.status(), RunStatus::GameOver);
        let best = session.state().best_score;
        assert!(best >= 1);

        session.handle(Command::Jump);
        assert_eq!(session.status(), RunStatus::Running);
        assert_eq!(session.state().score, 0);
        assert!(session.state().obstacles.is_empty());
        assert_eq!(session.state().best_score, best);
        assert!(session.clock().is_pending());
        assert_eq!(session.shell().cues.last(), Some(&Cue::Jump));
        assert_eq!(session.store().saves, 1);
    }

    #[test]
    fn test_pause_keeps_drawing_without_simulating() {
        let mut session = session_with(MemoryScoreStore::default());
        session.handle(Command::Start);
        drain(&mut session, 10);
        session.handle(Command::PauseToggle);
        assert_eq!(session.status(), RunStatus::Paused);

        let frame = session.state().frame;
        let rendered = session.shell().frames.len();
        assert_eq!(drain(&mut session, 30), 30);
        assert_eq!(session.state().frame, frame);
        assert_eq!(session.shell().frames.len(), rendered + 30);

        session.handle(Command::PauseToggle);
        drain(&mut session, 1);
        assert_eq!(session.state().frame, frame + 1);
        assert_eq!(session.clock().overlaps, 0);
    }

    #[test]
    fn test_sound_toggle_silences_cues() {
        let mut session = session_with(MemoryScoreStore::default());
        session.handle(Command::Start);
        session.handle(Command::Jump);
        assert_eq!(session.shell().cues, vec![Cue::Jump]);

        assert!(!session.toggle_sound());
        session.handle(Command::Jump);
        assert_eq!(session.shell().cues, vec![Cue::Jump]);

        assert!(session.toggle_sound());
        session.handle(Command::Jump);
        assert_eq!(session.shell().cues, vec![Cue::Jump, Cue::Jump]);
    }

    #[test]
    fn test_ignored_commands_do_nothing() {
        let mut session = session_with(MemoryScoreStore::default());
        session.handle(Command::Jump);
        session.handle(Command::PauseToggle);
        assert_eq!(session.status(), RunStatus::Idle);
        assert!(session.shell().frames.is_empty());
        assert!(session.shell().cues.is_empty());
        assert!(!session.clock().is_pending());
    }

    #[test]
    fn test_new_best_saved() {
        let mut session = session_with(MemoryScoreStore::default());
        session.set_autopilot(true);
        session.handle(Command::Start);
        drain(&mut session, 700);
        session.set_autopilot(false);
        let score = session.state().score;
        assert!(score >= 2);
        drain(&mut session, 10_000);
        assert_eq!(session.store().best_score, Some(session.state().score.max(score)));
        assert_eq!(session.store().saves, 1);
    }
}
