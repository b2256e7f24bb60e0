//! Gap Runner entry point
//!
//! Web: canvas shell driven by requestAnimationFrame.
//! Native: headless demo flown by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use gap_runner::audio::AudioManager;
    use gap_runner::persistence::LocalStorageScoreStore;
    use gap_runner::sim::{Command, RunStatus, SimConfig};
    use gap_runner::{Clock, Cue, FrameView, RenderShell, Session, Settings};

    type GameSession = Session<RafClock, CanvasShell, LocalStorageScoreStore>;

    /// Clock backed by requestAnimationFrame
    struct RafClock {
        handle: Option<i32>,
        /// Calls back into the session; set once the session exists
        callback: Option<Closure<dyn FnMut(f64)>>,
    }

    impl RafClock {
        fn new() -> Self {
            Self {
                handle: None,
                callback: None,
            }
        }
    }

    impl Clock for RafClock {
        fn schedule_next(&mut self) {
            let (Some(window), Some(callback)) = (web_sys::window(), self.callback.as_ref()) else {
                return;
            };
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.handle = Some(id),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }

        fn cancel(&mut self) {
            if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Flat-color canvas renderer plus Web Audio cues
    struct CanvasShell {
        ctx: CanvasRenderingContext2d,
        audio: AudioManager,
    }

    impl CanvasShell {
        fn centered_text(&self, text: &str, y: f64, width: f64) {
            let text_w = self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
            let _ = self.ctx.fill_text(text, (width - text_w) / 2.0, y);
        }

        fn draw_overlay(&self, view: &FrameView<'_>, width: f64, height: f64) {
            let ctx = &self.ctx;
            match view.status {
                RunStatus::Idle => {
                    ctx.set_fill_style_str("white");
                    ctx.set_font("bold 28px Arial");
                    self.centered_text("Press Start", height / 2.0, width);
                }
                RunStatus::Paused => {
                    ctx.set_fill_style_str("white");
                    ctx.set_font("bold 32px Arial");
                    self.centered_text("Paused", height / 2.0, width);
                }
                RunStatus::GameOver => {
                    ctx.set_fill_style_str("red");
                    ctx.set_font("bold 32px Arial");
                    self.centered_text("Game Over", height / 2.0, width);

                    ctx.set_fill_style_str("black");
                    ctx.set_font("24px Arial");
                    self.centered_text(
                        &format!("Current Score: {}", view.score),
                        height / 2.0 + 40.0,
                        width,
                    );
                    self.centered_text(
                        &format!("Best Score: {}", view.best_score),
                        height / 2.0 + 80.0,
                        width,
                    );
                    self.centered_text(
                        "Press Space or Arrow Up to Restart",
                        height / 2.0 + 120.0,
                        width,
                    );
                }
                RunStatus::Running => {}
            }
        }
    }

    impl RenderShell for CanvasShell {
        fn render(&mut self, view: &FrameView<'_>) {
            let ctx = &self.ctx;
            let (width, height) = (view.bounds.0 as f64, view.bounds.1 as f64);

            ctx.clear_rect(0.0, 0.0, width, height);
            ctx.set_fill_style_str("#70c5ce");
            ctx.fill_rect(0.0, 0.0, width, height);

            if view.status != RunStatus::GameOver {
                ctx.set_fill_style_str("#3c9a3c");
                for obstacle in view.obstacles {
                    let x = obstacle.x as f64;
                    let w = obstacle.width as f64;
                    ctx.fill_rect(x, 0.0, w, obstacle.top_height as f64);
                    let bottom = obstacle.bottom_height as f64;
                    ctx.fill_rect(x, height - bottom, w, bottom);
                }

                let c = view.character;
                ctx.set_fill_style_str("#f5d742");
                ctx.fill_rect(c.pos.x as f64, c.pos.y as f64, c.size as f64, c.size as f64);

                ctx.set_fill_style_str("white");
                ctx.set_font("24px Arial");
                let _ = ctx.fill_text(&format!("Score: {}", view.score), 10.0, 30.0);
                let best = format!("Best Score: {}", view.best_score);
                let best_w = ctx.measure_text(&best).map(|m| m.width()).unwrap_or(0.0);
                let _ = ctx.fill_text(&best, width - best_w - 10.0, 30.0);
            }

            self.draw_overlay(view, width, height);
        }

        fn play_cue(&mut self, cue: Cue) {
            self.audio.play(cue);
        }
    }

    fn hide_element(id: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn sound_label(enabled: bool) -> &'static str {
        if enabled { "Sound: On" } else { "Sound: Off" }
    }

    fn toggle_sound(session: &mut GameSession) {
        let enabled = session.toggle_sound();
        session.shell_mut().audio.set_muted(!enabled);
        set_text("soundButton", sound_label(enabled));
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Gap Runner starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let config = SimConfig::default();
        canvas.set_width(config.bounds_width as u32);
        canvas.set_height(config.bounds_height as u32);

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.set_volume(settings.volume);
        audio.set_muted(!settings.sound_enabled);
        set_text("soundButton", sound_label(settings.sound_enabled));

        let seed = js_sys::Date::now() as u64;
        let session = match Session::new(
            config,
            seed,
            RafClock::new(),
            CanvasShell { ctx, audio },
            LocalStorageScoreStore,
            settings,
        ) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start game: {}", e);
                return;
            }
        };
        let session: Rc<RefCell<GameSession>> = Rc::new(RefCell::new(session));

        // Clock calls back through a weak handle so the session can drop
        {
            let weak = Rc::downgrade(&session);
            let callback = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                if let Some(session) = weak.upgrade() {
                    session.borrow_mut().on_tick();
                }
            });
            session.borrow_mut().clock_mut().callback = Some(callback);
        }

        session.borrow_mut().redraw();

        setup_keyboard(session.clone());
        setup_canvas_click(&canvas, session.clone());
        setup_buttons(session.clone());
        setup_auto_pause(session);

        log::info!("Gap Runner ready (seed {})", seed);
    }

    fn setup_keyboard(session: Rc<RefCell<GameSession>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut s = session.borrow_mut();
            match event.code().as_str() {
                "Space" | "ArrowUp" => {
                    event.prevent_default();
                    s.shell().audio.resume();
                    s.handle(Command::Jump);
                }
                "Enter" => {
                    hide_element("start-screen");
                    s.handle(Command::Start);
                }
                "KeyP" | "Escape" => s.handle(Command::PauseToggle),
                "KeyM" => toggle_sound(&mut s),
                "KeyI" => {
                    let enabled = !s.autopilot();
                    s.set_autopilot(enabled);
                    if enabled && s.status() != RunStatus::Running {
                        hide_element("start-screen");
                        s.handle(Command::Start);
                    }
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_canvas_click(canvas: &HtmlCanvasElement, session: Rc<RefCell<GameSession>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut s = session.borrow_mut();
            s.shell().audio.resume();
            s.handle(Command::Jump);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(session: Rc<RefCell<GameSession>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("startButton") {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                hide_element("start-screen");
                let mut s = session.borrow_mut();
                s.shell().audio.resume();
                s.handle(Command::Start);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pauseButton") {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                session.borrow_mut().handle(Command::PauseToggle);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("soundButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_sound(&mut session.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn pause_if_running(session: &Rc<RefCell<GameSession>>, reason: &str) {
        let mut s = session.borrow_mut();
        if s.settings().pause_on_blur && s.status() == RunStatus::Running {
            s.handle(Command::PauseToggle);
            log::info!("Auto-paused ({})", reason);
        }
    }

    fn setup_auto_pause(session: Rc<RefCell<GameSession>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let session = session.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause_if_running(&session, "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                pause_if_running(&session, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use gap_runner::persistence::FileScoreStore;
    use gap_runner::sim::{Command, RunStatus, SimConfig};
    use gap_runner::{Cue, FrameView, ManualClock, RenderShell, Session, Settings};

    /// Autopilot ticks before the demo lets the character drop
    const DEMO_TICKS: usize = 3_000;
    /// Safety cap for the final fall
    const MAX_FALL_TICKS: usize = 10_000;

    /// Renderer that logs instead of drawing
    #[derive(Default)]
    struct LogShell {
        frames: u64,
    }

    impl RenderShell for LogShell {
        fn render(&mut self, view: &FrameView<'_>) {
            self.frames += 1;
            if view.status == RunStatus::GameOver {
                log::info!(
                    "GAME OVER - score {} (best {})",
                    view.score,
                    view.best_score
                );
            } else if self.frames % 300 == 0 {
                log::debug!(
                    "frame {}: y={:.1} v={:.2} obstacles={} score={}",
                    self.frames,
                    view.character.pos.y,
                    view.character.velocity,
                    view.obstacles.len(),
                    view.score
                );
            }
        }

        fn play_cue(&mut self, cue: Cue) {
            log::trace!("cue {:?}", cue);
        }
    }

    fn load_config() -> SimConfig {
        let Ok(path) = std::env::var("GAP_RUNNER_CONFIG") else {
            return SimConfig::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| SimConfig::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("Ignoring config {}: {}", path, e);
                SimConfig::default()
            }
        }
    }

    fn seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        let config = load_config();
        let score_file = std::env::var("GAP_RUNNER_SCORE_FILE")
            .unwrap_or_else(|_| "gap_runner_best.json".to_string());
        let seed = seed();

        let mut session = match Session::new(
            config,
            seed,
            ManualClock::new(),
            LogShell::default(),
            FileScoreStore::new(score_file),
            Settings::load(),
        ) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start demo: {}", e);
                return;
            }
        };

        session.set_autopilot(true);
        session.handle(Command::Start);

        let mut ticks = 0;
        while ticks < DEMO_TICKS && session.clock_mut().take() {
            session.on_tick();
            ticks += 1;
        }
        let flown = session.state().score;
        log::info!("Autopilot passed {} obstacles in {} ticks", flown, ticks);

        // Hands off: let it fall so the run ends and the best score is stored
        session.set_autopilot(false);
        let mut fall = 0;
        while fall < MAX_FALL_TICKS && session.clock_mut().take() {
            session.on_tick();
            fall += 1;
        }

        let state = session.state();
        println!(
            "Demo finished after {} ticks: score {}, best {} (seed {})",
            ticks + fall,
            state.score,
            state.best_score,
            seed
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gap Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    native::run();
}
