//! Top-level application state.
//!
//! `AppState` owns the `Session` (rendering into a `RingBoard`) and the
//! winner halo.  It feeds `TouchEvent`s into the session and drives the
//! session clock from real frame time.

use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use pick_session::{Session, SessionConfig, SessionState};
use tracing::info;

use crate::error::AppError;
use crate::rings::{Halo, RingBoard};
use crate::touch::{spawn_touch_source, ScriptTouchSource, SimInput, SimTouchSource, TouchEvent};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub session: SessionConfig,
    /// Replay the built-in demo script alongside the mouse.
    pub demo:    bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    session:    Session<RingBoard>,
    halo:       Option<Halo>,
    last_state: SessionState,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self, AppError> {
        let session = Session::new(cfg.session.clone(), RingBoard::default())?;
        Ok(AppState {
            session,
            halo:       None,
            last_state: SessionState::Empty,
            status:     describe(SessionState::Empty, 0, None),
        })
    }

    // ── process one TouchEvent ───────────────────────────────────────────

    pub fn handle_touch(&mut self, event: TouchEvent) {
        match event {
            TouchEvent::Start { id, position } => self.session.on_contact_start(id, position),
            TouchEvent::Move  { id, position } => self.session.on_contact_move(id, position),
            TouchEvent::End   { id }           => self.session.on_contact_end(id),
            TouchEvent::Quit => { /* handled in run loop */ }
        }
        self.refresh_status();
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Advance the session clock by the real time since the last frame.
    pub fn tick(&mut self, elapsed: Duration) {
        self.session.tick(elapsed);

        if let Some(ref mut h) = self.halo {
            h.tick();
            if h.done() { self.halo = None; }
        }

        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let state = self.session.state();
        if state == self.last_state && state != SessionState::Racing {
            return;
        }
        if state == SessionState::Standby && self.last_state == SessionState::Racing {
            if let Some(winner) = self.session.chosen() {
                info!(winner, at = ?self.session.now(), "picked");
                self.halo = Some(Halo::new(winner));
            }
        }
        if state == SessionState::Empty || state == SessionState::Racing {
            self.halo = None;
        }
        self.last_state = state;
        self.status = describe(state, self.session.len(), self.session.chosen());
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn board(&self)   -> &RingBoard         { self.session.presenter() }
    pub fn halo(&self)    -> Option<&Halo>      { self.halo.as_ref() }
    pub fn session(&self) -> &Session<RingBoard> { &self.session }
}

fn describe(state: SessionState, contacts: usize, chosen: Option<u64>) -> String {
    match (state, chosen) {
        (SessionState::Empty, _) =>
            "Everybody put a finger down".to_string(),
        (SessionState::Racing, _) if contacts < 2 =>
            "Waiting for more fingers...".to_string(),
        (SessionState::Racing, _) =>
            format!("{} fingers - hold on!", contacts),
        (SessionState::Standby, Some(id)) =>
            format!("Picked finger #{} - lift it to play again", id),
        (SessionState::StandbyPendingRelease, Some(id)) =>
            format!("Finger #{} released", id),
        (_, None) =>
            "Picked!".to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer,
/// the touch sources (mouse simulation, plus the demo script with `--demo`),
/// and drives the event/render loop at ~60 fps.  Touch events and session
/// timers are handled on this one thread.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Touch channel ─────────────────────────────────────────────────────
    let (touch_tx, touch_rx) = mpsc::channel::<TouchEvent>();
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    spawn_touch_source(SimTouchSource::new(sim_rx), touch_tx.clone());
    if cfg.demo {
        spawn_touch_source(ScriptTouchSource::demo(), touch_tx.clone());
    }
    drop(touch_tx);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg)?;
    let mut last_frame = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → SimInput
        if !vis.poll_input() { break; }

        // 2. Drain touch events
        loop {
            match touch_rx.try_recv() {
                Ok(TouchEvent::Quit)            => return Ok(()),
                Ok(evt)                         => app.handle_touch(evt),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        // 3. Advance timers by real elapsed time
        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;

        // 4. Render
        vis.render(app.board(), app.halo(), &app.status)?;
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
