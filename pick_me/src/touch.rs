//! Touch input — from the window's mouse/keyboard simulation or a timed script.
//!
//! The public interface is [`TouchEvent`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether events came from the window or the
//! demo script; both only promise a stable id for the life of one touch.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pick_session::{ContactId, Position};
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// TouchEvent
// ════════════════════════════════════════════════════════════════════════════

/// A normalized touch event.
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// A finger touched down.
    Start { id: ContactId, position: Position },
    /// A held finger moved.
    Move  { id: ContactId, position: Position },
    /// A finger lifted.
    End   { id: ContactId },
    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// TouchSource trait — unified interface for window and script
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`TouchEvent`]s over a channel.
pub trait TouchSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<TouchEvent>);
}

/// Run a touch source on its own thread, feeding `tx`.
pub fn spawn_touch_source<S: TouchSource>(source: S, tx: Sender<TouchEvent>) -> JoinHandle<()> {
    thread::spawn(move || Box::new(source).run(tx))
}

// ════════════════════════════════════════════════════════════════════════════
// SimTouchSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the visualizer window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Left button pressed at the cursor.
    MouseDown(Position),
    /// Cursor moved (button state irrelevant).
    MouseMove(Position),
    /// Left button released.
    MouseUp,
    /// Digit key `slot` pressed: pin a finger at `position`, or lift the one
    /// already pinned there.
    TogglePin { slot: u8, position: Position },
    Quit,
}

/// Turns window input into touches.
///
/// The left mouse button is one finger that follows the cursor.  Digit keys
/// pin extra fingers where the cursor is, so one mouse can hold several
/// contacts at once.  Every press gets a fresh id.
#[derive(Debug)]
pub struct SimTranslator {
    next_id: ContactId,
    mouse:   Option<ContactId>,
    pins:    HashMap<u8, ContactId>,
}

impl Default for SimTranslator {
    fn default() -> Self { Self::new(1) }
}

impl SimTranslator {
    pub fn new(first_id: ContactId) -> Self {
        SimTranslator { next_id: first_id, mouse: None, pins: HashMap::new() }
    }

    fn fresh_id(&mut self) -> ContactId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Translate one window input.  `None` means nothing touch-related happened.
    pub fn translate(&mut self, input: SimInput) -> Option<TouchEvent> {
        match input {
            SimInput::MouseDown(position) => {
                if self.mouse.is_some() { return None; }
                let id = self.fresh_id();
                self.mouse = Some(id);
                Some(TouchEvent::Start { id, position })
            }
            SimInput::MouseMove(position) => {
                self.mouse.map(|id| TouchEvent::Move { id, position })
            }
            SimInput::MouseUp => {
                self.mouse.take().map(|id| TouchEvent::End { id })
            }
            SimInput::TogglePin { slot, position } => match self.pins.remove(&slot) {
                Some(id) => Some(TouchEvent::End { id }),
                None => {
                    let id = self.fresh_id();
                    self.pins.insert(slot, id);
                    Some(TouchEvent::Start { id, position })
                }
            },
            SimInput::Quit => Some(TouchEvent::Quit),
        }
    }

    /// Slots that currently hold a pinned finger.
    pub fn pinned_slots(&self) -> Vec<u8> {
        let mut slots: Vec<u8> = self.pins.keys().copied().collect();
        slots.sort_unstable();
        slots
    }
}

/// Touch source driven by [`SimInput`] events (from the visualizer's window).
pub struct SimTouchSource {
    pub rx:         Receiver<SimInput>,
    pub translator: SimTranslator,
}

impl SimTouchSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimTouchSource { rx, translator: SimTranslator::default() }
    }
}

impl TouchSource for SimTouchSource {
    fn run(mut self: Box<Self>, tx: Sender<TouchEvent>) {
        while let Ok(input) = self.rx.recv() {
            let Some(event) = self.translator.translate(input) else { continue };
            let quit = event == TouchEvent::Quit;
            if tx.send(event).is_err() || quit { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptTouchSource — timed replay (`--demo`)
// ════════════════════════════════════════════════════════════════════════════

/// One scripted event, sent `after` the previous one.
#[derive(Clone, Debug)]
pub struct ScriptStep {
    pub after: Duration,
    pub event: TouchEvent,
}

/// Replays a fixed sequence of touches in real time.
#[derive(Clone, Debug, Default)]
pub struct ScriptTouchSource {
    pub steps: Vec<ScriptStep>,
}

/// Script ids carry the top bit; the simulator counts up from 1 and never
/// reaches it.
pub const SCRIPT_ID_BIT: ContactId = 1 << 63;

impl ScriptTouchSource {
    pub fn then(mut self, after_ms: u64, event: TouchEvent) -> Self {
        self.steps.push(ScriptStep { after: Duration::from_millis(after_ms), event });
        self
    }

    /// Three players pick; the winner lifts at the same instant a fourth
    /// player lands, then two players play a second round.  The script
    /// leaves the window open when it runs out.
    pub fn demo() -> Self {
        let [a, b, c, d, e] = [0, 1, 2, 3, 4].map(|i| SCRIPT_ID_BIT | i);
        let start = |id, x, y| TouchEvent::Start { id, position: [x, y] };
        let end   = |id| TouchEvent::End { id };

        ScriptTouchSource::default()
            .then(500, start(a, 220.0, 260.0))
            .then(150, start(b, 450.0, 180.0))
            .then(150, start(c, 680.0, 300.0))
            .then(400, TouchEvent::Move { id: b, position: [460.0, 200.0] })
            // Everyone lets go once the pick is in; only the winner was left.
            .then(2_500, end(a))
            .then(0, end(b))
            .then(0, end(c))
            .then(0, start(d, 450.0, 420.0))
            .then(300, start(e, 250.0, 420.0))
            .then(2_500, end(d))
            .then(0, end(e))
    }
}

impl TouchSource for ScriptTouchSource {
    fn run(self: Box<Self>, tx: Sender<TouchEvent>) {
        for step in self.steps {
            if !step.after.is_zero() {
                thread::sleep(step.after);
            }
            debug!(event = ?step.event, "script");
            if tx.send(step.event).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn mouse_press_drag_release() {
        let mut t = SimTranslator::default();
        assert_eq!(
            t.translate(SimInput::MouseDown([1.0, 2.0])),
            Some(TouchEvent::Start { id: 1, position: [1.0, 2.0] }),
        );
        assert_eq!(
            t.translate(SimInput::MouseMove([3.0, 4.0])),
            Some(TouchEvent::Move { id: 1, position: [3.0, 4.0] }),
        );
        assert_eq!(t.translate(SimInput::MouseUp), Some(TouchEvent::End { id: 1 }));
        assert_eq!(t.translate(SimInput::MouseMove([5.0, 5.0])), None);
    }

    #[test]
    fn each_press_gets_a_fresh_id() {
        let mut t = SimTranslator::default();
        t.translate(SimInput::MouseDown([0.0, 0.0]));
        t.translate(SimInput::MouseUp);
        assert_eq!(
            t.translate(SimInput::MouseDown([0.0, 0.0])),
            Some(TouchEvent::Start { id: 2, position: [0.0, 0.0] }),
        );
    }

    #[test]
    fn repeated_mouse_down_is_ignored() {
        let mut t = SimTranslator::default();
        t.translate(SimInput::MouseDown([0.0, 0.0]));
        assert_eq!(t.translate(SimInput::MouseDown([9.0, 9.0])), None);
    }

    #[test]
    fn pins_toggle() {
        let mut t = SimTranslator::default();
        let down = t.translate(SimInput::TogglePin { slot: 3, position: [7.0, 7.0] });
        assert_eq!(down, Some(TouchEvent::Start { id: 1, position: [7.0, 7.0] }));
        assert_eq!(t.pinned_slots(), vec![3]);
        // Pins are independent of the mouse finger.
        t.translate(SimInput::MouseDown([0.0, 0.0]));
        let up = t.translate(SimInput::TogglePin { slot: 3, position: [0.0, 0.0] });
        assert_eq!(up, Some(TouchEvent::End { id: 1 }));
        assert!(t.pinned_slots().is_empty());
    }

    #[test]
    fn sim_source_forwards_and_stops_on_quit() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        let worker = spawn_touch_source(SimTouchSource::new(sim_rx), tx);

        sim_tx.send(SimInput::MouseMove([0.0, 0.0])).unwrap();
        sim_tx.send(SimInput::MouseDown([1.0, 1.0])).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();
        worker.join().unwrap();

        let events: Vec<TouchEvent> = rx.iter().collect();
        assert_eq!(events, vec![
            TouchEvent::Start { id: 1, position: [1.0, 1.0] },
            TouchEvent::Quit,
        ]);
    }

    #[test]
    fn script_replays_in_order() {
        let script = ScriptTouchSource::default()
            .then(0, TouchEvent::Start { id: 5, position: [0.0, 0.0] })
            .then(1, TouchEvent::End { id: 5 });
        let (tx, rx) = mpsc::channel();
        spawn_touch_source(script, tx).join().unwrap();
        let events: Vec<TouchEvent> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], TouchEvent::End { id: 5 });
    }

    #[test]
    fn demo_never_quits_and_races_a_start() {
        let demo = ScriptTouchSource::demo();
        assert!(demo.steps.iter().all(|s| s.event != TouchEvent::Quit));
        // A start scheduled with no delay right after the releases.
        let race = demo.steps.windows(2).any(|w| {
            matches!(w[0].event, TouchEvent::End { .. })
                && matches!(w[1].event, TouchEvent::Start { .. })
                && w[1].after.is_zero()
        });
        assert!(race);
    }

    fn event_id(event: &TouchEvent) -> Option<ContactId> {
        match *event {
            TouchEvent::Start { id, .. } | TouchEvent::Move { id, .. } | TouchEvent::End { id } => Some(id),
            TouchEvent::Quit => None,
        }
    }

    #[test]
    fn demo_ids_never_meet_mouse_ids() {
        let demo = ScriptTouchSource::demo();
        let script_ids: Vec<ContactId> = demo.steps.iter().filter_map(|s| event_id(&s.event)).collect();
        assert!(script_ids.iter().all(|id| id & SCRIPT_ID_BIT != 0));

        // Even a translator deep into a long session stays below the script range.
        let mut t = SimTranslator::new(5_000);
        for _ in 0..1_000 {
            t.translate(SimInput::MouseDown([0.0, 0.0]));
            t.translate(SimInput::MouseUp);
        }
        let id = match t.translate(SimInput::MouseDown([0.0, 0.0])) {
            Some(TouchEvent::Start { id, .. }) => id,
            other => panic!("expected a start, got {:?}", other),
        };
        assert_eq!(id, 6_000);
        assert!(!script_ids.contains(&id));
        assert_eq!(id & SCRIPT_ID_BIT, 0);
    }
}
