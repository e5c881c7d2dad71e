//! Output side of the session: fire-and-forget render directives.
//!
//! The session never reads anything back from a presenter.

use crate::contact::{ContactId, Position};

/// Everything needed to draw one progress ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingFrame {
    pub id:          ContactId,
    pub position:    Position,
    /// 0.0–100.0
    pub progress:    f32,
    /// Index into the presenter's palette.
    pub color_index: usize,
}

/// Receives render directives from the session and its contacts.
pub trait Presenter {
    /// Draw or redraw the ring for `frame.id`.
    fn draw(&mut self, frame: RingFrame);
    /// Erase a previously drawn ring.
    fn clear(&mut self, id: ContactId);
}

// ── null backend (headless) ───────────────────────────────────────────────

/// Discards every directive.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn draw(&mut self, _frame: RingFrame) {}
    fn clear(&mut self, _id: ContactId)   {}
}

// ── recording backend (tests, replays) ────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Directive {
    Draw(RingFrame),
    Clear(ContactId),
}

/// Keeps every directive in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    pub directives: Vec<Directive>,
}

impl RecordingPresenter {
    /// Most recent frame drawn for `id`, if any.
    pub fn last_frame(&self, id: ContactId) -> Option<RingFrame> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::Draw(f) if f.id == id => Some(*f),
            _ => None,
        })
    }

    /// How many times `id` was cleared.
    pub fn clear_count(&self, id: ContactId) -> usize {
        self.directives.iter()
            .filter(|d| matches!(d, Directive::Clear(c) if *c == id))
            .count()
    }
}

impl Presenter for RecordingPresenter {
    fn draw(&mut self, frame: RingFrame) {
        self.directives.push(Directive::Draw(frame));
    }
    fn clear(&mut self, id: ContactId) {
        self.directives.push(Directive::Clear(id));
    }
}
