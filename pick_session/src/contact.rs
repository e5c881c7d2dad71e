//! One held finger: identity, position and hold progress.
//!
//! A `Contact` owns the handle of its own recurring advance timer.  The
//! session decides *when* a contact is created, clamped or removed; the
//! contact only mutates its own progress and position and emits render
//! directives as it does so.

use std::time::Duration;

use crate::presenter::{Presenter, RingFrame};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::session::Task;

/// Stable per-touch identifier supplied by the input adapter.
pub type ContactId = u64;

/// Screen coordinate of a touch, in pixels.
pub type Position = [f32; 2];

#[derive(Debug)]
pub struct Contact {
    id:          ContactId,
    position:    Position,
    progress:    f32,
    color_index: usize,
    /// `None` once cancelled.
    advance:     Option<TimerHandle>,
    removed:     bool,
}

impl Contact {
    /// Create a contact and register its recurring advance action.
    pub(crate) fn create(
        id:        ContactId,
        position:  Position,
        seed:      f32,
        every:     Duration,
        scheduler: &mut Scheduler<Task>,
    ) -> Self {
        let advance = scheduler.schedule_repeating(every, Task::Advance(id));
        Contact {
            id,
            position,
            progress: seed,
            color_index: 0,
            advance: Some(advance),
            removed: false,
        }
    }

    pub fn id(&self)          -> ContactId { self.id }
    pub fn position(&self)    -> Position  { self.position }
    pub fn progress(&self)    -> f32       { self.progress }
    pub fn color_index(&self) -> usize     { self.color_index }
    pub fn is_advancing(&self) -> bool     { self.advance.is_some() }
    pub fn is_removed(&self)  -> bool      { self.removed }

    pub fn frame(&self) -> RingFrame {
        RingFrame {
            id:          self.id,
            position:    self.position,
            progress:    self.progress,
            color_index: self.color_index,
        }
    }

    /// One scheduler tick: add `step`, saturating at `full`.
    ///
    /// A full contact keeps its timer so that a later clamp lets it climb
    /// again; at full it simply does nothing.  Returns whether progress moved.
    pub(crate) fn advance(&mut self, step: f32, full: f32, out: &mut dyn Presenter) -> bool {
        if self.removed || self.progress >= full {
            return false;
        }
        self.progress = (self.progress + step).min(full);
        out.draw(self.frame());
        true
    }

    pub(crate) fn move_to(&mut self, position: Position, out: &mut dyn Presenter) {
        if self.removed { return; }
        self.position = position;
        out.draw(self.frame());
    }

    /// Lower progress to at most `cap`.
    pub(crate) fn clamp_progress(&mut self, cap: f32, out: &mut dyn Presenter) {
        if self.removed { return; }
        self.progress = self.progress.min(cap);
        out.draw(self.frame());
    }

    pub(crate) fn set_color_index(&mut self, index: usize, out: &mut dyn Presenter) {
        if self.removed { return; }
        self.color_index = index;
        out.draw(self.frame());
    }

    /// Stop the recurring advance.  Safe to call any number of times.
    pub(crate) fn cancel(&mut self, scheduler: &mut Scheduler<Task>) {
        if let Some(handle) = self.advance.take() {
            scheduler.cancel(handle);
        }
    }

    /// Cancel and erase.  Terminal; repeated calls do nothing.
    pub(crate) fn remove(&mut self, scheduler: &mut Scheduler<Task>, out: &mut dyn Presenter) {
        if self.removed { return; }
        self.cancel(scheduler);
        out.clear(self.id);
        self.removed = true;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{Directive, RecordingPresenter};

    fn make(scheduler: &mut Scheduler<Task>) -> Contact {
        Contact::create(7, [10.0, 20.0], 0.01, Duration::from_millis(10), scheduler)
    }

    #[test]
    fn create_registers_advance_timer() {
        let mut s = Scheduler::new();
        let c = make(&mut s);
        assert!(c.is_advancing());
        assert_eq!(s.len(), 1);
        assert_eq!(c.progress(), 0.01);
    }

    #[test]
    fn advance_saturates_at_full() {
        let mut s = Scheduler::new();
        let mut out = RecordingPresenter::default();
        let mut c = make(&mut s);
        for _ in 0..150 { c.advance(1.0, 100.0, &mut out); }
        assert_eq!(c.progress(), 100.0);
        let draws = out.directives.len();
        assert!(!c.advance(1.0, 100.0, &mut out));
        assert_eq!(out.directives.len(), draws, "no side effect once full");
    }

    #[test]
    fn move_keeps_progress() {
        let mut s = Scheduler::new();
        let mut out = RecordingPresenter::default();
        let mut c = make(&mut s);
        c.advance(1.0, 100.0, &mut out);
        let before = c.progress();
        c.move_to([5.0, 5.0], &mut out);
        assert_eq!(c.position(), [5.0, 5.0]);
        assert_eq!(c.progress(), before);
        assert_eq!(out.last_frame(7).map(|f| f.position), Some([5.0, 5.0]));
    }

    #[test]
    fn clamp_only_lowers() {
        let mut s = Scheduler::new();
        let mut out = RecordingPresenter::default();
        let mut c = make(&mut s);
        c.clamp_progress(70.0, &mut out);
        assert_eq!(c.progress(), 0.01);
        for _ in 0..100 { c.advance(1.0, 100.0, &mut out); }
        c.clamp_progress(70.0, &mut out);
        assert_eq!(c.progress(), 70.0);
    }

    #[test]
    fn cancel_twice_is_harmless() {
        let mut s = Scheduler::new();
        let mut c = make(&mut s);
        c.cancel(&mut s);
        c.cancel(&mut s);
        assert!(!c.is_advancing());
        assert!(s.is_empty());
    }

    #[test]
    fn remove_twice_clears_once() {
        let mut s = Scheduler::new();
        let mut out = RecordingPresenter::default();
        let mut c = make(&mut s);
        c.remove(&mut s, &mut out);
        c.remove(&mut s, &mut out);
        assert!(c.is_removed());
        assert_eq!(out.clear_count(7), 1);
        assert_eq!(out.directives, vec![Directive::Clear(7)]);
        assert!(s.is_empty());
    }

    #[test]
    fn removed_contact_is_frozen() {
        let mut s = Scheduler::new();
        let mut out = RecordingPresenter::default();
        let mut c = make(&mut s);
        c.remove(&mut s, &mut out);
        assert!(!c.advance(1.0, 100.0, &mut out));
        c.move_to([1.0, 1.0], &mut out);
        assert_eq!(c.progress(), 0.01);
        assert_eq!(c.position(), [10.0, 20.0]);
    }
}
