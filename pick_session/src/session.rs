//! The touch-session state machine.
//!
//! `Session` owns the active contacts (in insertion order), the periodic
//! completion check, and the standby / deferred-removal protocol.
//!
//! ```text
//!            start                      all full, ≥ 2
//!   Empty ─────────▶ Racing ───────────────────────────▶ Standby
//!     ▲                 ▲                                 │    │
//!     │                 │ start (winner still held:       │    │ winner ends
//!     │                 │        rejoins the race)        │    ▼
//!     │                 └─────────────────────────────────┘  StandbyPendingRelease
//!     │                                                          │
//!     └──────── deferred removal fires, or a start flushes it ───┘
//! ```
//!
//! A winner's release never removes it inline.  Instead a single deferred
//! removal is queued for the next scheduling opportunity; if a new contact
//! starts first, the start flushes that removal synchronously, so the old
//! round always finishes before the new one begins.

use std::collections::HashMap;
use std::mem;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SessionConfig};
use crate::contact::{Contact, ContactId, Position};
use crate::palette::color_order;
use crate::presenter::Presenter;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::selector;

// ════════════════════════════════════════════════════════════════════════════
// Public state view
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No contacts.
    Empty,
    /// At least one contact, no winner yet.
    Racing,
    /// Winner chosen and still held.
    Standby,
    /// Winner released; its removal is queued.
    StandbyPendingRelease,
}

// ════════════════════════════════════════════════════════════════════════════
// Scheduled tasks
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    Advance(ContactId),
    Evaluate,
    RemoveWinner,
}

#[derive(Debug)]
enum Phase {
    Open,
    Standby {
        chosen:  ContactId,
        /// Deferred removal of `chosen`, present once the winner has released.
        pending: Option<TimerHandle>,
    },
}

// ════════════════════════════════════════════════════════════════════════════
// Roster — insertion-ordered contacts with an id index
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Roster {
    contacts: Vec<Contact>,
    index:    HashMap<ContactId, usize>,
}

impl Roster {
    fn len(&self) -> usize { self.contacts.len() }

    fn contains(&self, id: ContactId) -> bool { self.index.contains_key(&id) }

    fn get(&self, id: ContactId) -> Option<&Contact> {
        self.index.get(&id).map(|&i| &self.contacts[i])
    }

    fn get_mut(&mut self, id: ContactId) -> Option<&mut Contact> {
        let i = *self.index.get(&id)?;
        self.contacts.get_mut(i)
    }

    fn push(&mut self, contact: Contact) {
        self.index.insert(contact.id(), self.contacts.len());
        self.contacts.push(contact);
    }

    /// Remove without disturbing the relative order of the others.
    fn take(&mut self, id: ContactId) -> Option<Contact> {
        let i = self.index.remove(&id)?;
        let contact = self.contacts.remove(i);
        for (j, c) in self.contacts.iter().enumerate().skip(i) {
            self.index.insert(c.id(), j);
        }
        Some(contact)
    }

    fn ids(&self) -> Vec<ContactId> {
        self.contacts.iter().map(Contact::id).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session<P: Presenter> {
    config:    SessionConfig,
    roster:    Roster,
    phase:     Phase,
    scheduler: Scheduler<Task>,
    rng:       ChaCha8Rng,
    presenter: P,
}

impl<P: Presenter> Session<P> {
    /// Create an empty session and register the periodic completion check.
    pub fn new(config: SessionConfig, presenter: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None       => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(config.evaluate_interval, Task::Evaluate);

        Ok(Session {
            config,
            roster: Roster::default(),
            phase: Phase::Open,
            scheduler,
            rng,
            presenter,
        })
    }

    // ── input operations ─────────────────────────────────────────────────

    /// A new finger touched down.
    pub fn on_contact_start(&mut self, id: ContactId, position: Position) {
        // 1. Finish the previous round first.
        match self.phase {
            Phase::Standby { pending: Some(_), .. } => {
                debug!(id, "start flushes pending winner removal");
                self.finish_standby();
            }
            Phase::Standby { chosen, pending: None } => {
                debug!(id, winner = chosen, "start while winner held; winner rejoins");
                self.phase = Phase::Open;
            }
            Phase::Open => {}
        }

        if self.roster.contains(id) {
            warn!(id, "start for an id that is already active; replacing it");
            self.remove_contact(id);
        }

        // 2. Nobody keeps a head start over the newcomer.
        let cap = self.config.rejoin_cap;
        for contact in self.roster.contacts.iter_mut() {
            contact.clamp_progress(cap, &mut self.presenter);
        }

        // 3. Register.
        let contact = Contact::create(
            id,
            position,
            self.config.seed_progress,
            self.config.advance_interval,
            &mut self.scheduler,
        );
        self.roster.push(contact);
        debug!(id, ?position, contacts = self.roster.len(), "contact start");

        // 4. Spread colours across everyone.
        self.recolor();
    }

    /// A finger moved.  Unknown ids are stale and ignored.
    pub fn on_contact_move(&mut self, id: ContactId, position: Position) {
        match self.roster.get_mut(id) {
            Some(contact) => contact.move_to(position, &mut self.presenter),
            None => debug!(id, "move for unknown contact ignored"),
        }
    }

    /// A finger lifted.
    pub fn on_contact_end(&mut self, id: ContactId) {
        if let Phase::Standby { chosen, pending } = &mut self.phase {
            if *chosen == id {
                if let Some(old) = pending.take() {
                    self.scheduler.cancel(old);
                }
                *pending = Some(self.scheduler.schedule_once(Duration::ZERO, Task::RemoveWinner));
                info!(winner = id, "winner released");
                return;
            }
        }

        if self.remove_contact(id) {
            self.recolor();
        } else {
            debug!(id, "end for unknown contact ignored");
        }
    }

    // ── timer-driven operations ──────────────────────────────────────────

    /// Completion check: resolve the round if two or more contacts are all
    /// full.  Otherwise nothing changes.
    pub fn evaluate(&mut self) {
        if !matches!(self.phase, Phase::Open) || self.roster.len() < 2 {
            return;
        }
        let full = self.config.full_progress;
        if !self.roster.contacts.iter().all(|c| c.progress() >= full) {
            return;
        }

        let ids = self.roster.ids();
        let Some(chosen) = selector::pick(&mut self.rng, &ids) else { return };

        for &id in ids.iter().filter(|&&id| id != chosen) {
            self.remove_contact(id);
        }
        self.recolor();
        self.phase = Phase::Standby { chosen, pending: None };
        info!(winner = chosen, candidates = ids.len(), "round resolved");
    }

    /// Advance the session clock by `elapsed`, firing every timer that falls
    /// due, in time order.
    pub fn tick(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some((handle, task)) = self.scheduler.pop_due(until) {
            self.dispatch(handle, task);
        }
        self.scheduler.settle(until);
    }

    /// Fire whatever is due right now (e.g. a just-queued winner removal)
    /// without moving the clock.
    pub fn run_pending(&mut self) {
        self.tick(Duration::ZERO);
    }

    fn dispatch(&mut self, handle: TimerHandle, task: Task) {
        match task {
            Task::Advance(id) => {
                let (step, full) = (self.config.progress_step, self.config.full_progress);
                if let Some(contact) = self.roster.get_mut(id) {
                    contact.advance(step, full, &mut self.presenter);
                }
            }
            Task::Evaluate => self.evaluate(),
            Task::RemoveWinner => {
                // Only the currently installed token may finish the round.
                if matches!(self.phase, Phase::Standby { pending: Some(h), .. } if h == handle) {
                    debug!("deferred winner removal fired");
                    self.finish_standby();
                }
            }
        }
    }

    // ── internals ────────────────────────────────────────────────────────

    /// Leave standby: cancel any queued removal and remove the winner.
    fn finish_standby(&mut self) {
        if let Phase::Standby { chosen, pending } = mem::replace(&mut self.phase, Phase::Open) {
            if let Some(handle) = pending {
                self.scheduler.cancel(handle);
            }
            self.remove_contact(chosen);
            self.recolor();
        }
    }

    /// Returns `false` if `id` was not active.
    fn remove_contact(&mut self, id: ContactId) -> bool {
        match self.roster.take(id) {
            Some(mut contact) => {
                contact.remove(&mut self.scheduler, &mut self.presenter);
                debug!(id, contacts = self.roster.len(), "contact removed");
                true
            }
            None => false,
        }
    }

    /// Newest contact gets palette index 0; the rest spread evenly.  Runs
    /// after every membership change.
    fn recolor(&mut self) {
        let order = color_order(self.roster.len(), self.config.palette_len);
        for (contact, index) in self.roster.contacts.iter_mut().rev().zip(order) {
            contact.set_color_index(index, &mut self.presenter);
        }
    }

    // ── introspection ────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Standby { pending: Some(_), .. } => SessionState::StandbyPendingRelease,
            Phase::Standby { pending: None, .. }    => SessionState::Standby,
            Phase::Open if self.roster.len() == 0   => SessionState::Empty,
            Phase::Open                             => SessionState::Racing,
        }
    }

    pub fn is_standby(&self) -> bool { matches!(self.phase, Phase::Standby { .. }) }

    /// The winner, while in standby.
    pub fn chosen(&self) -> Option<ContactId> {
        match self.phase {
            Phase::Standby { chosen, .. } => Some(chosen),
            Phase::Open => None,
        }
    }

    pub fn has_pending_removal(&self) -> bool {
        matches!(self.phase, Phase::Standby { pending: Some(_), .. })
    }

    /// Active contact ids in insertion order.
    pub fn contact_ids(&self) -> Vec<ContactId> { self.roster.ids() }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> { self.roster.get(id) }

    pub fn len(&self) -> usize { self.roster.len() }

    pub fn is_empty(&self) -> bool { self.roster.len() == 0 }

    /// Session clock.
    pub fn now(&self) -> Duration { self.scheduler.now() }

    pub fn presenter(&self) -> &P { &self.presenter }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
