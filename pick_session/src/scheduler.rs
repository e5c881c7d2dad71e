//! Single-threaded cooperative timer queue.
//!
//! Time is virtual: the owner moves the clock forward explicitly by draining
//! [`Scheduler::pop_due`] and then calling [`Scheduler::settle`].  Nothing in
//! here reads the wall clock, so a session driven by a test and a session
//! driven by a 60 fps window loop behave identically.
//!
//! Timers due at the same instant fire in registration order.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

// ════════════════════════════════════════════════════════════════════════════
// TimerHandle
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a registered timer.  Handles are never reused, so a stale handle
/// can be cancelled safely (it is simply not found).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    task:  T,
    every: Option<Duration>,
}

// ════════════════════════════════════════════════════════════════════════════
// Scheduler
// ════════════════════════════════════════════════════════════════════════════

/// Cancellable one-shot and recurring timers carrying a task payload `T`.
#[derive(Debug)]
pub struct Scheduler<T> {
    now:         Duration,
    next_handle: u64,
    /// (due time, handle) — ordered earliest first, then by registration.
    queue:       BTreeSet<(Duration, TimerHandle)>,
    entries:     HashMap<TimerHandle, Entry<T>>,
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler {
            now:         Duration::ZERO,
            next_handle: 1,
            queue:       BTreeSet::new(),
            entries:     HashMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration { self.now }

    /// Number of live registrations.
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Run `task` once, `delay` after now.  A zero delay fires at the next
    /// drain, never during the call that registered it.
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TimerHandle {
        self.insert(self.now + delay, task, None)
    }

    /// Run `task` every `every`, first firing one interval from now.
    pub fn schedule_repeating(&mut self, every: Duration, task: T) -> TimerHandle {
        // A zero period would never let the clock move past `now`.
        let every = every.max(Duration::from_nanos(1));
        self.insert(self.now + every, task, Some(every))
    }

    /// Cancel a registration.  Returns `false` if it had already fired (one-shot)
    /// or been cancelled; cancelling twice is harmless.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.remove(&handle) {
            Some(_) => {
                self.queue.retain(|&(_, h)| h != handle);
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its
    /// due time.  Recurring timers are re-armed before being returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let &(due, handle) = self.queue.first()?;
        if due > until {
            return None;
        }
        self.queue.pop_first();
        self.now = self.now.max(due);

        let entry = self.entries.get(&handle)?;
        let task = entry.task.clone();
        match entry.every {
            Some(every) => { self.queue.insert((due + every, handle)); }
            None        => { self.entries.remove(&handle); }
        }
        Some((handle, task))
    }

    /// Move the clock to `until` once everything due has been drained.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, due: Duration, task: T, every: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.insert(handle, Entry { task, every });
        self.queue.insert((due, handle));
        handle
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    fn drain(s: &mut Scheduler<&'static str>, until: Duration) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some((_, task)) = s.pop_due(until) { fired.push(task); }
        s.settle(until);
        fired
    }

    #[test]
    fn repeating_timer_catches_up() {
        let mut s = Scheduler::new();
        s.schedule_repeating(ms(10), "tick");
        assert_eq!(drain(&mut s, ms(35)).len(), 3);
        assert_eq!(s.now(), ms(35));
        assert_eq!(drain(&mut s, ms(40)).len(), 1);
    }

    #[test]
    fn once_fires_a_single_time() {
        let mut s = Scheduler::new();
        let h = s.schedule_once(ms(5), "once");
        assert_eq!(drain(&mut s, ms(100)), vec!["once"]);
        assert!(!s.is_scheduled(h));
        assert!(drain(&mut s, ms(200)).is_empty());
    }

    #[test]
    fn zero_delay_waits_for_next_drain() {
        let mut s = Scheduler::new();
        s.settle(ms(50));
        s.schedule_once(Duration::ZERO, "deferred");
        assert_eq!(s.len(), 1);
        assert_eq!(drain(&mut s, ms(50)), vec!["deferred"]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let h = s.schedule_repeating(ms(10), "tick");
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(drain(&mut s, ms(100)).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn same_instant_fires_in_registration_order() {
        let mut s = Scheduler::new();
        s.schedule_repeating(ms(20), "first");
        s.schedule_repeating(ms(10), "second");
        // At 20 ms both are due; "second" also fired alone at 10 ms.
        assert_eq!(drain(&mut s, ms(20)), vec!["second", "first", "second"]);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut s: Scheduler<&str> = Scheduler::new();
        s.settle(ms(30));
        s.settle(ms(10));
        assert_eq!(s.now(), ms(30));
    }
}
