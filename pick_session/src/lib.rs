//! # pick_session
//!
//! The touch-session state machine behind a multi-touch random picker.
//!
//! Everybody presses and holds a finger on the surface.  Each held contact
//! fills a progress ring; once at least two contacts are held and every ring
//! is full, one contact is drawn uniformly at random as the winner and the
//! others are dropped.  The winner stays on screen ("standby") until it lifts.
//!
//! ## Events → actions
//!
//! | Event | State | Action |
//! |---|---|---|
//! | start | pending winner removal | flush it, then register the newcomer |
//! | start | any | clamp everyone to 70, register, recolour (newest = colour 0) |
//! | move  | known id | update position |
//! | end   | standby, winner | queue one deferred removal |
//! | end   | otherwise | remove immediately, recolour |
//! | evaluate (every 200 ms) | ≥ 2 contacts, all full | pick a winner, drop the rest, recolour |
//! | advance (every 10 ms, per contact) | not full | progress + 1 |
//!
//! Unknown ids on move/end are stale events and are silently ignored.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use pick_session::{NullPresenter, Session, SessionConfig, SessionState};
//!
//! let cfg = SessionConfig::default().with_rng_seed(7);
//! let mut session = Session::new(cfg, NullPresenter).unwrap();
//!
//! session.on_contact_start(1, [100.0, 100.0]);
//! session.on_contact_start(2, [300.0, 100.0]);
//! session.tick(Duration::from_millis(1200));
//!
//! assert_eq!(session.state(), SessionState::Standby);
//! let winner = session.chosen().unwrap();
//! assert_eq!(session.contact_ids(), vec![winner]);
//! ```
//!
//! Time is virtual: the owner calls [`Session::tick`] with the elapsed time,
//! so the same session runs under a test or under a window's frame loop.

pub mod config;
pub mod contact;
pub mod palette;
pub mod presenter;
pub mod scheduler;
pub mod selector;
pub mod session;

pub use config::{ConfigError, SessionConfig};
pub use contact::{Contact, ContactId, Position};
pub use presenter::{Directive, NullPresenter, Presenter, RecordingPresenter, RingFrame};
pub use session::{Session, SessionState};
