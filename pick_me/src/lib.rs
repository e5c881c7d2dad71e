//! # pick_me
//!
//! Desktop front end for the multi-touch random picker in `pick_session`.
//!
//! Every held finger draws a ring that fills clockwise.  Once two or more
//! fingers are held and all rings are full, one is picked at random: the
//! others vanish and the winner gets a halo until it lifts.
//!
//! ## Input
//!
//! A desktop has one mouse, so extra fingers are pinned with the keyboard.
//!
//! | Input | Touch |
//! |---|---|
//! | Left button down / drag / up | One finger that follows the cursor |
//! | `1`–`9` | Pin a finger at the cursor, or lift the one pinned on that key |
//! | `Q` / `Escape` | Quit |
//!
//! With `--demo` a scripted round plays alongside the mouse.

pub mod error;
pub mod touch;
pub mod rings;
pub mod visualizer;
pub mod app;
