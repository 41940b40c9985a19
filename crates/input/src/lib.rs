//! Input: raw key and pointer events folded into a per-frame input snapshot.
//!
//! # Invariants
//! - Event handlers are the only writers of `InputState`.
//! - Locomotion reads the snapshot; it never mutates it.
//! - Jump is a discrete press, never a held state.

pub mod action;
pub mod state;

pub use action::{Action, Key};
pub use state::{InputEvent, InputState};
