//! Developer tooling: a read-only session inspector for HUDs and logs.
//!
//! # Invariants
//! - Tools only read the session.

pub mod inspector;

pub use inspector::{OrbInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "shoreline-tools v0.1.0"
}
