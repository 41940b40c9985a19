//! Kernel: the session world context and the per-frame simulation.
//!
//! A [`Session`] owns everything the frame loop touches and is passed
//! explicitly; there is no ambient state.
//!
//! # Invariants
//! - Frame order is fixed: assets, input, animation, locomotion, decorations, camera.
//! - Planar speed never exceeds `max_speed`; deceleration never reverses direction.
//! - No failure inside a frame is fatal. Missing terrain, ray misses and
//!   failed asset loads degrade to defaults.

pub mod character;
pub mod clock;
pub mod config;
pub mod session;

pub use character::{CharacterState, MotionState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LocomotionConfig, Tuning, WorldConfig};
pub use session::{FrameReport, Session};

pub fn crate_info() -> &'static str {
    "shoreline-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
