//! Camera rig controller.
//!
//! The rig is a pivot that trails the character. Its orientation is driven by
//! mouse look or by an automatic swivel toward the direction of travel; its
//! position chases an ideal offset with a spring-damper and is pulled in front
//! of any terrain between the character and the camera.
//!
//! # Invariants
//! - Orientation quaternions are unit length after every update.
//! - Pitch stays within `[min_pitch, max_pitch]`, roll is always zero.

mod config;
mod rig;

pub use config::CameraConfig;
pub use rig::{CameraRig, RigMode};

pub fn crate_info() -> &'static str {
    "shoreline-camera v0.1.0"
}
