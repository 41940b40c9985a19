//! Rendering adapter: a renderer-agnostic seam plus the frame driver that
//! feeds it.
//!
//! # Invariants
//! - Renderers read the session; they never mutate it.
//! - Every tick runs the session update before the render call, so a frame
//!   never shows the camera one step behind the character.
//! - Visibility filtering is its own pass over scene objects, separate from
//!   locomotion and camera logic.

mod cull;
mod frame;
mod renderer;

pub use cull::{BoundingSphere, Frustum, VisibilityReport, cull};
pub use frame::{FrameDriver, FrameTimer, TickOutput};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "shoreline-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
