use crate::cull::{Frustum, cull};
use glam::{Mat4, Vec3};
use shoreline_camera::CameraRig;
use shoreline_kernel::Session;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height.
    pub aspect: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 80.0,
            near: 0.1,
            far: 600.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl RenderView {
    /// The render camera hangs off the rig at its eye offset and always
    /// looks at the rig's look target.
    pub fn from_rig(rig: &CameraRig, aspect: f32) -> Self {
        let c = rig.config();
        Self {
            eye: rig.eye(),
            target: rig.look_target(),
            fov_degrees: c.fov_degrees,
            near: c.near,
            far: c.far,
            aspect,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect.max(f32::EPSILON),
            self.near,
            self.far,
        );
        proj * view
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.view_projection())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads session state and a view configuration, then produces
/// output. It never mutates the session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given session and view.
    fn render(&self, session: &Session, view: &RenderView) -> Self::Output;
}

/// Human-readable frame dump for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list every visible prop.
    pub list_props: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { list_props: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &Session, view: &RenderView) -> String {
        let mut out = String::new();
        let c = session.character();
        let p = c.position();
        let visibility = cull(&view.frustum(), session.scene().iter());

        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} (t={:.2}s) ===",
            session.frame(),
            session.elapsed()
        );
        let _ = writeln!(
            out,
            "Character: pos=({:.2}, {:.2}, {:.2}) speed={:.2} facing={:.2} {:?}{}",
            p.x,
            p.y,
            p.z,
            c.speed(),
            c.facing(),
            c.motion(),
            if c.grounded() { "" } else { " airborne" }
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} mode={:?}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            session.camera().mode()
        );
        let _ = writeln!(
            out,
            "Orbs: collected={} remaining={}",
            session.orbs().collected(),
            session.orbs().remaining()
        );
        let _ = writeln!(
            out,
            "Props: visible={} culled={}",
            visibility.visible.len(),
            visibility.culled
        );

        if self.list_props {
            for id in &visibility.visible {
                if let Some(prop) = session.scene().get(*id) {
                    let p = prop.transform.position;
                    let _ = writeln!(
                        out,
                        "  [{}] {:?} {} pos=({:.2}, {:.2}, {:.2})",
                        id.short(),
                        prop.kind,
                        prop.name,
                        p.x,
                        p.y,
                        p.z
                    );
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoreline_kernel::Tuning;

    #[test]
    fn debug_renderer_empty_session() {
        let session = Session::new(Tuning::default());
        let view = RenderView::from_rig(session.camera(), 16.0 / 9.0);
        let output = DebugTextRenderer::new().render(&session, &view);

        assert!(output.contains("Frame 0"));
        assert!(output.contains("Orbs: collected=0 remaining=0"));
        assert!(output.contains("Props: visible=0 culled=0"));
    }

    #[test]
    fn debug_renderer_lists_visible_props() {
        let mut session = Session::new(Tuning::default());
        let ahead = session.character().position() + Vec3::new(0.0, 0.0, -8.0);
        session.spawn_orb(ahead, 0.0);

        let view = RenderView::from_rig(session.camera(), 16.0 / 9.0);
        let output = DebugTextRenderer::verbose().render(&session, &view);

        assert!(output.contains("remaining=1"));
        assert!(output.contains("visible=1"));
        assert!(output.contains("Orb orb pos="));
    }

    #[test]
    fn view_follows_rig() {
        let session = Session::new(Tuning::default());
        let rig = session.camera();
        let view = RenderView::from_rig(rig, 1.0);
        assert_eq!(view.target, rig.look_target());
        assert_eq!(view.eye, rig.eye());
        assert_eq!(view.fov_degrees, 80.0);
        assert_eq!(view.far, 600.0);
        assert!(view.frustum().contains_point(view.target));
    }
}
