use glam::Vec3;
use shoreline_camera::RigMode;
use shoreline_common::EntityId;
use shoreline_kernel::{MotionState, Session};
use shoreline_scene::PropKind;

/// Session inspector for developer tooling.
///
/// Read-only queries against a running session for HUDs, logs and tests.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let c = session.character();
        let cam = session.camera();
        SessionSummary {
            frame: session.frame(),
            elapsed: session.elapsed(),
            position: c.position(),
            speed: c.speed(),
            motion: c.motion(),
            grounded: c.grounded(),
            orbs_collected: session.orbs().collected(),
            orbs_remaining: session.orbs().remaining(),
            camera_yaw: cam.yaw(),
            camera_pitch: cam.pitch(),
            camera_mode: cam.mode(),
            animation: session.mixer().active().map(str::to_string),
            props: session.scene().len(),
        }
    }

    /// Orb `id` if it is still in play.
    pub fn inspect_orb(session: &Session, id: EntityId) -> Option<OrbInfo> {
        let character = session.character().position();
        session
            .orbs()
            .active()
            .iter()
            .find(|orb| orb.id == id)
            .map(|orb| OrbInfo {
                id,
                position: orb.position,
                distance: orb.position.distance(character),
            })
    }

    /// The remaining orb closest to the character.
    pub fn nearest_orb(session: &Session) -> Option<OrbInfo> {
        let character = session.character().position();
        session
            .orbs()
            .active()
            .iter()
            .map(|orb| OrbInfo {
                id: orb.id,
                position: orb.position,
                distance: orb.position.distance(character),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    pub fn count_props(session: &Session, kind: PropKind) -> usize {
        session.scene().count_of(kind)
    }
}

/// Snapshot of the session for the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub frame: u64,
    pub elapsed: f32,
    pub position: Vec3,
    pub speed: f32,
    pub motion: MotionState,
    pub grounded: bool,
    pub orbs_collected: u32,
    pub orbs_remaining: usize,
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    pub camera_mode: RigMode,
    pub animation: Option<String>,
    pub props: usize,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame={} t={:.2}s pos=({:.2}, {:.2}, {:.2}) speed={:.2} {:?}{} \
             orbs={}/{} camera(yaw={:.2} pitch={:.2} {:?}) anim={} props={}",
            self.frame,
            self.elapsed,
            self.position.x,
            self.position.y,
            self.position.z,
            self.speed,
            self.motion,
            if self.grounded { "" } else { " airborne" },
            self.orbs_collected,
            self.orbs_collected as usize + self.orbs_remaining,
            self.camera_yaw,
            self.camera_pitch,
            self.camera_mode,
            self.animation.as_deref().unwrap_or("-"),
            self.props,
        )
    }
}

/// Where an orb is relative to the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbInfo {
    pub id: EntityId,
    pub position: Vec3,
    pub distance: f32,
}

impl std::fmt::Display for OrbInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Orb [{}] pos=({:.2}, {:.2}, {:.2}) distance={:.2}",
            self.id.short(),
            self.position.x,
            self.position.y,
            self.position.z,
            self.distance
        )
    }
}
