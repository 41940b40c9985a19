use crate::config::CameraConfig;
use glam::{EulerRot, Quat, Vec2, Vec3};
use shoreline_common::{Ray, flatten_xz};
use shoreline_terrain::RayCast;

/// What drove the rig's orientation on the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RigMode {
    /// Pointer lock engaged; the player steers the camera.
    ManualLook,
    /// Swivelling toward the character's direction of travel.
    AutoFollow,
    /// Nothing to do; orientation only settles toward its target.
    #[default]
    Resting,
}

/// Third-person camera rig.
///
/// The rig reads the character's position but never writes it.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    current: Quat,
    target: Quat,
    position: Vec3,
    velocity: Vec3,
    look_target: Vec3,
    mode: RigMode,
}

impl CameraRig {
    /// Create a rig already parked at its ideal spot behind `character`.
    pub fn new(config: CameraConfig, character: Vec3) -> Self {
        let mut rig = Self {
            config,
            current: Quat::IDENTITY,
            target: Quat::IDENTITY,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            look_target: character + Vec3::Y * config.look_height,
            mode: RigMode::Resting,
        };
        rig.position = rig.ideal_position(character);
        rig
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn orientation(&self) -> Quat {
        self.current
    }

    pub fn target_orientation(&self) -> Quat {
        self.target
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn mode(&self) -> RigMode {
        self.mode
    }

    pub fn forward(&self) -> Vec3 {
        self.current * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.current * Vec3::X
    }

    pub fn yaw(&self) -> f32 {
        self.current.to_euler(EulerRot::YXZ).0
    }

    pub fn pitch(&self) -> f32 {
        self.current.to_euler(EulerRot::YXZ).1
    }

    /// World-space camera position: the rig pivot plus the rotated eye offset.
    pub fn eye(&self) -> Vec3 {
        self.position + self.current * self.config.eye_offset
    }

    /// Turn pointer motion into a new target orientation.
    ///
    /// Yaw spins about world up, pitch about the camera's own right axis. The
    /// result is rebuilt from clamped Euler angles so pitch stays in range and
    /// roll never creeps in.
    pub fn apply_mouse_look(&mut self, delta: Vec2) {
        if !delta.is_finite() || delta == Vec2::ZERO {
            return;
        }
        let s = self.config.mouse_sensitivity;
        let yaw = Quat::from_axis_angle(Vec3::Y, -delta.x * s);
        let right = (self.target * Vec3::X).normalize_or_zero();
        let pitch = if right == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_axis_angle(right, -delta.y * s)
        };
        self.target = self.constrain(yaw * pitch * self.target);
    }

    /// Swing the target orientation toward the direction of travel, at most
    /// `max_swivel_angle * dt` radians, the short way round.
    pub fn auto_follow(&mut self, planar_velocity: Vec2, dt: f32) -> bool {
        if planar_velocity.length() <= self.config.swivel_speed_threshold {
            return false;
        }
        let heading = Vec3::new(planar_velocity.x, 0.0, planar_velocity.y).normalize_or_zero();
        let forward = flatten_xz(self.forward());
        if heading == Vec3::ZERO || forward == Vec3::ZERO {
            return false;
        }
        let angle = forward.angle_between(heading);
        if angle.is_nan() || angle <= self.config.swivel_angle_threshold {
            return false;
        }
        let sign = if forward.cross(heading).y < 0.0 { -1.0 } else { 1.0 };
        let amount = angle.min(self.config.max_swivel_angle * dt.max(0.0));
        self.target = self.constrain(Quat::from_rotation_y(amount * sign) * self.current);
        true
    }

    /// Advance the rig one frame behind a character at `character` moving with
    /// `planar_velocity` (world XZ).
    pub fn update<T: RayCast + ?Sized>(
        &mut self,
        character: Vec3,
        planar_velocity: Vec2,
        mouse_look: bool,
        terrain: Option<&T>,
        dt: f32,
    ) {
        self.mode = if mouse_look {
            RigMode::ManualLook
        } else if self.auto_follow(planar_velocity, dt) {
            RigMode::AutoFollow
        } else {
            RigMode::Resting
        };

        let t = (self.config.swivel_speed * dt.max(0.0) * 60.0).min(1.0);
        let blended = self.current.slerp(self.target, t).normalize();
        self.current = self.constrain(blended);

        let ideal = self.ideal_position(character);
        let adjusted = match terrain {
            Some(terrain) => self.avoid_obstruction(character, ideal, terrain),
            None => ideal,
        };

        let force = (adjusted - self.position) * self.config.spring_stiffness;
        self.velocity += force;
        self.velocity *= 1.0 - self.config.damping;
        self.position += self.velocity;

        self.look_target = character + Vec3::Y * self.config.look_height;

        tracing::trace!(
            mode = ?self.mode,
            yaw = self.yaw(),
            pitch = self.pitch(),
            "camera rig updated"
        );
    }

    /// Where the rig wants to be: behind and above the character along the
    /// current orientation.
    pub fn ideal_position(&self, character: Vec3) -> Vec3 {
        character + self.forward() * -self.config.follow_distance
            + Vec3::Y * self.config.follow_height
    }

    /// Pull `ideal` in front of the first terrain hit on the way out from the
    /// character.
    pub fn avoid_obstruction<T: RayCast + ?Sized>(
        &self,
        character: Vec3,
        ideal: Vec3,
        terrain: &T,
    ) -> Vec3 {
        let origin = character + Vec3::Y * self.config.collision_probe_height;
        let offset = ideal - origin;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return ideal;
        }
        let ray = Ray::new(origin, offset);
        match terrain.cast_ray(&ray, distance) {
            Some(hit) if hit.distance < distance => {
                tracing::trace!(hit = hit.distance, distance, "camera obstructed");
                hit.point - ray.direction * self.config.min_obstruction_distance
            }
            _ => ideal,
        }
    }

    fn constrain(&self, q: Quat) -> Quat {
        let q = q.normalize();
        if !q.is_finite() {
            return self.current;
        }
        let (yaw, pitch, _roll) = q.to_euler(EulerRot::YXZ);
        let pitch = pitch.clamp(self.config.min_pitch, self.config.max_pitch);
        Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoreline_common::{RayHit, SeededRng};
    use shoreline_terrain::HeightField;

    const DT: f32 = 1.0 / 60.0;

    /// A wall at a fixed distance along any ray, for obstruction tests.
    struct WallAt(f32);

    impl RayCast for WallAt {
        fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
            (self.0 <= max_distance).then(|| RayHit {
                point: ray.at(self.0),
                distance: self.0,
            })
        }
    }

    fn rig() -> CameraRig {
        CameraRig::new(CameraConfig::default(), Vec3::ZERO)
    }

    #[test]
    fn starts_behind_and_above() {
        let r = rig();
        assert_eq!(r.orientation(), Quat::IDENTITY);
        assert!((r.position() - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);
        assert_eq!(r.look_target(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn mouse_right_turns_camera_right() {
        let mut r = rig();
        r.apply_mouse_look(Vec2::new(100.0, 0.0));
        r.update::<HeightField>(Vec3::ZERO, Vec2::ZERO, true, None, DT);
        assert!(r.yaw() < 0.0);
        assert!(r.forward().x > 0.0);
        assert_eq!(r.mode(), RigMode::ManualLook);
    }

    #[test]
    fn mouse_up_pitches_up() {
        let mut r = rig();
        r.apply_mouse_look(Vec2::new(0.0, -50.0));
        r.update::<HeightField>(Vec3::ZERO, Vec2::ZERO, true, None, DT);
        assert!(r.pitch() > 0.0);
        assert!(r.forward().y > 0.0);
    }

    #[test]
    fn extreme_pitch_is_clamped() {
        let mut r = rig();
        let c = *r.config();
        for dy in [1.0e6, -1.0e6, 3.0e4, -777.0] {
            r.apply_mouse_look(Vec2::new(13.0, dy));
            r.update::<HeightField>(Vec3::ZERO, Vec2::ZERO, true, None, DT);
            let p = r.pitch();
            assert!(p >= c.min_pitch - 1e-4 && p <= c.max_pitch + 1e-4, "pitch {p}");
            let (_, tp, roll) = r.target_orientation().to_euler(EulerRot::YXZ);
            assert!(tp >= c.min_pitch - 1e-4 && tp <= c.max_pitch + 1e-4);
            assert!(roll.abs() < 1e-4);
        }
    }

    #[test]
    fn orientation_stays_unit_under_random_look() {
        let mut r = rig();
        let c = *r.config();
        let mut rng = SeededRng::new(99);
        for frame in 0..1000 {
            let delta = Vec2::new(rng.centered(400.0), rng.centered(400.0));
            r.apply_mouse_look(delta);
            let velocity = Vec2::new(rng.centered(20.0), rng.centered(20.0));
            let look = frame % 3 != 0;
            r.update::<HeightField>(Vec3::ZERO, velocity, look, None, DT);
            assert!((r.orientation().length() - 1.0).abs() < 1e-4);
            assert!((r.target_orientation().length() - 1.0).abs() < 1e-4);
            let p = r.pitch();
            assert!(p >= c.min_pitch - 1e-4 && p <= c.max_pitch + 1e-4);
        }
    }

    #[test]
    fn auto_follow_swings_toward_travel() {
        let mut r = rig();
        // Character runs toward -X, camera faces -Z: turn left (positive yaw).
        let v = Vec2::new(-10.0, 0.0);
        r.update::<HeightField>(Vec3::ZERO, v, false, None, DT);
        assert_eq!(r.mode(), RigMode::AutoFollow);
        assert!(r.yaw() > 0.0);
        let max_step = r.config().max_swivel_angle * DT;
        assert!(r.yaw() <= max_step + 1e-5);
    }

    #[test]
    fn auto_follow_eventually_aligns() {
        let mut r = rig();
        let v = Vec2::new(10.0, 0.0);
        for _ in 0..240 {
            r.update::<HeightField>(Vec3::ZERO, v, false, None, DT);
        }
        let f = flatten_xz(r.forward());
        assert!(f.angle_between(Vec3::X) < 0.02);
    }

    #[test]
    fn slow_or_looking_does_not_swivel() {
        let mut r = rig();
        r.update::<HeightField>(Vec3::ZERO, Vec2::new(0.05, 0.0), false, None, DT);
        assert_eq!(r.mode(), RigMode::Resting);
        r.update::<HeightField>(Vec3::ZERO, Vec2::new(10.0, 0.0), true, None, DT);
        assert_eq!(r.mode(), RigMode::ManualLook);
        assert!(r.yaw().abs() < 1e-6);
    }

    #[test]
    fn spring_lags_then_settles() {
        let mut r = rig();
        let character = Vec3::new(10.0, 0.0, 0.0);
        r.update::<HeightField>(character, Vec2::ZERO, false, None, DT);
        let ideal = r.ideal_position(character);
        // One frame moves toward the ideal without reaching it.
        assert!(r.position().distance(ideal) > 1.0);
        for _ in 0..600 {
            r.update::<HeightField>(character, Vec2::ZERO, false, None, DT);
        }
        assert!(r.position().distance(ideal) < 1e-3);
    }

    #[test]
    fn obstruction_pulls_rig_in() {
        let r = rig();
        let character = Vec3::ZERO;
        let ideal = Vec3::new(0.0, 1.0, 10.0);
        let adjusted = r.avoid_obstruction(character, ideal, &WallAt(4.0));
        let origin = Vec3::Y;
        // Hit at 4 m, backed off by the minimum obstruction distance.
        assert!((adjusted.distance(origin) - 3.8).abs() < 1e-4);
    }

    #[test]
    fn clear_line_keeps_ideal() {
        let r = rig();
        let ideal = Vec3::new(0.0, 1.0, 3.0);
        assert_eq!(r.avoid_obstruction(Vec3::ZERO, ideal, &WallAt(50.0)), ideal);
    }

    #[test]
    fn look_target_tracks_character() {
        let mut r = rig();
        let character = Vec3::new(3.0, 1.5, -2.0);
        r.update::<HeightField>(character, Vec2::ZERO, false, None, DT);
        assert_eq!(r.look_target(), character + Vec3::Y);
    }
}
