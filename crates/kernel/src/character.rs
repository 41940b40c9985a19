use crate::config::LocomotionConfig;
use glam::{Quat, Vec2, Vec3};
use shoreline_common::{Ray, flatten_xz, wrap_angle};
use shoreline_input::InputState;
use shoreline_terrain::RayCast;

const GROUND_PROBE_RANGE: f32 = 1000.0;

/// Gait derived from instantaneous planar speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Moving,
}

/// The player character's kinematic state.
///
/// Planar velocity is stored as `(x, z)`. Facing is a yaw in radians where
/// zero looks down -Z.
#[derive(Debug, Clone)]
pub struct CharacterState {
    config: LocomotionConfig,
    position: Vec3,
    facing: f32,
    planar_velocity: Vec2,
    vertical_velocity: f32,
    grounded: bool,
    jump_available: bool,
    capsule_radius: f32,
    /// Last surface height under the feet; sea level until the first hit.
    ground_height: f32,
}

impl CharacterState {
    pub fn new(config: LocomotionConfig) -> Self {
        Self::at(config, config.spawn)
    }

    pub fn at(config: LocomotionConfig, position: Vec3) -> Self {
        Self {
            config,
            position,
            facing: 0.0,
            planar_velocity: Vec2::ZERO,
            vertical_velocity: 0.0,
            grounded: false,
            jump_available: true,
            capsule_radius: config.capsule_radius,
            ground_height: 0.0,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.facing)
    }

    pub fn planar_velocity(&self) -> Vec2 {
        self.planar_velocity
    }

    pub fn speed(&self) -> f32 {
        self.planar_velocity.length()
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn jump_available(&self) -> bool {
        self.jump_available
    }

    pub fn capsule_radius(&self) -> f32 {
        self.capsule_radius
    }

    pub fn motion(&self) -> MotionState {
        if self.speed() > self.config.moving_threshold {
            MotionState::Moving
        } else {
            MotionState::Idle
        }
    }

    pub fn set_capsule_radius(&mut self, radius: f32) {
        if radius.is_finite() && radius > 0.0 {
            self.capsule_radius = radius;
        }
    }

    pub fn set_velocity(&mut self, planar: Vec2, vertical: f32) {
        self.planar_velocity = planar;
        self.vertical_velocity = vertical;
    }

    pub fn set_facing(&mut self, yaw: f32) {
        self.facing = wrap_angle(yaw);
    }

    /// Advance one frame: steer and integrate planar motion relative to the
    /// camera, turn toward the direction of travel, fall, then settle on the
    /// ground.
    pub fn integrate<T: RayCast + ?Sized>(
        &mut self,
        input: &InputState,
        camera: Quat,
        terrain: Option<&T>,
        dt: f32,
    ) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let c = self.config;

        let intent = input.direction();
        if intent != Vec2::ZERO {
            let forward = flatten_xz(camera * Vec3::NEG_Z);
            let right = flatten_xz(camera * Vec3::X);
            let heading = (forward * intent.y + right * intent.x).normalize_or_zero();
            self.planar_velocity += Vec2::new(heading.x, heading.z) * c.acceleration * dt;
            self.planar_velocity = self.planar_velocity.clamp_length_max(c.max_speed);
        } else {
            let speed = self.planar_velocity.length();
            if speed > 0.0 {
                let slowed = (speed - c.deceleration * dt).max(0.0);
                self.planar_velocity = if slowed == 0.0 {
                    Vec2::ZERO
                } else {
                    self.planar_velocity * (slowed / speed)
                };
            }
        }

        self.position.x += self.planar_velocity.x * dt;
        self.position.z += self.planar_velocity.y * dt;

        if self.speed() > c.moving_threshold {
            let target = (-self.planar_velocity.x).atan2(-self.planar_velocity.y);
            let step = (c.turn_speed * dt * 60.0).min(1.0);
            self.facing = wrap_angle(self.facing + wrap_angle(target - self.facing) * step);
        }

        let feet_before = self.position.y;
        self.vertical_velocity -= c.gravity;
        self.position.y += self.vertical_velocity;

        if let Some(terrain) = terrain {
            self.settle(terrain, feet_before);
        }
    }

    /// Snap onto the ground when the feet reach it. The probe starts above the
    /// higher of the old and new feet so a fast fall cannot skip the surface.
    /// Where the probe finds nothing the last known ground height stands in.
    fn settle<T: RayCast + ?Sized>(&mut self, terrain: &T, feet_before: f32) {
        let lift = self.capsule_radius / 2.0;
        let origin = Vec3::new(
            self.position.x,
            feet_before.max(self.position.y) + lift,
            self.position.z,
        );
        match terrain.cast_ray(&Ray::down(origin), GROUND_PROBE_RANGE) {
            Some(hit) => self.ground_height = hit.point.y,
            None => tracing::trace!(
                x = self.position.x,
                z = self.position.z,
                ground = self.ground_height,
                "no ground under character"
            ),
        }
        let rest = self.ground_height + lift;
        if self.position.y <= rest {
            if !self.grounded {
                tracing::debug!(
                    y = rest,
                    impact = self.vertical_velocity,
                    "character landed"
                );
            }
            self.position.y = rest;
            self.vertical_velocity = 0.0;
            self.grounded = true;
            self.jump_available = true;
        } else {
            self.grounded = false;
        }
    }

    /// Start a jump if one is available. Returns whether it started.
    pub fn try_jump(&mut self) -> bool {
        if !self.jump_available {
            return false;
        }
        self.vertical_velocity = self.config.jump_force;
        self.jump_available = false;
        self.grounded = false;
        tracing::debug!(force = self.config.jump_force, "jump");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoreline_common::SeededRng;
    use shoreline_input::{InputEvent, Key};
    use shoreline_terrain::HeightField;

    const DT: f32 = 1.0 / 60.0;

    fn flat() -> HeightField {
        HeightField::flat(200.0, 20)
    }

    fn holding(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.apply(InputEvent::KeyDown(*key));
        }
        input
    }

    fn grounded_character() -> CharacterState {
        let mut c = CharacterState::at(LocomotionConfig::default(), Vec3::ZERO);
        c.integrate(&InputState::new(), Quat::IDENTITY, Some(&flat()), DT);
        assert!(c.grounded());
        c
    }

    #[test]
    fn speed_never_exceeds_max() {
        let keys = [Key::W, Key::A, Key::S, Key::D];
        let mut rng = SeededRng::new(7);
        let mut c = grounded_character();
        let terrain = flat();
        for _ in 0..600 {
            let mut input = InputState::new();
            for key in keys {
                if rng.next_f32() < 0.5 {
                    input.apply(InputEvent::KeyDown(key));
                }
            }
            let camera = Quat::from_rotation_y(rng.centered(3.0));
            let dt = rng.range(0.001, 0.1);
            c.integrate(&input, camera, Some(&terrain), dt);
            assert!(c.speed() <= 20.0 + 1e-4, "speed {}", c.speed());
        }
    }

    #[test]
    fn deceleration_stops_exactly() {
        let mut c = grounded_character();
        let start = Vec2::new(6.0, -8.0);
        c.set_velocity(start, 0.0);
        let limit = start.length() / 120.01 + DT;
        let mut t = 0.0;
        while c.speed() > 0.0 {
            let before = c.planar_velocity();
            c.integrate(&InputState::new(), Quat::IDENTITY, Some(&flat()), DT);
            t += DT;
            let after = c.planar_velocity();
            // Never reverses.
            assert!(after.dot(before) >= 0.0);
            assert!(t <= limit + 1e-6, "still moving after {t}s");
        }
        assert_eq!(c.planar_velocity(), Vec2::ZERO);
        assert_eq!(c.motion(), MotionState::Idle);
    }

    #[test]
    fn facing_converges_without_overshoot() {
        let mut c = grounded_character();
        c.set_facing(3.0);
        // Travel along +Z, i.e. target yaw of PI, across the wrap boundary.
        let target = std::f32::consts::PI;
        let mut previous = wrap_angle(target - c.facing()).abs();
        for _ in 0..120 {
            c.set_velocity(Vec2::new(0.0, 5.0), 0.0);
            c.integrate(&InputState::new(), Quat::IDENTITY, None::<&HeightField>, DT);
            let remaining = wrap_angle(target - c.facing()).abs();
            assert!(remaining <= previous + 1e-6);
            previous = remaining;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn facing_takes_short_way_round() {
        let mut c = grounded_character();
        c.set_facing(-3.0);
        c.set_velocity(Vec2::new(0.0, 5.0), 0.0);
        c.integrate(&InputState::new(), Quat::IDENTITY, None::<&HeightField>, DT);
        // From -3.0 toward PI the short way is decreasing through -PI.
        assert!(c.facing() < -3.0 || c.facing() > 3.0);
    }

    #[test]
    fn falls_and_lands_at_half_radius() {
        let config = LocomotionConfig::default();
        let mut c = CharacterState::at(config, Vec3::new(1.0, 10.0, 1.0));
        let terrain = flat();
        let mut frames = 0;
        while !c.grounded() {
            c.integrate(&InputState::new(), Quat::IDENTITY, Some(&terrain), DT);
            frames += 1;
            assert!(frames < 1000, "never landed");
        }
        assert!((c.position().y - config.capsule_radius / 2.0).abs() < 1e-4);
        assert_eq!(c.vertical_velocity(), 0.0);
        assert!(c.jump_available());

        // Resting stays put.
        c.integrate(&InputState::new(), Quat::IDENTITY, Some(&terrain), DT);
        assert!((c.position().y - config.capsule_radius / 2.0).abs() < 1e-4);
        assert_eq!(c.vertical_velocity(), 0.0);
    }

    #[test]
    fn comes_to_rest_off_the_terrain() {
        let config = LocomotionConfig::default();
        let terrain = flat();
        let mut c = CharacterState::at(config, Vec3::new(150.0, 1.0, 0.0));
        for _ in 0..600 {
            c.integrate(&InputState::new(), Quat::IDENTITY, Some(&terrain), DT);
        }
        assert!(c.grounded());
        assert!((c.position().y - config.capsule_radius / 2.0).abs() < 1e-4);
        assert_eq!(c.vertical_velocity(), 0.0);
    }

    #[test]
    fn walking_off_the_edge_keeps_last_ground() {
        let config = LocomotionConfig::default();
        let raised = HeightField::from_fn(20.0, 4, |_, _| 3.0);
        let mut c = CharacterState::at(config, Vec3::new(0.0, 4.0, 0.0));
        let input = holding(&[Key::W]);
        for _ in 0..120 {
            c.integrate(&input, Quat::IDENTITY, Some(&raised), DT);
        }
        // Well past the -Z edge at z = -10.
        assert!(c.position().z < -30.0);
        assert!(c.grounded());
        assert!((c.position().y - (3.0 + config.capsule_radius / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn jump_needs_ground() {
        let mut c = grounded_character();
        assert!(c.try_jump());
        assert_eq!(c.vertical_velocity(), 0.2);
        assert!(!c.try_jump());

        let terrain = flat();
        c.integrate(&InputState::new(), Quat::IDENTITY, Some(&terrain), DT);
        assert!(c.position().y > 0.125);
        for _ in 0..200 {
            c.integrate(&InputState::new(), Quat::IDENTITY, Some(&terrain), DT);
        }
        assert!(c.grounded());
        assert!(c.try_jump());
    }

    #[test]
    fn forward_second_reaches_twenty_metres() {
        let mut c = grounded_character();
        let start = c.position();
        let input = holding(&[Key::W]);
        let terrain = flat();
        for _ in 0..60 {
            c.integrate(&input, Quat::IDENTITY, Some(&terrain), DT);
        }
        assert!((c.speed() - 20.0).abs() < 1e-4);
        let travelled = c.position() - start;
        // Camera looks down -Z, so forward is -Z.
        assert!(travelled.x.abs() < 1e-4);
        assert!((-travelled.z - 20.0).abs() < 0.5, "travelled {travelled}");
        assert!(c.facing().abs() < 1e-3);
    }

    #[test]
    fn movement_is_relative_to_camera() {
        let mut c = grounded_character();
        let input = holding(&[Key::W]);
        let camera = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        c.integrate(&input, camera, Some(&flat()), DT);
        let v = c.planar_velocity();
        // Yawed a quarter turn left, forward is -X.
        assert!(v.x < 0.0 && v.y.abs() < 1e-4);
    }

    #[test]
    fn opposing_keys_do_not_move() {
        let mut c = grounded_character();
        let input = holding(&[Key::W, Key::S]);
        c.integrate(&input, Quat::IDENTITY, Some(&flat()), DT);
        assert_eq!(c.planar_velocity(), Vec2::ZERO);
    }
}
