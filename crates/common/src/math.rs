use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// A half-line used for terrain probes. `direction` is kept unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; a degenerate direction falls back to straight down.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec3::NEG_Y);
        Self { origin, direction }
    }

    pub fn down(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest intersection reported by a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Wrap an angle into `[-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can land exactly on TAU for tiny negative inputs.
    if a > PI {
        a -= TAU;
    }
    a
}

/// Project onto the horizontal plane and normalize. Zero when the projection
/// has no length (vector pointing straight up or down).
pub fn flatten_xz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_range() {
        for i in -100..=100 {
            let a = wrap_angle(i as f32 * 0.37);
            assert!((-PI..=PI).contains(&a), "{a}");
        }
    }

    #[test]
    fn wrap_angle_crosses_pi_boundary() {
        // 3.0 - (-3.0) is 6.0 the long way; the short way is 6.0 - TAU.
        let diff = wrap_angle(3.0 - -3.0);
        assert!((diff - (6.0 - TAU)).abs() < 1e-5);
        assert!(diff < 0.0);
    }

    #[test]
    fn flatten_removes_vertical_component() {
        let f = flatten_xz(Vec3::new(3.0, 10.0, 4.0));
        assert_eq!(f.y, 0.0);
        assert!((f.length() - 1.0).abs() < 1e-6);
        assert_eq!(flatten_xz(Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn ray_direction_is_normalized() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(r.direction, Vec3::NEG_Y);
        assert_eq!(r.at(2.0), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(Ray::new(Vec3::ZERO, Vec3::ZERO).direction, Vec3::NEG_Y);
    }
}
