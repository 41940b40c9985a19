use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tuning for the camera rig. Spring values are per-frame factors, angular
/// speeds are radians per second unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Radians of rotation per pixel of pointer motion.
    pub mouse_sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Horizontal distance of the rig behind the character.
    pub follow_distance: f32,
    /// Height of the rig above the character's feet.
    pub follow_height: f32,
    /// Gap kept between the rig and any terrain blocking the view.
    pub min_obstruction_distance: f32,
    pub spring_stiffness: f32,
    /// Fraction of rig velocity removed each frame.
    pub damping: f32,
    /// Orientation smoothing, as a fraction per 60 Hz frame.
    pub swivel_speed: f32,
    /// Planar character speed above which auto-follow engages.
    pub swivel_speed_threshold: f32,
    /// Smallest heading error auto-follow bothers to correct.
    pub swivel_angle_threshold: f32,
    pub max_swivel_angle: f32,
    /// The camera aims this far above the character's feet.
    pub look_height: f32,
    /// Obstruction rays start this far above the character's feet.
    pub collision_probe_height: f32,
    /// Camera position in rig-local space.
    pub eye_offset: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            min_pitch: -0.5,
            max_pitch: 0.5,
            follow_distance: 1.0,
            follow_height: 2.0,
            min_obstruction_distance: 0.2,
            spring_stiffness: 0.15,
            damping: 0.4,
            swivel_speed: 5.0,
            swivel_speed_threshold: 0.1,
            swivel_angle_threshold: 0.01,
            max_swivel_angle: std::f32::consts::FRAC_PI_2,
            look_height: 1.0,
            collision_probe_height: 1.0,
            eye_offset: Vec3::new(0.0, 5.0, 10.0),
            fov_degrees: 80.0,
            near: 0.1,
            far: 600.0,
        }
    }
}
