use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoreline_camera::CameraConfig;
use shoreline_scene::{CoastlineConfig, OrbConfig, RockConfig, WaterConfig};
use shoreline_terrain::HeightQuery;
use std::path::{Path, PathBuf};

/// Errors from loading or validating tuning.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Character movement constants.
///
/// Acceleration, deceleration and max speed are per second. Gravity and jump
/// force are per frame, applied once per tick regardless of `dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Fraction of the remaining turn covered per 60 Hz frame.
    pub turn_speed: f32,
    /// Planar speed above which the character counts as moving.
    pub moving_threshold: f32,
    pub gravity: f32,
    pub jump_force: f32,
    /// Used until the character rig reports its own size.
    pub capsule_radius: f32,
    pub spawn: Vec3,
    /// Cross-fade time between gait clips, seconds.
    pub animation_fade: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 20.0,
            acceleration: 420.015,
            deceleration: 120.01,
            turn_speed: 0.15,
            moving_threshold: 0.01,
            gravity: 0.0098,
            jump_force: 0.2,
            capsule_radius: 0.25,
            spawn: Vec3::new(0.0, 2.0, 0.0),
            animation_fade: 0.2,
        }
    }
}

/// Everything placed in the world at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    pub terrain_size: f32,
    pub terrain_segments: usize,
    pub height_query: HeightQuery,
    pub water: WaterConfig,
    pub coastline: CoastlineConfig,
    pub rocks: RockConfig,
    /// JSON rig manifest. Without one the fallback rig is used.
    pub rig_manifest: Option<PathBuf>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 2,
            terrain_size: 800.0,
            terrain_segments: 150,
            height_query: HeightQuery::default(),
            water: WaterConfig::default(),
            coastline: CoastlineConfig::default(),
            rocks: RockConfig::default(),
            rig_manifest: None,
        }
    }
}

/// All tunable constants of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
    pub orbs: OrbConfig,
    pub world: WorldConfig,
}

impl Tuning {
    /// Parse YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_yaml::from_str(yaml)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_yaml_str(&data)?;
        tracing::info!(path = %path.as_ref().display(), "tuning loaded");
        Ok(tuning)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.locomotion;
        if !(l.max_speed > 0.0) {
            return Err(ConfigError::Invalid("locomotion.max_speed must be positive".into()));
        }
        if l.acceleration < 0.0 || l.deceleration < 0.0 {
            return Err(ConfigError::Invalid(
                "locomotion acceleration and deceleration must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&l.turn_speed) {
            return Err(ConfigError::Invalid("locomotion.turn_speed must be in [0, 1]".into()));
        }
        if l.capsule_radius <= 0.0 {
            return Err(ConfigError::Invalid("locomotion.capsule_radius must be positive".into()));
        }
        let c = &self.camera;
        if c.min_pitch > c.max_pitch {
            return Err(ConfigError::Invalid(format!(
                "camera pitch range is empty: [{}, {}]",
                c.min_pitch, c.max_pitch
            )));
        }
        if !(0.0..=1.0).contains(&c.damping) {
            return Err(ConfigError::Invalid("camera.damping must be in [0, 1]".into()));
        }
        if self.world.terrain_segments == 0 || self.world.terrain_size <= 0.0 {
            return Err(ConfigError::Invalid("terrain needs a positive size and segment count".into()));
        }
        let q = &self.world.height_query;
        if q.near_threshold > q.far_threshold {
            return Err(ConfigError::Invalid(
                "height_query.near_threshold exceeds far_threshold".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let t = Tuning::from_yaml_str("locomotion:\n  gravity: 0.005\norbs:\n  pickup_radius: 0.8\n")
            .unwrap();
        assert_eq!(t.locomotion.gravity, 0.005);
        assert_eq!(t.orbs.pickup_radius, 0.8);
        assert_eq!(t.locomotion.max_speed, 20.0);
        assert_eq!(t.world.seed, 2);
    }

    #[test]
    fn yaml_round_trip() {
        let t = Tuning::default();
        let back = Tuning::from_yaml_str(&t.to_yaml().unwrap()).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn rejects_inverted_pitch_range() {
        let err = Tuning::from_yaml_str("camera:\n  min_pitch: 1.0\n  max_pitch: -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            Tuning::from_yaml_str("locomotion: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "world:\n  seed: 9\n").unwrap();
        assert_eq!(Tuning::load(tmp.path()).unwrap().world.seed, 9);
        assert!(matches!(
            Tuning::load(tmp.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }
}
