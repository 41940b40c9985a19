use crate::AssetError;
use crate::mixer::{IDLE, RUN, WALK};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of_bytes(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(bytes))
    }
}

/// Axis-aligned size of the model in its bind pose, meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigBounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    /// Seconds.
    pub duration: f32,
}

/// On-disk description of a character rig, as JSON.
///
/// ```json
/// { "name": "beachgoer", "bounds": { "width": 1.0, "height": 1.8 },
///   "clips": [ { "name": "idle", "duration": 2.0 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigManifest {
    pub name: String,
    pub bounds: RigBounds,
    #[serde(default)]
    pub clips: Vec<ClipInfo>,
}

impl RigManifest {
    pub fn from_json(data: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn content_id(&self) -> Result<AssetId, AssetError> {
        Ok(AssetId::of_bytes(&serde_json::to_vec(self)?))
    }
}

/// A loaded character: its size and the clips the locomotion animation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRig {
    pub id: AssetId,
    pub name: String,
    pub bounds: RigBounds,
    /// Clip name to duration in seconds.
    pub clips: BTreeMap<String, f32>,
}

impl CharacterRig {
    /// Validate a manifest. The idle, walk and run clips are required.
    pub fn from_manifest(manifest: RigManifest) -> Result<Self, AssetError> {
        let id = manifest.content_id()?;
        let clips: BTreeMap<String, f32> = manifest
            .clips
            .into_iter()
            .map(|c| (c.name, c.duration.max(0.0)))
            .collect();
        for required in [IDLE, WALK, RUN] {
            if !clips.contains_key(required) {
                return Err(AssetError::MissingClip {
                    rig: manifest.name,
                    clip: required.to_string(),
                });
            }
        }
        Ok(Self {
            id,
            name: manifest.name,
            bounds: manifest.bounds,
            clips,
        })
    }

    /// Stand-in used when the real rig cannot be loaded.
    pub fn fallback() -> Self {
        let clips = [IDLE, WALK, RUN]
            .into_iter()
            .map(|name| (name.to_string(), 1.0))
            .collect();
        Self {
            id: AssetId(0),
            name: "fallback".into(),
            bounds: RigBounds {
                width: 1.0,
                height: 2.0,
            },
            clips,
        }
    }

    /// Collision capsule radius: a quarter of the model's width.
    pub fn capsule_radius(&self) -> f32 {
        self.bounds.width / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(clips: &[&str]) -> RigManifest {
        RigManifest {
            name: "beachgoer".into(),
            bounds: RigBounds {
                width: 1.2,
                height: 1.8,
            },
            clips: clips
                .iter()
                .map(|n| ClipInfo {
                    name: n.to_string(),
                    duration: 1.5,
                })
                .collect(),
        }
    }

    #[test]
    fn capsule_is_quarter_width() {
        let rig = CharacterRig::from_manifest(manifest(&["idle", "walk", "run"])).unwrap();
        assert!((rig.capsule_radius() - 0.3).abs() < 1e-6);
        assert_eq!(rig.clips.len(), 3);
    }

    #[test]
    fn missing_run_clip_is_rejected() {
        let err = CharacterRig::from_manifest(manifest(&["idle", "walk"])).unwrap_err();
        assert!(matches!(err, AssetError::MissingClip { ref clip, .. } if clip == "run"));
    }

    #[test]
    fn content_id_tracks_content() {
        let a = manifest(&["idle", "walk", "run"]);
        let mut b = a.clone();
        assert_eq!(a.content_id().unwrap(), b.content_id().unwrap());
        b.bounds.width = 2.0;
        assert_ne!(a.content_id().unwrap(), b.content_id().unwrap());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let m = manifest(&["idle", "walk", "run"]);
        m.save(tmp.path()).unwrap();
        assert_eq!(RigManifest::load(tmp.path()).unwrap(), m);
    }

    #[test]
    fn fallback_has_every_clip() {
        let rig = CharacterRig::fallback();
        for clip in [IDLE, WALK, RUN] {
            assert!(rig.clips.contains_key(clip));
        }
        assert_eq!(rig.capsule_radius(), 0.25);
    }
}
