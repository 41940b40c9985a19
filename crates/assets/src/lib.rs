//! Assets: the character rig and its animation clips.
//!
//! Loading is asynchronous. A load hands back a [`PendingAsset`] the frame
//! loop polls without blocking; nothing waits on disk.
//!
//! # Invariants
//! - A pending load settles exactly once, as ready or failed.
//! - A failed rig load is replaced by [`CharacterRig::fallback`]; it never
//!   stops the frame loop.

mod loader;
mod mixer;
mod rig;

pub use loader::{AssetLoad, FileRigLoader, PendingAsset, RigLoader};
pub use mixer::{AnimationMixer, ClipAction, IDLE, RUN, WALK};
pub use rig::{AssetId, CharacterRig, ClipInfo, RigBounds, RigManifest};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rig {rig:?} has no {clip:?} clip")]
    MissingClip { rig: String, clip: String },
    #[error("asset loader went away before finishing")]
    LoaderDisconnected,
}

pub fn crate_info() -> &'static str {
    "shoreline-assets v0.1.0"
}
