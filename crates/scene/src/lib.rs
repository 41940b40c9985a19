//! Scene content around the controller: the props placed at world-build time
//! and the two pieces of per-frame decoration (water swell, orb bobbing).
//!
//! Props are stored in a BTreeMap for deterministic iteration, and every
//! insertion or removal is logged as a `SceneEvent`.

mod object;
mod orbs;
mod planting;
mod water;

pub use object::{
    ColorSpace, Material, Prop, PropKind, SceneEvent, SceneGraph, SceneObject, TextureSlot,
};
pub use orbs::{Orb, OrbConfig, OrbField};
pub use planting::{CoastlineConfig, CoastlinePlanter, RockConfig, scatter_rocks};
pub use water::{Water, WaterConfig};

pub fn crate_info() -> &'static str {
    "shoreline-scene v0.1.0"
}
