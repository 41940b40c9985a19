//! Shared types: entity ids, transforms, rays, angle helpers and the
//! deterministic world RNG.

mod math;
mod rng;
mod types;

pub use math::{Ray, RayHit, flatten_xz, wrap_angle};
pub use rng::SeededRng;
pub use types::{EntityId, Transform};
