//! Terrain: the collidable sand heightfield and the height query every
//! ground-contact consumer goes through.
//!
//! # Invariants
//! - Queries are deterministic for a given static heightfield.
//! - A missing terrain or a missed ray is "no ground here" (height 0), never an error.

mod heightfield;
mod query;

pub use heightfield::{HeightField, RayCast, analytic_height};
pub use query::HeightQuery;

pub fn crate_info() -> &'static str {
    "shoreline-terrain v0.1.0"
}
