use crate::heightfield::{RayCast, analytic_height};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoreline_common::Ray;

/// Ground height lookup with a cheap far-field approximation.
///
/// Inside `near_threshold` the terrain mesh is ray cast from `probe_height`
/// straight down. Between near and far the analytic dune function stands in.
/// Beyond `far_threshold` everything is sea level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightQuery {
    pub near_threshold: f32,
    pub far_threshold: f32,
    pub probe_height: f32,
}

impl Default for HeightQuery {
    fn default() -> Self {
        Self {
            near_threshold: 200.0,
            far_threshold: 400.0,
            probe_height: 100.0,
        }
    }
}

impl HeightQuery {
    pub fn height_at<T: RayCast + ?Sized>(&self, terrain: Option<&T>, x: f32, z: f32) -> f32 {
        let Some(terrain) = terrain else {
            return 0.0;
        };
        let reach = x.abs().max(z.abs());
        if reach > self.far_threshold {
            return 0.0;
        }
        if reach > self.near_threshold {
            return analytic_height(x, z);
        }
        let ray = Ray::down(Vec3::new(x, self.probe_height, z));
        terrain
            .cast_ray(&ray, f32::INFINITY)
            .map_or(0.0, |hit| hit.point.y)
    }
}
