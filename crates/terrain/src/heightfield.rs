use glam::Vec3;
use shoreline_common::{Ray, RayHit};

/// Anything a probe ray can be cast against.
pub trait RayCast {
    /// Nearest intersection within `max_distance` along the ray, if any.
    fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;
}

/// Closed-form version of the beach displacement, used where a ray cast would
/// be wasted effort.
pub fn analytic_height(x: f32, z: f32) -> f32 {
    ((x * 0.03).sin() + (z * 0.02).cos()) * 2.0
}

/// Square grid of height samples centred on the origin, triangulated two
/// triangles per cell.
#[derive(Debug, Clone)]
pub struct HeightField {
    size: f32,
    segments: usize,
    cell: f32,
    heights: Vec<f32>,
    min_height: f32,
    max_height: f32,
}

impl HeightField {
    /// Sample `height(x, z)` at every grid vertex. A degenerate grid is
    /// widened to one 1 m cell.
    pub fn from_fn(size: f32, segments: usize, height: impl Fn(f32, f32) -> f32) -> Self {
        let size = if size.is_finite() && size > 0.0 { size } else { 1.0 };
        if segments == 0 {
            tracing::warn!(size, "heightfield requested with zero segments, using one");
        }
        let segments = segments.max(1);
        let cell = size / segments as f32;
        let half = size * 0.5;
        let stride = segments + 1;
        let mut heights = Vec::with_capacity(stride * stride);
        for iz in 0..stride {
            for ix in 0..stride {
                let x = -half + ix as f32 * cell;
                let z = -half + iz as f32 * cell;
                heights.push(height(x, z));
            }
        }
        let min_height = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_height = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        tracing::debug!(size, segments, min_height, max_height, "heightfield built");
        Self {
            size,
            segments,
            cell,
            heights,
            min_height,
            max_height,
        }
    }

    /// The default 800 m sand plane with gentle sinusoidal dunes.
    pub fn beach(size: f32, segments: usize) -> Self {
        Self::from_fn(size, segments, analytic_height)
    }

    pub fn flat(size: f32, segments: usize) -> Self {
        Self::from_fn(size, segments, |_, _| 0.0)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    fn vertex(&self, ix: usize, iz: usize) -> Vec3 {
        let half = self.size * 0.5;
        Vec3::new(
            -half + ix as f32 * self.cell,
            self.heights[iz * (self.segments + 1) + ix],
            -half + iz as f32 * self.cell,
        )
    }

    fn cell_index(&self, coord: f32) -> usize {
        let i = ((coord + self.size * 0.5) / self.cell).floor();
        (i.max(0.0) as usize).min(self.segments - 1)
    }
}

impl RayCast for HeightField {
    fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        const PAD: f32 = 1e-3;
        let half = self.size * 0.5;
        let mut t0 = 0.0f32;
        let mut t1 = max_distance;

        // Only the part of the ray inside the field's bounding box can hit.
        let o = ray.origin;
        let d = ray.direction;
        if !clip_axis(o.y, d.y, self.min_height - PAD, self.max_height + PAD, &mut t0, &mut t1)
            || !clip_axis(o.x, d.x, -half, half, &mut t0, &mut t1)
            || !clip_axis(o.z, d.z, -half, half, &mut t0, &mut t1)
            || !t1.is_finite()
        {
            return None;
        }

        let a = ray.at(t0);
        let b = ray.at(t1);
        let (x0, x1) = (self.cell_index(a.x.min(b.x)), self.cell_index(a.x.max(b.x)));
        let (z0, z1) = (self.cell_index(a.z.min(b.z)), self.cell_index(a.z.max(b.z)));

        let mut best: Option<f32> = None;
        for iz in z0..=z1 {
            for ix in x0..=x1 {
                let v00 = self.vertex(ix, iz);
                let v10 = self.vertex(ix + 1, iz);
                let v01 = self.vertex(ix, iz + 1);
                let v11 = self.vertex(ix + 1, iz + 1);
                for tri in [[v00, v01, v10], [v01, v11, v10]] {
                    if let Some(t) = intersect_triangle(ray, tri)
                        && t <= max_distance
                        && best.is_none_or(|b| t < b)
                    {
                        best = Some(t);
                    }
                }
            }
        }

        best.map(|distance| RayHit {
            point: ray.at(distance),
            distance,
        })
    }
}

fn clip_axis(origin: f32, dir: f32, lo: f32, hi: f32, t0: &mut f32, t1: &mut f32) -> bool {
    if dir.abs() < f32::EPSILON {
        return origin >= lo && origin <= hi;
    }
    let mut a = (lo - origin) / dir;
    let mut b = (hi - origin) / dir;
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    *t0 = t0.max(a);
    *t1 = t1.min(b);
    *t0 <= *t1
}

/// Möller–Trumbore, double sided. Returns the distance along the ray.
fn intersect_triangle(ray: &Ray, [v0, v1, v2]: [Vec3; 3]) -> Option<f32> {
    const EPS: f32 = 1e-7;
    const EDGE_TOL: f32 = 1e-5;
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(p) * inv;
    if !(-EDGE_TOL..=1.0 + EDGE_TOL).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv;
    if v < -EDGE_TOL || u + v > 1.0 + EDGE_TOL {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}
