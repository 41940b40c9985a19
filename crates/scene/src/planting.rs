use crate::object::{Material, Prop, PropKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoreline_common::{SeededRng, Transform};
use std::f32::consts::TAU;

const PALM_TRUNK: u32 = 0x4a3a2a;
const ROCK: u32 = 0x555555;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoastlineConfig {
    /// Control points of the shoreline curve (Y ignored).
    pub points: Vec<Vec3>,
    pub clusters: usize,
    pub trees_per_cluster: usize,
    /// Cluster width across the shoreline; half of it along the shoreline.
    pub spread: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub model: String,
}

impl Default for CoastlineConfig {
    fn default() -> Self {
        Self {
            points: vec![
                Vec3::new(150.0, 0.0, 60.0),
                Vec3::new(33.0, 0.0, 30.0),
                Vec3::new(25.0, 0.0, 0.0),
                Vec3::new(35.0, 0.0, -50.0),
            ],
            clusters: 10,
            trees_per_cluster: 6,
            spread: 17.0,
            min_scale: 0.7,
            max_scale: 1.2,
            model: "models/low_poly_palm_tree.glb".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockConfig {
    pub count: usize,
    pub half_extent: f32,
    pub height: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            count: 20,
            half_extent: 100.0,
            height: 0.5,
            min_scale: 0.2,
            max_scale: 1.0,
        }
    }
}

/// Plants clusters of palms along a Catmull-Rom curve through the shoreline
/// control points.
#[derive(Debug, Clone)]
pub struct CoastlinePlanter {
    config: CoastlineConfig,
}

impl CoastlinePlanter {
    pub fn new(config: CoastlineConfig) -> Self {
        Self { config }
    }

    /// Point on the curve at `t` in `[0, 1]`.
    pub fn point(&self, t: f32) -> Vec3 {
        let pts = &self.config.points;
        match pts.len() {
            0 => return Vec3::ZERO,
            1 => return pts[0],
            _ => {}
        }
        let last = pts.len() - 1;
        let p = last as f32 * t.clamp(0.0, 1.0);
        let mut i = p.floor() as usize;
        let mut w = p - i as f32;
        if i >= last {
            i = last - 1;
            w = 1.0;
        }
        let p1 = pts[i];
        let p2 = pts[i + 1];
        let p0 = if i > 0 { pts[i - 1] } else { p1 * 2.0 - p2 };
        let p3 = if i + 2 <= last { pts[i + 2] } else { p2 * 2.0 - p1 };
        catmull_rom(p0, p1, p2, p3, w)
    }

    /// Unit tangent at `t`, by central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        const H: f32 = 1e-3;
        let a = self.point((t - H).max(0.0));
        let b = self.point((t + H).min(1.0));
        (b - a).normalize_or_zero()
    }

    pub fn plant(&self, rng: &mut SeededRng, height: impl Fn(f32, f32) -> f32) -> Vec<Prop> {
        let c = &self.config;
        let mut palms = Vec::with_capacity(c.clusters * c.trees_per_cluster);
        for i in 0..c.clusters {
            let t = if c.clusters > 1 {
                i as f32 / (c.clusters - 1) as f32
            } else {
                0.0
            };
            let center = self.point(t);
            let tangent = self.tangent(t);
            let across = Vec3::new(-tangent.z, 0.0, tangent.x).normalize_or_zero();

            for _ in 0..c.trees_per_cluster {
                let offset = across * rng.centered(c.spread * 0.5)
                    + tangent * rng.centered(c.spread * 0.25);
                let mut position = center + offset;
                position.y = height(position.x, position.z);
                let yaw = rng.next_f32() * TAU;
                let scale = rng.range(c.min_scale, c.max_scale);
                palms.push(Prop::new(
                    PropKind::PalmTree,
                    format!("palm_{}", palms.len()),
                    Transform::placed(position, yaw, scale),
                    Material::textured(PALM_TRUNK, c.model.clone()),
                ));
            }
        }
        tracing::debug!(count = palms.len(), "coastline planted");
        palms
    }
}

/// Squat, randomly sized rocks scattered around the origin.
pub fn scatter_rocks(config: &RockConfig, rng: &mut SeededRng) -> Vec<Prop> {
    (0..config.count)
        .map(|i| {
            let scale = rng.range(config.min_scale, config.max_scale);
            let position = Vec3::new(
                rng.centered(config.half_extent),
                config.height,
                rng.centered(config.half_extent),
            );
            let transform = Transform {
                position,
                scale: Vec3::new(scale, scale * 0.8, scale),
                ..Transform::default()
            };
            Prop::new(PropKind::Rock, format!("rock_{i}"), transform, Material::solid(ROCK))
        })
        .collect()
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, w: f32) -> Vec3 {
    let t1 = (p2 - p0) * 0.5;
    let t2 = (p3 - p1) * 0.5;
    let w2 = w * w;
    let w3 = w2 * w;
    p1 * (2.0 * w3 - 3.0 * w2 + 1.0)
        + t1 * (w3 - 2.0 * w2 + w)
        + p2 * (-2.0 * w3 + 3.0 * w2)
        + t2 * (w3 - w2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::SceneObject;

    #[test]
    fn curve_passes_through_control_points() {
        let planter = CoastlinePlanter::new(CoastlineConfig::default());
        let pts = CoastlineConfig::default().points;
        assert!(planter.point(0.0).distance(pts[0]) < 1e-4);
        assert!(planter.point(1.0 / 3.0).distance(pts[1]) < 1e-3);
        assert!(planter.point(1.0).distance(pts[3]) < 1e-4);
    }

    #[test]
    fn tangent_is_unit() {
        let planter = CoastlinePlanter::new(CoastlineConfig::default());
        for i in 0..=10 {
            let t = planter.tangent(i as f32 / 10.0);
            assert!((t.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn plants_every_tree_on_the_ground() {
        let planter = CoastlinePlanter::new(CoastlineConfig::default());
        let palms = planter.plant(&mut SeededRng::new(2), |x, z| x * 0.01 - z * 0.02);
        assert_eq!(palms.len(), 60);
        for palm in &palms {
            let p = palm.transform.position;
            assert!((p.y - (p.x * 0.01 - p.z * 0.02)).abs() < 1e-4);
            let s = palm.transform.scale.x;
            assert!((0.7..1.2).contains(&s));
            assert!(palm.texture().is_some());
        }
    }

    #[test]
    fn rocks_are_squashed_and_in_bounds() {
        let rocks = scatter_rocks(&RockConfig::default(), &mut SeededRng::new(5));
        assert_eq!(rocks.len(), 20);
        for rock in &rocks {
            let t = rock.transform;
            assert!((t.scale.y - t.scale.x * 0.8).abs() < 1e-6);
            assert!(t.position.x.abs() <= 100.0 && t.position.z.abs() <= 100.0);
            assert_eq!(t.position.y, 0.5);
        }
    }
}
