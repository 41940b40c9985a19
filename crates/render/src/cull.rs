use glam::{Mat4, Vec3, Vec4};
use shoreline_common::EntityId;
use shoreline_scene::SceneObject;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn of(object: &impl SceneObject) -> Self {
        let (center, radius) = object.bounds();
        Self { center, radius }
    }
}

/// Six inward-facing planes `(n, d)` with unit `n`; a point `p` is inside a
/// plane when `n·p + d >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract the planes from a view-projection matrix with a `[0, 1]`
    /// depth range.
    pub fn from_view_projection(m: Mat4) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        let r3 = m.row(3);
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(|p| {
            let len = p.truncate().length();
            if len > 0.0 { p / len } else { p }
        });
        Self { planes }
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.intersects_sphere(&BoundingSphere {
            center: p,
            radius: 0.0,
        })
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.planes
            .iter()
            .all(|p| p.truncate().dot(sphere.center) + p.w >= -sphere.radius)
    }
}

/// Result of a culling pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityReport {
    pub visible: Vec<EntityId>,
    pub culled: usize,
}

impl VisibilityReport {
    pub fn total(&self) -> usize {
        self.visible.len() + self.culled
    }
}

/// Split `objects` into those whose bounding sphere touches `frustum` and
/// the rest.
pub fn cull<'a, O: SceneObject + 'a>(
    frustum: &Frustum,
    objects: impl IntoIterator<Item = (EntityId, &'a O)>,
) -> VisibilityReport {
    let mut report = VisibilityReport::default();
    for (id, object) in objects {
        if frustum.intersects_sphere(&BoundingSphere::of(object)) {
            report.visible.push(id);
        } else {
            report.culled += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoreline_common::Transform;
    use shoreline_scene::{Material, Prop, PropKind, SceneGraph};

    fn looking_down_neg_z() -> Frustum {
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(80f32.to_radians(), 16.0 / 9.0, 0.1, 600.0);
        Frustum::from_view_projection(proj * view)
    }

    #[test]
    fn planes_bound_the_view_volume() {
        let f = looking_down_neg_z();
        assert!(f.contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, 10.0)));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, -700.0)));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, -0.05)));
        assert!(!f.contains_point(Vec3::new(500.0, 0.0, -10.0)));
    }

    #[test]
    fn sphere_straddling_plane_is_visible() {
        let f = looking_down_neg_z();
        let behind = BoundingSphere {
            center: Vec3::new(0.0, 0.0, 1.0),
            radius: 2.0,
        };
        assert!(f.intersects_sphere(&behind));
        let far_behind = BoundingSphere {
            center: Vec3::new(0.0, 0.0, 5.0),
            radius: 2.0,
        };
        assert!(!f.intersects_sphere(&far_behind));
    }

    #[test]
    fn culls_props_behind_the_camera() {
        let mut scene = SceneGraph::new();
        let rock = |z: f32| {
            Prop::new(
                PropKind::Rock,
                "rock",
                Transform::at(Vec3::new(0.0, 0.0, z)),
                Material::solid(0x555555),
            )
        };
        let ahead = scene.insert(rock(-20.0));
        scene.insert(rock(20.0));
        scene.insert(rock(30.0));

        let report = cull(&looking_down_neg_z(), scene.iter());
        assert_eq!(report.visible, vec![ahead]);
        assert_eq!(report.culled, 2);
        assert_eq!(report.total(), 3);
    }
}
