use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoreline_common::{EntityId, Transform};
use std::collections::BTreeMap;

/// How texel values in a texture should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Linear,
    Srgb,
}

/// A texture bound to a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSlot {
    pub path: String,
    pub color_space: ColorSpace,
}

impl TextureSlot {
    pub fn linear(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            color_space: ColorSpace::Linear,
        }
    }
}

/// Surface description. The texture slot is optional: untextured props carry
/// only a base color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub base_color: [f32; 4],
    pub texture: Option<TextureSlot>,
}

impl Material {
    pub fn solid(rgb: u32) -> Self {
        Self {
            base_color: unpack_rgb(rgb),
            texture: None,
        }
    }

    pub fn textured(rgb: u32, path: impl Into<String>) -> Self {
        Self {
            base_color: unpack_rgb(rgb),
            texture: Some(TextureSlot::linear(path)),
        }
    }
}

fn unpack_rgb(rgb: u32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

/// What a prop is, which decides its default look and rough size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropKind {
    Terrain,
    Water,
    PalmTree,
    Rock,
    Orb,
}

impl PropKind {
    /// Bounding sphere radius at unit scale, centred on the prop origin.
    pub fn base_radius(self) -> f32 {
        match self {
            Self::Terrain | Self::Water => 800.0 * std::f32::consts::FRAC_1_SQRT_2,
            Self::PalmTree => 9.0,
            Self::Rock => 1.0,
            Self::Orb => 0.3,
        }
    }
}

/// Capability interface for anything the renderer can draw.
///
/// Callers ask for the texture slot instead of probing for one.
pub trait SceneObject {
    fn name(&self) -> &str;
    fn transform(&self) -> &Transform;
    fn texture(&self) -> Option<&TextureSlot>;
    fn texture_mut(&mut self) -> Option<&mut TextureSlot>;
    /// World-space bounding sphere `(center, radius)`.
    fn bounds(&self) -> (Vec3, f32);
}

/// A placed scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub name: String,
    pub kind: PropKind,
    pub transform: Transform,
    pub material: Material,
}

impl Prop {
    pub fn new(kind: PropKind, name: impl Into<String>, transform: Transform, material: Material) -> Self {
        Self {
            name: name.into(),
            kind,
            transform,
            material,
        }
    }
}

impl SceneObject for Prop {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn texture(&self) -> Option<&TextureSlot> {
        self.material.texture.as_ref()
    }

    fn texture_mut(&mut self) -> Option<&mut TextureSlot> {
        self.material.texture.as_mut()
    }

    fn bounds(&self) -> (Vec3, f32) {
        let scale = self.transform.scale.max_element();
        (self.transform.position, self.kind.base_radius() * scale)
    }
}

/// Events produced by scene mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    Added { id: EntityId, kind: PropKind },
    Removed { id: EntityId, kind: PropKind },
}

/// Deterministic prop storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    props: BTreeMap<EntityId, Prop>,
    #[serde(skip)]
    events: Vec<SceneEvent>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prop: Prop) -> EntityId {
        let id = EntityId::new();
        self.insert_with_id(id, prop);
        id
    }

    pub fn insert_with_id(&mut self, id: EntityId, prop: Prop) {
        self.events.push(SceneEvent::Added {
            id,
            kind: prop.kind,
        });
        self.props.insert(id, prop);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Prop> {
        let removed = self.props.remove(&id);
        if let Some(ref p) = removed {
            self.events.push(SceneEvent::Removed { id, kind: p.kind });
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Prop> {
        self.props.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Prop> {
        self.props.get_mut(&id)
    }

    /// Move a prop without logging; used for per-frame animation.
    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> bool {
        match self.props.get_mut(&id) {
            Some(p) => {
                p.transform.position = position;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Prop)> {
        self.props.iter().map(|(id, p)| (*id, p))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn count_of(&self, kind: PropKind) -> usize {
        self.props.values().filter(|p| p.kind == kind).count()
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Mark every color texture as sRGB. Returns how many slots changed.
    pub fn apply_srgb_textures(&mut self) -> usize {
        let mut changed = 0;
        for prop in self.props.values_mut() {
            if let Some(slot) = prop.texture_mut()
                && slot.color_space != ColorSpace::Srgb
            {
                slot.color_space = ColorSpace::Srgb;
                changed += 1;
            }
        }
        changed
    }
}
