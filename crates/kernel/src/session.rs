use crate::character::{CharacterState, MotionState};
use crate::config::{ConfigError, Tuning};
use glam::Vec3;
use shoreline_assets::{
    AnimationMixer, AssetLoad, CharacterRig, FileRigLoader, PendingAsset, RigLoader,
};
use shoreline_camera::CameraRig;
use shoreline_common::{EntityId, SeededRng, Transform};
use shoreline_input::{Action, InputEvent, InputState};
use shoreline_scene::{
    CoastlinePlanter, Material, OrbField, Prop, PropKind, SceneEvent, SceneGraph, Water,
    scatter_rocks,
};
use shoreline_terrain::HeightField;

const SAND: u32 = 0xedc9af;
const SEA: u32 = 0x0077ff;
const ORB_GLOW: u32 = 0xffef50;
const SAND_TEXTURE: &str = "textures/sand_basecolor.png";

/// What happened during one [`Session::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub motion: MotionState,
    pub collected: Vec<EntityId>,
    /// The character rig finished loading (or fell back) this frame.
    pub rig_installed: bool,
    /// Props added or removed since the previous update, oldest first.
    pub scene_events: Vec<SceneEvent>,
}

/// The world context: every piece of state the frame loop touches.
///
/// Terrain is optional; until it is installed the character has no ground
/// and every height query reads zero.
pub struct Session {
    tuning: Tuning,
    terrain: Option<HeightField>,
    character: CharacterState,
    camera: CameraRig,
    input: InputState,
    orbs: OrbField,
    water: Water,
    water_prop: Option<EntityId>,
    scene: SceneGraph,
    mixer: AnimationMixer,
    rig: Option<CharacterRig>,
    pending_rig: Option<PendingAsset<CharacterRig>>,
    frame: u64,
    elapsed: f32,
}

impl Session {
    /// An empty beach: character and camera only, no terrain, no props.
    /// The fallback rig is installed on the first update.
    pub fn new(tuning: Tuning) -> Self {
        let character = CharacterState::new(tuning.locomotion);
        let camera = CameraRig::new(tuning.camera, character.position());
        Self {
            orbs: OrbField::new(tuning.orbs),
            water: Water::new(tuning.world.water),
            water_prop: None,
            terrain: None,
            character,
            camera,
            input: InputState::new(),
            scene: SceneGraph::new(),
            mixer: AnimationMixer::new(),
            rig: None,
            pending_rig: Some(PendingAsset::ready(CharacterRig::fallback())),
            frame: 0,
            elapsed: 0.0,
            tuning,
        }
    }

    /// The full demo world: dune terrain, sea, palms, rocks and orbs, with
    /// the character rig loading from disk if a manifest is configured.
    ///
    /// Fails only when `tuning` does not pass [`Tuning::validate`].
    pub fn build(tuning: Tuning) -> Result<Self, ConfigError> {
        Self::build_with_loader(tuning, &FileRigLoader::new())
    }

    pub fn build_with_loader(tuning: Tuning, loader: &dyn RigLoader) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let world = tuning.world.clone();
        let mut session = Self::new(tuning);
        if let Some(path) = &world.rig_manifest {
            session.pending_rig = Some(loader.load(path));
        }
        session.set_terrain(HeightField::beach(world.terrain_size, world.terrain_segments));
        session.populate();
        tracing::info!(
            seed = world.seed,
            props = session.scene.len(),
            orbs = session.orbs.remaining(),
            "session built"
        );
        Ok(session)
    }

    pub fn set_terrain(&mut self, terrain: HeightField) {
        let size = terrain.size();
        self.terrain = Some(terrain);
        self.scene.insert(Prop::new(
            PropKind::Terrain,
            "terrain",
            Transform {
                scale: Vec3::new(size / 800.0, 1.0, size / 800.0),
                ..Transform::default()
            },
            Material::textured(SAND, SAND_TEXTURE),
        ));
    }

    fn populate(&mut self) {
        let world = self.tuning.world.clone();
        let mut rng = SeededRng::new(world.seed);

        self.water_prop = Some(self.scene.insert(Prop::new(
            PropKind::Water,
            "water",
            Transform::at(Vec3::new(0.0, self.water.level(), 0.0)),
            Material::solid(SEA),
        )));

        let query = world.height_query;
        let terrain = self.terrain.as_ref();
        let height = |x: f32, z: f32| query.height_at(terrain, x, z);

        let palms = CoastlinePlanter::new(world.coastline).plant(&mut rng, height);
        let rocks = scatter_rocks(&world.rocks, &mut rng);
        let orbs = OrbField::scatter(self.tuning.orbs, &mut rng, height);

        for prop in palms.into_iter().chain(rocks) {
            self.scene.insert(prop);
        }
        self.orbs = orbs;
        let orb_props: Vec<_> = self
            .orbs
            .active()
            .iter()
            .map(|orb| (orb.id, orb_prop(orb.position)))
            .collect();
        for (id, prop) in orb_props {
            self.scene.insert_with_id(id, prop);
        }

        let srgb = self.scene.apply_srgb_textures();
        tracing::debug!(textures = srgb, "color textures marked sRGB");
    }

    /// Place one orb, e.g. for scripted pickups.
    pub fn spawn_orb(&mut self, position: Vec3, phase: f32) -> EntityId {
        let id = self.orbs.spawn(position, phase);
        self.scene.insert_with_id(id, orb_prop(position));
        id
    }

    /// Route one host event. Jump presses act immediately.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Action> {
        let action = self.input.apply(event);
        if action == Some(Action::Jump) {
            self.character.try_jump();
        }
        action
    }

    /// Run one frame in the fixed order: assets, look input, animation,
    /// locomotion and pickup, decorations, camera.
    pub fn update(&mut self, dt: f32, elapsed: f32) -> FrameReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.frame += 1;
        let rig_installed = self.poll_rig();

        let look = self.input.take_mouse_delta();
        if self.input.mouse_look() {
            self.camera.apply_mouse_look(look);
        }

        self.mixer.update(dt);

        self.character
            .integrate(&self.input, self.camera.orientation(), self.terrain.as_ref(), dt);
        let motion = self.character.motion();
        if self.rig.is_some() {
            let l = self.tuning.locomotion;
            if let Err(e) = self.mixer.follow_locomotion(
                motion == MotionState::Moving,
                self.character.speed(),
                l.max_speed,
                l.animation_fade,
            ) {
                tracing::warn!(error = %e, "gait animation skipped");
            }
        }
        let collected = self
            .orbs
            .collect_within(self.character.position(), self.tuning.orbs.pickup_radius);
        for id in &collected {
            self.scene.remove(*id);
        }

        if self.water.update(elapsed)
            && let Some(id) = self.water_prop
        {
            self.scene
                .set_position(id, Vec3::new(0.0, self.water.level(), 0.0));
        }
        if self.orbs.bob(elapsed) {
            for orb in self.orbs.active() {
                self.scene.set_position(orb.id, orb.position);
            }
        }

        self.camera.update(
            self.character.position(),
            self.character.planar_velocity(),
            self.input.mouse_look(),
            self.terrain.as_ref(),
            dt,
        );

        self.elapsed = elapsed;
        tracing::trace!(
            frame = self.frame,
            speed = self.character.speed(),
            y = self.character.position().y,
            "frame"
        );
        FrameReport {
            frame: self.frame,
            motion,
            collected,
            rig_installed,
            scene_events: self.scene.drain_events(),
        }
    }

    fn poll_rig(&mut self) -> bool {
        let Some(pending) = self.pending_rig.as_mut() else {
            return false;
        };
        let rig = match pending.poll() {
            AssetLoad::Pending => return false,
            AssetLoad::Ready(rig) => {
                tracing::info!(rig = %rig.name, clips = rig.clips.len(), "character rig loaded");
                rig
            }
            AssetLoad::Failed(e) => {
                tracing::warn!(error = %e, "character rig failed to load, using fallback");
                CharacterRig::fallback()
            }
        };
        self.pending_rig = None;
        self.character.set_capsule_radius(rig.capsule_radius());
        self.mixer = AnimationMixer::for_rig(&rig);
        self.rig = Some(rig);
        true
    }

    /// Ground height under `(x, z)`.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.tuning
            .world
            .height_query
            .height_at(self.terrain.as_ref(), x, z)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn terrain(&self) -> Option<&HeightField> {
        self.terrain.as_ref()
    }

    pub fn character(&self) -> &CharacterState {
        &self.character
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn orbs(&self) -> &OrbField {
        &self.orbs
    }

    pub fn water(&self) -> &Water {
        &self.water
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn rig(&self) -> Option<&CharacterRig> {
        self.rig.as_ref()
    }

    pub fn rig_pending(&self) -> bool {
        self.pending_rig.is_some()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// FNV-1a over the simulated state, for comparing runs. Entity ids are
    /// random per run and left out.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.frame.to_le_bytes());
        let c = &self.character;
        for v in [
            c.position().x,
            c.position().y,
            c.position().z,
            c.facing(),
            c.planar_velocity().x,
            c.planar_velocity().y,
            c.vertical_velocity(),
        ] {
            mix(&v.to_le_bytes());
        }
        let q = self.camera.orientation();
        let p = self.camera.position();
        for v in [q.x, q.y, q.z, q.w, p.x, p.y, p.z] {
            mix(&v.to_le_bytes());
        }
        mix(&self.orbs.collected().to_le_bytes());
        for orb in self.orbs.active() {
            for v in orb.position.to_array() {
                mix(&v.to_le_bytes());
            }
        }
        h
    }
}

fn orb_prop(position: Vec3) -> Prop {
    Prop::new(
        PropKind::Orb,
        "orb",
        Transform::at(position),
        Material::solid(ORB_GLOW),
    )
}
