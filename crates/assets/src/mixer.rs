use crate::AssetError;
use crate::rig::CharacterRig;
use std::collections::BTreeMap;

pub const IDLE: &str = "idle";
pub const WALK: &str = "walk";
pub const RUN: &str = "run";

const WALK_TIME_SCALE: f32 = 2.0;
const MOVING_SPEED: f32 = 0.01;
const MIN_RUN_SCALE: f32 = 0.7;
const MAX_RUN_SCALE: f32 = 2.0;

/// Playback state of one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipAction {
    pub duration: f32,
    /// Playhead, seconds, wrapped into the clip.
    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    /// Weight change per second while fading; zero when settled.
    pub fade_rate: f32,
    pub playing: bool,
}

impl ClipAction {
    fn new(duration: f32, time_scale: f32) -> Self {
        Self {
            duration,
            time: 0.0,
            time_scale,
            weight: 0.0,
            fade_rate: 0.0,
            playing: false,
        }
    }

    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        if self.duration > 0.0 {
            self.time = (self.time + dt * self.time_scale).rem_euclid(self.duration);
        }
        if self.fade_rate != 0.0 {
            self.weight = (self.weight + self.fade_rate * dt).clamp(0.0, 1.0);
            if self.fade_rate < 0.0 && self.weight <= 0.0 {
                self.playing = false;
                self.fade_rate = 0.0;
            } else if self.fade_rate > 0.0 && self.weight >= 1.0 {
                self.fade_rate = 0.0;
            }
        }
    }
}

fn fade_rate(duration: f32) -> f32 {
    if duration > 0.0 { 1.0 / duration } else { f32::MAX }
}

/// Cross-fading clip player for the character.
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    actions: BTreeMap<String, ClipAction>,
    active: Option<String>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// One action per rig clip, walk at double speed, idle playing.
    pub fn for_rig(rig: &CharacterRig) -> Self {
        let mut mixer = Self::new();
        for (name, duration) in &rig.clips {
            let scale = if name == WALK { WALK_TIME_SCALE } else { 1.0 };
            mixer
                .actions
                .insert(name.clone(), ClipAction::new(*duration, scale));
        }
        mixer.play(IDLE);
        mixer
    }

    pub fn action(&self, clip: &str) -> Option<&ClipAction> {
        self.actions.get(clip)
    }

    /// Clip most recently started with [`play`](Self::play) or
    /// [`fade_to`](Self::fade_to).
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Start `clip` at full weight. Returns false if the clip is unknown.
    pub fn play(&mut self, clip: &str) -> bool {
        let Some(action) = self.actions.get_mut(clip) else {
            return false;
        };
        action.playing = true;
        action.weight = 1.0;
        action.fade_rate = 0.0;
        self.active = Some(clip.to_string());
        true
    }

    pub fn fade_in(&mut self, clip: &str, duration: f32) -> bool {
        let Some(action) = self.actions.get_mut(clip) else {
            return false;
        };
        action.playing = true;
        action.weight = 0.0;
        action.fade_rate = fade_rate(duration);
        true
    }

    pub fn fade_out(&mut self, clip: &str, duration: f32) -> bool {
        let Some(action) = self.actions.get_mut(clip) else {
            return false;
        };
        if action.playing {
            action.fade_rate = -fade_rate(duration);
        }
        true
    }

    /// Cross-fade from the active clip to `clip` over `duration` seconds. The
    /// incoming clip restarts from the beginning. No-op if already active.
    pub fn fade_to(&mut self, clip: &str, duration: f32) -> Result<(), AssetError> {
        if self.active.as_deref() == Some(clip) {
            return Ok(());
        }
        let Some(action) = self.actions.get_mut(clip) else {
            return Err(AssetError::MissingClip {
                rig: "mixer".into(),
                clip: clip.to_string(),
            });
        };
        action.time = 0.0;
        if let Some(previous) = self.active.take() {
            self.fade_out(&previous, duration);
        }
        self.fade_in(clip, duration);
        tracing::trace!(clip, duration, "animation cross-fade");
        self.active = Some(clip.to_string());
        Ok(())
    }

    pub fn set_time_scale(&mut self, clip: &str, scale: f32) -> bool {
        match self.actions.get_mut(clip) {
            Some(action) => {
                action.time_scale = scale;
                true
            }
            None => false,
        }
    }

    /// Playing with some weight.
    pub fn is_running(&self, clip: &str) -> bool {
        self.actions
            .get(clip)
            .is_some_and(|a| a.playing && a.weight > 0.0)
    }

    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for action in self.actions.values_mut() {
            action.advance(dt);
        }
    }

    /// Pick the clip for the character's gait: run, sped up with planar
    /// speed, while moving; idle otherwise.
    pub fn follow_locomotion(
        &mut self,
        moving: bool,
        speed: f32,
        max_speed: f32,
        fade: f32,
    ) -> Result<(), AssetError> {
        if moving && speed > MOVING_SPEED {
            self.fade_to(RUN, fade)?;
            let ratio = if max_speed > 0.0 { speed / max_speed } else { 1.0 };
            self.set_time_scale(RUN, (ratio * 2.0).clamp(MIN_RUN_SCALE, MAX_RUN_SCALE));
        } else {
            self.fade_to(IDLE, fade)?;
        }
        Ok(())
    }
}
