use glam::Vec3;
use serde::{Deserialize, Serialize};
use shoreline_common::{EntityId, SeededRng};
use std::f32::consts::TAU;

/// Layout and behaviour of the collectible orbs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub count: usize,
    /// Orbs are scattered over `[-half_extent, half_extent]` on X and Z.
    pub half_extent: f32,
    /// Rest height above the ground.
    pub lift: f32,
    pub bob_amplitude: f32,
    /// Angular frequency of the bob in radians per second.
    pub bob_frequency: f32,
    /// Pickup happens when the character is strictly closer than this.
    pub pickup_radius: f32,
    /// Bobbing is refreshed at most this often (seconds).
    pub update_interval: f32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            count: 20,
            half_extent: 100.0,
            lift: 1.5,
            bob_amplitude: 0.2,
            bob_frequency: 2.0,
            pickup_radius: 1.8,
            update_interval: 1.0 / 60.0,
        }
    }
}

/// A collectible hovering above the sand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub id: EntityId,
    pub position: Vec3,
    pub initial_y: f32,
    pub phase: f32,
    pub collected: bool,
}

/// The set of orbs still in play plus the pickup tally.
#[derive(Debug, Clone)]
pub struct OrbField {
    config: OrbConfig,
    orbs: Vec<Orb>,
    collected: u32,
    last_update: f32,
}

impl OrbField {
    pub fn new(config: OrbConfig) -> Self {
        Self {
            config,
            orbs: Vec::new(),
            collected: 0,
            last_update: 0.0,
        }
    }

    /// Scatter `config.count` orbs, each lifted above the ground height
    /// reported by `height`.
    pub fn scatter(config: OrbConfig, rng: &mut SeededRng, height: impl Fn(f32, f32) -> f32) -> Self {
        let mut field = Self::new(config);
        for _ in 0..config.count {
            let x = rng.centered(config.half_extent);
            let z = rng.centered(config.half_extent);
            let y = height(x, z) + config.lift;
            let phase = rng.next_f32() * TAU;
            field.spawn(Vec3::new(x, y, z), phase);
        }
        tracing::debug!(count = field.orbs.len(), "orbs scattered");
        field
    }

    pub fn spawn(&mut self, position: Vec3, phase: f32) -> EntityId {
        let id = EntityId::new();
        self.orbs.push(Orb {
            id,
            position,
            initial_y: position.y,
            phase,
            collected: false,
        });
        id
    }

    pub fn config(&self) -> &OrbConfig {
        &self.config
    }

    pub fn active(&self) -> &[Orb] {
        &self.orbs
    }

    pub fn remaining(&self) -> usize {
        self.orbs.len()
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    /// Bob every orb around its rest height. Throttled to
    /// `config.update_interval`; returns whether positions changed.
    pub fn bob(&mut self, elapsed: f32) -> bool {
        if elapsed - self.last_update <= self.config.update_interval {
            return false;
        }
        let c = self.config;
        for orb in &mut self.orbs {
            orb.position.y =
                orb.initial_y + (elapsed * c.bob_frequency + orb.phase).sin() * c.bob_amplitude;
        }
        self.last_update = elapsed;
        true
    }

    /// Remove every orb within `radius` of `position` and add them to the
    /// tally. Returns the ids removed.
    pub fn collect_within(&mut self, position: Vec3, radius: f32) -> Vec<EntityId> {
        let mut taken = Vec::new();
        self.orbs.retain_mut(|orb| {
            if orb.position.distance(position) < radius {
                orb.collected = true;
                taken.push(orb.id);
                false
            } else {
                true
            }
        });
        for id in &taken {
            self.collected += 1;
            tracing::info!(orb = %id.short(), total = self.collected, "collected orb");
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_deterministic() {
        let a = OrbField::scatter(OrbConfig::default(), &mut SeededRng::new(2), |_, _| 0.0);
        let b = OrbField::scatter(OrbConfig::default(), &mut SeededRng::new(2), |_, _| 0.0);
        assert_eq!(a.remaining(), 20);
        for (x, y) in a.active().iter().zip(b.active()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.phase, y.phase);
        }
    }

    #[test]
    fn scatter_lifts_above_ground() {
        let field = OrbField::scatter(OrbConfig::default(), &mut SeededRng::new(2), |x, _| x * 0.01);
        for orb in field.active() {
            assert!((orb.position.y - (orb.position.x * 0.01 + 1.5)).abs() < 1e-5);
            assert!(orb.position.x.abs() <= 100.0 && orb.position.z.abs() <= 100.0);
            assert!((0.0..TAU).contains(&orb.phase));
        }
    }

    #[test]
    fn bob_stays_within_amplitude_and_is_throttled() {
        let mut field = OrbField::new(OrbConfig::default());
        field.spawn(Vec3::new(0.0, 2.0, 0.0), 0.3);
        assert!(!field.bob(0.001));
        assert!(field.bob(0.5));
        assert!(!field.bob(0.505));
        let y = field.active()[0].position.y;
        assert!((y - 2.0).abs() <= 0.2 + 1e-6);
        assert!((y - (2.0 + (0.5f32 * 2.0 + 0.3).sin() * 0.2)).abs() < 1e-6);
    }

    #[test]
    fn pickup_removes_and_counts_once() {
        let mut field = OrbField::new(OrbConfig::default());
        let near = field.spawn(Vec3::new(0.5, 0.0, 0.0), 0.0);
        field.spawn(Vec3::new(10.0, 0.0, 0.0), 0.0);
        let taken = field.collect_within(Vec3::ZERO, 1.8);
        assert_eq!(taken, vec![near]);
        assert_eq!(field.collected(), 1);
        assert_eq!(field.remaining(), 1);
        assert!(field.collect_within(Vec3::ZERO, 1.8).is_empty());
        assert_eq!(field.collected(), 1);
    }
}
