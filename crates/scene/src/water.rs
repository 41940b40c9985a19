use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub base_level: f32,
    pub swell: f32,
    pub base_opacity: f32,
    pub shimmer: f32,
    pub update_interval: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            base_level: 1.2,
            swell: 0.05,
            base_opacity: 0.5,
            shimmer: 0.05,
            update_interval: 1.0 / 60.0,
        }
    }
}

/// The sea plane: a slow swell in height and a shimmer in opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Water {
    config: WaterConfig,
    level: f32,
    opacity: f32,
    last_update: f32,
}

impl Water {
    pub fn new(config: WaterConfig) -> Self {
        Self {
            config,
            level: config.base_level,
            opacity: config.base_opacity,
            last_update: 0.0,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Returns whether the water changed this call.
    pub fn update(&mut self, elapsed: f32) -> bool {
        if elapsed - self.last_update <= self.config.update_interval {
            return false;
        }
        let c = self.config;
        self.level = c.base_level + elapsed.sin() * c.swell;
        self.opacity = c.base_opacity + (elapsed + 0.1).sin() * c.shimmer;
        self.last_update = elapsed;
        true
    }
}
