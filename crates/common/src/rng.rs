use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Small linear congruential generator used for world layout.
///
/// All arithmetic is integer, so a seed lays out the same beach on every
/// platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u64,
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % MODULUS,
        }
    }

    pub fn seed(&self) -> u64 {
        self.state
    }

    /// Next value in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f32 / MODULUS as f32
    }

    /// Next value in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Next value in `[-half, half)`.
    pub fn centered(&mut self, half: f32) -> f32 {
        (self.next_f32() - 0.5) * 2.0 * half
    }
}
