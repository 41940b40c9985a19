use std::time::{Duration, Instant};

/// Source of frame timing.
pub trait Clock {
    /// Seconds since the previous call. Advances the clock.
    fn delta(&mut self) -> f32;
    /// Seconds since the clock started, as of the last `delta` call.
    fn elapsed(&self) -> f32;
}

/// Wall clock. Long stalls (debugger, window drag) are reported as at most
/// `max_delta` so one frame cannot launch the character across the map.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    last: Instant,
    max_delta: Duration,
}

impl SystemClock {
    pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self::with_max_delta(Self::DEFAULT_MAX_DELTA)
    }

    pub fn with_max_delta(max_delta: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            max_delta,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).min(self.max_delta);
        self.last = now;
        dt.as_secs_f32()
    }

    fn elapsed(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }
}

/// Deterministic clock advancing a fixed step per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f32,
    frames: u64,
}

impl FixedClock {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(0.0),
            frames: 0,
        }
    }

    pub fn from_fps(fps: f32) -> Self {
        Self::new(if fps > 0.0 { 1.0 / fps } else { 0.0 })
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Clock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.frames += 1;
        self.step
    }

    fn elapsed(&self) -> f32 {
        self.frames as f32 * self.step
    }
}
