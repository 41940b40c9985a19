use crate::renderer::{RenderView, Renderer};
use shoreline_kernel::{Clock, FrameReport, Session};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of recent frame times.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(frame_time);
    }

    pub fn count(&self) -> usize {
        self.window.len()
    }

    pub fn average(&self) -> Duration {
        match self.window.len() {
            0 => Duration::ZERO,
            n => self.window.iter().sum::<Duration>() / n as u32,
        }
    }

    pub fn max(&self) -> Duration {
        self.window.iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.window.iter().copied().min().unwrap_or_default()
    }
}

/// One tick's results.
#[derive(Debug)]
pub struct TickOutput<T> {
    pub report: FrameReport,
    pub view: RenderView,
    pub output: T,
}

/// Drives a session from a clock: delta, update, view, render, in that order.
#[derive(Debug)]
pub struct FrameDriver<C: Clock> {
    clock: C,
    timer: FrameTimer,
    aspect: f32,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C, aspect: f32) -> Self {
        Self {
            clock,
            timer: FrameTimer::new(120),
            aspect,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn tick<R: Renderer>(&mut self, session: &mut Session, renderer: &R) -> TickOutput<R::Output> {
        let _span = tracing::trace_span!("frame", n = session.frame() + 1).entered();
        let started = Instant::now();

        let dt = self.clock.delta();
        let report = session.update(dt, self.clock.elapsed());
        let view = RenderView::from_rig(session.camera(), self.aspect);
        let output = renderer.render(session, &view);

        self.timer.record(started.elapsed());
        TickOutput {
            report,
            view,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoreline_input::{InputEvent, Key};
    use shoreline_kernel::{FixedClock, Tuning};
    use shoreline_terrain::HeightField;

    /// Records what the renderer saw, to check the update ran first.
    struct Probe;

    impl Renderer for Probe {
        type Output = (u64, glam::Vec3);

        fn render(&self, session: &Session, view: &RenderView) -> Self::Output {
            (session.frame(), view.target - session.character().position())
        }
    }

    #[test]
    fn frame_timer_window() {
        let mut timer = FrameTimer::new(2);
        assert_eq!(timer.average(), Duration::ZERO);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(20));
    }

    #[test]
    fn render_sees_this_frames_camera() {
        let mut session = Session::new(Tuning::default());
        session.set_terrain(HeightField::flat(200.0, 20));
        session.handle_input(InputEvent::KeyDown(Key::W));
        let mut driver = FrameDriver::new(FixedClock::from_fps(60.0), 1.0);
        for n in 1..=90 {
            let tick = driver.tick(&mut session, &Probe);
            let (frame, offset) = tick.output;
            assert_eq!(frame, n);
            // Look target sits exactly above this frame's character.
            assert!((offset - glam::Vec3::Y).length() < 1e-5);
        }
        assert_eq!(driver.timer().count(), 90);
        assert_eq!(driver.clock().frames(), 90);
    }

    #[test]
    fn elapsed_comes_from_the_clock() {
        let mut session = Session::new(Tuning::default());
        let mut driver = FrameDriver::new(FixedClock::new(0.5), 1.0);
        driver.tick(&mut session, &Probe);
        driver.tick(&mut session, &Probe);
        assert_eq!(session.elapsed(), 1.0);
    }
}
