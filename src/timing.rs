//! Frame timing.
//!
//! [`FrameClock`] reads a monotonic [`Clock`] once per frame and keeps the
//! previous reading around. The render loop uses the previous reading to scale
//! movement and the difference between the two to report a frame rate.

use std::time::{Duration, Instant};

/// A monotonic source of "time since start".
pub trait Clock {
    /// Time elapsed since the clock started. Never decreases.
    fn elapsed(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Starts counting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Timing of one frame as seen by [`FrameClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Clock reading taken by the previous tick.
    pub previous_elapsed: Duration,
    /// Clock reading taken by this tick.
    pub current_elapsed: Duration,
}

impl FrameTiming {
    /// Time between the two readings.
    pub fn delta(&self) -> Duration {
        self.current_elapsed.saturating_sub(self.previous_elapsed)
    }

    /// Instantaneous frame rate, `None` when both readings are equal.
    pub fn fps(&self) -> Option<f32> {
        let delta = self.delta().as_secs_f32();
        if delta > 0.0 { Some(1.0 / delta) } else { None }
    }
}

/// Tracks the previous and current clock readings across frames.
///
/// Readings are measured from an origin, which [`FrameClock::restart`] moves
/// to the clock's current time.
#[derive(Debug)]
pub struct FrameClock<K: Clock> {
    clock: K,
    origin: Duration,
    previous_elapsed: Duration,
    frame_count: u32,
    last_report: Duration,
    current_fps: u32,
}

impl<K: Clock> FrameClock<K> {
    /// Starts tracking from the clock's current reading.
    pub fn new(clock: K) -> Self {
        let origin = clock.elapsed();
        Self {
            clock,
            origin,
            previous_elapsed: Duration::ZERO,
            frame_count: 0,
            last_report: Duration::ZERO,
            current_fps: 0,
        }
    }

    /// Moves the origin to now and forgets every earlier reading.
    pub fn restart(&mut self) {
        self.origin = self.clock.elapsed();
        self.previous_elapsed = Duration::ZERO;
        self.frame_count = 0;
        self.last_report = Duration::ZERO;
        self.current_fps = 0;
    }

    /// Reading stored by the last [`FrameClock::advance`].
    pub fn previous_elapsed(&self) -> Duration {
        self.previous_elapsed
    }

    /// Time since the origin, without advancing.
    pub fn now(&self) -> Duration {
        self.clock.elapsed().saturating_sub(self.origin)
    }

    /// Frames counted over the last full second.
    #[cfg(test)]
    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    /// Stores `current` as the previous reading and returns the timing of the
    /// frame that just ended.
    pub fn advance(&mut self, current: Duration) -> FrameTiming {
        let timing = FrameTiming {
            previous_elapsed: self.previous_elapsed,
            current_elapsed: current.max(self.previous_elapsed),
        };
        self.previous_elapsed = timing.current_elapsed;

        self.frame_count += 1;
        if timing
            .current_elapsed
            .saturating_sub(self.last_report)
            .as_secs_f32()
            >= 1.0
        {
            self.current_fps = self.frame_count;
            self.frame_count = 0;
            self.last_report = timing.current_elapsed;
            tracing::debug!(fps = self.current_fps, "frame rate");
        }

        timing
    }

    /// Reads the clock and advances in one step.
    #[cfg(test)]
    pub fn tick(&mut self) -> FrameTiming {
        let current = self.now();
        self.advance(current)
    }
}
