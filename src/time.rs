//! Time facilities for the generators.
//!
//! Two clocks live here:
//!
//! - [`Clock`] is simulated time. Each generator owns one and advances it by a
//!   parameter-dependent step per tick. It stops accumulating while paused.
//! - [`FrameTimer`] measures real wall-clock time between frames, for the
//!   generators whose motion is specified in seconds (flux, mesh, terrain).
//!
//! [`TickContext`] bundles what every generator needs to know about the
//! current tick.
//!
//! # Example
//!
//! ```
//! use morphgen::time::Clock;
//!
//! let mut clock = Clock::new();
//! clock.advance(0.5);
//! clock.set_paused(true);
//! clock.advance(0.5);
//! assert_eq!(clock.elapsed(), 0.5);
//! ```

use std::time::Instant;

use crate::params::Viewport;

/// Longest real-time step handed to a generator, in seconds.
///
/// A frame that arrives after a long stall (debugger, minimized window) would
/// otherwise teleport time-driven particles.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Simulated time that only advances while not paused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clock {
    elapsed: f32,
    paused: bool,
}

impl Clock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `step` unless paused.
    ///
    /// Returns the elapsed time after the step.
    pub fn advance(&mut self, step: f32) -> f32 {
        if !self.paused && step.is_finite() {
            self.elapsed += step;
        }
        self.elapsed
    }

    /// Total accumulated time.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Follow an externally owned pause flag.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// Wall-clock frame timing for the loop driving the engine.
#[derive(Debug)]
pub struct FrameTimer {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
}

impl FrameTimer {
    /// Create a new frame timer starting from now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_secs: 0.0,
            frame_count: 0,
        }
    }

    /// Measure the time since the previous frame. Call once per frame.
    ///
    /// The result is capped at [`MAX_FRAME_DELTA`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_secs = now
            .duration_since(self.last_frame)
            .as_secs_f32()
            .clamp(0.0, MAX_FRAME_DELTA);
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a generator needs to know about the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Size of the drawing surface.
    pub viewport: Viewport,
    /// Real seconds since the previous tick.
    pub delta: f32,
    /// Whether the snapshot asks for the animation to be frozen.
    pub paused: bool,
    /// Engine tick counter, advanced on every tick including paused ones.
    pub frame: u64,
}

impl TickContext {
    /// Context for a running tick at 60 FPS.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            delta: 1.0 / 60.0,
            paused: false,
            frame: 0,
        }
    }

    /// Builder-style pause flag.
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Builder-style real-time delta.
    pub fn with_delta(mut self, delta: f32) -> Self {
        self.delta = delta;
        self
    }

    /// Builder-style frame counter.
    pub fn with_frame(mut self, frame: u64) -> Self {
        self.frame = frame;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        assert_eq!(clock.elapsed(), 0.0);
        clock.advance(0.25);
        assert_eq!(clock.advance(0.25), 0.5);
        assert_eq!(clock.elapsed(), 0.5);
    }

    #[test]
    fn test_clock_pause() {
        let mut clock = Clock::new();
        clock.advance(1.0);
        clock.set_paused(true);
        for _ in 0..10 {
            clock.advance(0.1);
        }
        assert_eq!(clock.elapsed(), 1.0);

        clock.set_paused(false);
        clock.advance(0.5);
        assert_eq!(clock.elapsed(), 1.5);
    }

    #[test]
    fn test_clock_ignores_non_finite_step() {
        let mut clock = Clock::new();
        clock.advance(f32::NAN);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_stalled_frame_is_capped() {
        let mut timer = FrameTimer::new();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(timer.tick(), MAX_FRAME_DELTA);
        assert_eq!(timer.delta(), MAX_FRAME_DELTA);
        assert_eq!(timer.frame(), 1);

        let delta = timer.tick();
        assert!((0.0..MAX_FRAME_DELTA).contains(&delta));
        assert_eq!(timer.frame(), 2);
    }
}
