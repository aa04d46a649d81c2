//! Organic blob outline.
//!
//! The outline is a circle of `base_radius` whose vertices are pushed in and
//! out by two phase-shifted waves running around it. Chaos scales how far a
//! vertex may move, at most 40% of the radius, which keeps the outline from
//! folding over itself.

use std::f32::consts::TAU;

use glam::Vec2;
use tracing::trace;

use crate::color::Fill;
use crate::params::{BlobParams, ParamRange};
use crate::spline::{self, Path};
use crate::time::{Clock, TickContext};

/// Largest displacement as a fraction of the base radius (at chaos 100).
pub const MAX_DISTORTION: f32 = 0.4;

/// Lobe counts reachable through warp.
pub const RIPPLE_FREQUENCY: ParamRange = ParamRange::new(2.0, 10.0);

/// Clock step per tick at motion speed 0.
pub const BASE_STEP: f32 = 0.001;
/// Additional clock step per unit of motion speed.
pub const SPEED_STEP: f32 = 0.0005;

/// Number of ripples around the outline for a warp value.
///
/// Rounded to whole lobes so the outline joins up seamlessly at angle 0.
pub fn ripple_frequency(warp: f32) -> f32 {
    RIPPLE_FREQUENCY.lerp(BlobParams::WARP.clamp(warp) / 100.0).round()
}

/// Radius of the outline at `angle`.
pub fn radius_at(angle: f32, time: f32, params: &BlobParams) -> f32 {
    let frequency = ripple_frequency(params.warp);
    let n1 = (angle * frequency + time).sin();
    let n2 = (angle * frequency * 2.0 - time * 1.5).cos();
    let noise = (n1 + n2) * 0.5;

    let max_distortion = params.base_radius * MAX_DISTORTION * (params.chaos / 100.0);
    params.base_radius + noise * max_distortion
}

/// Control points of the outline at `time`, centered on the origin.
///
/// `params` is clamped first.
pub fn generate(time: f32, params: &BlobParams) -> Vec<Vec2> {
    let params = params.clamped();
    let count = params.vertex_count();

    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let radius = radius_at(angle, time, &params);
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// One rendered blob.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobFrame {
    /// Blob time this frame was generated at.
    pub time: f32,
    /// Control points, counter-clockwise from angle 0.
    pub points: Vec<Vec2>,
    /// Closed spline through `points`.
    pub path: Path,
    pub fill: Fill,
    /// Glow strength in 0.0-1.0.
    pub glow: f32,
}

impl BlobFrame {
    /// Distance of every control point from the center.
    pub fn radii(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().map(|p| p.length())
    }
}

/// Animates a blob over time.
#[derive(Debug, Clone, Default)]
pub struct BlobGenerator {
    clock: Clock,
}

impl BlobGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current blob time.
    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Advance the clock (unless paused) and build the frame.
    pub fn tick(&mut self, params: &BlobParams, fill: Fill, ctx: &TickContext) -> BlobFrame {
        let params = params.clamped();
        self.clock.set_paused(ctx.paused);
        let time = self.clock.advance(BASE_STEP + params.motion_speed * SPEED_STEP);
        trace!(time, vertices = params.vertex_count(), "blob tick");

        let points = generate(time, &params);
        let path = spline::build(&points, 1.0, true);
        BlobFrame {
            time,
            points,
            path,
            fill,
            glow: params.glow / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorRamp, FillStyle};
    use crate::params::Viewport;

    fn ctx() -> TickContext {
        TickContext::new(Viewport::new(240.0, 240.0))
    }

    #[test]
    fn test_radius_bounded_at_max_chaos() {
        let params = BlobParams {
            chaos: 100.0,
            smoothness: 8.0,
            warp: 50.0,
            ..Default::default()
        };
        let base = params.base_radius;
        for step in 0..1000 {
            let time = step as f32 * 0.037;
            for p in generate(time, &params) {
                let r = p.length();
                assert!(r >= base * 0.6 - 1e-3 && r <= base * 1.4 + 1e-3, "radius {r}");
            }
        }
    }

    #[test]
    fn test_zero_chaos_is_circle() {
        let params = BlobParams {
            chaos: 0.0,
            ..Default::default()
        };
        for p in generate(1.3, &params) {
            assert!((p.length() - params.base_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn test_vertex_count_follows_smoothness() {
        let mut params = BlobParams::default();
        for (smoothness, expected) in [(0.0, 3), (3.4, 3), (8.0, 8), (12.6, 13), (99.0, 20)] {
            params.smoothness = smoothness;
            assert_eq!(generate(0.0, &params).len(), expected);
        }
    }

    #[test]
    fn test_ripple_frequency_grows_with_warp() {
        assert_eq!(ripple_frequency(0.0), 2.0);
        assert_eq!(ripple_frequency(100.0), 10.0);
        let mut last = 0.0;
        for warp in 0..=100 {
            let f = ripple_frequency(warp as f32);
            assert!(f >= last);
            last = f;
        }
    }

    #[test]
    fn test_tick_advances_time() {
        let mut blob = BlobGenerator::new();
        let fill = FillStyle::Linear.build(&ColorRamp::default());
        let params = BlobParams::default();
        let frame = blob.tick(&params, fill, &ctx());
        let expected = BASE_STEP + params.motion_speed * SPEED_STEP;
        assert!((frame.time - expected).abs() < 1e-7);
        assert!(frame.path.is_closed());
        assert_eq!(frame.points.len(), 8);
        assert_eq!(frame.path.start_point(), frame.path.end_point());
    }

    #[test]
    fn test_paused_tick_keeps_time() {
        let mut blob = BlobGenerator::new();
        let fill = FillStyle::Solid.build(&ColorRamp::default());
        let params = BlobParams::default();
        let first = blob.tick(&params, fill, &ctx());
        let paused = ctx().with_paused(true);
        for _ in 0..5 {
            let frame = blob.tick(&params, fill, &paused);
            assert_eq!(frame.time, first.time);
            assert_eq!(frame.points, first.points);
        }
    }
}
