//! Curve gradient: contour bands over layered value noise.
//!
//! Three fBm layers at different scales and drift directions are summed into
//! a height pattern. The pattern is cut into repeating bands, and each band
//! blends smoothly into the next color of a cycling six-stop palette. Film
//! grain scales every color by a small random factor.
//!
//! The pattern lives on a plane larger than the view; the view shows its
//! central [`VIEW_SPAN`] per unit of viewport height.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::aurora::smoothstep;
use crate::color::{ColorRamp, Rgb};
use crate::field::{raster_size, shade_blocks, DEFAULT_STRIDE};
use crate::noise::{fract, hash2, value_noise2};
use crate::params::CurveParams;
use crate::time::{Clock, TickContext};

/// Octaves in each fBm layer.
pub const OCTAVES: u32 = 6;

/// Fraction of the pattern plane visible per unit of viewport height.
pub const VIEW_SPAN: f32 = 0.414_213_56; // tan(22.5 deg)

/// Bands per unit of pattern height at density 1.
pub const BANDS: f32 = 5.0;

/// Value-noise fBm in [0, 1): halving amplitude, doubling frequency.
pub fn fbm(p: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..OCTAVES {
        value += amplitude * value_noise2(p * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    value
}

/// Palette color for a band position `zone` in [0, 1).
///
/// The stops are evenly spaced and the last one blends back into the first.
pub fn band_color(palette: &ColorRamp, zone: f32) -> Vec3 {
    let stops = palette.stops().len();
    let scaled = fract(zone) * stops as f32;
    let index = (scaled.floor() as usize).min(stops - 1);
    let t = smoothstep(scaled - index as f32);
    palette.cycle(index).to_vec3().lerp(palette.cycle(index + 1).to_vec3(), t)
}

/// Animated contour-band renderer.
#[derive(Debug, Clone)]
pub struct CurveGradient {
    clock: Clock,
    /// Seeded shift into the noise plane, in [0, 1).
    offset: f32,
    stride: u32,
}

impl CurveGradient {
    pub fn new(seed: u64) -> Self {
        Self {
            clock: Clock::new(),
            offset: SmallRng::seed_from_u64(seed).gen(),
            stride: DEFAULT_STRIDE,
        }
    }

    /// Builder-style sample stride (at least 1).
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Clock time: real seconds scaled by the speed parameter.
    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Smoothed pattern height in [0, 1] at plane coordinate `st`.
    pub fn pattern(&self, st: Vec2, expand: f32, time: f32) -> f32 {
        let pos = st * expand + Vec2::splat(self.offset * 10.0);
        let n1 = fbm(pos + Vec2::splat(time * 0.3));
        let n2 = fbm(pos * 2.0 - Vec2::splat(time * 0.2));
        let n3 = fbm(pos * 0.5 + Vec2::splat(time * 0.4));
        smoothstep(n1 * 0.5 + n2 * 0.3 + n3 * 0.2)
    }

    /// Color at plane coordinate `st` and clock time `time`.
    pub fn shade(&self, params: &CurveParams, palette: &ColorRamp, st: Vec2, time: f32) -> Rgb {
        let time = time * 0.5;
        let height = self.pattern(st, params.expand, time);
        let zone = (height * BANDS + (st.x * PI + time).sin() * 0.5) * params.density;

        let color = band_color(palette, zone);
        let grain = (hash2(st + Vec2::splat(time * 0.1)) - 0.5) * params.grain;
        Rgb::from_vec3(color + color * grain)
    }

    /// Advance the clock by `delta * speed` (unless paused) and render the
    /// viewport.
    pub fn tick(&mut self, params: &CurveParams, ctx: &TickContext) -> RgbaImage {
        let params = params.clamped();
        self.clock.set_paused(ctx.paused);
        let time = self.clock.advance(ctx.delta * params.speed);

        let palette = ColorRamp::new(params.colors);
        let (width, height) = raster_size(ctx.viewport);
        let aspect = ctx.viewport.width / ctx.viewport.height;
        trace!(time, width, height, "curve tick");

        shade_blocks(width, height, self.stride, |uv| {
            let centered = Vec2::new((uv.x - 0.5) * aspect, uv.y - 0.5);
            let st = Vec2::splat(0.5) + centered * VIEW_SPAN;
            self.shade(&params, &palette, st, time)
        })
    }
}

impl Default for CurveGradient {
    fn default() -> Self {
        Self::new(0)
    }
}
