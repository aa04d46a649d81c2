//! Four-color aurora gradient.
//!
//! The four corner colors are blended bilinearly with smoothstep weights.
//! Before the blend, each texture coordinate is pushed around by two layers
//! of [`simplex2`] noise: a broad slow one and a finer one drifting the other
//! way. A fixed sine-hash dither is added on top to hide banding.
//!
//! ```
//! use morphgen::aurora::AuroraGradient;
//! use morphgen::params::{AuroraParams, Viewport};
//! use morphgen::time::TickContext;
//!
//! let mut aurora = AuroraGradient::new();
//! let ctx = TickContext::new(Viewport::new(64.0, 48.0));
//! let image = aurora.tick(&AuroraParams::default(), &ctx);
//! assert_eq!(image.dimensions(), (64, 48));
//! ```

use glam::{Vec2, Vec3};
use image::RgbaImage;
use tracing::trace;

use crate::color::{ColorRamp, Rgb};
use crate::field::{raster_size, shade_blocks, DEFAULT_STRIDE};
use crate::noise::{hash2, simplex2};
use crate::params::AuroraParams;
use crate::time::{Clock, TickContext};

/// Pattern time per second of clock time.
pub const TIME_SCALE: f32 = 0.15;

/// How far the noise may push a texture coordinate.
pub const DISTORTION: f32 = 0.3;

/// Peak brightness of the dither.
pub const DITHER: f32 = 0.04;

/// Hermite smoothstep between 0 and 1, clamping `x` first.
#[inline]
pub(crate) fn smoothstep(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bilinear blend of the ramp's first four stops at `uv`.
///
/// Stop 0 sits top-left, 1 top-right, 2 bottom-left, 3 bottom-right.
pub fn mix_corners(corners: &ColorRamp, uv: Vec2) -> Vec3 {
    let corner = |i| corners.cycle(i).to_vec3();
    let sx = smoothstep(uv.x);
    let top = corner(0).lerp(corner(1), sx);
    let bottom = corner(2).lerp(corner(3), sx);
    bottom.lerp(top, smoothstep(uv.y))
}

/// Animated four-corner gradient renderer.
#[derive(Debug, Clone)]
pub struct AuroraGradient {
    clock: Clock,
    stride: u32,
}

impl AuroraGradient {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            stride: DEFAULT_STRIDE,
        }
    }

    /// Builder-style sample stride (at least 1).
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Clock time in seconds.
    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Color at texture coordinate `uv` (y up) and clock time `time`.
    pub fn shade(params: &AuroraParams, corners: &ColorRamp, uv: Vec2, time: f32) -> Rgb {
        let t = time * TIME_SCALE;
        let scale = params.noise_scale;

        let broad = simplex2(uv * scale * 0.5 + Vec2::new(t * 0.2, t * 0.1));
        let ripple = simplex2(uv * scale * 1.5 - Vec2::new(t * 0.3, t * 0.4));
        let warped = uv + Vec2::new(broad, ripple) * DISTORTION;

        let color = mix_corners(corners, warped) + Vec3::splat(hash2(uv) * DITHER);
        Rgb::from_vec3(color)
    }

    /// Advance the clock by the real frame delta (unless paused) and render
    /// the viewport.
    pub fn tick(&mut self, params: &AuroraParams, ctx: &TickContext) -> RgbaImage {
        let params = params.clamped();
        self.clock.set_paused(ctx.paused);
        let time = self.clock.advance(ctx.delta);

        let corners = ColorRamp::new(params.colors);
        let (width, height) = raster_size(ctx.viewport);
        trace!(time, width, height, "aurora tick");

        shade_blocks(width, height, self.stride, |uv| {
            Self::shade(&params, &corners, uv, time)
        })
    }
}

impl Default for AuroraGradient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Viewport;

    fn ctx() -> TickContext {
        TickContext::new(Viewport::new(40.0, 30.0)).with_delta(0.5)
    }

    #[test]
    fn test_corner_colors() {
        let corners = ColorRamp::new([
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 0),
        ]);
        assert_eq!(mix_corners(&corners, Vec2::new(0.0, 1.0)), Vec3::X);
        assert_eq!(mix_corners(&corners, Vec2::new(1.0, 1.0)), Vec3::Y);
        assert_eq!(mix_corners(&corners, Vec2::new(0.0, 0.0)), Vec3::Z);
        assert_eq!(mix_corners(&corners, Vec2::new(4.0, -3.0)), Vec3::new(1.0, 1.0, 0.0));

        let center = mix_corners(&corners, Vec2::splat(0.5));
        assert!((center - Vec3::new(0.5, 0.5, 0.25)).length() < 1e-6);
    }

    #[test]
    fn test_black_palette_leaves_only_dither() {
        let params = AuroraParams {
            colors: [Rgb::BLACK; 4],
            ..Default::default()
        };
        let image = AuroraGradient::new().tick(&params, &ctx());
        let ceiling = (DITHER * 255.0).round() as u8;
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            assert!(r == g && g == b && r <= ceiling, "{:?}", pixel.0);
            assert_eq!(a, 255);
        }
    }

    #[test]
    fn test_paused_image_is_frozen() {
        let mut aurora = AuroraGradient::new();
        let params = AuroraParams::default();
        aurora.tick(&params, &ctx());
        let time = aurora.time();
        assert_eq!(time, 0.5);

        let paused = ctx().with_paused(true);
        let a = aurora.tick(&params, &paused);
        let b = aurora.tick(&params, &paused);
        assert_eq!(aurora.time(), time);
        assert_eq!(a, b);
    }

    #[test]
    fn test_motion_changes_image() {
        let mut aurora = AuroraGradient::new().with_stride(1);
        let params = AuroraParams::default();
        let first = aurora.tick(&params, &ctx().with_delta(0.0));
        let later = aurora.tick(&params, &ctx().with_delta(20.0));
        assert_eq!(first.dimensions(), (40, 30));
        assert_ne!(first, later);
    }
}
