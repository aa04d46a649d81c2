//! Animated fractal noise raster.
//!
//! [`NoiseFieldRenderer`] samples [`LatticeNoise::fbm`] across the viewport
//! once per tick. Only every `stride`-th pixel is sampled; the value fills a
//! `stride x stride` block when the field is turned into an image.
//!
//! ```
//! use morphgen::color::ColorRamp;
//! use morphgen::field::NoiseFieldRenderer;
//! use morphgen::params::{NoiseParams, Viewport};
//! use morphgen::time::TickContext;
//!
//! let mut renderer = NoiseFieldRenderer::new(42);
//! let ctx = TickContext::new(Viewport::new(64.0, 48.0));
//! let field = renderer.tick(&NoiseParams::default(), &ctx);
//! let image = field.to_image(&ColorRamp::default());
//! assert_eq!(image.dimensions(), (64, 48));
//! ```

use glam::Vec2;
use image::RgbaImage;
use tracing::{debug, trace};

use crate::color::{ColorRamp, Rgb};
use crate::noise::LatticeNoise;
use crate::params::{NoiseParams, Viewport};
use crate::time::{Clock, TickContext};

/// Pixels per sample along each axis.
pub const DEFAULT_STRIDE: u32 = 2;

/// The viewport spans this many noise units (before frequency scaling).
pub const FIELD_SCALE: f32 = 3.0;

/// Clock step per tick per unit of animation.
pub const ANIMATION_STEP: f32 = 0.01;

/// Map a raw noise value through the contrast curve into 0.0-1.0.
///
/// A contrast of 50 doubles the distance from 0.5.
pub fn apply_contrast(value: f32, contrast: f32) -> f32 {
    let factor = (contrast / 50.0) * 2.0;
    ((value - 0.5) * factor + 0.5).clamp(0.0, 1.0)
}

/// Number of cells in a `width` x `height` raster, computed without `u32`
/// overflow.
pub(crate) fn area(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Whole-pixel raster size covering `viewport`.
pub fn raster_size(viewport: Viewport) -> (u32, u32) {
    (
        viewport.width.max(0.0).round() as u32,
        viewport.height.max(0.0).round() as u32,
    )
}

/// Build a `width` x `height` image by evaluating `shade` once per
/// `stride x stride` block.
///
/// `shade` receives the center of each block's first pixel as a texture
/// coordinate over 0.0-1.0, x left to right and y bottom to top.
pub fn shade_blocks(
    width: u32,
    height: u32,
    stride: u32,
    mut shade: impl FnMut(Vec2) -> Rgb,
) -> RgbaImage {
    let stride = stride.max(1);
    let cols = width.div_ceil(stride) as usize;
    let mut row_colors: Vec<[u8; 4]> = Vec::with_capacity(cols);
    let mut pixels: Vec<[u8; 4]> = Vec::with_capacity(area(width, height));

    for y in 0..height {
        if y % stride == 0 {
            let v = 1.0 - (y as f32 + 0.5) / height as f32;
            row_colors.clear();
            row_colors.extend((0..cols).map(|col| {
                let u = ((col as u32 * stride) as f32 + 0.5) / width as f32;
                shade(Vec2::new(u, v)).to_rgba(255)
            }));
        }
        pixels.extend((0..width).map(|x| row_colors[(x / stride) as usize]));
    }

    let bytes: Vec<u8> = bytemuck::cast_slice(&pixels).to_vec();
    RgbaImage::from_raw(width, height, bytes).unwrap_or_else(|| RgbaImage::new(width, height))
}

/// One sampled frame of the noise field.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Pixels per sample along each axis.
    pub stride: u32,
    /// Samples per row.
    pub cols: u32,
    /// Sample rows.
    pub rows: u32,
    /// Contrast-mapped values in 0.0-1.0, row-major, `cols * rows` long.
    pub values: Vec<f32>,
}

impl NoiseField {
    /// Value of the block covering pixel `(x, y)`.
    pub fn value_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let col = x / self.stride;
        let row = y / self.stride;
        self.values
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }

    /// Rasterize through `ramp`, filling each block with its sample color.
    pub fn to_image(&self, ramp: &ColorRamp) -> RgbaImage {
        let mut pixels: Vec<[u8; 4]> = Vec::with_capacity(area(self.width, self.height));
        for y in 0..self.height {
            let row = (y / self.stride) as usize * self.cols as usize;
            for x in 0..self.width {
                let value = self.values[row + (x / self.stride) as usize];
                pixels.push(ramp.sample(value).to_rgba(255));
            }
        }

        let bytes: Vec<u8> = bytemuck::cast_slice(&pixels).to_vec();
        // The buffer length always matches the dimensions.
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

/// Samples fractal noise over the viewport, advancing its own clock.
#[derive(Debug, Clone)]
pub struct NoiseFieldRenderer {
    noise: LatticeNoise,
    clock: Clock,
    stride: u32,
}

impl NoiseFieldRenderer {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: LatticeNoise::new(seed),
            clock: Clock::new(),
            stride: DEFAULT_STRIDE,
        }
    }

    /// Builder-style sample stride (at least 1).
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Advance the clock (unless paused) and sample the whole field.
    ///
    /// A seed change in `params` rebuilds the permutation table.
    pub fn tick(&mut self, params: &NoiseParams, ctx: &TickContext) -> NoiseField {
        let params = params.clamped();
        if params.seed != self.noise.seed() {
            debug!(seed = params.seed, "rebuilding noise permutation");
            self.noise = LatticeNoise::new(params.seed);
        }

        self.clock.set_paused(ctx.paused);
        let time = self.clock.advance(params.animation * ANIMATION_STEP);

        let (width, height) = raster_size(ctx.viewport);
        let cols = width.div_ceil(self.stride);
        let rows = height.div_ceil(self.stride);
        trace!(time, cols, rows, "noise field tick");

        let frequency = params.frequency / 100.0;
        let mut values = Vec::with_capacity(area(cols, rows));
        for row in 0..rows {
            let ny = (row * self.stride) as f32 / height as f32;
            for col in 0..cols {
                let nx = (col * self.stride) as f32 / width as f32;
                let raw = self.noise.fbm(
                    nx * FIELD_SCALE * frequency,
                    ny * FIELD_SCALE * frequency,
                    time,
                    params.octaves,
                    params.persistence,
                    params.lacunarity,
                );
                values.push(apply_contrast(raw, params.contrast));
            }
        }

        NoiseField {
            width,
            height,
            stride: self.stride,
            cols,
            rows,
            values,
        }
    }
}

impl Default for NoiseFieldRenderer {
    fn default() -> Self {
        Self::new(42)
    }
}
