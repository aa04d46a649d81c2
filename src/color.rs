//! Colors, gradient ramps and fill styles.
//!
//! Every generator colors its output through the same few types:
//!
//! - [`Rgb`] - an 8-bit color stop, serialized as a `#rrggbb` string
//! - [`ColorRamp`] - 2 to 6 stops sampled by a normalized position
//! - [`Fill`] - how a closed outline is painted (solid, linear or radial)
//! - [`MeshPalette`] - how 1 to 3 mesh colors spread over a surface
//!
//! ```
//! use morphgen::color::{ColorRamp, Rgb};
//!
//! let amber = Rgb::from_hex("#F59E0B").unwrap();
//! let red = Rgb::from_hex("#DC2626").unwrap();
//! assert_eq!(ColorRamp::interpolate(amber, red, 0.0), amber);
//! assert_eq!(ColorRamp::interpolate(amber, red, 7.0), red);
//! ```

use std::fmt;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Minimum number of stops in a [`ColorRamp`].
pub const MIN_STOPS: usize = 2;
/// Maximum number of stops in a [`ColorRamp`].
pub const MAX_STOPS: usize = 6;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Parse `#rrggbb`, resolving anything malformed to black.
    pub fn from_hex_or_black(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or(Self::BLACK)
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels normalized to 0.0-1.0.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    /// Build from normalized channels, clamping each to 0.0-1.0.
    pub fn from_vec3(v: Vec3) -> Self {
        let v = v.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
        Self::new(v.x.round() as u8, v.y.round() as u8, v.z.round() as u8)
    }

    /// RGBA bytes with the given alpha.
    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// A uniformly random color.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.gen(), rng.gen(), rng.gen())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<String> for Rgb {
    fn from(hex: String) -> Self {
        Self::from_hex_or_black(&hex)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Linear gradient across 2 to 6 evenly spaced color stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl ColorRamp {
    /// Build a ramp from color stops.
    ///
    /// A single stop is repeated, an empty list becomes black-to-black, and
    /// stops beyond [`MAX_STOPS`] are dropped.
    pub fn new(stops: impl IntoIterator<Item = Rgb>) -> Self {
        let mut stops: Vec<Rgb> = stops.into_iter().take(MAX_STOPS).collect();
        match stops.len() {
            0 => stops = vec![Rgb::BLACK; MIN_STOPS],
            1 => stops.push(stops[0]),
            _ => {}
        }
        Self { stops }
    }

    /// Two-stop ramp.
    pub fn two(start: Rgb, end: Rgb) -> Self {
        Self { stops: vec![start, end] }
    }

    /// Blend two colors. `t` is clamped to 0.0-1.0 first (NaN counts as 0).
    pub fn interpolate(c1: Rgb, c2: Rgb, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b))
    }

    /// Color at a normalized position along the ramp.
    pub fn sample(&self, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.stops.len() - 1;
        let scaled = t * segments as f32;
        let index = (scaled.floor() as usize).min(segments - 1);
        Self::interpolate(self.stops[index], self.stops[index + 1], scaled - index as f32)
    }

    /// All stops in order.
    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Color at position 0.
    pub fn start(&self) -> Rgb {
        self.stops[0]
    }

    /// Color at position 1.
    pub fn end(&self) -> Rgb {
        self.stops[self.stops.len() - 1]
    }

    /// Stop `index`, cycling through the ramp.
    pub fn cycle(&self, index: usize) -> Rgb {
        self.stops[index % self.stops.len()]
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::two(Rgb::new(0xF5, 0x9E, 0x0B), Rgb::new(0xDC, 0x26, 0x26))
    }
}

/// Which kind of fill a closed outline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStyle {
    Solid,
    #[default]
    Linear,
    Radial,
}

impl FillStyle {
    /// Resolve the style against a ramp into a concrete [`Fill`].
    pub fn build(self, ramp: &ColorRamp) -> Fill {
        match self {
            FillStyle::Solid => Fill::Solid { color: ramp.start() },
            FillStyle::Linear => Fill::Linear {
                from: ramp.start(),
                to: ramp.end(),
            },
            FillStyle::Radial => Fill::Radial {
                inner: ramp.start(),
                outer: ramp.end(),
            },
        }
    }
}

/// A concrete paint for a closed outline.
///
/// Coordinates passed to [`Fill::resolve`] are normalized to the outline's
/// bounding box: `(0, 0)` is the top-left corner, `(1, 1)` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fill {
    /// One flat color.
    Solid { color: Rgb },
    /// Diagonal gradient from the top-left to the bottom-right corner.
    Linear { from: Rgb, to: Rgb },
    /// Gradient from the box center out to the inscribed circle.
    Radial { inner: Rgb, outer: Rgb },
}

impl Fill {
    /// Color at a normalized bounding-box coordinate.
    pub fn resolve(&self, uv: Vec2) -> Rgb {
        match *self {
            Fill::Solid { color } => color,
            Fill::Linear { from, to } => ColorRamp::interpolate(from, to, (uv.x + uv.y) * 0.5),
            Fill::Radial { inner, outer } => {
                let t = uv.distance(Vec2::splat(0.5)) / 0.5;
                ColorRamp::interpolate(inner, outer, t)
            }
        }
    }

    /// The style this fill was built from.
    pub fn style(&self) -> FillStyle {
        match self {
            Fill::Solid { .. } => FillStyle::Solid,
            Fill::Linear { .. } => FillStyle::Linear,
            Fill::Radial { .. } => FillStyle::Radial,
        }
    }
}

/// Vertex coloring for a surface with 1 to 3 active colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPalette {
    /// Every vertex the same color.
    Single(Rgb),
    /// Blend from the first color at the bottom to the second at the top.
    Pair(Rgb, Rgb),
    /// Three height bands, split at one and two thirds.
    Triple(Rgb, Rgb, Rgb),
}

impl MeshPalette {
    /// Lower band boundary for [`MeshPalette::Triple`].
    pub const LOW_BAND: f32 = 0.33;
    /// Upper band boundary for [`MeshPalette::Triple`].
    pub const HIGH_BAND: f32 = 0.66;

    /// Pick the variant from the first `active` colors (clamped to 1-3).
    pub fn from_colors(colors: &[Rgb], active: usize) -> Self {
        let color = |i: usize| colors.get(i).copied().unwrap_or(Rgb::WHITE);
        match active.clamp(1, 3) {
            1 => MeshPalette::Single(color(0)),
            2 => MeshPalette::Pair(color(0), color(1)),
            _ => MeshPalette::Triple(color(0), color(1), color(2)),
        }
    }

    /// Color at a normalized height (0 = bottom, 1 = top).
    pub fn resolve(&self, height: f32) -> Rgb {
        let height = if height.is_nan() { 0.0 } else { height.clamp(0.0, 1.0) };
        match *self {
            MeshPalette::Single(color) => color,
            MeshPalette::Pair(low, high) => ColorRamp::interpolate(low, high, height),
            MeshPalette::Triple(low, mid, high) => {
                if height < Self::LOW_BAND {
                    ColorRamp::interpolate(low, mid, height / Self::LOW_BAND)
                } else if height < Self::HIGH_BAND {
                    let t = (height - Self::LOW_BAND) / (Self::HIGH_BAND - Self::LOW_BAND);
                    ColorRamp::interpolate(mid, high, t)
                } else {
                    high
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMBER: Rgb = Rgb::new(0xF5, 0x9E, 0x0B);
    const RED: Rgb = Rgb::new(0xDC, 0x26, 0x26);

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#F59E0B"), Some(AMBER));
        assert_eq!(Rgb::from_hex("dc2626"), Some(RED));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_hex_or_black("nope"), Rgb::BLACK);
        assert_eq!(AMBER.to_hex(), "#f59e0b");
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(ColorRamp::interpolate(AMBER, RED, 0.0), AMBER);
        assert_eq!(ColorRamp::interpolate(AMBER, RED, 1.0), RED);
    }

    #[test]
    fn test_interpolate_clamps_factor() {
        assert_eq!(ColorRamp::interpolate(AMBER, RED, -3.0), AMBER);
        assert_eq!(ColorRamp::interpolate(AMBER, RED, 42.0), RED);
        assert_eq!(ColorRamp::interpolate(AMBER, RED, f32::NAN), AMBER);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let mid = ColorRamp::interpolate(Rgb::BLACK, Rgb::WHITE, 0.5);
        assert_eq!(mid, Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_ramp_sample_multi_stop() {
        let green = Rgb::new(0, 255, 0);
        let ramp = ColorRamp::new([Rgb::BLACK, green, Rgb::WHITE]);
        assert_eq!(ramp.sample(0.0), Rgb::BLACK);
        assert_eq!(ramp.sample(0.5), green);
        assert_eq!(ramp.sample(1.0), Rgb::WHITE);
        assert_eq!(ramp.sample(2.0), Rgb::WHITE);
    }

    #[test]
    fn test_ramp_stop_count_normalized() {
        assert_eq!(ColorRamp::new([]).stops().len(), MIN_STOPS);
        assert_eq!(ColorRamp::new([RED]).stops(), &[RED, RED]);
        assert_eq!(ColorRamp::new([RED; 9]).stops().len(), MAX_STOPS);
    }

    #[test]
    fn test_fill_resolve() {
        let linear = FillStyle::Linear.build(&ColorRamp::two(AMBER, RED));
        assert_eq!(linear.resolve(Vec2::ZERO), AMBER);
        assert_eq!(linear.resolve(Vec2::ONE), RED);

        let radial = FillStyle::Radial.build(&ColorRamp::two(AMBER, RED));
        assert_eq!(radial.resolve(Vec2::splat(0.5)), AMBER);
        assert_eq!(radial.resolve(Vec2::new(0.5, 0.0)), RED);

        let solid = FillStyle::Solid.build(&ColorRamp::two(AMBER, RED));
        assert_eq!(solid.resolve(Vec2::ONE), AMBER);
        assert_eq!(solid.style(), FillStyle::Solid);
    }

    #[test]
    fn test_mesh_palette_bands() {
        let blue = Rgb::new(0, 0, 255);
        let palette = MeshPalette::from_colors(&[AMBER, RED, blue], 3);
        assert_eq!(palette.resolve(0.0), AMBER);
        assert_eq!(palette.resolve(0.9), blue);
        assert_eq!(
            MeshPalette::from_colors(&[AMBER], 5),
            MeshPalette::Triple(AMBER, Rgb::WHITE, Rgb::WHITE)
        );
        assert_eq!(MeshPalette::from_colors(&[AMBER, RED], 0), MeshPalette::Single(AMBER));
    }

    #[test]
    fn test_rgb_serde_hex() {
        let json = serde_json::to_string(&AMBER).unwrap();
        assert_eq!(json, "\"#f59e0b\"");
        let back: Rgb = serde_json::from_str("\"#DC2626\"").unwrap();
        assert_eq!(back, RED);
    }
}
