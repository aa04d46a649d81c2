//! Parameter snapshots for every generator.
//!
//! Each struct mirrors one control panel: plain numeric fields with a
//! documented closed range and a default. Values arriving from a UI or a
//! preset file may be anything, so every generator works on
//! [`clamped`](BlobParams::clamped) copies. Non-finite values clamp to the
//! bottom of their range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// A closed valid range for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp to the range. NaN maps to `min`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Clamp an integer parameter to the range.
    #[inline]
    pub fn clamp_count(&self, value: u32) -> u32 {
        value.clamp(self.min as u32, self.max as u32)
    }

    /// Map a 0.0-1.0 fraction onto the range.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Size of the drawing surface in pixels (or view-box units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether anything can be drawn (both sides finite and positive).
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

// ========== Blob ==========

/// Organic blob outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobParams {
    /// How far the outline strays from a circle.
    pub chaos: f32,
    /// Vertex count, rounded to an integer.
    pub smoothness: f32,
    /// Ripple frequency around the outline.
    pub warp: f32,
    /// Animation rate.
    pub motion_speed: f32,
    /// Radius of the undistorted circle, in view-box units.
    pub base_radius: f32,
    /// Strength of the soft glow behind the fill.
    pub glow: f32,
}

impl BlobParams {
    pub const CHAOS: ParamRange = ParamRange::new(0.0, 100.0);
    pub const SMOOTHNESS: ParamRange = ParamRange::new(3.0, 20.0);
    pub const WARP: ParamRange = ParamRange::new(0.0, 100.0);
    pub const MOTION_SPEED: ParamRange = ParamRange::new(0.0, 20.0);
    pub const BASE_RADIUS: ParamRange = ParamRange::new(1.0, 1000.0);
    pub const GLOW: ParamRange = ParamRange::new(0.0, 100.0);

    pub fn clamped(&self) -> Self {
        Self {
            chaos: Self::CHAOS.clamp(self.chaos),
            smoothness: Self::SMOOTHNESS.clamp(self.smoothness),
            warp: Self::WARP.clamp(self.warp),
            motion_speed: Self::MOTION_SPEED.clamp(self.motion_speed),
            base_radius: Self::BASE_RADIUS.clamp(self.base_radius),
            glow: Self::GLOW.clamp(self.glow),
        }
    }

    /// Number of outline vertices.
    pub fn vertex_count(&self) -> usize {
        Self::SMOOTHNESS.clamp(self.smoothness.round()) as usize
    }
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            chaos: 30.0,
            smoothness: 8.0,
            warp: 40.0,
            motion_speed: 10.0,
            base_radius: 60.0,
            glow: 20.0,
        }
    }
}

// ========== Waves ==========

/// Stacked wave layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub layers: u32,
    /// Wave amplitude.
    pub height: f32,
    pub frequency: f32,
    /// Vertical distance between layer baselines.
    pub spacing: f32,
    /// Phase offset between neighbouring layers.
    pub phase: f32,
    /// Weight of the high-frequency ripple.
    pub roughness: f32,
    /// Distance of the front baseline above the bottom edge.
    pub base_height: f32,
    pub motion_speed: f32,
}

impl WaveParams {
    pub const LAYERS: ParamRange = ParamRange::new(2.0, 10.0);
    pub const HEIGHT: ParamRange = ParamRange::new(5.0, 80.0);
    pub const FREQUENCY: ParamRange = ParamRange::new(2.0, 30.0);
    pub const SPACING: ParamRange = ParamRange::new(10.0, 200.0);
    pub const PHASE: ParamRange = ParamRange::new(0.0, 50.0);
    pub const ROUGHNESS: ParamRange = ParamRange::new(0.0, 50.0);
    pub const BASE_HEIGHT: ParamRange = ParamRange::new(0.0, 1000.0);
    pub const MOTION_SPEED: ParamRange = ParamRange::new(0.0, 20.0);

    pub fn clamped(&self) -> Self {
        Self {
            layers: Self::LAYERS.clamp_count(self.layers),
            height: Self::HEIGHT.clamp(self.height),
            frequency: Self::FREQUENCY.clamp(self.frequency),
            spacing: Self::SPACING.clamp(self.spacing),
            phase: Self::PHASE.clamp(self.phase),
            roughness: Self::ROUGHNESS.clamp(self.roughness),
            base_height: Self::BASE_HEIGHT.clamp(self.base_height),
            motion_speed: Self::MOTION_SPEED.clamp(self.motion_speed),
        }
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            layers: 4,
            height: 50.0,
            frequency: 20.0,
            spacing: 100.0,
            phase: 20.0,
            roughness: 20.0,
            base_height: 150.0,
            motion_speed: 5.0,
        }
    }
}

// ========== Noise field ==========

/// Animated fractal noise raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub octaves: u32,
    /// Base frequency, divided by 100 before sampling.
    pub frequency: f32,
    /// Amplitude falloff per octave.
    pub persistence: f32,
    /// Frequency growth per octave.
    pub lacunarity: f32,
    /// How fast the field drifts.
    pub animation: f32,
    /// 50 is neutral; higher values push towards the ramp ends.
    pub contrast: f32,
    /// Permutation seed.
    pub seed: u32,
}

impl NoiseParams {
    pub const OCTAVES: ParamRange = ParamRange::new(1.0, 8.0);
    pub const FREQUENCY: ParamRange = ParamRange::new(0.5, 10.0);
    pub const PERSISTENCE: ParamRange = ParamRange::new(0.1, 1.0);
    pub const LACUNARITY: ParamRange = ParamRange::new(1.0, 4.0);
    pub const ANIMATION: ParamRange = ParamRange::new(0.0, 5.0);
    pub const CONTRAST: ParamRange = ParamRange::new(10.0, 100.0);

    pub fn clamped(&self) -> Self {
        Self {
            octaves: Self::OCTAVES.clamp_count(self.octaves),
            frequency: Self::FREQUENCY.clamp(self.frequency),
            persistence: Self::PERSISTENCE.clamp(self.persistence),
            lacunarity: Self::LACUNARITY.clamp(self.lacunarity),
            animation: Self::ANIMATION.clamp(self.animation),
            contrast: Self::CONTRAST.clamp(self.contrast),
            seed: self.seed,
        }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 3.0,
            persistence: 0.5,
            lacunarity: 2.0,
            animation: 1.0,
            contrast: 50.0,
            seed: 42,
        }
    }
}

// ========== Swarm ==========

/// How the swarm finds particles inside the separation radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Check every pair. O(N^2).
    BruteForce,
    /// Bucket particles into a uniform grid and only check adjacent cells.
    #[default]
    Grid,
}

/// Flocking swarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmParams {
    pub count: u32,
    pub max_speed: f32,
    /// Pull towards the pointer or the field center.
    pub cohesion: f32,
    /// Radius inside which particles push each other apart.
    pub separation: f32,
    pub trail_length: u32,
    /// Dot radius for the presentation layer.
    pub size: f32,
    pub neighbor_search: NeighborSearch,
}

impl SwarmParams {
    pub const COUNT: ParamRange = ParamRange::new(0.0, 5000.0);
    pub const MAX_SPEED: ParamRange = ParamRange::new(0.5, 5.0);
    pub const COHESION: ParamRange = ParamRange::new(0.0, 100.0);
    pub const SEPARATION: ParamRange = ParamRange::new(5.0, 100.0);
    pub const TRAIL_LENGTH: ParamRange = ParamRange::new(0.0, 50.0);
    pub const SIZE: ParamRange = ParamRange::new(1.0, 10.0);

    pub fn clamped(&self) -> Self {
        Self {
            count: Self::COUNT.clamp_count(self.count),
            max_speed: Self::MAX_SPEED.clamp(self.max_speed),
            cohesion: Self::COHESION.clamp(self.cohesion),
            separation: Self::SEPARATION.clamp(self.separation),
            trail_length: Self::TRAIL_LENGTH.clamp_count(self.trail_length),
            size: Self::SIZE.clamp(self.size),
            neighbor_search: self.neighbor_search,
        }
    }
}

impl Default for SwarmParams {
    fn default() -> Self {
        Self {
            count: 300,
            max_speed: 2.0,
            cohesion: 50.0,
            separation: 30.0,
            trail_length: 10,
            size: 3.0,
            neighbor_search: NeighborSearch::Grid,
        }
    }
}

// ========== Spiral ==========

/// Rotating spiral galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralParams {
    pub arms: u32,
    /// Turns per arm; 50 gives two full turns.
    pub tightness: f32,
    pub particles_per_arm: u32,
    /// Radial spread of each arm.
    pub thickness: f32,
    pub rotation_speed: f32,
    pub glow: f32,
}

impl SpiralParams {
    pub const ARMS: ParamRange = ParamRange::new(1.0, 8.0);
    pub const TIGHTNESS: ParamRange = ParamRange::new(10.0, 100.0);
    pub const PARTICLES_PER_ARM: ParamRange = ParamRange::new(100.0, 2000.0);
    pub const THICKNESS: ParamRange = ParamRange::new(5.0, 100.0);
    pub const ROTATION_SPEED: ParamRange = ParamRange::new(0.0, 5.0);
    pub const GLOW: ParamRange = ParamRange::new(0.0, 100.0);

    pub fn clamped(&self) -> Self {
        Self {
            arms: Self::ARMS.clamp_count(self.arms),
            tightness: Self::TIGHTNESS.clamp(self.tightness),
            particles_per_arm: Self::PARTICLES_PER_ARM.clamp_count(self.particles_per_arm),
            thickness: Self::THICKNESS.clamp(self.thickness),
            rotation_speed: Self::ROTATION_SPEED.clamp(self.rotation_speed),
            glow: Self::GLOW.clamp(self.glow),
        }
    }

    /// Total number of particles across all arms.
    pub fn total(&self) -> usize {
        self.arms as usize * self.particles_per_arm as usize
    }
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            arms: 3,
            tightness: 50.0,
            particles_per_arm: 500,
            thickness: 20.0,
            rotation_speed: 1.0,
            glow: 50.0,
        }
    }
}

// ========== Flux ==========

/// Turbulent 3D particle flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxParams {
    pub count: u32,
    pub speed: f32,
    /// Point size before depth attenuation.
    pub size: f32,
    /// Turbulence magnitude.
    pub chaos: f32,
}

impl FluxParams {
    pub const COUNT: ParamRange = ParamRange::new(100.0, 5000.0);
    pub const SPEED: ParamRange = ParamRange::new(0.0, 2.0);
    pub const SIZE: ParamRange = ParamRange::new(0.5, 5.0);
    pub const CHAOS: ParamRange = ParamRange::new(0.0, 100.0);

    pub fn clamped(&self) -> Self {
        Self {
            count: Self::COUNT.clamp_count(self.count),
            speed: Self::SPEED.clamp(self.speed),
            size: Self::SIZE.clamp(self.size),
            chaos: Self::CHAOS.clamp(self.chaos),
        }
    }
}

impl Default for FluxParams {
    fn default() -> Self {
        Self {
            count: 2000,
            speed: 0.5,
            size: 1.5,
            chaos: 30.0,
        }
    }
}

// ========== Mesh ==========

/// Wave-displaced sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshParams {
    /// Width and height segments of the sphere.
    pub complexity: f32,
    /// Displacement strength.
    pub intensity: f32,
    pub speed: f32,
    /// Number of summed displacement waves.
    pub wave_count: u32,
    /// How many of the snapshot colors tint the surface (1-3).
    pub active_colors: u32,
}

impl MeshParams {
    pub const COMPLEXITY: ParamRange = ParamRange::new(10.0, 128.0);
    pub const INTENSITY: ParamRange = ParamRange::new(0.0, 100.0);
    pub const SPEED: ParamRange = ParamRange::new(0.0, 5.0);
    pub const WAVE_COUNT: ParamRange = ParamRange::new(1.0, 8.0);
    pub const ACTIVE_COLORS: ParamRange = ParamRange::new(1.0, 3.0);

    pub fn clamped(&self) -> Self {
        Self {
            complexity: Self::COMPLEXITY.clamp(self.complexity),
            intensity: Self::INTENSITY.clamp(self.intensity),
            speed: Self::SPEED.clamp(self.speed),
            wave_count: Self::WAVE_COUNT.clamp_count(self.wave_count),
            active_colors: Self::ACTIVE_COLORS.clamp_count(self.active_colors),
        }
    }

    /// Sphere segment count.
    pub fn segments(&self) -> u32 {
        Self::COMPLEXITY.clamp(self.complexity.round()) as u32
    }
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            complexity: 32.0,
            intensity: 50.0,
            speed: 1.0,
            wave_count: 3,
            active_colors: 2,
        }
    }
}

// ========== Terrain ==========

/// Animated grid of height-mapped cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Cells per side.
    pub size: u32,
    pub distortion: f32,
    pub speed: f32,
}

impl TerrainParams {
    pub const SIZE: ParamRange = ParamRange::new(10.0, 60.0);
    pub const DISTORTION: ParamRange = ParamRange::new(0.0, 100.0);
    pub const SPEED: ParamRange = ParamRange::new(0.0, 5.0);

    pub fn clamped(&self) -> Self {
        Self {
            size: Self::SIZE.clamp_count(self.size),
            distortion: Self::DISTORTION.clamp(self.distortion),
            speed: Self::SPEED.clamp(self.speed),
        }
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            size: 30,
            distortion: 30.0,
            speed: 1.0,
        }
    }
}

// ========== Aurora ==========

/// Four-corner gradient warped by simplex noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraParams {
    /// Top-left, top-right, bottom-left and bottom-right colors.
    pub colors: [Rgb; 4],
    /// Spatial frequency of the warp.
    pub noise_scale: f32,
}

impl AuroraParams {
    pub const NOISE_SCALE: ParamRange = ParamRange::new(0.1, 3.0);
    /// Where [`Snapshot::randomize`](crate::config::Snapshot::randomize)
    /// draws the noise scale from.
    pub const RANDOM_NOISE_SCALE: ParamRange = ParamRange::new(0.5, 2.5);

    pub fn clamped(&self) -> Self {
        Self {
            colors: self.colors,
            noise_scale: Self::NOISE_SCALE.clamp(self.noise_scale),
        }
    }
}

impl Default for AuroraParams {
    fn default() -> Self {
        Self {
            colors: [
                Rgb::new(0x0F, 0x17, 0x2A),
                Rgb::new(0x7C, 0x2D, 0x12),
                Rgb::new(0x43, 0x14, 0x07),
                Rgb::BLACK,
            ],
            noise_scale: 1.5,
        }
    }
}

// ========== Curve ==========

/// Contour bands over layered value noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Band colors, cycled in order.
    pub colors: [Rgb; 6],
    pub speed: f32,
    /// Bands per unit of pattern height.
    pub density: f32,
    /// Noise units across the pattern plane.
    pub expand: f32,
    /// Film grain strength.
    pub grain: f32,
}

impl CurveParams {
    pub const SPEED: ParamRange = ParamRange::new(0.0, 5.0);
    pub const DENSITY: ParamRange = ParamRange::new(0.5, 3.0);
    pub const EXPAND: ParamRange = ParamRange::new(2.0, 15.0);
    pub const GRAIN: ParamRange = ParamRange::new(0.0, 0.3);

    pub fn clamped(&self) -> Self {
        Self {
            colors: self.colors,
            speed: Self::SPEED.clamp(self.speed),
            density: Self::DENSITY.clamp(self.density),
            expand: Self::EXPAND.clamp(self.expand),
            grain: Self::GRAIN.clamp(self.grain),
        }
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            colors: [
                Rgb::new(0xF5, 0x9E, 0x0B),
                Rgb::new(0xDC, 0x26, 0x26),
                Rgb::new(0x7C, 0x3A, 0xED),
                Rgb::new(0x0F, 0x17, 0x2A),
                Rgb::new(0x1E, 0x29, 0x3B),
                Rgb::new(0x33, 0x41, 0x55),
            ],
            speed: 1.0,
            density: 1.0,
            expand: 6.0,
            grain: 0.1,
        }
    }
}
