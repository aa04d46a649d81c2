//! Wave-displaced sphere.
//!
//! A UV sphere whose vertices are pushed in and out along their radius by a
//! sum of interfering sine waves, while the whole mesh slowly tumbles.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::color::{MeshPalette, Rgb};
use crate::params::MeshParams;
use crate::time::{Clock, TickContext};

/// Undisplaced sphere radius.
pub const RADIUS: f32 = 2.0;

/// Peak displacement at full intensity, as a fraction of the radius.
pub const MAX_DISPLACEMENT: f32 = 0.3;

/// Rotation per tick per unit of speed, around X then Y.
pub const ROTATION_STEP: Vec2 = Vec2::new(0.001, 0.003);

/// Indexed UV sphere with `(segments + 1)^2` vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub segments: u32,
    pub positions: Vec<Vec3>,
    /// Triangle list, counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl Sphere {
    pub fn new(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let stride = segments + 1;
        let mut positions = Vec::with_capacity((stride * stride) as usize);

        for iy in 0..=segments {
            let v = iy as f32 / segments as f32;
            for ix in 0..=segments {
                let u = ix as f32 / segments as f32;
                positions.push(Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                ));
            }
        }

        // Poles collapse one triangle of each quad.
        let mut indices = Vec::new();
        for iy in 0..segments {
            for ix in 0..segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;
                if iy != 0 {
                    indices.extend([a, b, d]);
                }
                if iy != segments - 1 {
                    indices.extend([b, c, d]);
                }
            }
        }

        Self {
            segments,
            positions,
            indices,
        }
    }
}

/// Radial displacement factor at `p` and time `t`.
pub fn displacement(p: Vec3, t: f32, wave_count: u32, intensity: f32) -> f32 {
    let mut d = 0.0;
    for w in 0..wave_count {
        let falloff = (w + 1) as f32;
        let f = 0.5 * falloff;
        d += (p.x * f + t).sin() * (p.y * f + t * 0.7).cos() * (p.z * f + t * 0.5).sin() / falloff;
    }
    d * (intensity / 100.0) * MAX_DISPLACEMENT
}

/// Drawable mesh state.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFrame {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Rgb>,
    pub indices: Vec<u32>,
    /// Accumulated rotation around X and Y in radians.
    pub rotation: Vec2,
}

/// Morphing sphere generator.
#[derive(Debug, Clone)]
pub struct MeshMorph {
    sphere: Option<Sphere>,
    clock: Clock,
    rotation: Vec2,
}

impl Default for MeshMorph {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshMorph {
    pub fn new() -> Self {
        Self {
            sphere: None,
            clock: Clock::new(),
            rotation: Vec2::ZERO,
        }
    }

    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// Advance and return the displaced sphere colored by `palette`.
    pub fn tick(
        &mut self,
        params: &MeshParams,
        palette: MeshPalette,
        ctx: &TickContext,
    ) -> MeshFrame {
        let params = params.clamped();
        let segments = params.segments();
        if self.sphere.as_ref().map(|s| s.segments) != Some(segments) {
            debug!(segments, "building sphere");
            self.sphere = Some(Sphere::new(RADIUS, segments));
        }

        self.clock.set_paused(ctx.paused);
        let t = self.clock.advance(ctx.delta * params.speed);
        if !ctx.paused {
            self.rotation += ROTATION_STEP * params.speed;
        }

        let Some(sphere) = &self.sphere else {
            return MeshFrame {
                positions: Vec::new(),
                colors: Vec::new(),
                indices: Vec::new(),
                rotation: self.rotation,
            };
        };

        let positions = sphere
            .positions
            .iter()
            .map(|&p| p * (1.0 + displacement(p, t, params.wave_count, params.intensity)))
            .collect();
        let colors = sphere
            .positions
            .iter()
            .map(|p| palette.resolve((p.y + RADIUS) / (2.0 * RADIUS)))
            .collect();

        MeshFrame {
            positions,
            colors,
            indices: sphere.indices.clone(),
            rotation: self.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Viewport;

    fn ctx() -> TickContext {
        TickContext::new(Viewport::default())
    }

    #[test]
    fn test_sphere_topology() {
        let sphere = Sphere::new(RADIUS, 16);
        assert_eq!(sphere.positions.len(), 17 * 17);
        // Two triangles per quad minus one per quad on each pole row.
        assert_eq!(sphere.indices.len(), (16 * 16 * 2 - 2 * 16) * 3);
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.positions.len()));
        for p in &sphere.positions {
            assert!((p.length() - RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn test_displacement_bounded() {
        // Harmonic sum of 8 waves stays below 2.72.
        let bound = 2.72 * MAX_DISPLACEMENT;
        for i in 0..200 {
            let i = i as f32;
            let p = Vec3::new((i * 0.3).sin(), (i * 0.7).cos(), i * 0.01) * RADIUS;
            let d = displacement(p, i * 0.1, 8, 100.0);
            assert!(d.abs() <= bound);
        }
        assert_eq!(displacement(Vec3::ONE, 1.0, 3, 0.0), 0.0);
    }

    #[test]
    fn test_segments_follow_complexity() {
        let mut mesh = MeshMorph::new();
        let palette = MeshPalette::Single(Rgb::WHITE);
        let params = MeshParams {
            complexity: 20.4,
            ..Default::default()
        };
        let frame = mesh.tick(&params, palette, &ctx());
        assert_eq!(frame.positions.len(), 21 * 21);
        assert_eq!(frame.colors.len(), frame.positions.len());

        let params = MeshParams {
            complexity: 2.0,
            ..Default::default()
        };
        let frame = mesh.tick(&params, palette, &ctx());
        assert_eq!(frame.positions.len(), 11 * 11);
    }

    #[test]
    fn test_pause_freezes_time_and_rotation() {
        let mut mesh = MeshMorph::new();
        let params = MeshParams::default();
        let palette = MeshPalette::Single(Rgb::WHITE);
        let first = mesh.tick(&params, palette, &ctx());
        let paused = mesh.tick(&params, palette, &ctx().with_paused(true));
        assert_eq!(first, paused);

        let moved = mesh.tick(&params, palette, &ctx());
        assert!(moved.rotation.y > first.rotation.y);
        assert!((mesh.rotation().y - 2.0 * ROTATION_STEP.y).abs() < 1e-6);
    }

    #[test]
    fn test_palette_by_height() {
        let low = Rgb::new(255, 0, 0);
        let high = Rgb::new(0, 0, 255);
        let mut mesh = MeshMorph::new();
        let frame = mesh.tick(&MeshParams::default(), MeshPalette::Pair(low, high), &ctx());

        // Vertex row 0 is the top pole, the last row the bottom pole.
        assert_eq!(frame.colors[0], high);
        assert_eq!(frame.colors[frame.colors.len() - 1], low);
    }
}
