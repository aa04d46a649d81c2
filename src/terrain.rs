//! Animated terrain grid.
//!
//! A square grid of flat tiles centered on the origin. Tile heights follow a
//! travelling sine/cosine pattern; each tile tilts with its height, breathes
//! in scale and takes its color from the ramp by height.

use glam::Vec3;

use crate::color::{ColorRamp, Rgb};
use crate::params::TerrainParams;
use crate::time::{Clock, TickContext};

/// Distance between neighboring tile centers.
pub const SPACING: f32 = 1.5;

/// Spatial frequency of the height pattern.
pub const WAVE_FREQUENCY: f32 = 0.2;

/// Tilt in radians per unit of height, around X and Z.
pub const TILT_PER_HEIGHT: f32 = 0.2;

/// One tile instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainCell {
    pub position: Vec3,
    /// Rotation around both X and Z.
    pub tilt: f32,
    /// Uniform scale.
    pub scale: f32,
    pub color: Rgb,
}

/// Drawable grid, row-major over `size x size` tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainFrame {
    pub size: u32,
    pub cells: Vec<TerrainCell>,
}

/// Terrain grid generator.
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    clock: Clock,
}

impl Terrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated real time in seconds.
    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn tick(
        &mut self,
        params: &TerrainParams,
        ramp: &ColorRamp,
        ctx: &TickContext,
    ) -> TerrainFrame {
        let params = params.clamped();
        self.clock.set_paused(ctx.paused);
        let t = self.clock.advance(ctx.delta) * params.speed * 0.5;

        let size = params.size;
        let amplitude = params.distortion / 10.0;
        let half = size as f32 / 2.0;

        let mut cells = Vec::with_capacity((size * size) as usize);
        for x in 0..size {
            for z in 0..size {
                let px = (x as f32 - half) * SPACING;
                let pz = (z as f32 - half) * SPACING;
                let height =
                    (px * WAVE_FREQUENCY + t).sin() * (pz * WAVE_FREQUENCY + t).cos() * amplitude;

                let mix = if amplitude > 0.0 { (height / amplitude + 1.0) / 2.0 } else { 0.5 };
                cells.push(TerrainCell {
                    position: Vec3::new(px, height, pz),
                    tilt: height * TILT_PER_HEIGHT,
                    scale: if ctx.paused { 1.0 } else { 1.0 + (t + px).sin() * 0.2 },
                    color: ramp.sample(mix),
                });
            }
        }

        TerrainFrame { size, cells }
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
    fn test_grid_size_and_centering() {
        let mut terrain = Terrain::new();
        let params = TerrainParams {
            size: 10,
            ..Default::default()
        };
        let frame = terrain.tick(&params, &ColorRamp::default(), &ctx());
        assert_eq!(frame.cells.len(), 100);
        assert_eq!(frame.cells[0].position.x, -7.5);
        assert_eq!(frame.cells[99].position.z, 6.0);
    }

    #[test]
    fn test_heights_bounded_by_distortion() {
        let mut terrain = Terrain::new();
        let params = TerrainParams {
            distortion: 80.0,
            ..Default::default()
        };
        for _ in 0..10 {
            let frame = terrain.tick(&params, &ColorRamp::default(), &ctx());
            for cell in &frame.cells {
                assert!(cell.position.y.abs() <= 8.0 + 1e-4);
                assert!((cell.tilt - cell.position.y * TILT_PER_HEIGHT).abs() < 1e-6);
                assert!((0.8 - 1e-4..=1.2 + 1e-4).contains(&cell.scale));
            }
        }
    }

    #[test]
    fn test_flat_when_undistorted() {
        let mut terrain = Terrain::new();
        let params = TerrainParams {
            distortion: 0.0,
            ..Default::default()
        };
        let ramp = ColorRamp::default();
        let frame = terrain.tick(&params, &ramp, &ctx());
        assert!(frame.cells.iter().all(|c| c.position.y == 0.0));
        assert!(frame.cells.iter().all(|c| c.color == ramp.sample(0.5)));
    }

    #[test]
    fn test_paused_scale_is_one() {
        let mut terrain = Terrain::new();
        let params = TerrainParams::default();
        terrain.tick(&params, &ColorRamp::default(), &ctx());
        let before = terrain.time();
        let frame = terrain.tick(&params, &ColorRamp::default(), &ctx().with_paused(true));
        assert_eq!(terrain.time(), before);
        assert!(frame.cells.iter().all(|c| c.scale == 1.0));
    }
}
