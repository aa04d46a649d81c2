//! Rotating spiral galaxy.
//!
//! Stars are laid out once along logarithmic-looking arms and never move
//! relative to each other; the whole galaxy spins by a single rotation angle.
//! The layout depends on the arm count, stars per arm, tightness and the
//! viewport, and is rebuilt from scratch whenever any of them changes.

use std::f32::consts::TAU;

use glam::Vec2;
use tracing::debug;

use super::{ParticleSystem, RandomAttributes};
use crate::color::{ColorRamp, Rgb};
use crate::params::{SpiralParams, Viewport};
use crate::spawn::Spawner;
use crate::time::{Clock, TickContext};

/// Outer radius of the galaxy as a fraction of the shorter viewport side.
pub const RADIUS_FRACTION: f32 = 0.4;

/// Rotation per tick per unit of rotation speed, in radians.
pub const ROTATION_STEP: f32 = 0.001;

/// Radius of the center glow.
pub const GLOW_RADIUS: f32 = 100.0;

/// Star shadow blur at full glow.
pub const STAR_BLUR: f32 = 15.0;

/// One star, fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Angle around the center before rotation.
    pub angle: f32,
    /// Distance from the center before jitter.
    pub distance: f32,
    pub arm: u32,
    /// Position along the arm, 0.0 at the center.
    pub progress: f32,
    pub attributes: RandomAttributes,
}

impl Star {
    /// Dot radius in 1.0-3.0.
    pub fn size(&self) -> f32 {
        1.0 + self.attributes.scale * 2.0
    }

    /// Radial offset in `[-thickness / 2, thickness / 2)`.
    pub fn jitter(&self, thickness: f32) -> f32 {
        (self.attributes.phase - 0.5) * thickness
    }
}

/// Place `arms * per_arm` stars along spiral arms.
pub fn layout(params: &SpiralParams, max_radius: f32, spawner: &mut Spawner) -> Vec<Star> {
    let per_arm = params.particles_per_arm.max(1);
    let arms = params.arms.max(1);
    let tightness = params.tightness / 50.0;

    spawner.spawn(params.total(), |ctx| {
        let arm = (ctx.index / per_arm as usize) as u32;
        let progress = (ctx.index % per_arm as usize) as f32 / per_arm as f32;
        Star {
            angle: progress * 2.0 * TAU * tightness + arm as f32 * TAU / arms as f32,
            distance: progress * max_radius,
            arm,
            progress,
            attributes: ctx.random_attributes(),
        }
    })
}

/// A star ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralPoint {
    pub position: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// Radial glow drawn once behind the stars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgb,
    /// Opacity at the center, fading to 0 at `radius`.
    pub intensity: f32,
    /// Shadow blur applied to every star.
    pub star_blur: f32,
}

/// Drawable spiral state.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralFrame {
    pub glow: Glow,
    pub stars: Vec<SpiralPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    arms: u32,
    per_arm: u32,
    tightness: f32,
    viewport: Viewport,
}

/// Spiral galaxy particle system.
#[derive(Debug, Clone)]
pub struct Spiral {
    stars: Vec<Star>,
    spawner: Spawner,
    rotation: Clock,
    key: Option<LayoutKey>,
}

impl Spiral {
    pub fn new(seed: u64) -> Self {
        Self {
            stars: Vec::new(),
            spawner: Spawner::new(seed),
            rotation: Clock::new(),
            key: None,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Current rotation angle in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation.elapsed()
    }

    /// Drawable stars and glow for `viewport`.
    pub fn frame(
        &self,
        params: &SpiralParams,
        ramp: &ColorRamp,
        viewport: Viewport,
    ) -> SpiralFrame {
        let params = params.clamped();
        let center = viewport.center();
        let max_radius = viewport.min_side() * RADIUS_FRACTION;
        let rotation = self.rotation();
        let glow = params.glow / 100.0;

        let stars = self
            .stars
            .iter()
            .map(|star| {
                let theta = rotation + star.angle;
                let radius = star.distance + star.jitter(params.thickness);
                let progress = if max_radius > 0.0 { star.distance / max_radius } else { 0.0 };
                SpiralPoint {
                    position: center + Vec2::new(theta.cos(), theta.sin()) * radius,
                    size: star.size(),
                    color: ramp.sample(progress),
                    alpha: 1.0 - progress * 0.5,
                }
            })
            .collect();

        SpiralFrame {
            glow: Glow {
                center,
                radius: GLOW_RADIUS,
                color: ramp.start(),
                intensity: glow,
                star_blur: STAR_BLUR * glow,
            },
            stars,
        }
    }
}

impl ParticleSystem for Spiral {
    type Params = SpiralParams;

    fn update(&mut self, params: &SpiralParams, ctx: &TickContext) {
        let params = params.clamped();
        let key = LayoutKey {
            arms: params.arms,
            per_arm: params.particles_per_arm,
            tightness: params.tightness,
            viewport: ctx.viewport,
        };
        if self.key != Some(key) {
            debug!(arms = key.arms, per_arm = key.per_arm, "laying out spiral");
            let max_radius = ctx.viewport.min_side() * RADIUS_FRACTION;
            self.stars = layout(&params, max_radius, &mut self.spawner);
            self.key = Some(key);
        }

        self.rotation.set_paused(ctx.paused);
        self.rotation.advance(params.rotation_speed * ROTATION_STEP);
    }

    fn len(&self) -> usize {
        self.stars.len()
    }

    fn reset(&mut self) {
        self.stars.clear();
        self.key = None;
    }
}
