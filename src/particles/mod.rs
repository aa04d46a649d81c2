//! Particle systems.
//!
//! Three systems share the [`ParticleSystem`] update contract:
//!
//! | System | Motion | State carried across ticks |
//! |--------|--------|----------------------------|
//! | [`Swarm`] | flocking towards a target with local separation | positions, velocities, trails |
//! | [`Spiral`] | rigid rotation of a parametric galaxy | global rotation angle |
//! | [`Flux`] | coherent noise-driven drift in 3D | accumulated time |
//!
//! Every system owns a fixed-size array whose length always equals the
//! configured count. Changing the count (or anything else that alters the
//! layout) throws the array away and respawns it on the next update; arrays
//! are never grown or shrunk in place.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::time::TickContext;

pub mod flux;
pub mod spatial;
pub mod spiral;
pub mod swarm;

pub use flux::{Flux, FluxFrame, FluxParticle, FluxPoint};
pub use spatial::SpatialGrid;
pub use spiral::{Glow, Spiral, SpiralFrame, SpiralPoint, Star};
pub use swarm::{Pointer, Swarm, SwarmFrame};

/// Alpha multiplier applied to every trail entry each tick.
pub const TRAIL_DECAY: f32 = 0.95;

/// Common update contract for particle systems.
pub trait ParticleSystem {
    /// Parameter snapshot the system reads each tick.
    type Params;

    /// Evolve the system by one tick.
    ///
    /// Respawns first if the parameters changed the particle layout. While
    /// `ctx.paused` is set nothing moves, but a respawn still happens so
    /// the count invariant holds.
    fn update(&mut self, params: &Self::Params, ctx: &TickContext);

    /// Number of particles currently alive.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all particles; the next update respawns them.
    fn reset(&mut self);
}

/// Per-particle randoms in [0, 1), drawn once at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RandomAttributes {
    /// Phase or position offset.
    pub phase: f32,
    /// Speed variance.
    pub speed: f32,
    /// Size variance.
    pub scale: f32,
}

/// A past position with its fading alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    pub alpha: f32,
}

/// Bounded FIFO of past positions, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `position` at full alpha, drop entries beyond `capacity`, then
    /// fade every entry by [`TRAIL_DECAY`].
    pub fn push(&mut self, position: Vec2, capacity: usize) {
        self.points.push_back(TrailPoint { position, alpha: 1.0 });
        while self.points.len() > capacity {
            self.points.pop_front();
        }
        for point in &mut self.points {
            point.alpha *= TRAIL_DECAY;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// A 2D particle with a trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub trail: Trail,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            trail: Trail::new(),
        }
    }
}
