//! Flocking swarm.
//!
//! Each tick every particle is pulled towards a target (the pointer while it
//! hovers over the field, the field center otherwise), pushed away from
//! neighbors inside the separation radius, speed-limited, moved and wrapped
//! around the edges.
//!
//! Particles are updated in place and in index order: particle i already
//! sees the moved positions of particles `0..i`. The grid search visits the
//! same neighbors in the same order as the pairwise loop, so both give the
//! same result.

use glam::Vec2;
use tracing::debug;

use super::{Particle, ParticleSystem, SpatialGrid, TrailPoint};
use crate::color::{ColorRamp, Rgb};
use crate::params::{NeighborSearch, SwarmParams, Viewport};
use crate::spawn::Spawner;
use crate::time::TickContext;

/// Distances below this are treated as zero and skipped.
pub const MIN_DISTANCE: f32 = 1e-4;

/// Extra cell width covering rounding in the per-tick travel bound.
const GRID_SLACK: f32 = 0.01;

/// Ticks after which a pointer that stopped reporting is ignored.
pub const POINTER_TIMEOUT: u64 = 120;

/// Trail dots are drawn at this fraction of the particle size.
pub const TRAIL_SIZE: f32 = 0.5;

/// Trail dots are drawn at this fraction of their stored alpha.
pub const TRAIL_OPACITY: f32 = 0.6;

/// Cohesion target supplied by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub position: Vec2,
    pub active: bool,
    /// Engine frame of the last report.
    pub last_seen: u64,
}

impl Pointer {
    /// The pointer position if it is active and was reported recently.
    pub fn target(&self, frame: u64) -> Option<Vec2> {
        let fresh = frame.saturating_sub(self.last_seen) <= POINTER_TIMEOUT;
        (self.active && fresh).then_some(self.position)
    }
}

/// A dot ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmDot {
    pub position: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// Drawable swarm state: trail dots first, then particles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwarmFrame {
    pub trails: Vec<SwarmDot>,
    pub particles: Vec<SwarmDot>,
}

/// Flocking particle system.
#[derive(Debug, Clone)]
pub struct Swarm {
    particles: Vec<Particle>,
    spawner: Spawner,
    grid: SpatialGrid,
    pointer: Pointer,
    /// Positions the grid was built from.
    positions: Vec<Vec2>,
    /// Particles that wrapped around an edge during the current tick.
    wrapped: Vec<usize>,
    /// Scratch list of neighbor candidates.
    candidates: Vec<usize>,
    needs_spawn: bool,
}

impl Swarm {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            spawner: Spawner::new(seed),
            grid: SpatialGrid::new(),
            pointer: Pointer::default(),
            positions: Vec::new(),
            wrapped: Vec::new(),
            candidates: Vec::new(),
            needs_spawn: true,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Report the pointer position at engine frame `frame`.
    pub fn pointer_moved(&mut self, position: Vec2, frame: u64) {
        self.pointer = Pointer {
            position,
            active: true,
            last_seen: frame,
        };
    }

    /// The pointer left the field.
    pub fn pointer_left(&mut self) {
        self.pointer.active = false;
    }

    fn respawn(&mut self, count: usize, viewport: Viewport) {
        debug!(count, "spawning swarm");
        let size = viewport.size();
        self.particles = self
            .spawner
            .spawn(count, |ctx| Particle::new(ctx.random_in_rect(size), ctx.random_velocity(1.0)));
        self.needs_spawn = false;
    }

    /// Indices of the particles that may lie within `radius` of `position`,
    /// in ascending order.
    fn gather_candidates(&mut self, position: Vec2, search: NeighborSearch) {
        self.candidates.clear();
        match search {
            NeighborSearch::BruteForce => self.candidates.extend(0..self.particles.len()),
            NeighborSearch::Grid => {
                let candidates = &mut self.candidates;
                self.grid.for_each_candidate(position, |j| candidates.push(j));
                // Wrapped particles left their bucket for the far edge.
                candidates.extend_from_slice(&self.wrapped);
                // Same summation order as the pairwise loop.
                candidates.sort_unstable();
                candidates.dedup();
            }
        }
    }

    /// Drawable dots, colored along `ramp` by particle index and trail age.
    pub fn frame(&self, params: &SwarmParams, ramp: &ColorRamp) -> SwarmFrame {
        let params = params.clamped();
        let count = self.particles.len();
        let mut frame = SwarmFrame {
            trails: Vec::new(),
            particles: Vec::with_capacity(count),
        };

        for (i, particle) in self.particles.iter().enumerate() {
            let trail_len = particle.trail.len();
            frame.trails.extend(particle.trail.iter().enumerate().map(
                |(t, &TrailPoint { position, alpha })| SwarmDot {
                    position,
                    radius: params.size * TRAIL_SIZE,
                    color: ramp.sample(t as f32 / trail_len as f32),
                    alpha: alpha * TRAIL_OPACITY,
                },
            ));
            frame.particles.push(SwarmDot {
                position: particle.position,
                radius: params.size,
                color: ramp.sample(i as f32 / count as f32),
                alpha: 1.0,
            });
        }
        frame
    }
}

impl ParticleSystem for Swarm {
    type Params = SwarmParams;

    fn update(&mut self, params: &SwarmParams, ctx: &TickContext) {
        let params = params.clamped();
        let count = params.count as usize;
        if self.needs_spawn || self.particles.len() != count {
            self.respawn(count, ctx.viewport);
        }
        if ctx.paused || self.particles.is_empty() {
            return;
        }

        let viewport = ctx.viewport;
        let target = self.pointer.target(ctx.frame).unwrap_or_else(|| viewport.center());
        let cohesion = params.cohesion / 1000.0;
        let radius = params.separation;

        // Particles move in place, so particle i sees 0..i already moved.
        // A particle travels at most `max_speed` per tick unless it wraps,
        // so widening the cells by that much keeps every moved neighbor in
        // the 3x3 block around the query.
        self.wrapped.clear();
        if params.neighbor_search == NeighborSearch::Grid {
            self.positions.clear();
            self.positions.extend(self.particles.iter().map(|p| p.position));
            self.grid.rebuild(&self.positions, radius + params.max_speed + GRID_SLACK);
        }

        for i in 0..self.particles.len() {
            let position = self.particles[i].position;
            self.gather_candidates(position, params.neighbor_search);

            let mut velocity = self.particles[i].velocity;

            // Cohesion
            let offset = target - position;
            let distance = offset.length();
            if distance > MIN_DISTANCE {
                velocity += offset / distance * cohesion;
            }

            // Separation
            for &j in &self.candidates {
                if j == i {
                    continue;
                }
                let offset = self.particles[j].position - position;
                let distance = offset.length();
                if distance > MIN_DISTANCE && distance < radius {
                    let force = (radius - distance) / radius;
                    velocity -= offset / distance * force * 0.5;
                }
            }

            // Speed limit
            let speed = velocity.length();
            if speed > params.max_speed {
                velocity = velocity / speed * params.max_speed;
            }

            // Integrate and wrap
            let mut p = position + velocity;
            let mut wrapped = false;
            if p.x < 0.0 {
                p.x = viewport.width;
                wrapped = true;
            }
            if p.x > viewport.width {
                p.x = 0.0;
                wrapped = true;
            }
            if p.y < 0.0 {
                p.y = viewport.height;
                wrapped = true;
            }
            if p.y > viewport.height {
                p.y = 0.0;
                wrapped = true;
            }
            if wrapped {
                self.wrapped.push(i);
            }

            let particle = &mut self.particles[i];
            particle.velocity = velocity;
            particle.position = p;
            particle.trail.push(p, params.trail_length as usize);
        }
    }

    fn len(&self) -> usize {
        self.particles.len()
    }

    fn reset(&mut self) {
        self.particles.clear();
        self.needs_spawn = true;
    }
}
