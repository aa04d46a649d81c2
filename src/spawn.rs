//! Seeded spawning for particle systems.
//!
//! A [`Spawner`] owns the random number generator of one particle system and
//! hands out a [`SpawnContext`] per particle, so spawn closures read like a
//! description of a single particle:
//!
//! ```
//! use morphgen::spawn::Spawner;
//! use glam::Vec2;
//!
//! let mut spawner = Spawner::new(7);
//! let dots: Vec<Vec2> = spawner.spawn(100, |ctx| ctx.random_in_rect(Vec2::new(800.0, 600.0)));
//! assert_eq!(dots.len(), 100);
//! ```
//!
//! The same seed always produces the same particles.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::particles::RandomAttributes;

/// Owns the RNG used to (re)seed one particle system.
#[derive(Debug, Clone)]
pub struct Spawner {
    seed: u64,
    rng: SmallRng,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed this spawner was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Spawn `count` particles, calling `f` once per index in order.
    pub fn spawn<T>(
        &mut self,
        count: usize,
        mut f: impl FnMut(&mut SpawnContext<'_>) -> T,
    ) -> Vec<T> {
        let mut out = Vec::with_capacity(count);
        for index in 0..count {
            let mut ctx = SpawnContext {
                index,
                count,
                rng: &mut self.rng,
            };
            out.push(f(&mut ctx));
        }
        out
    }

    /// Direct access to the RNG for one-off draws.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

/// Per-particle view of a [`Spawner`] with helpers for common spawn patterns.
pub struct SpawnContext<'a> {
    /// Index of the particle being spawned (0 to count-1).
    pub index: usize,
    /// Total number of particles being spawned.
    pub count: usize,
    rng: &'a mut SmallRng,
}

impl SpawnContext<'_> {
    /// Normalized progress through the spawn (0.0 up to, not including, 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.index as f32 / self.count as f32
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in [0, 1).
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Three independent uniform randoms, fixed for the particle's lifetime.
    pub fn random_attributes(&mut self) -> RandomAttributes {
        RandomAttributes {
            phase: self.random(),
            speed: self.random(),
            scale: self.random(),
        }
    }

    // ========== Position helpers ==========

    /// Random point in the rectangle from the origin to `size`.
    pub fn random_in_rect(&mut self, size: Vec2) -> Vec2 {
        Vec2::new(self.random() * size.x, self.random() * size.y)
    }

    /// Random point in a box of the given full extents, centered at the origin.
    pub fn random_in_box(&mut self, extents: Vec3) -> Vec3 {
        Vec3::new(
            (self.random() - 0.5) * extents.x,
            (self.random() - 0.5) * extents.y,
            (self.random() - 0.5) * extents.z,
        )
    }

    // ========== Velocity helpers ==========

    /// Random velocity with each component in `[-max, max)`.
    pub fn random_velocity(&mut self, max: f32) -> Vec2 {
        Vec2::new((self.random() - 0.5) * 2.0 * max, (self.random() - 0.5) * 2.0 * max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_progress() {
        let mut spawner = Spawner::new(1);
        let progress = spawner.spawn(4, |ctx| ctx.progress());
        assert_eq!(progress, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let a = Spawner::new(99).spawn(10, |ctx| ctx.random_attributes());
        let b = Spawner::new(99).spawn(10, |ctx| ctx.random_attributes());
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_in_rect_bounds() {
        let mut spawner = Spawner::new(3);
        let size = Vec2::new(640.0, 480.0);
        for p in spawner.spawn(500, |ctx| ctx.random_in_rect(size)) {
            assert!(p.x >= 0.0 && p.x < size.x);
            assert!(p.y >= 0.0 && p.y < size.y);
        }
    }

    #[test]
    fn test_random_in_box_bounds() {
        let mut spawner = Spawner::new(4);
        let extents = Vec3::new(50.0, 50.0, 20.0);
        for p in spawner.spawn(500, |ctx| ctx.random_in_box(extents)) {
            assert!(p.abs().cmple(extents * 0.5).all());
        }
    }

    #[test]
    fn test_attributes_in_unit_interval() {
        let mut spawner = Spawner::new(5);
        for attrs in spawner.spawn(200, |ctx| ctx.random_attributes()) {
            for v in [attrs.phase, attrs.speed, attrs.scale] {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_random_range_empty() {
        let mut spawner = Spawner::new(6);
        let v = spawner.spawn(1, |ctx| ctx.random_range(2.0, 2.0));
        assert_eq!(v, vec![2.0]);
    }
}
