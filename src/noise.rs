//! Coherent noise.
//!
//! - [`LatticeNoise`] - seeded 2D gradient noise with fractal (fBm) summation,
//!   used by the noise field
//! - [`simplex2`] - table-free 2D simplex noise, the same formula the flux
//!   compute kernel evaluates on the GPU
//! - [`hash2`] and [`value_noise2`] - sine-hash value noise, used by the curve
//!   gradient and for film grain

use glam::{Vec2, Vec3};

/// Seeded 2D gradient noise over an integer lattice.
///
/// The permutation is built once from the seed and never changes, so two
/// instances with the same seed return bit-identical samples.
#[derive(Clone)]
pub struct LatticeNoise {
    seed: u32,
    perm: [u8; 512],
}

impl LatticeNoise {
    /// Build the permutation table for `seed`.
    pub fn new(seed: u32) -> Self {
        let mut p = [0u8; 256];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates driven by a small linear congruential generator.
        let mut state = seed as u64;
        for i in (1..256usize).rev() {
            state = (state * 9301 + 49297) % 233280;
            let j = (state * (i as u64 + 1) / 233280) as usize;
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&p);
        perm[256..].copy_from_slice(&p);

        Self { seed, perm }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Gradient noise at `(x, y)`, roughly in [-1, 1].
    pub fn noise2d(&self, x: f32, y: f32) -> f32 {
        let (fx, fy) = (x.floor(), y.floor());
        let xi = (fx as i32 & 255) as usize;
        let yi = (fy as i32 & 255) as usize;
        let x = x - fx;
        let y = y - fy;

        let u = fade(x);
        let v = fade(y);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let b = p[xi + 1] as usize + yi;

        lerp(
            v,
            lerp(u, grad(p[a], x, y), grad(p[b], x - 1.0, y)),
            lerp(u, grad(p[a + 1], x, y - 1.0), grad(p[b + 1], x - 1.0, y - 1.0)),
        )
    }

    /// Fractal Brownian motion: `octaves` layers of [`noise2d`](Self::noise2d)
    /// at rising frequency and falling amplitude, shifted by `z`.
    ///
    /// Normalized by the total amplitude so the result stays in [-1, 1].
    /// Octaves are clamped to 1..=8.
    pub fn fbm(
        &self,
        x: f32,
        y: f32,
        z: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves.clamp(1, 8) {
            total += self.noise2d(x * frequency + z, y * frequency + z) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_value.abs() < f32::EPSILON {
            return 0.0;
        }
        total / max_value
    }
}

impl std::fmt::Debug for LatticeNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatticeNoise")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for LatticeNoise {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

/// Dot product with one of the four diagonal gradients picked by `hash`.
#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

// ========== Simplex ==========

#[inline]
fn mod289_2(x: Vec2) -> Vec2 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn permute(x: Vec3) -> Vec3 {
    mod289_3((x * 34.0 + 1.0) * x)
}

/// 2D simplex noise in roughly [-1, 1].
///
/// Hash-free variant using the `mod289` permutation polynomial, so it needs
/// no table and matches the WGSL `simplex2` in [`crate::shader`].
pub fn simplex2(v: Vec2) -> f32 {
    const C_X: f32 = 0.211_324_87; // (3 - sqrt(3)) / 6
    const C_Y: f32 = 0.366_025_4; // (sqrt(3) - 1) / 2
    const C_Z: f32 = -0.577_350_26; // -1 + 2 * C_X
    const C_W: f32 = 0.024_390_243; // 1 / 41

    // First corner
    let i = (v + Vec2::splat(v.dot(Vec2::splat(C_Y)))).floor();
    let x0 = v - i + Vec2::splat(i.dot(Vec2::splat(C_X)));

    // Other corners
    let i1 = if x0.x > x0.y { Vec2::X } else { Vec2::Y };
    let x12a = x0 + C_X - i1;
    let x12b = x0 + C_Z;

    // Permutations
    let i = mod289_2(i);
    let p = permute(
        permute(Vec3::splat(i.y) + Vec3::new(0.0, i1.y, 1.0))
            + Vec3::splat(i.x)
            + Vec3::new(0.0, i1.x, 1.0),
    );

    let falloff = Vec3::new(x0.dot(x0), x12a.dot(x12a), x12b.dot(x12b));
    let mut m = (Vec3::splat(0.5) - falloff).max(Vec3::ZERO);
    m *= m;
    m *= m;

    // Gradients from 41 points on a line, mapped onto a diamond
    let scaled = p * C_W;
    let x = 2.0 * (scaled - scaled.floor()) - 1.0;
    let h = x.abs() - 0.5;
    let ox = (x + 0.5).floor();
    let a0 = x - ox;

    // Normalise gradients implicitly by scaling m
    m *= 1.792_842_9 - 0.853_734_7 * (a0 * a0 + h * h);

    let g = Vec3::new(
        a0.x * x0.x + h.x * x0.y,
        a0.y * x12a.x + h.y * x12a.y,
        a0.z * x12b.x + h.z * x12b.y,
    );
    130.0 * m.dot(g)
}

// ========== Hash noise ==========

/// GLSL-style `fract`: `x - floor(x)`, non-negative for negative `x`.
#[inline]
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Pseudo-random value in [0, 1] from the classic sine hash of a 2D point.
#[inline]
pub fn hash2(p: Vec2) -> f32 {
    fract(p.dot(Vec2::new(12.9898, 78.233)).sin() * 43_758.547)
}

/// Value noise in [0, 1]: [`hash2`] at the four surrounding lattice corners,
/// blended with a cubic Hermite curve.
pub fn value_noise2(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;

    let a = hash2(i);
    let b = hash2(i + Vec2::X);
    let c = hash2(i + Vec2::Y);
    let d = hash2(i + Vec2::ONE);

    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    a + (b - a) * u.x + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_is_duplicated_shuffle() {
        let noise = LatticeNoise::new(42);
        let mut seen = [false; 256];
        for &v in &noise.perm[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(noise.perm[..256], noise.perm[256..]);
    }

    #[test]
    fn test_determinism() {
        let a = LatticeNoise::new(1234);
        let b = LatticeNoise::new(1234);
        for i in 0..100 {
            let x = i as f32 * 0.37 - 12.0;
            let y = i as f32 * 0.91 + 3.5;
            assert_eq!(a.noise2d(x, y).to_bits(), b.noise2d(x, y).to_bits());
        }
    }

    #[test]
    fn test_seeds_differ() {
        let a = LatticeNoise::new(1);
        let b = LatticeNoise::new(2);
        let differs = (0..50).any(|i| {
            let x = i as f32 * 0.53 + 0.1;
            a.noise2d(x, x * 0.7) != b.noise2d(x, x * 0.7)
        });
        assert!(differs);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = LatticeNoise::new(7);
        for x in -3..3 {
            for y in -3..3 {
                assert_eq!(noise.noise2d(x as f32, y as f32), 0.0);
            }
        }
    }

    #[test]
    fn test_fbm_bounded_for_all_octaves() {
        let noise = LatticeNoise::new(99);
        for octaves in 1..=8 {
            for i in 0..400 {
                let x = (i % 20) as f32 * 0.173 - 1.7;
                let y = (i / 20) as f32 * 0.219 + 0.3;
                let v = noise.fbm(x, y, 0.42, octaves, 0.5, 2.0);
                assert!((-1.05..=1.05).contains(&v), "octaves {octaves}: {v}");
            }
        }
    }

    #[test]
    fn test_fbm_clamps_octaves() {
        let noise = LatticeNoise::new(5);
        let fbm = |octaves| noise.fbm(0.3, 0.7, 0.0, octaves, 0.5, 2.0);
        assert_eq!(fbm(0), fbm(1));
        assert_eq!(fbm(99), fbm(8));
    }

    #[test]
    fn test_noise_is_continuous() {
        let noise = LatticeNoise::new(3);
        let a = noise.noise2d(1.5, 2.5);
        let b = noise.noise2d(1.5001, 2.5);
        assert!((a - b).abs() < 0.01);
    }

    #[test]
    fn test_hash_and_value_noise_range() {
        for i in 0..400 {
            let p = Vec2::new(i as f32 * 0.731 - 90.0, i as f32 * -0.389 + 12.0);
            assert!((0.0..=1.0).contains(&hash2(p)));
            let v = value_noise2(p);
            assert!((0.0..=1.0).contains(&v), "{p}: {v}");
        }
        assert_eq!(fract(-0.25), 0.75);
    }

    #[test]
    fn test_value_noise_hits_lattice_hashes() {
        for (x, y) in [(0.0, 0.0), (3.0, -2.0), (-7.0, 11.0)] {
            let p = Vec2::new(x, y);
            assert_eq!(value_noise2(p), hash2(p));
        }
    }

    #[test]
    fn test_simplex_range_and_continuity() {
        for i in 0..500 {
            let p = Vec2::new(i as f32 * 0.131 - 30.0, i as f32 * 0.077 + 4.0);
            let v = simplex2(p);
            assert!((-1.1..=1.1).contains(&v), "{p}: {v}");
            let w = simplex2(p + Vec2::splat(1e-3));
            assert!((v - w).abs() < 0.05);
        }
    }
}
