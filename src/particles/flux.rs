//! Turbulent 3D particle flow.
//!
//! Particles are spawned once inside a 50 x 50 x 20 box and never integrate
//! velocity. Every tick their rest positions are pushed through a coherent
//! displacement field driven by 2D simplex noise and accumulated time, which
//! makes neighboring particles flow together instead of jittering.
//!
//! The field is evaluated through the [`DisplacementField`] trait: the CPU
//! loop [`CpuTurbulence`] is the default, and with the `gpu` feature
//! `GpuTurbulence` runs the same formula as a compute shader.

use glam::{Vec2, Vec3};
use tracing::debug;

use super::{ParticleSystem, RandomAttributes};
use crate::color::{ColorRamp, Rgb};
use crate::noise::simplex2;
use crate::params::{FluxParams, Viewport};
use crate::spawn::Spawner;
use crate::time::{Clock, TickContext};

/// Full extents of the spawn volume.
pub const SPAWN_EXTENTS: Vec3 = Vec3::new(50.0, 50.0, 20.0);

/// Camera distance from the origin along +Z.
pub const CAMERA_Z: f32 = 30.0;

/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 60.0;

/// Points closer to the camera than this are culled.
pub const NEAR_PLANE: f32 = 0.1;

/// Point size scale at unit depth.
pub const SIZE_ATTENUATION: f32 = 200.0;

/// A flux particle, fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxParticle {
    /// Undisplaced position.
    pub rest: Vec3,
    pub attributes: RandomAttributes,
}

/// Per-frame inputs of the displacement field.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FluxUniforms {
    /// Accumulated flow time in seconds.
    pub time: f32,
    pub speed: f32,
    pub chaos: f32,
    /// Number of particles to evaluate.
    pub count: u32,
}

/// Displaced position and the noise value that drove it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FluxSample {
    pub position: Vec3,
    pub noise: f32,
}

/// Evaluates the flux displacement for a batch of particles.
///
/// Implementations must produce exactly one sample per particle, in order.
pub trait DisplacementField {
    /// Replace `out` with one sample per particle.
    fn evaluate(
        &mut self,
        particles: &[FluxParticle],
        uniforms: FluxUniforms,
        out: &mut Vec<FluxSample>,
    );

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Displace one particle.
pub fn turbulence(particle: &FluxParticle, uniforms: &FluxUniforms) -> FluxSample {
    let mut pos = particle.rest;
    let t = uniforms.time * uniforms.speed * (0.5 + particle.attributes.speed * 0.5);
    let noise = simplex2(Vec2::new(pos.x, pos.y) * 0.05 + Vec2::splat(t * 0.1));
    let swirl = noise * uniforms.chaos * 0.1;

    pos.x += (pos.y * 0.1 + t + swirl).sin();
    pos.y += (pos.x * 0.1 + t + swirl).cos();
    pos.z += (pos.x * 0.2 + t).sin() * (uniforms.chaos * 0.1);

    FluxSample { position: pos, noise }
}

/// Evaluates [`turbulence`] in a plain loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuTurbulence;

impl DisplacementField for CpuTurbulence {
    fn evaluate(
        &mut self,
        particles: &[FluxParticle],
        uniforms: FluxUniforms,
        out: &mut Vec<FluxSample>,
    ) {
        out.clear();
        out.extend(particles.iter().map(|p| turbulence(p, &uniforms)));
    }

    fn name(&self) -> &'static str {
        "cpu"
    }
}

/// GLSL-style smoothstep.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A flux particle projected onto the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxPoint {
    /// Displaced world position.
    pub world: Vec3,
    /// Projected position in viewport pixels.
    pub screen: Vec2,
    /// Point size in pixels.
    pub size: f32,
    pub color: Rgb,
    /// Fades out away from the z = 0 plane.
    pub alpha: f32,
}

/// Drawable flux state, in particle order (culled points are skipped).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxFrame {
    pub points: Vec<FluxPoint>,
}

/// Turbulent flow particle system.
pub struct Flux {
    particles: Vec<FluxParticle>,
    samples: Vec<FluxSample>,
    spawner: Spawner,
    clock: Clock,
    field: Box<dyn DisplacementField>,
    needs_spawn: bool,
}

impl Flux {
    /// Flux evaluated on the CPU.
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Box::new(CpuTurbulence))
    }

    /// Flux evaluated by a custom displacement backend.
    pub fn with_field(seed: u64, field: Box<dyn DisplacementField>) -> Self {
        Self {
            particles: Vec::new(),
            samples: Vec::new(),
            spawner: Spawner::new(seed),
            clock: Clock::new(),
            field,
            needs_spawn: true,
        }
    }

    /// Swap the displacement backend, keeping particles and time.
    pub fn set_field(&mut self, field: Box<dyn DisplacementField>) {
        debug!(backend = field.name(), "flux backend changed");
        self.field = field;
    }

    pub fn backend(&self) -> &'static str {
        self.field.name()
    }

    pub fn particles(&self) -> &[FluxParticle] {
        &self.particles
    }

    /// Samples from the most recent update.
    pub fn samples(&self) -> &[FluxSample] {
        &self.samples
    }

    /// Accumulated flow time.
    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Project the latest samples for `viewport`.
    pub fn frame(&self, params: &FluxParams, ramp: &ColorRamp, viewport: Viewport) -> FluxFrame {
        let params = params.clamped();
        let center = viewport.center();
        let focal = viewport.height * 0.5 / (FOV_DEGREES.to_radians() * 0.5).tan();

        let points = self
            .particles
            .iter()
            .zip(&self.samples)
            .filter_map(|(particle, sample)| {
                let world = sample.position;
                let depth = CAMERA_Z - world.z;
                if depth < NEAR_PLANE {
                    return None;
                }
                Some(FluxPoint {
                    world,
                    screen: center + Vec2::new(world.x, -world.y) * (focal / depth),
                    size: params.size
                        * (SIZE_ATTENUATION / depth)
                        * (0.5 + particle.attributes.scale),
                    color: ramp.sample(smoothstep(-1.0, 1.0, sample.noise)),
                    alpha: 1.0 - smoothstep(15.0, 40.0, world.z.abs()),
                })
            })
            .collect();

        FluxFrame { points }
    }
}

impl std::fmt::Debug for Flux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flux")
            .field("particles", &self.particles.len())
            .field("time", &self.clock.elapsed())
            .field("backend", &self.field.name())
            .finish()
    }
}

impl ParticleSystem for Flux {
    type Params = FluxParams;

    fn update(&mut self, params: &FluxParams, ctx: &TickContext) {
        let params = params.clamped();
        let count = params.count as usize;
        if self.needs_spawn || self.particles.len() != count {
            debug!(count, "spawning flux");
            self.particles = self.spawner.spawn(count, |spawn| FluxParticle {
                rest: spawn.random_in_box(SPAWN_EXTENTS),
                attributes: spawn.random_attributes(),
            });
            self.needs_spawn = false;
        }

        self.clock.set_paused(ctx.paused);
        let time = self.clock.advance(ctx.delta);

        let uniforms = FluxUniforms {
            time,
            speed: params.speed,
            chaos: params.chaos,
            count: count as u32,
        };
        self.field.evaluate(&self.particles, uniforms, &mut self.samples);
    }

    fn len(&self) -> usize {
        self.particles.len()
    }

    fn reset(&mut self) {
        self.particles.clear();
        self.samples.clear();
        self.needs_spawn = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TickContext {
        TickContext::new(Viewport::new(800.0, 600.0)).with_delta(1.0 / 60.0)
    }

    #[test]
    fn test_spawn_volume_and_count() {
        let mut flux = Flux::new(1);
        let params = FluxParams {
            count: 1200,
            ..Default::default()
        };
        flux.update(&params, &ctx());
        assert_eq!(flux.len(), 1200);
        assert_eq!(flux.samples().len(), 1200);
        for p in flux.particles() {
            assert!(p.rest.abs().cmple(SPAWN_EXTENTS * 0.5).all());
        }
    }

    #[test]
    fn test_count_change_respawns() {
        let mut flux = Flux::new(2);
        flux.update(&FluxParams::default(), &ctx());
        let params = FluxParams {
            count: 300,
            ..Default::default()
        };
        flux.update(&params, &ctx());
        assert_eq!(flux.len(), 300);
    }

    #[test]
    fn test_zero_chaos_keeps_depth() {
        let particle = FluxParticle {
            rest: Vec3::new(3.0, -4.0, 5.0),
            attributes: RandomAttributes::default(),
        };
        let uniforms = FluxUniforms {
            time: 12.0,
            speed: 1.0,
            chaos: 0.0,
            count: 1,
        };
        let sample = turbulence(&particle, &uniforms);
        assert_eq!(sample.position.z, 5.0);
        // x and y move by at most one unit each
        assert!((sample.position.x - 3.0).abs() <= 1.0);
        assert!((sample.position.y + 4.0).abs() <= 1.0);
    }

    #[test]
    fn test_flow_is_coherent() {
        let uniforms = FluxUniforms {
            time: 4.0,
            speed: 1.0,
            chaos: 50.0,
            count: 2,
        };
        let a = FluxParticle {
            rest: Vec3::new(1.0, 1.0, 0.0),
            attributes: RandomAttributes::default(),
        };
        let b = FluxParticle {
            rest: Vec3::new(1.01, 1.0, 0.0),
            ..a
        };
        let da = turbulence(&a, &uniforms).position - a.rest;
        let db = turbulence(&b, &uniforms).position - b.rest;
        assert!(da.distance(db) < 0.1);
    }

    #[test]
    fn test_time_accumulates_delta_unless_paused() {
        let mut flux = Flux::new(3);
        let params = FluxParams::default();
        flux.update(&params, &ctx().with_delta(0.5));
        flux.update(&params, &ctx().with_delta(0.25));
        assert!((flux.time() - 0.75).abs() < 1e-6);

        let before = flux.samples().to_vec();
        flux.update(&params, &ctx().with_delta(0.5).with_paused(true));
        assert!((flux.time() - 0.75).abs() < 1e-6);
        assert_eq!(flux.samples(), &before[..]);
    }

    #[test]
    fn test_frame_projection() {
        let mut flux = Flux::new(4);
        let params = FluxParams {
            count: 500,
            ..Default::default()
        };
        flux.update(&params, &ctx());
        let viewport = Viewport::new(800.0, 600.0);
        let frame = flux.frame(&params, &ColorRamp::default(), viewport);
        assert_eq!(frame.points.len(), 500);
        for point in &frame.points {
            assert!((0.0..=1.0).contains(&point.alpha));
            assert!(point.size > 0.0);
        }

        // Size attenuates with distance from the camera.
        for (point, particle) in frame.points.iter().zip(flux.particles()) {
            let depth = CAMERA_Z - point.world.z;
            let expected =
                params.size * SIZE_ATTENUATION / depth * (0.5 + particle.attributes.scale);
            assert!((point.size - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(-1.0, 1.0, -2.0), 0.0);
        assert_eq!(smoothstep(-1.0, 1.0, 0.0), 0.5);
        assert_eq!(smoothstep(15.0, 40.0, 50.0), 1.0);
    }

    #[test]
    fn test_cpu_backend_one_sample_per_particle() {
        let particles: Vec<FluxParticle> = Spawner::new(5).spawn(64, |ctx| FluxParticle {
            rest: ctx.random_in_box(SPAWN_EXTENTS),
            attributes: ctx.random_attributes(),
        });
        let mut out = vec![FluxSample::default(); 3];
        CpuTurbulence.evaluate(&particles, FluxUniforms::default(), &mut out);
        assert_eq!(out.len(), 64);
    }
}
