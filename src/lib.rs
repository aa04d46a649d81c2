//! # morphgen - Morphing Procedural Generators
//!
//! Slider-driven generators for organic shapes, noise fields and particle
//! swarms. Every generator is a plain Rust value: feed it a parameter
//! snapshot and a [`TickContext`], get back geometry ready to draw.
//! Rendering, UI and export live outside this crate.
//!
//! ## Quick Start
//!
//! ```
//! use morphgen::prelude::*;
//!
//! let mut engine = Engine::new(42);
//! let mut snapshot = Snapshot::default();
//! snapshot.scene = Scene::Swarm;
//! snapshot.swarm.count = 500;
//!
//! let viewport = Viewport::new(800.0, 600.0);
//! for _ in 0..10 {
//!     if let Some(Frame::Swarm(frame)) = engine.tick(&snapshot, Some(viewport)) {
//!         assert_eq!(frame.particles.len(), 500);
//!     }
//! }
//! ```
//!
//! Generators can also be driven directly:
//!
//! ```
//! use morphgen::prelude::*;
//!
//! let mut blob = BlobGenerator::new();
//! let ctx = TickContext::new(Viewport::default());
//! let fill = FillStyle::Linear.build(&ColorRamp::default());
//! let frame = blob.tick(&BlobParams::default(), fill, &ctx);
//! assert!(frame.path.is_closed());
//! ```
//!
//! ## Generators
//!
//! | Scene | Generator | Output |
//! |-------|-----------|--------|
//! | Blob | [`BlobGenerator`] | closed smooth outline, fill and glow |
//! | Waves | [`WaveGenerator`] | stacked filled wave silhouettes |
//! | Noise | [`NoiseFieldRenderer`] | fBm scalar grid, convertible to an image |
//! | Swarm | [`Swarm`] | flocking 2D particles with trails |
//! | Spiral | [`Spiral`] | rotating galaxy of stars |
//! | Flux | [`Flux`] | 3D particles in a coherent noise flow |
//! | Mesh | [`MeshMorph`] | wave-displaced sphere |
//! | Terrain | [`Terrain`] | animated grid of height-mapped tiles |
//! | Aurora | [`AuroraGradient`] | noise-warped four-corner gradient image |
//! | Curve | [`CurveGradient`] | contour bands over layered noise, as an image |
//!
//! ## Cargo Features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `gpu` | `GpuTurbulence`, a `wgpu` compute backend for [`Flux`] |
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (respawns, scene changes, preset I/O,
//! GPU fallback) and never installs a subscriber.

pub mod aurora;
pub mod color;
pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod field;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod particles;
pub mod shader;
pub mod shape;
pub mod spawn;
pub mod spline;
pub mod terrain;
pub mod time;

pub use aurora::AuroraGradient;
pub use color::{ColorRamp, Fill, FillStyle, MeshPalette, Rgb};
pub use config::{Scene, Snapshot};
pub use curve::CurveGradient;
pub use engine::{Engine, Frame};
pub use error::ConfigError;
#[cfg(feature = "gpu")]
pub use error::GpuError;
pub use field::{NoiseField, NoiseFieldRenderer};
pub use glam::{Vec2, Vec3};
#[cfg(feature = "gpu")]
pub use gpu::GpuTurbulence;
pub use mesh::{MeshFrame, MeshMorph};
pub use noise::LatticeNoise;
pub use params::{
    AuroraParams, BlobParams, CurveParams, FluxParams, MeshParams, NeighborSearch, NoiseParams,
    ParamRange, SpiralParams, SwarmParams, TerrainParams, Viewport, WaveParams,
};
pub use particles::{Flux, ParticleSystem, Spiral, Swarm};
pub use shape::{BlobFrame, BlobGenerator, WaveGenerator, WaveLayer};
pub use spawn::{SpawnContext, Spawner};
pub use spline::Path;
pub use terrain::{Terrain, TerrainFrame};
pub use time::{Clock, FrameTimer, TickContext};

/// Convenient re-exports for common usage.
///
/// ```
/// use morphgen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aurora::AuroraGradient;
    pub use crate::color::{ColorRamp, Fill, FillStyle, MeshPalette, Rgb};
    pub use crate::config::{Scene, Snapshot};
    pub use crate::curve::CurveGradient;
    pub use crate::engine::{Engine, Frame};
    #[cfg(feature = "gpu")]
    pub use crate::gpu::GpuTurbulence;
    pub use crate::mesh::MeshMorph;
    pub use crate::field::NoiseFieldRenderer;
    pub use crate::params::{
        AuroraParams, BlobParams, CurveParams, FluxParams, MeshParams, NeighborSearch, NoiseParams,
        SpiralParams, SwarmParams, TerrainParams, Viewport, WaveParams,
    };
    pub use crate::particles::{Flux, ParticleSystem, Spiral, Swarm};
    pub use crate::shape::{BlobGenerator, WaveGenerator};
    pub use crate::terrain::Terrain;
    pub use crate::time::TickContext;
    pub use crate::{Vec2, Vec3};
}
