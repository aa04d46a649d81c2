//! The frame loop driver.
//!
//! [`Engine`] owns one instance of every generator and, on each tick, runs
//! only the one selected by the snapshot's scene. Generators that are not
//! selected keep their state, so switching back resumes where they left off.
//!
//! ```
//! use morphgen::{Engine, Frame, Snapshot, Viewport};
//!
//! let mut engine = Engine::new(7);
//! let snapshot = Snapshot::default();
//! let frame = engine.tick(&snapshot, Some(Viewport::new(640.0, 480.0)));
//! assert!(matches!(frame, Some(Frame::Blob(_))));
//!
//! // No surface, no work.
//! assert!(engine.tick(&snapshot, None).is_none());
//! ```

use glam::Vec2;
use image::RgbaImage;
use tracing::{debug, info, trace};

use crate::aurora::AuroraGradient;
use crate::config::{Scene, Snapshot};
use crate::curve::CurveGradient;
use crate::field::{NoiseField, NoiseFieldRenderer};
use crate::mesh::{MeshFrame, MeshMorph};
use crate::params::{NoiseParams, Viewport};
use crate::particles::flux::DisplacementField;
use crate::particles::{
    Flux, FluxFrame, ParticleSystem, Spiral, SpiralFrame, Swarm, SwarmFrame,
};
use crate::shape::{BlobFrame, BlobGenerator, WaveGenerator, WaveLayer};
use crate::terrain::{Terrain, TerrainFrame};
use crate::time::{FrameTimer, TickContext};

/// Output of one engine tick, tagged by scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Blob(BlobFrame),
    /// Layers back to front.
    Waves(Vec<WaveLayer>),
    Noise(NoiseField),
    Swarm(SwarmFrame),
    Spiral(SpiralFrame),
    Flux(FluxFrame),
    Mesh(MeshFrame),
    Terrain(TerrainFrame),
    Aurora(RgbaImage),
    Curve(RgbaImage),
}

impl Frame {
    pub fn scene(&self) -> Scene {
        match self {
            Frame::Blob(_) => Scene::Blob,
            Frame::Waves(_) => Scene::Waves,
            Frame::Noise(_) => Scene::Noise,
            Frame::Swarm(_) => Scene::Swarm,
            Frame::Spiral(_) => Scene::Spiral,
            Frame::Flux(_) => Scene::Flux,
            Frame::Mesh(_) => Scene::Mesh,
            Frame::Terrain(_) => Scene::Terrain,
            Frame::Aurora(_) => Scene::Aurora,
            Frame::Curve(_) => Scene::Curve,
        }
    }
}

/// Owns every generator and dispatches ticks to the active one.
#[derive(Debug)]
pub struct Engine {
    blob: BlobGenerator,
    waves: WaveGenerator,
    noise: NoiseFieldRenderer,
    swarm: Swarm,
    spiral: Spiral,
    flux: Flux,
    mesh: MeshMorph,
    terrain: Terrain,
    aurora: AuroraGradient,
    curve: CurveGradient,
    timer: FrameTimer,
    /// Ticks run so far, paused ones included.
    frame: u64,
    scene: Option<Scene>,
    torn_down: bool,
}

impl Engine {
    /// Create an engine whose particle systems and curve gradient are seeded
    /// from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            blob: BlobGenerator::new(),
            waves: WaveGenerator::new(),
            noise: NoiseFieldRenderer::new(NoiseParams::default().seed),
            swarm: Swarm::new(seed),
            spiral: Spiral::new(seed.wrapping_add(1)),
            flux: Flux::new(seed.wrapping_add(2)),
            mesh: MeshMorph::new(),
            terrain: Terrain::new(),
            aurora: AuroraGradient::new(),
            curve: CurveGradient::new(seed.wrapping_add(3)),
            timer: FrameTimer::new(),
            frame: 0,
            scene: None,
            torn_down: false,
        }
    }

    /// Builder-style flux displacement backend.
    pub fn with_flux_field(mut self, field: Box<dyn DisplacementField>) -> Self {
        self.flux.set_field(field);
        self
    }

    /// Ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn spiral(&self) -> &Spiral {
        &self.spiral
    }

    pub fn flux(&self) -> &Flux {
        &self.flux
    }

    /// Advance the active generator by the real time since the last tick.
    ///
    /// Returns `None` without touching any state when there is no drawable
    /// viewport or after [`teardown`](Self::teardown).
    pub fn tick(&mut self, snapshot: &Snapshot, viewport: Option<Viewport>) -> Option<Frame> {
        let delta = self.timer.tick();
        self.tick_with_delta(snapshot, viewport, delta)
    }

    /// Like [`tick`](Self::tick) with an explicit real-time delta in seconds.
    pub fn tick_with_delta(
        &mut self,
        snapshot: &Snapshot,
        viewport: Option<Viewport>,
        delta: f32,
    ) -> Option<Frame> {
        if self.torn_down {
            return None;
        }
        let Some(viewport) = viewport.filter(Viewport::is_drawable) else {
            trace!("no drawable surface, skipping tick");
            return None;
        };

        if self.scene != Some(snapshot.scene) {
            debug!(scene = snapshot.scene.name(), "scene changed");
            self.scene = Some(snapshot.scene);
        }

        let ctx = TickContext::new(viewport)
            .with_paused(snapshot.paused)
            .with_delta(delta)
            .with_frame(self.frame);
        let ramp = snapshot.ramp();
        trace!(frame = self.frame, delta, "tick");

        let frame = match snapshot.scene {
            Scene::Blob => {
                let fill = snapshot.fill.build(&ramp);
                Frame::Blob(self.blob.tick(&snapshot.blob, fill, &ctx))
            }
            Scene::Waves => Frame::Waves(self.waves.tick(&snapshot.wave, &ramp, &ctx)),
            Scene::Noise => Frame::Noise(self.noise.tick(&snapshot.noise, &ctx)),
            Scene::Swarm => {
                self.swarm.update(&snapshot.swarm, &ctx);
                Frame::Swarm(self.swarm.frame(&snapshot.swarm, &ramp))
            }
            Scene::Spiral => {
                self.spiral.update(&snapshot.spiral, &ctx);
                Frame::Spiral(self.spiral.frame(&snapshot.spiral, &ramp, viewport))
            }
            Scene::Flux => {
                self.flux.update(&snapshot.flux, &ctx);
                Frame::Flux(self.flux.frame(&snapshot.flux, &ramp, viewport))
            }
            Scene::Mesh => {
                let palette = snapshot.mesh_palette();
                Frame::Mesh(self.mesh.tick(&snapshot.mesh, palette, &ctx))
            }
            Scene::Terrain => Frame::Terrain(self.terrain.tick(&snapshot.terrain, &ramp, &ctx)),
            Scene::Aurora => Frame::Aurora(self.aurora.tick(&snapshot.aurora, &ctx)),
            Scene::Curve => Frame::Curve(self.curve.tick(&snapshot.curve, &ctx)),
        };

        self.frame += 1;
        Some(frame)
    }

    /// Pointer position over the surface, for the swarm.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.swarm.pointer_moved(position, self.frame);
    }

    pub fn pointer_left(&mut self) {
        self.swarm.pointer_left();
    }

    /// Stop the engine. Every later tick returns `None`.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            info!(frames = self.frame, "engine torn down");
            self.torn_down = true;
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
