//! Parameter snapshot and presets.
//!
//! A [`Snapshot`] is everything the engine reads in one tick: which scene is
//! active, whether time is paused, the shared colors and every generator's
//! parameters. It is plain data, so presets are just the snapshot written as
//! JSON.
//!
//! ```
//! use morphgen::config::{Scene, Snapshot};
//!
//! let mut snapshot = Snapshot::default();
//! snapshot.scene = Scene::Swarm;
//! snapshot.swarm.count = 1200;
//!
//! let json = snapshot.to_json().unwrap();
//! let restored = Snapshot::from_json(&json).unwrap();
//! assert_eq!(restored, snapshot);
//! ```

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::{ColorRamp, FillStyle, MeshPalette, Rgb};
use crate::error::ConfigError;
use crate::params::{
    AuroraParams, BlobParams, CurveParams, FluxParams, MeshParams, NoiseParams, SpiralParams,
    SwarmParams, TerrainParams, WaveParams,
};

/// Which generator the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    #[default]
    Blob,
    Waves,
    Noise,
    Swarm,
    Spiral,
    Flux,
    Mesh,
    Terrain,
    Aurora,
    Curve,
}

impl Scene {
    pub const ALL: [Scene; 10] = [
        Scene::Blob,
        Scene::Waves,
        Scene::Noise,
        Scene::Swarm,
        Scene::Spiral,
        Scene::Flux,
        Scene::Mesh,
        Scene::Terrain,
        Scene::Aurora,
        Scene::Curve,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Blob => "Blob",
            Scene::Waves => "Waves",
            Scene::Noise => "Noise",
            Scene::Swarm => "Swarm",
            Scene::Spiral => "Spiral",
            Scene::Flux => "Flux",
            Scene::Mesh => "Mesh",
            Scene::Terrain => "Terrain",
            Scene::Aurora => "Aurora",
            Scene::Curve => "Curve",
        }
    }
}

fn default_colors() -> Vec<Rgb> {
    vec![Rgb::new(0xF5, 0x9E, 0x0B), Rgb::new(0xDC, 0x26, 0x26)]
}

/// Complete engine input for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub scene: Scene,
    pub paused: bool,
    /// Ramp stops shared by every generator, 2 to 6 of them.
    pub colors: Vec<Rgb>,
    /// Fill used for closed outlines.
    pub fill: FillStyle,
    pub blob: BlobParams,
    pub wave: WaveParams,
    pub noise: NoiseParams,
    pub swarm: SwarmParams,
    pub spiral: SpiralParams,
    pub flux: FluxParams,
    pub mesh: MeshParams,
    pub terrain: TerrainParams,
    /// Carries its own four corner colors.
    pub aurora: AuroraParams,
    /// Carries its own six band colors.
    pub curve: CurveParams,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            paused: false,
            colors: default_colors(),
            fill: FillStyle::default(),
            blob: BlobParams::default(),
            wave: WaveParams::default(),
            noise: NoiseParams::default(),
            swarm: SwarmParams::default(),
            spiral: SpiralParams::default(),
            flux: FluxParams::default(),
            mesh: MeshParams::default(),
            terrain: TerrainParams::default(),
            aurora: AuroraParams::default(),
            curve: CurveParams::default(),
        }
    }
}

impl Snapshot {
    /// Copy with every parameter clamped into range and the color list
    /// normalized to what the ramp will actually use.
    pub fn clamped(&self) -> Self {
        Self {
            scene: self.scene,
            paused: self.paused,
            colors: self.ramp().stops().to_vec(),
            fill: self.fill,
            blob: self.blob.clamped(),
            wave: self.wave.clamped(),
            noise: self.noise.clamped(),
            swarm: self.swarm.clamped(),
            spiral: self.spiral.clamped(),
            flux: self.flux.clamped(),
            mesh: self.mesh.clamped(),
            terrain: self.terrain.clamped(),
            aurora: self.aurora.clamped(),
            curve: self.curve.clamped(),
        }
    }

    /// The shared color ramp.
    pub fn ramp(&self) -> ColorRamp {
        ColorRamp::new(self.colors.iter().copied())
    }

    /// Vertex palette for the mesh scene.
    pub fn mesh_palette(&self) -> MeshPalette {
        MeshPalette::from_colors(&self.colors, self.mesh.clamped().active_colors as usize)
    }

    /// Shuffle the blob look (outline shape, fill style, colors and glow) and
    /// the aurora colors and noise scale.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        self.blob.chaos = rng.gen_range(10..80) as f32;
        self.blob.smoothness = rng.gen_range(6..14) as f32;
        self.blob.warp = rng.gen_range(20..80) as f32;
        self.blob.glow = rng.gen_range(10..60) as f32;
        self.fill = if rng.gen_bool(0.5) {
            FillStyle::Linear
        } else {
            FillStyle::Radial
        };
        self.colors = vec![Rgb::random(rng), Rgb::random(rng)];
        self.aurora.colors = std::array::from_fn(|_| Rgb::random(rng));
        self.aurora.noise_scale = AuroraParams::RANDOM_NOISE_SCALE.lerp(rng.gen());
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a preset. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let snapshot = Self::from_json(&json)?;
        info!(path = %path.display(), scene = snapshot.scene.name(), "loaded preset");
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "saved preset");
        Ok(())
    }
}
