//! # Engine Configuration
//!
//! This module defines the serializable configuration for the engine. A host
//! constructs an [`EngineConfig`] (directly, via [`Default`], or from a JSON
//! document) and hands it to [`World::new`](crate::voxels::world::World::new).
//!
//! All fields carry serde defaults, so a partial JSON document such as
//! `{"seed": 7, "render_distance": 12}` is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
///
/// Controls the world seed, the streaming policy, and the optional worker
/// pool. Terrain tunables live in the nested [`GeneratorConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for every noise source and for structure randomness. Two worlds
    /// built from the same seed generate byte-identical chunks.
    pub seed: u32,

    /// Radius, in chunks, of the disc kept loaded and meshed around the
    /// viewer.
    pub render_distance: i32,

    /// Extra chunks beyond `render_distance` a chunk may drift before it is
    /// evicted. Prevents load/unload thrashing at the boundary.
    pub hysteresis_margin: i32,

    /// Number of background worker threads for generation and meshing.
    /// Zero selects the synchronous, single-threaded path.
    pub worker_threads: usize,

    /// Terrain generation tunables.
    pub generator: GeneratorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: 0,
            render_distance: 8,
            hysteresis_margin: 2,
            worker_threads: 0,
            generator: GeneratorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing fields fall back to their defaults, so hosts can ship sparse
    /// config files.
    ///
    /// # Errors
    /// Returns the underlying `serde_json` error when the document is not
    /// valid JSON or a present field has the wrong shape.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Tunables for terrain generation.
///
/// None of these are load-bearing for correctness; they shape the terrain
/// and may be adjusted freely. Heights are in blocks, frequencies are in
/// cycles per block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Mean terrain surface height.
    pub base_height: f64,
    /// Peak-to-mean amplitude of the fractal height noise.
    pub height_amplitude: f64,
    /// Number of octaves summed by the height noise.
    pub octaves: u32,
    /// Base frequency of the first height octave.
    pub frequency: f64,
    /// Frequency of the temperature/moisture noise used for biome selection.
    pub climate_frequency: f64,
    /// Water fills empty cells strictly below this height.
    pub sea_level: i32,
    /// Frequency of the 3D cave noise.
    pub cave_frequency: f64,
    /// Vertical scale factor for cave noise; values below 1.0 stretch caves
    /// horizontally.
    pub cave_vertical_squeeze: f64,
    /// Cave noise values (in `[0, 1]`) above this threshold carve to air.
    pub cave_threshold: f64,
    /// Temperatures below this value select a snow surface.
    pub snow_temperature: f64,
    /// Temperatures above this value combined with dry moisture select sand.
    pub sand_temperature: f64,
    /// Moisture below this value counts as dry for the sand biome.
    pub sand_moisture: f64,
    /// Columns whose surface sits within this many blocks of sea level get a
    /// sand beach regardless of climate.
    pub beach_band: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            base_height: 48.0,
            height_amplitude: 24.0,
            octaves: 4,
            frequency: 0.01,
            climate_frequency: 0.003,
            sea_level: 40,
            cave_frequency: 0.05,
            cave_vertical_squeeze: 0.5,
            cave_threshold: 0.62,
            snow_temperature: -0.35,
            sand_temperature: 0.4,
            sand_moisture: 0.0,
            beach_band: 1,
        }
    }
}
