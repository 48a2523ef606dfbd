//! # World Generation Module
//!
//! This module fills freshly created chunks with terrain. Generation is a
//! pure function of the world seed and the chunk coordinate, which is what
//! makes the world reproducible and lets worker threads generate chunks
//! without touching shared state.
//!
//! ## Passes
//!
//! 1. **Strata**: per column, a surface height is sampled from the noise
//!    field and the column is filled bottom-up: bedrock at the floor, stone,
//!    dirt, a biome-selected top block, and water in empty cells below sea
//!    level.
//! 2. **Caves**: strictly after the strata pass, 3D noise is sampled per
//!    sub-surface cell and stone/dirt above the threshold is carved back to
//!    air. Bedrock and water are never carved.

use crate::config::GeneratorConfig;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::{block_index, Chunk, CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z, CHUNK_VOLUME};
use crate::voxels::chunk_store::ChunkCoord;

pub mod noise_field;

use noise_field::NoiseField;

/// Fills chunks with procedurally generated terrain.
pub struct WorldGenerator {
    seed: u32,
    config: GeneratorConfig,
    noise: NoiseField,
}

impl WorldGenerator {
    /// Creates a generator for the given world seed and tunables.
    pub fn new(seed: u32, config: GeneratorConfig) -> Self {
        let noise = NoiseField::new(seed, &config);
        WorldGenerator { seed, config, noise }
    }

    /// Generates the chunk at `coord`. Always succeeds.
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let (origin_x, origin_z) = coord.origin();
        let mut blocks = vec![BlockId::Air; CHUNK_VOLUME].into_boxed_slice();
        let mut surfaces = [0i32; (CHUNK_SIZE_X * CHUNK_SIZE_Z) as usize];

        for local_z in 0..CHUNK_SIZE_Z {
            for local_x in 0..CHUNK_SIZE_X {
                let world_x = origin_x + local_x;
                let world_z = origin_z + local_z;
                let surface = self
                    .noise
                    .height_at(world_x as f64, world_z as f64)
                    .floor() as i32;
                // Keep one bedrock layer below and headroom above.
                let surface = surface.clamp(2, CHUNK_HEIGHT - 2);
                surfaces[(local_x + local_z * CHUNK_SIZE_X) as usize] = surface;

                let top_block = self.surface_block(world_x, world_z, surface);
                for y in 0..CHUNK_HEIGHT {
                    let id = if y == 0 {
                        BlockId::Bedrock
                    } else if y < surface - 3 {
                        BlockId::Stone
                    } else if y < surface - 1 {
                        BlockId::Dirt
                    } else if y == surface - 1 {
                        top_block
                    } else if y < self.config.sea_level {
                        BlockId::Water
                    } else {
                        BlockId::Air
                    };
                    blocks[block_index(local_x as usize, y as usize, local_z as usize)] = id;
                }
            }
        }

        self.carve_caves(&mut blocks, &surfaces, origin_x, origin_z);

        log::trace!("generated chunk ({}, {})", coord.x, coord.z);
        Chunk::from_blocks(coord, blocks)
    }

    /// World seed this generator was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Picks the top block of a column from the climate noise.
    ///
    /// Columns at or just above sea level become beaches; otherwise cold
    /// picks snow, hot-and-dry picks sand, and everything else falls back to
    /// grass.
    fn surface_block(&self, world_x: i32, world_z: i32, surface: i32) -> BlockId {
        if surface - 1 <= self.config.sea_level + self.config.beach_band {
            return BlockId::Sand;
        }
        let temperature = self.noise.temperature_at(world_x as f64, world_z as f64);
        let moisture = self.noise.moisture_at(world_x as f64, world_z as f64);
        if temperature < self.config.snow_temperature {
            BlockId::Snow
        } else if temperature > self.config.sand_temperature && moisture < self.config.sand_moisture {
            BlockId::Sand
        } else {
            BlockId::Grass
        }
    }

    /// Second pass: carves caves out of the strata.
    ///
    /// Must run after the strata pass: it reads what the strata wrote and
    /// only ever clears stone or dirt, so bedrock, water, and surface blocks
    /// survive.
    fn carve_caves(
        &self,
        blocks: &mut [BlockId],
        surfaces: &[i32],
        origin_x: i32,
        origin_z: i32,
    ) {
        for local_z in 0..CHUNK_SIZE_Z {
            for local_x in 0..CHUNK_SIZE_X {
                let surface = surfaces[(local_x + local_z * CHUNK_SIZE_X) as usize];
                let world_x = (origin_x + local_x) as f64;
                let world_z = (origin_z + local_z) as f64;
                for y in 1..(surface - 1).max(1) {
                    let index = block_index(local_x as usize, y as usize, local_z as usize);
                    if !matches!(blocks[index], BlockId::Stone | BlockId::Dirt) {
                        continue;
                    }
                    let density = self.noise.cave_density_at(world_x, y as f64, world_z);
                    if density > self.config.cave_threshold {
                        blocks[index] = BlockId::Air;
                    }
                }
            }
        }
    }
}

impl Clone for WorldGenerator {
    // Rebuilt from seed + config rather than copying noise tables; the
    // result is bit-identical because every source is seeded.
    fn clone(&self) -> Self {
        WorldGenerator::new(self.seed, self.config.clone())
    }
}
