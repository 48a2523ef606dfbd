//! # Structure Stamping Module
//!
//! Writes multi-block decorations into the world through the query layer,
//! so every write inherits its dirty-marking behavior. Stamping is purely
//! additive and performs no site validation; the caller chooses where a
//! structure makes sense.

use crate::query;
use crate::voxels::block::BlockId;
use crate::voxels::chunk_store::ChunkStore;

/// Stamps multi-block structures into the world.
///
/// Owns a seeded random source so structure variation reproduces exactly
/// for a given world seed and call sequence.
pub struct StructureStamper {
    rng: fastrand::Rng,
}

impl StructureStamper {
    /// Creates a stamper whose randomness derives from the given seed.
    pub fn new(seed: u64) -> Self {
        StructureStamper {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Places a tree whose trunk base sits at `(x, y, z)`.
    ///
    /// A wood trunk of random height (4 to 6 blocks) rises from the base,
    /// wrapped at the top in a diamond-shaped leaf canopy. Leaves overwrite
    /// whatever occupied their cells, but never the trunk itself.
    pub fn place_tree(&mut self, store: &mut ChunkStore, x: i32, y: i32, z: i32) {
        let trunk_height = self.rng.i32(4..=6);
        let trunk_top = y + trunk_height - 1;

        // Canopy first, trunk second, so the trunk column stays wood.
        for layer_y in (trunk_top - 1)..=(trunk_top + 1) {
            let radius = if layer_y > trunk_top { 1 } else { 2 };
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() + dz.abs() > radius + 1 {
                        continue;
                    }
                    query::set_block(store, x + dx, layer_y, z + dz, BlockId::Leaves);
                }
            }
        }

        for dy in 0..trunk_height {
            query::set_block(store, x, y + dy, z, BlockId::Wood);
        }
    }
}
