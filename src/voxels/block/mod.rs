//! # Block Module
//!
//! This module defines the block identifiers of the voxel world along with
//! the predicates that drive meshing, raycasting, and collision, and the
//! per-block base colors consumed by the mesher.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

pub mod block_side;

/// Compact storage representation of a [`BlockId`], used by the persistence
/// layer and anywhere a raw byte is exchanged.
pub type RawBlockId = u8;

/// Enumerates every block type the world can hold.
///
/// The discriminants are stable: they are what the persistence layer writes,
/// so new variants must only ever be appended.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum BlockId {
    /// Empty space. Non-solid, never meshed.
    Air = 0,
    /// Grass surface block, the default biome top.
    Grass = 1,
    /// Dirt, found directly beneath the surface.
    Dirt = 2,
    /// Stone, the bulk of the underground.
    Stone = 3,
    /// Sand, surfaces in hot dry biomes and on beaches.
    Sand = 4,
    /// Snow, surfaces in cold biomes.
    Snow = 5,
    /// Water. Non-solid and transparent; fills cells below sea level.
    Water = 6,
    /// Tree trunk wood.
    Wood = 7,
    /// Tree canopy leaves. Solid for collision, transparent to rays.
    Leaves = 8,
    /// Unbreakable world floor at y = 0.
    Bedrock = 9,
}

impl BlockId {
    /// Converts a raw byte back into a `BlockId`.
    ///
    /// Bytes that do not correspond to a known block decode to [`BlockId::Air`],
    /// so stale or corrupt persisted data degrades to empty space instead of
    /// failing.
    pub fn from_raw(raw: RawBlockId) -> Self {
        num::FromPrimitive::from_u8(raw).unwrap_or(BlockId::Air)
    }

    /// Returns the raw byte representation of this block.
    #[inline]
    pub fn to_raw(self) -> RawBlockId {
        self as RawBlockId
    }

    /// Whether this block occupies space.
    ///
    /// Solidity drives face culling (faces are emitted only toward non-solid
    /// neighbors) and AABB collision. Water is deliberately non-solid so that
    /// submerged terrain still renders and entities can enter it.
    #[inline]
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockId::Air | BlockId::Water)
    }

    /// Whether rays pass through this block.
    ///
    /// Raycasts stop at the first solid, non-transparent block, so water and
    /// leaves never capture a ray.
    #[inline]
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockId::Air | BlockId::Water | BlockId::Leaves)
    }

    /// Base RGB color of this block, before the per-face ambient occlusion
    /// tint is applied.
    pub fn base_color(self) -> [f32; 3] {
        match self {
            BlockId::Air => [0.0, 0.0, 0.0],
            BlockId::Grass => [0.30, 0.65, 0.20],
            BlockId::Dirt => [0.45, 0.32, 0.18],
            BlockId::Stone => [0.50, 0.50, 0.52],
            BlockId::Sand => [0.85, 0.80, 0.55],
            BlockId::Snow => [0.95, 0.97, 1.00],
            BlockId::Water => [0.15, 0.35, 0.75],
            BlockId::Wood => [0.55, 0.40, 0.22],
            BlockId::Leaves => [0.20, 0.55, 0.15],
            BlockId::Bedrock => [0.20, 0.20, 0.22],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip_preserves_every_block() {
        for raw in 0..=9u8 {
            let block = BlockId::from_raw(raw);
            assert_eq!(block.to_raw(), raw);
        }
    }

    #[test]
    fn unknown_raw_bytes_decode_to_air() {
        assert_eq!(BlockId::from_raw(200), BlockId::Air);
        assert_eq!(BlockId::from_raw(10), BlockId::Air);
    }

    #[test]
    fn water_is_non_solid_and_transparent() {
        assert!(!BlockId::Water.is_solid());
        assert!(BlockId::Water.is_transparent());
    }

    #[test]
    fn leaves_collide_but_do_not_block_rays() {
        assert!(BlockId::Leaves.is_solid());
        assert!(BlockId::Leaves.is_transparent());
    }
}
