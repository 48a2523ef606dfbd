//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size dense column of
//! blocks, the unit of generation, meshing, and streaming.
//!
//! ## Storage
//!
//! Blocks live in a flat `Box<[BlockId]>` indexed
//! `x + z * CHUNK_SIZE_X + y * CHUNK_SIZE_X * CHUNK_SIZE_Z`, an arena-style
//! fixed allocation with no pointer graph. Alongside it, a bit vector caches
//! each cell's solidity so the meshing and collision hot paths test a single
//! bit instead of matching on the block enum. The two structures are kept in
//! lockstep by every mutation.
//!
//! ## Flags
//!
//! - `dirty`: the chunk's mesh is stale. Set by any mutation (including
//!   initial generation) and cleared by the streamer after a rebuild.
//! - `modified`: the chunk differs from what the generator would produce.
//!   Set only by explicit edits, never by generation; it drives edit
//!   retention and persistence.

use bitvec::prelude::BitVec;

use crate::streaming::MeshHandle;

use super::block::BlockId;
use super::chunk_store::ChunkCoord;

/// Chunk width along X, in blocks.
pub const CHUNK_SIZE_X: i32 = 16;
/// Chunk depth along Z, in blocks.
pub const CHUNK_SIZE_Z: i32 = 16;
/// World height, in blocks. The world is chunked only in X/Z; one chunk
/// spans the entire Y range.
pub const CHUNK_HEIGHT: i32 = 128;
/// Total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE_X * CHUNK_SIZE_Z * CHUNK_HEIGHT) as usize;

/// A fixed-size dense column of voxels.
///
/// Chunks are exclusively owned by the
/// [`ChunkStore`](super::chunk_store::ChunkStore); everything else reads
/// them through it.
pub struct Chunk {
    /// This chunk's position in chunk coordinates.
    pub coord: ChunkCoord,
    /// Dense block storage, one entry per cell.
    blocks: Box<[BlockId]>,
    /// Solidity bit per cell, kept in lockstep with `blocks`.
    solid: BitVec,
    /// Whether the mesh for this chunk is stale.
    pub dirty: bool,
    /// Whether this chunk has been explicitly edited since generation.
    pub modified: bool,
    /// Handle of the uploaded mesh currently representing this chunk, if any.
    pub(crate) mesh_handle: Option<MeshHandle>,
}

/// Flat index of a cell inside the dense block array.
///
/// Callers must pass in-range local coordinates.
#[inline]
pub fn block_index(x: usize, y: usize, z: usize) -> usize {
    x + z * CHUNK_SIZE_X as usize + y * (CHUNK_SIZE_X * CHUNK_SIZE_Z) as usize
}

impl Chunk {
    /// Creates a chunk filled with air.
    pub fn empty(coord: ChunkCoord) -> Self {
        Chunk {
            coord,
            blocks: vec![BlockId::Air; CHUNK_VOLUME].into_boxed_slice(),
            solid: BitVec::repeat(false, CHUNK_VOLUME),
            dirty: true,
            modified: false,
            mesh_handle: None,
        }
    }

    /// Creates a chunk from a prebuilt block array, deriving the solidity
    /// mask in one pass.
    ///
    /// The chunk starts dirty (it has never been meshed) and unmodified.
    ///
    /// # Panics
    /// Panics if `blocks` is not exactly [`CHUNK_VOLUME`] entries long.
    pub fn from_blocks(coord: ChunkCoord, blocks: Box<[BlockId]>) -> Self {
        assert_eq!(blocks.len(), CHUNK_VOLUME, "block array has wrong length");
        let solid = build_solid_mask(&blocks);
        Chunk {
            coord,
            blocks,
            solid,
            dirty: true,
            modified: false,
            mesh_handle: None,
        }
    }

    /// Returns the block at the given local coordinates.
    ///
    /// Out-of-range coordinates read as [`BlockId::Air`].
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x < CHUNK_SIZE_X as usize && y < CHUNK_HEIGHT as usize && z < CHUNK_SIZE_Z as usize {
            self.blocks[block_index(x, y, z)]
        } else {
            BlockId::Air
        }
    }

    /// Writes a block at the given local coordinates and marks the chunk
    /// dirty and modified. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        if x < CHUNK_SIZE_X as usize && y < CHUNK_HEIGHT as usize && z < CHUNK_SIZE_Z as usize {
            let index = block_index(x, y, z);
            self.blocks[index] = id;
            self.solid.set(index, id.is_solid());
            self.dirty = true;
            self.modified = true;
        }
    }

    /// O(1) solidity test via the bit mask. Out-of-range coordinates read as
    /// non-solid.
    #[inline]
    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        if x < CHUNK_SIZE_X as usize && y < CHUNK_HEIGHT as usize && z < CHUNK_SIZE_Z as usize {
            self.solid[block_index(x, y, z)]
        } else {
            false
        }
    }

    /// Read-only view of the dense block array.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Owned copy of the block array, used for worker snapshots and edit
    /// retention.
    pub fn clone_blocks(&self) -> Box<[BlockId]> {
        self.blocks.clone()
    }

    /// Consumes the chunk, yielding its block array.
    pub(crate) fn into_blocks(self) -> Box<[BlockId]> {
        self.blocks
    }

    /// Replaces the entire block array, rebuilding the solidity mask.
    ///
    /// Used when restoring persisted edits onto a resident chunk. Marks the
    /// chunk dirty and modified.
    ///
    /// # Panics
    /// Panics if `blocks` is not exactly [`CHUNK_VOLUME`] entries long.
    pub fn replace_blocks(&mut self, blocks: Box<[BlockId]>) {
        assert_eq!(blocks.len(), CHUNK_VOLUME, "block array has wrong length");
        self.solid = build_solid_mask(&blocks);
        self.blocks = blocks;
        self.dirty = true;
        self.modified = true;
    }
}

fn build_solid_mask(blocks: &[BlockId]) -> BitVec {
    let mut solid = BitVec::repeat(false, blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        if block.is_solid() {
            solid.set(index, true);
        }
    }
    solid
}
