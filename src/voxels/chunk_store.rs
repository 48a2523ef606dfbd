//! # Chunk Store Module
//!
//! This module owns every resident chunk, keyed by chunk coordinate. It is
//! the single authority over chunk lifecycle: chunks are created lazily on
//! first access (generating terrain on demand), observed without side
//! effects through [`ChunkStore::peek`], and evicted with their meshes
//! disposed through the rendering collaborator.
//!
//! ## Coordinate mapping
//!
//! World-to-chunk mapping uses floored division (`div_euclid` /
//! `rem_euclid`), which is exact for negative coordinates:
//! `chunk = floor(world / size)`, `local = world mod size` with a
//! non-negative result.
//!
//! ## Claims
//!
//! When a worker pool is active, generation for a coordinate is claimed by
//! inserting a [`Pending`](ChunkSlot::Pending) marker synchronously before
//! dispatch, so no coordinate is ever generated into the map twice. A query
//! that cannot wait resolves the claim inline; the late worker result is
//! then dropped.
//!
//! ## Edit retention
//!
//! The world regenerates deterministically from its seed, so evicting an
//! edited chunk would silently revert the player's changes. Evicting a
//! `modified` chunk therefore stashes its block array in a retention
//! overlay, and the next generation of that coordinate restores it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::generation::WorldGenerator;
use crate::streaming::{MeshHandle, RenderBackend};

use super::block::BlockId;
use super::chunk::{Chunk, CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// Position of a chunk in the chunk grid. The world is chunked only along
/// X and Z.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk grid X.
    pub x: i32,
    /// Chunk grid Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    #[inline]
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing the given world-space block column.
    #[inline]
    pub fn from_world(world_x: i32, world_z: i32) -> Self {
        ChunkCoord {
            x: world_x.div_euclid(CHUNK_SIZE_X),
            z: world_z.div_euclid(CHUNK_SIZE_Z),
        }
    }

    /// World-space coordinates of this chunk's minimum corner.
    #[inline]
    pub fn origin(self) -> (i32, i32) {
        (self.x * CHUNK_SIZE_X, self.z * CHUNK_SIZE_Z)
    }

    /// Squared distance to another chunk coordinate, in chunks.
    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }

    /// The four edge-adjacent chunk coordinates.
    pub fn neighbors(self) -> [ChunkCoord; 4] {
        [
            ChunkCoord::new(self.x - 1, self.z),
            ChunkCoord::new(self.x + 1, self.z),
            ChunkCoord::new(self.x, self.z - 1),
            ChunkCoord::new(self.x, self.z + 1),
        ]
    }
}

/// Splits world-space block coordinates into chunk-local coordinates.
///
/// The result is always in `[0, CHUNK_SIZE_X) x [0, CHUNK_SIZE_Z)`, for
/// negative inputs too.
#[inline]
pub fn world_to_local(world_x: i32, world_z: i32) -> (usize, usize) {
    (
        world_x.rem_euclid(CHUNK_SIZE_X) as usize,
        world_z.rem_euclid(CHUNK_SIZE_Z) as usize,
    )
}

/// Occupancy state of a chunk coordinate in the store.
enum ChunkSlot {
    /// Generation has been claimed by a worker but has not completed.
    Pending,
    /// The chunk is resident.
    Ready(Chunk),
}

/// Owner of all resident chunks.
pub struct ChunkStore {
    slots: HashMap<ChunkCoord, ChunkSlot>,
    generator: WorldGenerator,
    /// Block arrays of modified chunks that have been evicted, restored on
    /// the next generation of their coordinate.
    retained: HashMap<ChunkCoord, Box<[BlockId]>>,
}

impl ChunkStore {
    /// Creates an empty store that generates missing chunks with the given
    /// generator.
    pub fn new(generator: WorldGenerator) -> Self {
        ChunkStore {
            slots: HashMap::new(),
            generator,
            retained: HashMap::new(),
        }
    }

    /// Returns the chunk at `coord`, creating and generating it on first
    /// access. Never fails: any coordinate is valid in an unbounded world.
    ///
    /// A pending worker claim is resolved inline here, because callers of
    /// `get` cannot wait; the worker's eventual result is dropped by
    /// [`fulfill`](ChunkStore::fulfill).
    pub fn get(&mut self, coord: ChunkCoord) -> &mut Chunk {
        if !self.is_resident(coord) {
            let chunk = self.create(coord);
            self.install(coord, chunk);
        }
        match self.slots.get_mut(&coord) {
            Some(ChunkSlot::Ready(chunk)) => chunk,
            _ => unreachable!("chunk installed above"),
        }
    }

    /// Returns the chunk at `coord` only if it is already resident.
    ///
    /// Never triggers generation; this is what keeps meshing from
    /// recursively generating the whole plane: an absent neighbor is simply
    /// treated as air by the caller.
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Chunk> {
        match self.slots.get(&coord) {
            Some(ChunkSlot::Ready(chunk)) => Some(chunk),
            _ => None,
        }
    }

    /// Whether a generated chunk is resident at `coord`.
    #[inline]
    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        matches!(self.slots.get(&coord), Some(ChunkSlot::Ready(_)))
    }

    /// Whether generation for `coord` has been claimed but not completed.
    #[inline]
    pub fn is_claimed(&self, coord: ChunkCoord) -> bool {
        matches!(self.slots.get(&coord), Some(ChunkSlot::Pending))
    }

    /// Claims generation of `coord` for a worker by inserting a pending
    /// marker. Returns `false` if the coordinate is already claimed or
    /// resident.
    pub fn claim(&mut self, coord: ChunkCoord) -> bool {
        if self.slots.contains_key(&coord) {
            return false;
        }
        self.slots.insert(coord, ChunkSlot::Pending);
        true
    }

    /// Installs a worker-generated chunk into its pending slot.
    ///
    /// If the slot was resolved inline in the meantime (or evicted), the
    /// result is dropped: exactly one chunk is ever installed per
    /// coordinate.
    pub fn fulfill(&mut self, coord: ChunkCoord, chunk: Chunk) {
        match self.slots.get(&coord) {
            Some(ChunkSlot::Pending) => {
                let chunk = match self.retained.remove(&coord) {
                    Some(blocks) => restored_chunk(coord, blocks),
                    None => chunk,
                };
                self.install(coord, chunk);
            }
            _ => {
                log::debug!("dropping duplicate generation result for ({}, {})", coord.x, coord.z);
            }
        }
    }

    /// Marks the chunk at `coord` dirty, if resident.
    pub fn set_dirty(&mut self, coord: ChunkCoord) {
        if let Some(ChunkSlot::Ready(chunk)) = self.slots.get_mut(&coord) {
            chunk.dirty = true;
        }
    }

    /// Clears the dirty flag of the chunk at `coord`, if resident.
    pub(crate) fn clear_dirty(&mut self, coord: ChunkCoord) {
        if let Some(ChunkSlot::Ready(chunk)) = self.slots.get_mut(&coord) {
            chunk.dirty = false;
        }
    }

    /// Records the uploaded mesh handle for `coord`, disposing the handle it
    /// replaces. If the chunk vanished mid-tick the new handle is disposed
    /// immediately.
    pub(crate) fn install_mesh(
        &mut self,
        coord: ChunkCoord,
        handle: MeshHandle,
        renderer: &mut dyn RenderBackend,
    ) {
        match self.slots.get_mut(&coord) {
            Some(ChunkSlot::Ready(chunk)) => {
                if let Some(old) = chunk.mesh_handle.replace(handle) {
                    renderer.dispose_mesh(old);
                }
            }
            _ => renderer.dispose_mesh(handle),
        }
    }

    /// Removes the chunk at `coord`, disposing its mesh through the
    /// rendering collaborator first. Modified block data moves into the
    /// retention overlay. Pending claims are left in place.
    pub fn evict(&mut self, coord: ChunkCoord, renderer: &mut dyn RenderBackend) {
        match self.slots.remove(&coord) {
            Some(ChunkSlot::Ready(chunk)) => {
                if let Some(handle) = chunk.mesh_handle {
                    renderer.dispose_mesh(handle);
                }
                if chunk.modified {
                    self.retained.insert(coord, chunk.into_blocks());
                }
            }
            Some(ChunkSlot::Pending) => {
                self.slots.insert(coord, ChunkSlot::Pending);
            }
            None => {}
        }
    }

    /// Disposes every uploaded mesh and drops all chunks. Modified block
    /// data moves into the retention overlay so a later reload still sees
    /// the edits.
    pub fn dispose_all(&mut self, renderer: &mut dyn RenderBackend) {
        let slots = std::mem::take(&mut self.slots);
        for (coord, slot) in slots {
            if let ChunkSlot::Ready(chunk) = slot {
                if let Some(handle) = chunk.mesh_handle {
                    renderer.dispose_mesh(handle);
                }
                if chunk.modified {
                    self.retained.insert(coord, chunk.into_blocks());
                }
            }
        }
    }

    /// Coordinates of every resident chunk.
    pub fn resident_coords(&self) -> Vec<ChunkCoord> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, ChunkSlot::Ready(_)))
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Number of resident chunks.
    pub fn resident_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, ChunkSlot::Ready(_)))
            .count()
    }

    /// Retained block arrays of modified chunks that are not currently
    /// resident.
    pub(crate) fn retained_edits(&self) -> &HashMap<ChunkCoord, Box<[BlockId]>> {
        &self.retained
    }

    /// Stores edited block data for `coord`: applied in place if the chunk
    /// is resident, otherwise retained for its next generation.
    pub(crate) fn restore_blocks(&mut self, coord: ChunkCoord, blocks: Box<[BlockId]>) {
        match self.slots.get_mut(&coord) {
            Some(ChunkSlot::Ready(chunk)) => chunk.replace_blocks(blocks),
            _ => {
                self.retained.insert(coord, blocks);
            }
        }
    }

    fn create(&mut self, coord: ChunkCoord) -> Chunk {
        if let Some(blocks) = self.retained.remove(&coord) {
            return restored_chunk(coord, blocks);
        }
        self.generator.generate(coord)
    }

    fn install(&mut self, coord: ChunkCoord, chunk: Chunk) {
        self.slots.insert(coord, ChunkSlot::Ready(chunk));
        // A new chunk can hide faces its neighbors emitted against the void.
        for neighbor in coord.neighbors() {
            self.set_dirty(neighbor);
        }
    }
}

fn restored_chunk(coord: ChunkCoord, blocks: Box<[BlockId]>) -> Chunk {
    let mut chunk = Chunk::from_blocks(coord, blocks);
    chunk.modified = true;
    chunk
}
