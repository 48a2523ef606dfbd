//! # Meshing Module
//!
//! Converts chunk block data into renderable triangle meshes by per-face
//! culling: every solid block tests its six axis neighbors and emits a quad
//! only toward non-solid ones, so faces buried between two solid blocks are
//! never generated. Adjacent coplanar faces are *not* merged; this is
//! plain culling, not greedy meshing.
//!
//! ## Neighbor access
//!
//! Neighbor lookups go through the [`BlockSampler`] seam, which has two
//! implementations:
//!
//! * [`StoreSampler`]: the live path: cells outside the chunk are resolved
//!   through [`ChunkStore::peek`] on the adjacent chunk. An absent neighbor
//!   reads as air, so the face is emitted and, crucially, meshing never
//!   triggers generation. A chunk's mesh is a pure function of itself and
//!   its already-loaded neighbors.
//! * [`MeshSnapshot`]: an owned copy of the chunk's blocks plus the four
//!   neighbor boundary planes, captured on the main thread and meshed on a
//!   worker without touching shared state.

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::{block_index, Chunk, CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z};
use crate::voxels::chunk_store::{world_to_local, ChunkCoord, ChunkStore};

pub mod mesh;

use mesh::ChunkMesh;

/// Source of block data for the mesher, addressed in chunk-local
/// coordinates extended one cell beyond each X/Z boundary.
pub trait BlockSampler {
    /// Block at extended local coordinates. `x` and `z` may be `-1` or the
    /// chunk size to address the boundary column of an adjacent chunk; any
    /// `y` outside the world height reads as air.
    fn block(&self, x: i32, y: i32, z: i32) -> BlockId;
}

/// Live sampler over a chunk and its already-loaded neighbors.
pub struct StoreSampler<'a> {
    chunk: &'a Chunk,
    store: &'a ChunkStore,
}

impl<'a> StoreSampler<'a> {
    /// Creates a sampler for `chunk`, resolving boundary lookups through
    /// `store`.
    pub fn new(chunk: &'a Chunk, store: &'a ChunkStore) -> Self {
        StoreSampler { chunk, store }
    }
}

impl BlockSampler for StoreSampler<'_> {
    fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if y < 0 || y >= CHUNK_HEIGHT {
            return BlockId::Air;
        }
        if (0..CHUNK_SIZE_X).contains(&x) && (0..CHUNK_SIZE_Z).contains(&z) {
            return self.chunk.get(x as usize, y as usize, z as usize);
        }
        // Boundary cell of an adjacent chunk. Absent neighbors read as air
        // rather than forcing generation.
        let (origin_x, origin_z) = self.chunk.coord.origin();
        let world_x = origin_x + x;
        let world_z = origin_z + z;
        let neighbor = ChunkCoord::from_world(world_x, world_z);
        match self.store.peek(neighbor) {
            Some(chunk) => {
                let (local_x, local_z) = world_to_local(world_x, world_z);
                chunk.get(local_x, y as usize, local_z)
            }
            None => BlockId::Air,
        }
    }
}

/// Owned block data for off-thread meshing: the chunk's own cells plus the
/// facing boundary plane of each X/Z neighbor that was loaded at capture
/// time.
pub struct MeshSnapshot {
    coord: ChunkCoord,
    blocks: Box<[BlockId]>,
    /// Neighbor plane at x = -1, indexed `y * CHUNK_SIZE_Z + z`.
    west: Option<Box<[BlockId]>>,
    /// Neighbor plane at x = CHUNK_SIZE_X, indexed `y * CHUNK_SIZE_Z + z`.
    east: Option<Box<[BlockId]>>,
    /// Neighbor plane at z = -1, indexed `y * CHUNK_SIZE_X + x`.
    south: Option<Box<[BlockId]>>,
    /// Neighbor plane at z = CHUNK_SIZE_Z, indexed `y * CHUNK_SIZE_X + x`.
    north: Option<Box<[BlockId]>>,
}

impl MeshSnapshot {
    /// Captures a snapshot of `chunk` and its resident neighbors' boundary
    /// planes. Neighbors that are not loaded stay `None` and read as air,
    /// exactly like the live path.
    pub fn capture(chunk: &Chunk, store: &ChunkStore) -> Self {
        let coord = chunk.coord;
        let column_x = |neighbor: &Chunk, x: usize| {
            let mut plane = Vec::with_capacity((CHUNK_HEIGHT * CHUNK_SIZE_Z) as usize);
            for y in 0..CHUNK_HEIGHT as usize {
                for z in 0..CHUNK_SIZE_Z as usize {
                    plane.push(neighbor.get(x, y, z));
                }
            }
            plane.into_boxed_slice()
        };
        let column_z = |neighbor: &Chunk, z: usize| {
            let mut plane = Vec::with_capacity((CHUNK_HEIGHT * CHUNK_SIZE_X) as usize);
            for y in 0..CHUNK_HEIGHT as usize {
                for x in 0..CHUNK_SIZE_X as usize {
                    plane.push(neighbor.get(x, y, z));
                }
            }
            plane.into_boxed_slice()
        };

        MeshSnapshot {
            coord,
            blocks: chunk.clone_blocks(),
            west: store
                .peek(ChunkCoord::new(coord.x - 1, coord.z))
                .map(|n| column_x(n, (CHUNK_SIZE_X - 1) as usize)),
            east: store
                .peek(ChunkCoord::new(coord.x + 1, coord.z))
                .map(|n| column_x(n, 0)),
            south: store
                .peek(ChunkCoord::new(coord.x, coord.z - 1))
                .map(|n| column_z(n, (CHUNK_SIZE_Z - 1) as usize)),
            north: store
                .peek(ChunkCoord::new(coord.x, coord.z + 1))
                .map(|n| column_z(n, 0)),
        }
    }

    /// Chunk coordinate this snapshot was captured from.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }
}

impl BlockSampler for MeshSnapshot {
    fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if y < 0 || y >= CHUNK_HEIGHT {
            return BlockId::Air;
        }
        let in_x = (0..CHUNK_SIZE_X).contains(&x);
        let in_z = (0..CHUNK_SIZE_Z).contains(&z);
        if in_x && in_z {
            return self.blocks[block_index(x as usize, y as usize, z as usize)];
        }
        let plane_entry = |plane: &Option<Box<[BlockId]>>, index: usize| {
            plane.as_ref().map(|p| p[index]).unwrap_or(BlockId::Air)
        };
        if in_z && x == -1 {
            plane_entry(&self.west, (y * CHUNK_SIZE_Z + z) as usize)
        } else if in_z && x == CHUNK_SIZE_X {
            plane_entry(&self.east, (y * CHUNK_SIZE_Z + z) as usize)
        } else if in_x && z == -1 {
            plane_entry(&self.south, (y * CHUNK_SIZE_X + x) as usize)
        } else if in_x && z == CHUNK_SIZE_Z {
            plane_entry(&self.north, (y * CHUNK_SIZE_X + x) as usize)
        } else {
            BlockId::Air
        }
    }
}

/// Builds the mesh for the chunk at `coord` from the given sampler.
///
/// Emits one quad per visible face, placed in world space via the chunk's
/// origin, colored by the block's base color scaled with the face's fixed
/// ambient occlusion factor. An all-air chunk yields an empty, valid mesh.
pub fn build_mesh<S: BlockSampler>(sampler: &S, coord: ChunkCoord) -> ChunkMesh {
    let mut mesh = ChunkMesh::new();
    let (origin_x, origin_z) = coord.origin();

    for y in 0..CHUNK_HEIGHT {
        for z in 0..CHUNK_SIZE_Z {
            for x in 0..CHUNK_SIZE_X {
                let id = sampler.block(x, y, z);
                if !id.is_solid() {
                    continue;
                }
                let base_color = id.base_color();
                for side in BlockSide::ALL {
                    let (dx, dy, dz) = side.offset();
                    if sampler.block(x + dx, y + dy, z + dz).is_solid() {
                        continue;
                    }
                    let min_corner = [
                        (origin_x + x) as f32,
                        y as f32,
                        (origin_z + z) as f32,
                    ];
                    let corners = side.corner_offsets().map(|offset| {
                        [
                            min_corner[0] + offset[0],
                            min_corner[1] + offset[1],
                            min_corner[2] + offset[2],
                        ]
                    });
                    let ao = side.ao_factor();
                    let color = [base_color[0] * ao, base_color[1] * ao, base_color[2] * ao];
                    mesh.push_quad(corners, side.normal(), color);
                }
            }
        }
    }
    mesh
}

/// Convenience wrapper: meshes a resident chunk against the live store.
pub fn mesh_chunk(chunk: &Chunk, store: &ChunkStore) -> ChunkMesh {
    build_mesh(&StoreSampler::new(chunk, store), chunk.coord)
}
