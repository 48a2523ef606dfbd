#![warn(missing_docs)]

//! # Voxel World Engine
//!
//! A chunked voxel world engine: a sparse, effectively infinite 3D block
//! grid with procedural terrain generation, per-face-culled mesh
//! extraction, real-time block edits, and spatial queries.
//!
//! ## Key Modules
//!
//! * `voxels` - blocks, chunks, the chunk store, and the `World` facade
//! * `generation` - seeded fractal noise and terrain generation
//! * `meshing` - per-face-culling mesh extraction
//! * `streaming` - per-tick chunk load/mesh/evict policy around a viewer
//! * `query` - block access, voxel raycasting, AABB collision
//! * `structures` - multi-block decorations (trees)
//! * `tasks` - optional worker pool for background generation and meshing
//! * `persist` - serialization of edited chunks
//!
//! ## Architecture
//!
//! The engine is a library with no rendering, windowing, or input code of
//! its own. A host implements [`RenderBackend`] over its graphics stack,
//! constructs a [`World`] from an [`EngineConfig`], calls
//! [`World::update`] once per tick with the viewer position, and uses the
//! query surface ([`World::get_block`], [`World::raycast`], ...) from game
//! logic. Teardown is explicit: [`World::dispose`] releases every uploaded
//! mesh through the backend.
//!
//! ## Determinism
//!
//! The world is a pure function of its seed. Generation samples seeded
//! value noise at world coordinates, so the same seed produces
//! byte-identical chunks across runs and across threads, and adjacent
//! chunks tile seamlessly.

pub mod config;
pub mod generation;
pub mod meshing;
pub mod persist;
pub mod query;
pub mod streaming;
pub mod structures;
pub mod tasks;
pub mod voxels;

pub use config::{EngineConfig, GeneratorConfig};
pub use meshing::mesh::{ChunkMesh, MeshVertex};
pub use persist::SavedChunk;
pub use query::RayHit;
pub use streaming::{MeshHandle, RenderBackend};
pub use voxels::block::BlockId;
pub use voxels::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z};
pub use voxels::chunk_store::{ChunkCoord, ChunkStore};
pub use voxels::world::World;
