//! # Voxel Core
//!
//! The data model of the engine: block identifiers, fixed-size chunks, the
//! store that owns every resident chunk, and the `World` facade that ties
//! the engine together for a host.
//!
//! ## Ownership
//!
//! Chunks are exclusively owned by the [`chunk_store::ChunkStore`]; every
//! other component reads them through it. The store itself is owned by
//! [`world::World`], which a host constructs and tears down explicitly.

pub mod block;
pub mod chunk;
pub mod chunk_store;
pub mod world;
