//! # World Module
//!
//! The `World` struct is the explicitly constructed, explicitly owned
//! facade over the whole engine: it wires the chunk store, streamer, and
//! structure stamper together and exposes the complete host-facing
//! interface: per-tick streaming, block access, spatial queries, structure
//! stamping, persistence of edits, and an explicit teardown that disposes
//! every uploaded mesh.
//!
//! Nothing in the crate holds module-level mutable state; a host owns a
//! `World` value and passes its rendering collaborator into the calls that
//! need it.

use cgmath::{Point3, Vector3};

use crate::config::EngineConfig;
use crate::generation::WorldGenerator;
use crate::persist::SavedChunk;
use crate::query::{self, RayHit};
use crate::streaming::{ChunkStreamer, RenderBackend};
use crate::structures::StructureStamper;
use crate::tasks::TaskPool;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::Chunk;
use crate::voxels::chunk_store::{ChunkCoord, ChunkStore};

/// A chunked voxel world.
///
/// # Examples
///
/// ```no_run
/// use voxel_world::{EngineConfig, World};
/// # struct Backend;
/// # impl voxel_world::RenderBackend for Backend {
/// #     fn upload_mesh(
/// #         &mut self,
/// #         _coord: voxel_world::ChunkCoord,
/// #         _mesh: &voxel_world::ChunkMesh,
/// #     ) -> voxel_world::MeshHandle { voxel_world::MeshHandle(0) }
/// #     fn dispose_mesh(&mut self, _handle: voxel_world::MeshHandle) {}
/// # }
/// let mut world = World::new(EngineConfig::default());
/// let mut backend = Backend;
///
/// // Each tick: stream chunks around the viewer.
/// world.update(&mut backend, 8.0, 8.0);
///
/// // Game logic queries the grid independently of streaming.
/// let block = world.get_block(8, 60, 8);
///
/// // Explicit teardown disposes every uploaded mesh.
/// world.dispose(&mut backend);
/// ```
pub struct World {
    store: ChunkStore,
    streamer: ChunkStreamer,
    stamper: StructureStamper,
    config: EngineConfig,
}

impl World {
    /// Builds a world from a configuration.
    ///
    /// With `worker_threads > 0` a task pool is spawned and generation and
    /// meshing run in the background; otherwise everything runs inline in
    /// [`update`](World::update).
    pub fn new(config: EngineConfig) -> Self {
        let generator = WorldGenerator::new(config.seed, config.generator.clone());
        let streamer = if config.worker_threads > 0 {
            let pool = TaskPool::new(config.worker_threads, generator.clone());
            ChunkStreamer::with_pool(config.render_distance, config.hysteresis_margin, pool)
        } else {
            ChunkStreamer::new(config.render_distance, config.hysteresis_margin)
        };
        log::info!(
            "world created: seed {}, render distance {}, {} workers",
            config.seed,
            config.render_distance,
            config.worker_threads
        );
        World {
            store: ChunkStore::new(generator),
            streamer,
            stamper: StructureStamper::new(config.seed as u64),
            config,
        }
    }

    /// Runs one streaming tick for a viewer at the given world position:
    /// loads and generates the render disc, rebuilds dirty meshes and hands
    /// them to the rendering collaborator, and evicts chunks beyond the
    /// hysteresis ring.
    pub fn update(&mut self, renderer: &mut dyn RenderBackend, viewer_x: f32, viewer_z: f32) {
        self.streamer
            .update(&mut self.store, renderer, viewer_x, viewer_z);
    }

    /// Returns the block at a world position. Y outside the world height
    /// reads as air; any X/Z succeeds.
    pub fn get_block(&mut self, x: i32, y: i32, z: i32) -> BlockId {
        query::get_block(&mut self.store, x, y, z)
    }

    /// Writes a block at a world position, marking affected chunks dirty.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        query::set_block(&mut self.store, x, y, z, id);
    }

    /// Steps a ray through the grid; see [`query::raycast`].
    pub fn raycast(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        query::raycast(&mut self.store, origin, direction, max_distance)
    }

    /// Tests a cube AABB against the grid; see [`query::check_collision`].
    pub fn check_collision(&mut self, position: Point3<f32>, half_extent: f32) -> bool {
        query::check_collision(&mut self.store, position, half_extent)
    }

    /// Stamps a tree with its trunk base at the given position.
    pub fn place_tree(&mut self, x: i32, y: i32, z: i32) {
        self.stamper.place_tree(&mut self.store, x, y, z);
    }

    /// Explicit teardown: disposes every uploaded mesh through the
    /// rendering collaborator and drops all chunks. Edited block data is
    /// retained, so the world can keep serving queries afterwards without
    /// losing edits.
    pub fn dispose(&mut self, renderer: &mut dyn RenderBackend) {
        self.store.dispose_all(renderer);
        log::info!("world disposed");
    }

    /// Exports every explicitly edited chunk, resident or evicted, for
    /// saving.
    pub fn export_modified(&self) -> Vec<SavedChunk> {
        let mut saved: Vec<SavedChunk> = self
            .store
            .resident_coords()
            .into_iter()
            .filter_map(|coord| self.store.peek(coord))
            .filter(|chunk| chunk.modified)
            .map(SavedChunk::capture)
            .collect();
        for (coord, blocks) in self.store.retained_edits() {
            saved.push(SavedChunk::from_raw_blocks(*coord, blocks));
        }
        saved
    }

    /// Applies previously exported chunk edits, replacing resident chunks
    /// in place and retaining the rest for their next generation.
    pub fn apply_saved<I>(&mut self, saved: I)
    where
        I: IntoIterator<Item = SavedChunk>,
    {
        for entry in saved {
            self.store.restore_blocks(entry.coord, entry.to_blocks());
        }
    }

    /// Read-only view of a resident chunk; `None` when not loaded. Never
    /// triggers generation.
    pub fn peek_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.peek(coord)
    }

    /// Number of chunks currently resident.
    pub fn resident_chunks(&self) -> usize {
        self.store.resident_count()
    }

    /// Whether background generation or meshing is still outstanding.
    pub fn is_idle(&self) -> bool {
        self.streamer.is_idle()
    }

    /// The configuration this world was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
