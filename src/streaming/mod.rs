//! # Chunk Streaming Module
//!
//! Decides, once per tick, which chunks to load, mesh, and unload around
//! the viewer, and hands finished meshes to the rendering collaborator.
//!
//! ## Policy
//!
//! Every chunk within `render_distance` (Euclidean, in chunks) of the
//! viewer's chunk is made resident: generated synchronously, or claimed
//! and dispatched to the worker pool when one is configured. Resident
//! chunks whose `dirty` flag is set are re-meshed and re-uploaded. Chunks
//! farther than `render_distance + hysteresis_margin` are evicted, their
//! meshes disposed; the margin keeps a chunk at the boundary from being
//! loaded and unloaded on alternating ticks as the viewer jitters.
//!
//! A teleporting viewer simply causes a generation and meshing burst
//! bounded by the render-distance disc; there is no failure mode.

use std::collections::HashSet;

use crate::meshing::{mesh_chunk, MeshSnapshot};
use crate::meshing::mesh::ChunkMesh;
use crate::tasks::{EngineTask, TaskOutcome, TaskPool};
use crate::voxels::chunk_store::{ChunkCoord, ChunkStore};

/// Opaque identifier for a mesh owned by the rendering collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(
    /// Backend-chosen identifier; the engine only stores and returns it.
    pub u64,
);

/// The rendering collaborator.
///
/// The engine never touches GPU state itself: it uploads finished meshes
/// through this trait and disposes them on rebuild and eviction. Hosts
/// implement it over their graphics stack of choice.
pub trait RenderBackend {
    /// Takes ownership of a chunk's mesh, returning a handle the engine
    /// will later pass back to [`dispose_mesh`](RenderBackend::dispose_mesh).
    fn upload_mesh(&mut self, coord: ChunkCoord, mesh: &ChunkMesh) -> MeshHandle;

    /// Releases a previously uploaded mesh.
    fn dispose_mesh(&mut self, handle: MeshHandle);
}

/// Per-tick load/mesh/evict policy around a viewer.
pub struct ChunkStreamer {
    render_distance: i32,
    hysteresis_margin: i32,
    pool: Option<TaskPool>,
    /// Coordinates with a mesh build currently on a worker.
    meshes_in_flight: HashSet<ChunkCoord>,
}

impl ChunkStreamer {
    /// Creates a synchronous streamer: generation and meshing run inline in
    /// [`update`](ChunkStreamer::update).
    pub fn new(render_distance: i32, hysteresis_margin: i32) -> Self {
        ChunkStreamer {
            render_distance: render_distance.max(0),
            hysteresis_margin: hysteresis_margin.max(0),
            pool: None,
            meshes_in_flight: HashSet::new(),
        }
    }

    /// Creates a streamer that runs generation and meshing on the given
    /// worker pool.
    pub fn with_pool(render_distance: i32, hysteresis_margin: i32, pool: TaskPool) -> Self {
        ChunkStreamer {
            render_distance: render_distance.max(0),
            hysteresis_margin: hysteresis_margin.max(0),
            pool: Some(pool),
            meshes_in_flight: HashSet::new(),
        }
    }

    /// Runs one streaming tick for a viewer at the given world position.
    ///
    /// Order: drain finished worker results, ensure the render disc is
    /// resident, rebuild dirty meshes, then evict chunks beyond the
    /// hysteresis ring.
    pub fn update(
        &mut self,
        store: &mut ChunkStore,
        renderer: &mut dyn RenderBackend,
        viewer_x: f32,
        viewer_z: f32,
    ) {
        let center = ChunkCoord::from_world(viewer_x.floor() as i32, viewer_z.floor() as i32);
        self.drain_pool(store, renderer);
        self.load_disc(store, center);
        self.remesh_dirty(store, renderer);
        self.evict_ring(store, renderer, center);
    }

    /// Whether background work is still outstanding. Always `false` for a
    /// synchronous streamer after [`update`](ChunkStreamer::update) returns.
    pub fn is_idle(&self) -> bool {
        self.pool.as_ref().map_or(true, |pool| pool.outstanding() == 0)
    }

    fn drain_pool(&mut self, store: &mut ChunkStore, renderer: &mut dyn RenderBackend) {
        let Some(pool) = &mut self.pool else {
            return;
        };
        pool.pump();
        for outcome in pool.drain() {
            match outcome {
                TaskOutcome::Generated { chunk } => {
                    let coord = chunk.coord;
                    store.fulfill(coord, chunk);
                }
                TaskOutcome::Meshed { coord, mesh } => {
                    self.meshes_in_flight.remove(&coord);
                    if store.is_resident(coord) {
                        let handle = renderer.upload_mesh(coord, &mesh);
                        store.install_mesh(coord, handle, renderer);
                    }
                    // A mesh for an evicted chunk is simply discarded.
                }
            }
        }
    }

    fn load_disc(&mut self, store: &mut ChunkStore, center: ChunkCoord) {
        let radius = self.render_distance;
        let mut requested = 0usize;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if store.is_resident(coord) {
                    continue;
                }
                match &mut self.pool {
                    Some(pool) => {
                        if store.claim(coord) {
                            pool.submit(EngineTask::Generate { coord });
                            requested += 1;
                        }
                    }
                    None => {
                        store.get(coord);
                        requested += 1;
                    }
                }
            }
        }
        if requested > 0 {
            log::debug!(
                "requested {requested} chunks around ({}, {})",
                center.x,
                center.z
            );
        }
    }

    fn remesh_dirty(&mut self, store: &mut ChunkStore, renderer: &mut dyn RenderBackend) {
        let dirty: Vec<ChunkCoord> = store
            .resident_coords()
            .into_iter()
            .filter(|coord| store.peek(*coord).is_some_and(|chunk| chunk.dirty))
            .collect();

        for coord in dirty {
            match &mut self.pool {
                Some(pool) => {
                    if self.meshes_in_flight.contains(&coord) {
                        // An edit landed while a build is in flight: the
                        // dirty flag stays set and triggers a follow-up
                        // rebuild once the current one returns.
                        continue;
                    }
                    let Some(chunk) = store.peek(coord) else {
                        continue;
                    };
                    let snapshot = MeshSnapshot::capture(chunk, store);
                    store.clear_dirty(coord);
                    self.meshes_in_flight.insert(coord);
                    pool.submit(EngineTask::BuildMesh { snapshot });
                }
                None => {
                    let Some(chunk) = store.peek(coord) else {
                        continue;
                    };
                    let mesh = mesh_chunk(chunk, store);
                    let handle = renderer.upload_mesh(coord, &mesh);
                    store.install_mesh(coord, handle, renderer);
                    store.clear_dirty(coord);
                }
            }
        }
    }

    fn evict_ring(
        &mut self,
        store: &mut ChunkStore,
        renderer: &mut dyn RenderBackend,
        center: ChunkCoord,
    ) {
        let limit = (self.render_distance + self.hysteresis_margin) as i64;
        let doomed: Vec<ChunkCoord> = store
            .resident_coords()
            .into_iter()
            .filter(|coord| coord.distance_sq(center) > limit * limit)
            .collect();
        let evicted = doomed.len();
        for coord in doomed {
            store.evict(coord, renderer);
        }
        if evicted > 0 {
            log::debug!("evicted {evicted} chunks beyond the hysteresis ring");
        }
    }
}
