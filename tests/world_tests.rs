//! Integration tests driving the engine through its public surface, with a
//! recording fake standing in for the rendering collaborator.

use cgmath::{Point3, Vector3};
use voxel_world::{
    persist, BlockId, ChunkCoord, ChunkMesh, EngineConfig, GeneratorConfig, MeshHandle,
    RenderBackend, World, CHUNK_HEIGHT,
};

/// Rendering collaborator fake that records every upload and dispose.
#[derive(Default)]
struct RecordingBackend {
    next_handle: u64,
    uploads: Vec<(ChunkCoord, usize)>,
    disposed: Vec<MeshHandle>,
    live: std::collections::HashSet<MeshHandle>,
}

impl RenderBackend for RecordingBackend {
    fn upload_mesh(&mut self, coord: ChunkCoord, mesh: &ChunkMesh) -> MeshHandle {
        self.next_handle += 1;
        let handle = MeshHandle(self.next_handle);
        self.uploads.push((coord, mesh.vertices.len()));
        self.live.insert(handle);
        handle
    }

    fn dispose_mesh(&mut self, handle: MeshHandle) {
        assert!(self.live.remove(&handle), "double dispose of {handle:?}");
        self.disposed.push(handle);
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Flat terrain: bedrock at y = 0, sand at y = 1, air above. Keeps spatial
/// assertions independent of the noise field.
fn flat_config() -> EngineConfig {
    EngineConfig {
        seed: 1,
        render_distance: 2,
        hysteresis_margin: 1,
        generator: GeneratorConfig {
            base_height: 2.0,
            height_amplitude: 0.0,
            sea_level: 0,
            ..GeneratorConfig::default()
        },
        ..EngineConfig::default()
    }
}

#[test]
fn worlds_with_the_same_seed_are_byte_identical() {
    init_logging();
    let mut a = World::new(EngineConfig::default());
    let mut b = World::new(EngineConfig::default());

    // Touching a block forces generation of the containing chunk.
    a.get_block(100, 50, -100);
    b.get_block(100, 50, -100);

    let coord = ChunkCoord::from_world(100, -100);
    let chunk_a = a.peek_chunk(coord).expect("chunk generated in a");
    let chunk_b = b.peek_chunk(coord).expect("chunk generated in b");
    assert_eq!(chunk_a.blocks(), chunk_b.blocks());
}

#[test]
fn terrain_tiles_seamlessly_across_chunk_boundaries() {
    init_logging();
    let mut world = World::new(EngineConfig::default());

    // Scan the seam between chunk columns x = 15 and x = 16. If the noise
    // were sampled in chunk-local coordinates, the surface height would
    // jump here; sampled in world coordinates it changes by at most the
    // local terrain gradient.
    let surface_height = |world: &mut World, x: i32, z: i32| -> i32 {
        for y in (0..CHUNK_HEIGHT).rev() {
            if world.get_block(x, y, z).is_solid() {
                return y;
            }
        }
        0
    };

    for z in 0..16 {
        let west = surface_height(&mut world, 15, z);
        let east = surface_height(&mut world, 16, z);
        assert!(
            (west - east).abs() <= 4,
            "seam discontinuity at z={z}: {west} vs {east}"
        );
    }
}

#[test]
fn block_edits_round_trip_and_y_is_clamped() {
    init_logging();
    let mut world = World::new(flat_config());

    world.set_block(5, 10, 5, BlockId::Stone);
    assert_eq!(world.get_block(5, 10, 5), BlockId::Stone);
    assert_eq!(world.get_block(5, -1, 5), BlockId::Air);
    assert_eq!(world.get_block(5, CHUNK_HEIGHT, 5), BlockId::Air);
}

#[test]
fn collision_flips_when_a_block_appears() {
    init_logging();
    let mut world = World::new(flat_config());
    let probe = Point3::new(5.1, 10.1, 5.1);

    assert!(!world.check_collision(probe, 0.3));
    world.set_block(5, 10, 5, BlockId::Stone);
    assert!(world.check_collision(probe, 0.3));
}

#[test]
fn raycast_reports_the_looked_at_block() {
    init_logging();
    let mut world = World::new(flat_config());
    world.set_block(0, 3, 0, BlockId::Stone);

    let hit = world
        .raycast(Point3::new(0.5, 5.5, 0.5), Vector3::new(0.0, -1.0, 0.0), 10.0)
        .expect("ray must hit");
    assert_eq!(hit.position, Point3::new(0, 3, 0));
    assert_eq!(hit.block, BlockId::Stone);
    assert!((hit.distance - 1.5).abs() < 1e-5);

    // Without the block, the same ray falls through to the ground layer.
    world.set_block(0, 3, 0, BlockId::Air);
    let ground = world
        .raycast(Point3::new(0.5, 5.5, 0.5), Vector3::new(0.0, -1.0, 0.0), 10.0)
        .expect("ground must catch the ray");
    assert_eq!(ground.position, Point3::new(0, 1, 0));
}

#[test]
fn streaming_uploads_then_evicts_and_teardown_disposes_the_rest() {
    init_logging();
    let mut world = World::new(flat_config());
    let mut backend = RecordingBackend::default();

    world.update(&mut backend, 0.0, 0.0);
    let resident_after_first_tick = world.resident_chunks();
    assert_eq!(resident_after_first_tick, 13); // Euclidean disc of radius 2
    assert_eq!(backend.uploads.len(), 13);
    assert_eq!(backend.live.len(), 13);

    // Teleport: the old neighborhood is evicted and disposed, a new one
    // uploaded.
    world.update(&mut backend, 800.0, 800.0);
    assert_eq!(world.resident_chunks(), 13);
    assert_eq!(backend.live.len(), 13);
    assert!(backend.disposed.len() >= resident_after_first_tick);

    // Explicit teardown releases everything that is still uploaded.
    world.dispose(&mut backend);
    assert!(backend.live.is_empty());
    assert_eq!(world.resident_chunks(), 0);
}

#[test]
fn an_edit_causes_exactly_one_remesh_next_tick() {
    init_logging();
    let mut world = World::new(flat_config());
    let mut backend = RecordingBackend::default();
    world.update(&mut backend, 0.0, 0.0);
    backend.uploads.clear();

    world.set_block(8, 20, 8, BlockId::Stone);
    world.update(&mut backend, 0.0, 0.0);
    assert_eq!(backend.uploads.len(), 1);
    assert_eq!(backend.uploads[0].0, ChunkCoord::new(0, 0));

    // A boundary edit remeshes both touching chunks.
    backend.uploads.clear();
    world.set_block(0, 20, 8, BlockId::Stone);
    world.update(&mut backend, 0.0, 0.0);
    let mut remeshed: Vec<ChunkCoord> = backend.uploads.iter().map(|(c, _)| *c).collect();
    remeshed.sort_by_key(|c| (c.x, c.z));
    assert_eq!(
        remeshed,
        vec![ChunkCoord::new(-1, 0), ChunkCoord::new(0, 0)]
    );
}

#[test]
fn edits_survive_eviction_and_reload() {
    init_logging();
    let mut world = World::new(flat_config());
    let mut backend = RecordingBackend::default();

    world.update(&mut backend, 0.0, 0.0);
    world.set_block(5, 10, 5, BlockId::Stone);

    // Walk far enough away that chunk (0, 0) is evicted, then come back.
    world.update(&mut backend, 800.0, 800.0);
    assert!(world.peek_chunk(ChunkCoord::new(0, 0)).is_none());
    world.update(&mut backend, 0.0, 0.0);

    assert_eq!(world.get_block(5, 10, 5), BlockId::Stone);
}

#[test]
fn modified_chunks_export_and_import_through_json() {
    init_logging();
    let mut world = World::new(flat_config());
    world.set_block(5, 10, 5, BlockId::Stone);
    world.place_tree(40, 2, 40);

    let saved = world.export_modified();
    assert!(!saved.is_empty());
    let json = persist::to_json(&saved).unwrap();

    let mut restored = World::new(flat_config());
    restored.apply_saved(persist::from_json(&json).unwrap());
    assert_eq!(restored.get_block(5, 10, 5), BlockId::Stone);
    assert_eq!(restored.get_block(40, 2, 40), BlockId::Wood);
}

#[test]
fn trees_stamp_through_the_query_layer() {
    init_logging();
    let mut world = World::new(flat_config());
    let mut backend = RecordingBackend::default();
    world.update(&mut backend, 0.0, 0.0);
    backend.uploads.clear();

    world.place_tree(8, 2, 8);
    assert_eq!(world.get_block(8, 2, 8), BlockId::Wood);

    // The stamp dirtied the chunk, so the next tick re-meshes it.
    world.update(&mut backend, 0.0, 0.0);
    assert!(backend
        .uploads
        .iter()
        .any(|(coord, _)| *coord == ChunkCoord::new(0, 0)));
}

#[test]
fn background_workers_match_the_synchronous_world() {
    init_logging();
    let mut sync_world = World::new(flat_config());
    let mut sync_backend = RecordingBackend::default();
    sync_world.update(&mut sync_backend, 0.0, 0.0);

    let mut async_world = World::new(EngineConfig {
        worker_threads: 2,
        ..flat_config()
    });
    let mut async_backend = RecordingBackend::default();
    for _ in 0..500 {
        async_world.update(&mut async_backend, 0.0, 0.0);
        if async_world.resident_chunks() == sync_world.resident_chunks() && async_world.is_idle() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    assert_eq!(async_world.resident_chunks(), sync_world.resident_chunks());
    let coord = ChunkCoord::new(0, 0);
    assert_eq!(
        async_world.peek_chunk(coord).unwrap().blocks(),
        sync_world.peek_chunk(coord).unwrap().blocks()
    );
    // One live mesh per resident chunk, regardless of how many interim
    // rebuilds the arrival order caused.
    assert_eq!(async_backend.live.len(), async_world.resident_chunks());
}

#[test]
fn config_documents_can_be_partial() {
    init_logging();
    let config = EngineConfig::from_json_str(r#"{"seed": 9, "generator": {"sea_level": 30}}"#)
        .expect("partial config must parse");
    assert_eq!(config.seed, 9);
    assert_eq!(config.generator.sea_level, 30);
    assert_eq!(
        config.render_distance,
        EngineConfig::default().render_distance
    );
}
