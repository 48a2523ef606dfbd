//! # World Query Module
//!
//! Block-level access and spatial queries over the chunk grid, serving game
//! logic independently of streaming. Every operation here is total: any
//! world coordinate is valid (chunks generate on demand), Y outside the
//! world height reads as air, and queries that find nothing report a
//! negative result instead of failing.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::voxels::block::BlockId;
use crate::voxels::chunk::{CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z};
use crate::voxels::chunk_store::{world_to_local, ChunkCoord, ChunkStore};

/// Result of a successful [`raycast`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Integer position of the block the ray stopped at.
    pub position: Point3<i32>,
    /// The block found there.
    pub block: BlockId,
    /// Distance traveled along the (normalized) ray when entering the
    /// block's cell.
    pub distance: f32,
}

/// Returns the block at a world position.
///
/// Y outside `[0, CHUNK_HEIGHT)` reads as air regardless of any writes;
/// any X/Z succeeds, generating the containing chunk if needed.
pub fn get_block(store: &mut ChunkStore, x: i32, y: i32, z: i32) -> BlockId {
    if y < 0 || y >= CHUNK_HEIGHT {
        return BlockId::Air;
    }
    let coord = ChunkCoord::from_world(x, z);
    let (local_x, local_z) = world_to_local(x, z);
    store.get(coord).get(local_x, y as usize, local_z)
}

/// Writes a block at a world position.
///
/// Marks the containing chunk dirty; a write on a chunk boundary also marks
/// the adjacent resident chunk dirty, since its mesh culled faces against
/// the old value. Writes with Y outside the world height are ignored.
pub fn set_block(store: &mut ChunkStore, x: i32, y: i32, z: i32, id: BlockId) {
    if y < 0 || y >= CHUNK_HEIGHT {
        return;
    }
    let coord = ChunkCoord::from_world(x, z);
    let (local_x, local_z) = world_to_local(x, z);
    store.get(coord).set(local_x, y as usize, local_z, id);

    if local_x == 0 {
        store.set_dirty(ChunkCoord::new(coord.x - 1, coord.z));
    }
    if local_x == (CHUNK_SIZE_X - 1) as usize {
        store.set_dirty(ChunkCoord::new(coord.x + 1, coord.z));
    }
    if local_z == 0 {
        store.set_dirty(ChunkCoord::new(coord.x, coord.z - 1));
    }
    if local_z == (CHUNK_SIZE_Z - 1) as usize {
        store.set_dirty(ChunkCoord::new(coord.x, coord.z + 1));
    }
}

/// Steps a ray through the voxel grid and reports the first solid,
/// non-transparent block within `max_distance`.
///
/// Grid traversal (not sampling): the ray visits every cell it passes
/// through exactly once, advancing to whichever axis boundary comes next,
/// so thin geometry cannot be skipped. The reported distance is measured
/// along the normalized direction at the cell's entry point; a ray starting
/// inside a solid cell reports distance zero.
///
/// Returns `None` when nothing is hit, including for a zero direction whose
/// origin cell is empty.
pub fn raycast(
    store: &mut ChunkStore,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RayHit> {
    let length = direction.magnitude();
    if length <= f32::EPSILON {
        let position = Point3::new(
            origin.x.floor() as i32,
            origin.y.floor() as i32,
            origin.z.floor() as i32,
        );
        let block = get_block(store, position.x, position.y, position.z);
        if block.is_solid() && !block.is_transparent() {
            return Some(RayHit {
                position,
                block,
                distance: 0.0,
            });
        }
        return None;
    }
    let dir = direction / length;

    let mut cell_x = origin.x.floor() as i32;
    let mut cell_y = origin.y.floor() as i32;
    let mut cell_z = origin.z.floor() as i32;

    let step_x = if dir.x > 0.0 { 1 } else { -1 };
    let step_y = if dir.y > 0.0 { 1 } else { -1 };
    let step_z = if dir.z > 0.0 { 1 } else { -1 };

    let delta = |component: f32| {
        if component != 0.0 {
            1.0 / component.abs()
        } else {
            f32::INFINITY
        }
    };
    let delta_x = delta(dir.x);
    let delta_y = delta(dir.y);
    let delta_z = delta(dir.z);

    let first_crossing = |component: f32, origin: f32, cell: i32, delta: f32| {
        if component > 0.0 {
            (cell as f32 + 1.0 - origin) * delta
        } else if component < 0.0 {
            (origin - cell as f32) * delta
        } else {
            f32::INFINITY
        }
    };
    let mut next_x = first_crossing(dir.x, origin.x, cell_x, delta_x);
    let mut next_y = first_crossing(dir.y, origin.y, cell_y, delta_y);
    let mut next_z = first_crossing(dir.z, origin.z, cell_z, delta_z);

    let mut traveled = 0.0f32;
    while traveled <= max_distance {
        let block = get_block(store, cell_x, cell_y, cell_z);
        if block.is_solid() && !block.is_transparent() {
            return Some(RayHit {
                position: Point3::new(cell_x, cell_y, cell_z),
                block,
                distance: traveled,
            });
        }
        if next_x < next_y && next_x < next_z {
            traveled = next_x;
            cell_x += step_x;
            next_x += delta_x;
        } else if next_y < next_z {
            traveled = next_y;
            cell_y += step_y;
            next_y += delta_y;
        } else {
            traveled = next_z;
            cell_z += step_z;
            next_z += delta_z;
        }
    }
    None
}

/// Tests whether the cube AABB centered at `position` with the given half
/// extent overlaps any solid block.
///
/// Every voxel cell the box touches is checked; the result reports
/// intersection only; no push-out vector is computed.
pub fn check_collision(store: &mut ChunkStore, position: Point3<f32>, half_extent: f32) -> bool {
    let min_x = (position.x - half_extent).floor() as i32;
    let max_x = (position.x + half_extent).floor() as i32;
    let min_y = (position.y - half_extent).floor() as i32;
    let max_y = (position.y + half_extent).floor() as i32;
    let min_z = (position.z - half_extent).floor() as i32;
    let max_z = (position.z + half_extent).floor() as i32;

    for y in min_y..=max_y {
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                if get_block(store, x, y, z).is_solid() {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generation::WorldGenerator;

    /// Flat test terrain: bedrock at y = 0, sand at y = 1, air above.
    fn flat_store() -> ChunkStore {
        let config = GeneratorConfig {
            base_height: 2.0,
            height_amplitude: 0.0,
            sea_level: 0,
            ..GeneratorConfig::default()
        };
        ChunkStore::new(WorldGenerator::new(1, config))
    }

    #[test]
    fn set_then_get_round_trips_and_out_of_range_y_is_air() {
        let mut store = flat_store();
        set_block(&mut store, 5, 10, 5, BlockId::Stone);
        assert_eq!(get_block(&mut store, 5, 10, 5), BlockId::Stone);
        assert_eq!(get_block(&mut store, 5, -1, 5), BlockId::Air);
        assert_eq!(get_block(&mut store, 5, CHUNK_HEIGHT, 5), BlockId::Air);

        // Writes above/below the world are ignored, not stored.
        set_block(&mut store, 5, -1, 5, BlockId::Stone);
        assert_eq!(get_block(&mut store, 5, -1, 5), BlockId::Air);
    }

    #[test]
    fn negative_coordinates_address_distinct_blocks() {
        let mut store = flat_store();
        set_block(&mut store, -1, 30, -1, BlockId::Wood);
        assert_eq!(get_block(&mut store, -1, 30, -1), BlockId::Wood);
        assert_eq!(get_block(&mut store, 0, 30, 0), BlockId::Air);
        assert_eq!(get_block(&mut store, -2, 30, -1), BlockId::Air);
    }

    #[test]
    fn boundary_edits_dirty_the_adjacent_chunk() {
        let mut store = flat_store();
        // Make both chunks resident, then clear their flags.
        store.get(ChunkCoord::new(0, 0));
        store.get(ChunkCoord::new(-1, 0));
        store.clear_dirty(ChunkCoord::new(0, 0));
        store.clear_dirty(ChunkCoord::new(-1, 0));

        set_block(&mut store, 0, 5, 3, BlockId::Stone);
        assert!(store.peek(ChunkCoord::new(0, 0)).unwrap().dirty);
        assert!(store.peek(ChunkCoord::new(-1, 0)).unwrap().dirty);
    }

    #[test]
    fn interior_edits_do_not_dirty_neighbors() {
        let mut store = flat_store();
        store.get(ChunkCoord::new(0, 0));
        store.get(ChunkCoord::new(1, 0));
        store.clear_dirty(ChunkCoord::new(0, 0));
        store.clear_dirty(ChunkCoord::new(1, 0));

        set_block(&mut store, 8, 5, 8, BlockId::Stone);
        assert!(store.peek(ChunkCoord::new(0, 0)).unwrap().dirty);
        assert!(!store.peek(ChunkCoord::new(1, 0)).unwrap().dirty);
    }

    #[test]
    fn descending_ray_hits_a_placed_block_at_cell_entry() {
        let mut store = flat_store();
        set_block(&mut store, 0, 3, 0, BlockId::Stone);

        let hit = raycast(
            &mut store,
            Point3::new(0.5, 5.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            10.0,
        )
        .expect("ray must hit the stone block");
        assert_eq!(hit.position, Point3::new(0, 3, 0));
        assert_eq!(hit.block, BlockId::Stone);
        // The ray crosses into cell y = 3 at world y = 4.0.
        assert!((hit.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn raycast_misses_when_nothing_is_in_range() {
        let mut store = flat_store();
        let hit = raycast(
            &mut store,
            Point3::new(0.5, 50.0, 0.5),
            Vector3::new(0.0, 1.0, 0.0),
            30.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn raycast_passes_through_water() {
        let mut store = flat_store();
        set_block(&mut store, 0, 4, 0, BlockId::Water);
        set_block(&mut store, 0, 3, 0, BlockId::Stone);

        let hit = raycast(
            &mut store,
            Point3::new(0.5, 6.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            10.0,
        )
        .expect("ray must pass the water and hit the stone");
        assert_eq!(hit.position, Point3::new(0, 3, 0));
    }

    #[test]
    fn raycast_respects_max_distance() {
        let mut store = flat_store();
        set_block(&mut store, 0, 3, 0, BlockId::Stone);
        let hit = raycast(
            &mut store,
            Point3::new(0.5, 5.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            1.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn diagonal_ray_traverses_without_skipping_cells() {
        let mut store = flat_store();
        set_block(&mut store, 3, 10, 3, BlockId::Stone);
        let hit = raycast(
            &mut store,
            Point3::new(0.5, 7.5, 0.5),
            Vector3::new(1.0, 1.0, 1.0),
            20.0,
        )
        .expect("diagonal ray must find the block");
        assert_eq!(hit.position, Point3::new(3, 10, 3));
        assert!(hit.distance > 0.0);
    }

    #[test]
    fn collision_toggles_with_a_nearby_write() {
        let mut store = flat_store();
        let probe = Point3::new(5.1, 10.1, 5.1);
        assert!(!check_collision(&mut store, probe, 0.3));
        set_block(&mut store, 5, 10, 5, BlockId::Stone);
        assert!(check_collision(&mut store, probe, 0.3));
    }

    #[test]
    fn collision_detects_the_ground_plane() {
        let mut store = flat_store();
        // Box straddling the sand layer at y = 1.
        assert!(check_collision(&mut store, Point3::new(0.5, 1.9, 0.5), 0.3));
        // Box fully above it.
        assert!(!check_collision(&mut store, Point3::new(0.5, 3.0, 0.5), 0.3));
    }
}
