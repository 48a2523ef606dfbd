//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block and the
//! per-face data the mesher needs: neighbor offsets, outward normals, quad
//! corner layouts, and the fixed ambient occlusion factor for each direction.

/// The six faces of a voxel block, named by the axis direction each face
/// points toward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockSide {
    /// Face toward +X.
    PosX,
    /// Face toward -X.
    NegX,
    /// Upward face (+Y).
    PosY,
    /// Downward face (-Y).
    NegY,
    /// Face toward +Z.
    PosZ,
    /// Face toward -Z.
    NegZ,
}

impl BlockSide {
    /// All six sides, in a fixed iteration order.
    pub const ALL: [BlockSide; 6] = [
        BlockSide::PosX,
        BlockSide::NegX,
        BlockSide::PosY,
        BlockSide::NegY,
        BlockSide::PosZ,
        BlockSide::NegZ,
    ];

    /// Offset to the neighboring cell this face looks at.
    #[inline]
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            BlockSide::PosX => (1, 0, 0),
            BlockSide::NegX => (-1, 0, 0),
            BlockSide::PosY => (0, 1, 0),
            BlockSide::NegY => (0, -1, 0),
            BlockSide::PosZ => (0, 0, 1),
            BlockSide::NegZ => (0, 0, -1),
        }
    }

    /// Outward unit normal of this face.
    #[inline]
    pub fn normal(self) -> [f32; 3] {
        match self {
            BlockSide::PosX => [1.0, 0.0, 0.0],
            BlockSide::NegX => [-1.0, 0.0, 0.0],
            BlockSide::PosY => [0.0, 1.0, 0.0],
            BlockSide::NegY => [0.0, -1.0, 0.0],
            BlockSide::PosZ => [0.0, 0.0, 1.0],
            BlockSide::NegZ => [0.0, 0.0, -1.0],
        }
    }

    /// Fixed ambient occlusion factor for this face direction.
    ///
    /// Top faces are lit fully, bottom faces darkest, side faces in between,
    /// which gives unlit geometry enough contrast to read as 3D.
    #[inline]
    pub fn ao_factor(self) -> f32 {
        match self {
            BlockSide::PosY => 1.0,
            BlockSide::NegY => 0.5,
            BlockSide::PosX | BlockSide::NegX => 0.8,
            BlockSide::PosZ | BlockSide::NegZ => 0.65,
        }
    }

    /// The four quad corners of this face as offsets from the block's minimum
    /// corner, ordered lower-left, lower-right, upper-left, upper-right.
    ///
    /// The ordering pairs with [`ChunkMesh::push_quad`]'s index pattern to
    /// produce counter-clockwise triangles when viewed from outside the
    /// block, so the winding always matches [`BlockSide::normal`].
    ///
    /// [`ChunkMesh::push_quad`]: crate::meshing::mesh::ChunkMesh::push_quad
    pub fn corner_offsets(self) -> [[f32; 3]; 4] {
        match self {
            BlockSide::NegX => [
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
            ],
            BlockSide::PosX => [
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
            ],
            BlockSide::NegY => [
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
            ],
            BlockSide::PosY => [
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
            ],
            BlockSide::NegZ => [
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            BlockSide::PosZ => [
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
            ],
        }
    }
}
