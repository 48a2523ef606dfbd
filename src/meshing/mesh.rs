//! # Chunk Mesh Module
//!
//! GPU-friendly geometry produced by the mesher: an interleaved vertex
//! buffer plus a triangle index list. The engine never talks to the GPU
//! itself; meshes are handed to the rendering collaborator, and the
//! byte-slice accessors allow a zero-copy upload.

/// A single vertex of a chunk mesh.
///
/// # Memory Layout
/// Three tightly packed `[f32; 3]` attributes (36 bytes, no padding), safe
/// to cast straight into a GPU buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Outward face normal, shared by all four vertices of a quad.
    pub normal: [f32; 3],
    /// Base block color tinted by the per-direction ambient occlusion
    /// factor.
    pub color: [f32; 3],
}

/// Triangle mesh for one chunk.
///
/// A rebuild always produces a complete replacement for the chunk's
/// previous mesh. An empty mesh (no vertices) is a valid result; an
/// all-air chunk produces one.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    /// Interleaved vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        ChunkMesh::default()
    }

    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one quad: four corners in lower-left, lower-right,
    /// upper-left, upper-right order, one shared normal, one color.
    ///
    /// The two triangles are (ll, lr, ur) and (ll, ur, ul), which is
    /// counter-clockwise when viewed from the normal's side.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], color: [f32; 3]) {
        let base = self.vertices.len() as u32;
        for position in corners {
            self.vertices.push(MeshVertex {
                position,
                normal,
                color,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 3, base, base + 3, base + 2]);
    }

    /// Vertex buffer as raw bytes, for direct upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes, for direct upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
