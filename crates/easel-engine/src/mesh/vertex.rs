use bytemuck::{Pod, Zeroable};

/// Interleaved vertex as a GPU backend uploads it.
///
/// Attributes a mesh does not carry are filled with neutral defaults:
/// white color, +Z normal, zero texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 3],
    pub color: [f32; 4], // straight alpha
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl PackedVertex {
    pub const STRIDE: usize = std::mem::size_of::<PackedVertex>();
}

/// Which optional attribute arrays a mesh carries.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    pub colors: bool,
    pub normals: bool,
    pub tex_coords: bool,
    pub indexed: bool,
}
