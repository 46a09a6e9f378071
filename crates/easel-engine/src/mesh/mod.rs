//! Generic vertex/index containers.

mod buffer;
pub mod primitives;
mod vertex;

pub use buffer::{MeshBuffer, TextureHandle};
pub use vertex::{PackedVertex, VertexLayout};

/// How a vertex (or index) sequence is assembled into primitives.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    #[default]
    Triangles,
    TriangleStrip,
}

impl PrimitiveMode {
    /// Number of primitives `n` elements assemble into.
    pub fn primitive_count(self, n: usize) -> usize {
        match self {
            PrimitiveMode::Points => n,
            PrimitiveMode::Lines => n / 2,
            PrimitiveMode::LineStrip => n.saturating_sub(1),
            PrimitiveMode::LineLoop => {
                if n >= 2 {
                    n
                } else {
                    0
                }
            }
            PrimitiveMode::Triangles => n / 3,
            PrimitiveMode::TriangleStrip => n.saturating_sub(2),
        }
    }
}
