//! Drawing-core error taxonomy.
//!
//! Every error here is recovered inside the engine: the offending call is
//! ignored (or clamped) and the error is logged through [`DrawError::report`].
//! Callers that want to observe failures use the `try_*` variants of the
//! affected operations, which return these errors instead of logging them.

use core::fmt;

use thiserror::Error;

/// Which nested-state stack an imbalance was detected on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StackKind {
    Transform,
    Style,
    Camera,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackKind::Transform => "transform",
            StackKind::Style => "style",
            StackKind::Camera => "camera",
        };
        f.write_str(name)
    }
}

/// Mesh attribute array that can be checked against the vertex count.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshAttribute {
    Colors,
    Normals,
    TexCoords,
}

impl fmt::Display for MeshAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeshAttribute::Colors => "colors",
            MeshAttribute::Normals => "normals",
            MeshAttribute::TexCoords => "tex coords",
        };
        f.write_str(name)
    }
}

/// Recoverable drawing error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Pop without a matching push, or a frame that ended with pushes left over.
    #[error("{stack} stack imbalance: {detail}")]
    StackImbalance {
        /// The stack the imbalance was detected on.
        stack: StackKind,
        /// What went wrong.
        detail: String,
    },

    /// Curve/path call with unusable input.
    #[error("invalid path: {reason}")]
    InvalidPath {
        /// The reason the call was rejected.
        reason: String,
    },

    /// An index refers past the end of the vertex array.
    #[error("mesh index {index} out of range for {vertex_count} vertices")]
    MeshIndexOutOfRange {
        /// The offending index value.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// An enabled attribute array is not the same length as the vertex array.
    ///
    /// Recovered the same way as [`DrawError::MeshIndexOutOfRange`]: the mesh's
    /// draw is skipped.
    #[error("mesh {attribute} has {len} entries for {vertex_count} vertices")]
    MeshAttributeLength {
        /// The mismatched attribute.
        attribute: MeshAttribute,
        /// Length of the attribute array.
        len: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Camera parameter outside its valid domain.
    #[error("degenerate camera: {reason}")]
    CameraDegenerate {
        /// The reason the value was rejected.
        reason: String,
    },
}

impl DrawError {
    pub(crate) fn imbalance(stack: StackKind, detail: impl Into<String>) -> Self {
        DrawError::StackImbalance { stack, detail: detail.into() }
    }

    pub(crate) fn invalid_path(reason: impl Into<String>) -> Self {
        DrawError::InvalidPath { reason: reason.into() }
    }

    pub(crate) fn camera(reason: impl Into<String>) -> Self {
        DrawError::CameraDegenerate { reason: reason.into() }
    }

    /// True for the errors that cause a mesh draw to be skipped.
    pub fn is_mesh_rejection(&self) -> bool {
        matches!(
            self,
            DrawError::MeshIndexOutOfRange { .. } | DrawError::MeshAttributeLength { .. }
        )
    }

    /// Logs the error as a recovered contract violation.
    pub fn report(&self) {
        log::warn!("{self}");
    }
}

pub type DrawResult<T> = Result<T, DrawError>;

/// Reports the error (if any) and discards it.
#[inline]
pub(crate) fn recover<T>(res: DrawResult<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            err.report();
            None
        }
    }
}
