use std::sync::Arc;

use crate::coords::Rect;
use crate::mesh::MeshBuffer;
use crate::paint::Color;
use crate::path::Path;
use crate::scene::DrawList;
use crate::style::Style;
use crate::transform::Transform;

/// Backend-agnostic draw command.
///
/// Commands are snapshots: the transform and style are copied out of the
/// live stacks and the geometry is shared immutably, so later changes by the
/// caller never alter an already-recorded command.
///
/// Extending the command set:
/// - add a payload struct and a variant here
/// - add `DrawList::push_*` helpers next to it
/// - teach [`crate::render::RenderBackend`] implementations to consume it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    DrawMesh(MeshCmd),
    DrawPath(PathCmd),
    Clear { color: Color },
    SetViewport { rect: Rect },
}

/// Mesh draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub mesh: Arc<MeshBuffer>,
    pub transform: Transform,
    pub style: Style,
}

/// Path draw payload. Paint comes from the path itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCmd {
    pub path: Arc<Path>,
    pub transform: Transform,
}

impl DrawList {
    /// Records a mesh draw, deep-copying `mesh`.
    #[inline]
    pub fn push_mesh(&mut self, mesh: &MeshBuffer, transform: Transform, style: Style) {
        self.push_shared_mesh(Arc::new(mesh.clone()), transform, style);
    }

    /// Records a mesh draw without copying. The `Arc` keeps it immutable.
    #[inline]
    pub fn push_shared_mesh(&mut self, mesh: Arc<MeshBuffer>, transform: Transform, style: Style) {
        self.push(DrawCmd::DrawMesh(MeshCmd { mesh, transform, style }));
    }

    /// Records a path draw, deep-copying `path`.
    #[inline]
    pub fn push_path(&mut self, path: &Path, transform: Transform) {
        self.push_shared_path(Arc::new(path.clone()), transform);
    }

    #[inline]
    pub fn push_shared_path(&mut self, path: Arc<Path>, transform: Transform) {
        self.push(DrawCmd::DrawPath(PathCmd { path, transform }));
    }

    #[inline]
    pub fn push_clear(&mut self, color: Color) {
        self.push(DrawCmd::Clear { color });
    }

    #[inline]
    pub fn push_viewport(&mut self, rect: Rect) {
        self.push(DrawCmd::SetViewport { rect });
    }
}
