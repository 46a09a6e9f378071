//! Rendering backend boundary.
//!
//! The engine never talks to a GPU API. At the end of each frame the
//! recorded [`DrawList`] is lent to a [`RenderBackend`], which turns it into
//! whatever submissions its API needs.
//!
//! Convention:
//! - 2D geometry is in logical pixels (top-left origin, +Y down).
//! - Each command carries the full local-to-clip matrix (depth in `[0, 1]`);
//!   backends apply it as-is. Outside a camera the base of that matrix is
//!   the viewport's pixel projection, inside one it is the camera's
//!   view-projection.

mod logging;

pub use logging::{LoggingBackend, SubmitStats};

use crate::scene::DrawList;

/// Consumer of a frame's draw commands.
///
/// Contract:
/// - commands are processed in recorded order
/// - adjacent mesh draws may be merged (see [`DrawList::batches`]) as long as
///   the pixels match strictly sequential execution
/// - mesh draws failing [`crate::mesh::MeshBuffer::validate`] are skipped,
///   the rest of the frame still renders
/// - the list is only borrowed for the call; the producer resets it right
///   after `submit` returns
pub trait RenderBackend {
    fn submit(&mut self, list: &DrawList);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn submit(&mut self, list: &DrawList) {
        (**self).submit(list);
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn submit(&mut self, list: &DrawList) {
        (**self).submit(list);
    }
}
