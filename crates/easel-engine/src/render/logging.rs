use super::RenderBackend;
use crate::scene::{DrawCmd, DrawList};

/// Per-submission counters kept by [`LoggingBackend`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SubmitStats {
    pub commands: usize,
    /// Submissions after merging adjacent compatible mesh draws.
    pub batches: usize,
    pub meshes: usize,
    pub paths: usize,
    pub clears: usize,
    pub viewports: usize,
    /// Mesh draws rejected by validation.
    pub skipped: usize,
    pub vertices: usize,
    pub primitives: usize,
}

/// Reference backend: validates, batches and counts what a GPU backend
/// would submit, and logs a one-line summary per frame.
#[derive(Debug, Default)]
pub struct LoggingBackend {
    frames: u64,
    last: SubmitStats,
}

impl LoggingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `submit` calls so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn last_stats(&self) -> SubmitStats {
        self.last
    }
}

impl RenderBackend for LoggingBackend {
    fn submit(&mut self, list: &DrawList) {
        let mut stats = SubmitStats {
            commands: list.command_count(),
            batches: list.batches().count(),
            ..SubmitStats::default()
        };

        let replay = list.replay(|cmd| match cmd {
            DrawCmd::DrawMesh(m) => {
                stats.meshes += 1;
                stats.vertices += m.mesh.num_vertices();
                stats.primitives += m.mesh.primitive_count();
            }
            DrawCmd::DrawPath(p) => {
                stats.paths += 1;
                if p.path.filled {
                    let fill = p.path.fill_mesh();
                    stats.vertices += fill.num_vertices();
                    stats.primitives += fill.primitive_count();
                }
                if p.path.has_stroke() {
                    let stroke = p.path.stroke_mesh();
                    stats.vertices += stroke.num_vertices();
                    stats.primitives += stroke.primitive_count();
                }
            }
            DrawCmd::Clear { color } => {
                stats.clears += 1;
                log::trace!("clear {:?}", color.to_rgba8());
            }
            DrawCmd::SetViewport { rect } => {
                stats.viewports += 1;
                log::trace!("viewport {rect:?}");
            }
        });
        stats.skipped = replay.skipped;

        self.frames += 1;
        self.last = stats;

        log::debug!(
            "frame {}: {} commands in {} batches, {} vertices, {} primitives, {} skipped",
            self.frames,
            stats.commands,
            stats.batches,
            stats.vertices,
            stats.primitives,
            stats.skipped,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::mesh::{MeshBuffer, PrimitiveMode};
    use crate::paint::Color;
    use crate::path::PathBuilder;
    use crate::style::Style;

    #[test]
    fn counts_a_mixed_frame() {
        let mut tri = MeshBuffer::new(PrimitiveMode::Triangles);
        tri.add_vertices(&[Vec3::ZERO, Vec3::X, Vec3::Y]);

        let mut bad = tri.clone();
        bad.add_index(9);

        let mut pb = PathBuilder::new();
        pb.rectangle(crate::coords::Rect::new(0.0, 0.0, 4.0, 4.0));

        let mut list = DrawList::new();
        list.push_clear(Color::BLACK);
        list.push_mesh(&tri, Mat4::IDENTITY, Style::default());
        list.push_mesh(&tri, Mat4::IDENTITY, Style::default());
        list.push_mesh(&bad, Mat4::IDENTITY, Style::default());
        list.push_path(pb.path(), Mat4::IDENTITY);

        let mut backend = LoggingBackend::new();
        backend.submit(&list);

        let s = backend.last_stats();
        assert_eq!(s.commands, 5);
        assert_eq!(s.batches, 3);
        assert_eq!(s.meshes, 2);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.paths, 1);
        assert_eq!(s.clears, 1);
        assert_eq!(s.primitives, 1 + 1 + 2);
        assert_eq!(backend.frames(), 1);
    }
}
