use super::DrawCmd;

/// Outcome of one [`DrawList::replay`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ReplayStats {
    /// Commands handed to the visitor.
    pub executed: usize,
    /// Mesh draws rejected by validation.
    pub skipped: usize,
}

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1) amortized
/// - `reset()` keeps the backing allocation, so a warmed-up list does not
///   allocate per frame
///
/// Commands are kept in insertion order. Nothing here reorders, merges or
/// drops them; [`DrawList::batches`] only groups adjacent runs.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { commands: Vec::with_capacity(capacity) }
    }

    /// Appends a command.
    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    /// Number of buffered commands.
    #[inline]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clears recorded commands. Keeps allocated capacity for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.commands.capacity()
    }

    /// Returns commands in insertion order.
    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DrawCmd> {
        self.commands.iter()
    }

    /// Visits every command once, in insertion order.
    ///
    /// Mesh draws that fail [`crate::mesh::MeshBuffer::validate`] are logged
    /// and skipped; the remaining commands still run. The list itself is not
    /// modified, so `command_count()` is unaffected.
    pub fn replay(&self, mut visit: impl FnMut(&DrawCmd)) -> ReplayStats {
        let mut stats = ReplayStats::default();
        for cmd in &self.commands {
            if let DrawCmd::DrawMesh(m) = cmd {
                if let Err(err) = m.mesh.validate() {
                    err.report();
                    stats.skipped += 1;
                    continue;
                }
            }
            visit(cmd);
            stats.executed += 1;
        }
        stats
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCmd;
    type IntoIter = std::slice::Iter<'a, DrawCmd>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::mesh::{MeshBuffer, PrimitiveMode};
    use crate::paint::Color;
    use crate::style::Style;

    fn tri() -> MeshBuffer {
        let mut m = MeshBuffer::new(PrimitiveMode::Triangles);
        m.add_vertices(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
        m.add_triangle(0, 1, 2);
        m
    }

    #[test]
    fn count_tracks_pushes_and_reset() {
        let mut list = DrawList::new();
        for _ in 0..5 {
            list.push_mesh(&tri(), Mat4::IDENTITY, Style::default());
        }
        list.push_clear(Color::BLACK);
        assert_eq!(list.command_count(), 6);
        list.reset();
        assert_eq!(list.command_count(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut list = DrawList::new();
        for _ in 0..64 {
            list.push_clear(Color::BLACK);
        }
        let cap = list.capacity();
        for _ in 0..10 {
            list.reset();
            for _ in 0..64 {
                list.push_clear(Color::WHITE);
            }
            assert_eq!(list.capacity(), cap);
        }
    }

    #[test]
    fn recorded_mesh_is_a_snapshot() {
        let mut list = DrawList::new();
        let mut mesh = tri();
        list.push_mesh(&mesh, Mat4::IDENTITY, Style::default());
        mesh.add_vertex(Vec3::ONE);
        let DrawCmd::DrawMesh(cmd) = &list.commands()[0] else {
            panic!("expected a mesh command");
        };
        assert_eq!(cmd.mesh.num_vertices(), 3);
    }

    #[test]
    fn replay_preserves_insertion_order() {
        let mut list = DrawList::new();
        list.push_clear(Color::BLACK);
        list.push_mesh(&tri(), Mat4::IDENTITY, Style::default());
        list.push_viewport(crate::coords::Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut seen = Vec::new();
        let stats = list.replay(|cmd| {
            seen.push(match cmd {
                DrawCmd::Clear { .. } => "clear",
                DrawCmd::DrawMesh(_) => "mesh",
                DrawCmd::SetViewport { .. } => "viewport",
                DrawCmd::DrawPath(_) => "path",
            })
        });
        assert_eq!(seen, ["clear", "mesh", "viewport"]);
        assert_eq!(stats, ReplayStats { executed: 3, skipped: 0 });
    }

    #[test]
    fn out_of_range_index_skips_only_that_mesh() {
        let mut bad = tri();
        bad.add_index(7);

        let mut list = DrawList::new();
        list.push_mesh(&tri(), Mat4::IDENTITY, Style::default());
        list.push_mesh(&bad, Mat4::IDENTITY, Style::default());
        list.push_mesh(&tri(), Mat4::IDENTITY, Style::default());

        let mut meshes = 0;
        let stats = list.replay(|_| meshes += 1);
        assert_eq!(meshes, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(list.command_count(), 3);
    }

    #[test]
    fn mismatched_attribute_lengths_skip_only_that_mesh() {
        let mut short_colors = tri();
        short_colors.add_colors(&[Color::BLACK, Color::WHITE]);
        let mut long_normals = tri();
        long_normals.add_normals(&[Vec3::Z; 4]);

        let mut list = DrawList::new();
        list.push_clear(Color::BLACK);
        list.push_mesh(&short_colors, Mat4::IDENTITY, Style::default());
        list.push_mesh(&tri(), Mat4::IDENTITY, Style::default());
        list.push_mesh(&long_normals, Mat4::IDENTITY, Style::default());

        let mut visited = Vec::new();
        let stats = list.replay(|cmd| visited.push(matches!(cmd, DrawCmd::DrawMesh(_))));
        assert_eq!(visited, [false, true]);
        assert_eq!(stats, ReplayStats { executed: 2, skipped: 2 });
        assert_eq!(list.command_count(), 4);
    }
}
