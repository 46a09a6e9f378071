use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec2, Vec3};

use super::{PackedVertex, PrimitiveMode, VertexLayout};
use crate::error::{DrawError, DrawResult, MeshAttribute};
use crate::paint::Color;

/// Opaque reference to decoded pixels owned by the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub u64);

/// Vertex data with parallel attribute arrays and an optional index array.
///
/// Attribute arrays are independent `Vec`s kept aligned by the caller. An
/// attribute takes part in the vertex layout when it is enabled *and* has been
/// populated; `disable_*` clears the array and turns it off.
///
/// Consistency is checked lazily by [`MeshBuffer::validate`] when a draw list
/// is consumed, not on every append.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    mode: PrimitiveMode,
    vertices: Vec<Vec3>,
    colors: Vec<Color>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    indices: Vec<u32>,

    use_colors: bool,
    use_normals: bool,
    use_tex_coords: bool,
    use_indices: bool,

    texture: Option<TextureHandle>,
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new(PrimitiveMode::Triangles)
    }
}

impl MeshBuffer {
    pub fn new(mode: PrimitiveMode) -> Self {
        Self {
            mode,
            vertices: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
            use_colors: true,
            use_normals: true,
            use_tex_coords: true,
            use_indices: true,
            texture: None,
        }
    }

    pub fn with_capacity(mode: PrimitiveMode, vertices: usize, indices: usize) -> Self {
        let mut m = Self::new(mode);
        m.vertices.reserve(vertices);
        m.indices.reserve(indices);
        m
    }

    // ── mode / texture ────────────────────────────────────────────────────

    #[inline]
    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    #[inline]
    pub fn set_mode(&mut self, mode: PrimitiveMode) {
        self.mode = mode;
    }

    #[inline]
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    #[inline]
    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    // ── append ────────────────────────────────────────────────────────────

    #[inline]
    pub fn add_vertex(&mut self, p: Vec3) {
        self.vertices.push(p);
    }

    pub fn add_vertices(&mut self, ps: &[Vec3]) {
        self.vertices.extend_from_slice(ps);
    }

    #[inline]
    pub fn add_color(&mut self, c: Color) {
        self.colors.push(c);
    }

    pub fn add_colors(&mut self, cs: &[Color]) {
        self.colors.extend_from_slice(cs);
    }

    #[inline]
    pub fn add_normal(&mut self, n: Vec3) {
        self.normals.push(n);
    }

    pub fn add_normals(&mut self, ns: &[Vec3]) {
        self.normals.extend_from_slice(ns);
    }

    #[inline]
    pub fn add_tex_coord(&mut self, uv: Vec2) {
        self.tex_coords.push(uv);
    }

    pub fn add_tex_coords(&mut self, uvs: &[Vec2]) {
        self.tex_coords.extend_from_slice(uvs);
    }

    #[inline]
    pub fn add_index(&mut self, i: u32) {
        self.indices.push(i);
    }

    pub fn add_indices(&mut self, is: &[u32]) {
        self.indices.extend_from_slice(is);
    }

    #[inline]
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends `other`'s geometry, offsetting its indices.
    ///
    /// Both meshes are expected to share a mode; `self`'s is kept. A
    /// non-indexed `other` is appended as an index run over its vertices
    /// when `self` is indexed.
    pub fn append(&mut self, other: &MeshBuffer) {
        let base = self.vertices.len() as u32;
        if self.is_indexed() || other.is_indexed() {
            if !self.is_indexed() {
                self.indices.extend(0..base);
            }
            if other.is_indexed() {
                self.indices.extend(other.indices.iter().map(|i| i + base));
            } else {
                self.indices.extend(base..base + other.vertices.len() as u32);
            }
        }
        self.vertices.extend_from_slice(&other.vertices);
        self.colors.extend_from_slice(&other.colors);
        self.normals.extend_from_slice(&other.normals);
        self.tex_coords.extend_from_slice(&other.tex_coords);
    }

    /// Clears all arrays. Flags, mode and texture are kept.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.indices.clear();
    }

    // ── enable / disable ──────────────────────────────────────────────────

    pub fn enable_colors(&mut self) {
        self.use_colors = true;
    }

    pub fn disable_colors(&mut self) {
        self.use_colors = false;
        self.colors.clear();
    }

    pub fn enable_normals(&mut self) {
        self.use_normals = true;
    }

    pub fn disable_normals(&mut self) {
        self.use_normals = false;
        self.normals.clear();
    }

    pub fn enable_tex_coords(&mut self) {
        self.use_tex_coords = true;
    }

    pub fn disable_tex_coords(&mut self) {
        self.use_tex_coords = false;
        self.tex_coords.clear();
    }

    pub fn enable_indices(&mut self) {
        self.use_indices = true;
    }

    pub fn disable_indices(&mut self) {
        self.use_indices = false;
        self.indices.clear();
    }

    // ── access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn has_colors(&self) -> bool {
        self.use_colors && !self.colors.is_empty()
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        self.use_normals && !self.normals.is_empty()
    }

    #[inline]
    pub fn has_tex_coords(&self) -> bool {
        self.use_tex_coords && !self.tex_coords.is_empty()
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.use_indices && !self.indices.is_empty()
    }

    pub fn layout(&self) -> VertexLayout {
        VertexLayout {
            colors: self.has_colors(),
            normals: self.has_normals(),
            tex_coords: self.has_tex_coords(),
            indexed: self.is_indexed(),
        }
    }

    /// Primitives the current mode assembles from the index (or vertex) run.
    pub fn primitive_count(&self) -> usize {
        let n = if self.is_indexed() { self.indices.len() } else { self.vertices.len() };
        self.mode.primitive_count(n)
    }

    /// Axis-aligned `(min, max)` over all vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let (&first, rest) = self.vertices.split_first()?;
        Some(rest.iter().fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))))
    }

    // ── consumption ───────────────────────────────────────────────────────

    /// Checks that every index is in range and every present attribute array
    /// matches the vertex count.
    pub fn validate(&self) -> DrawResult<()> {
        let n = self.vertices.len();
        let attrs = [
            (MeshAttribute::Colors, self.has_colors(), self.colors.len()),
            (MeshAttribute::Normals, self.has_normals(), self.normals.len()),
            (MeshAttribute::TexCoords, self.has_tex_coords(), self.tex_coords.len()),
        ];
        for (attribute, present, len) in attrs {
            if present && len != n {
                return Err(DrawError::MeshAttributeLength { attribute, len, vertex_count: n });
            }
        }

        if self.is_indexed() {
            if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= n) {
                return Err(DrawError::MeshIndexOutOfRange { index, vertex_count: n });
            }
        }
        Ok(())
    }

    /// Interleaves the present attributes. Call [`MeshBuffer::validate`] first;
    /// short attribute arrays fall back to defaults past their end.
    pub fn to_packed_vertices(&self) -> Vec<PackedVertex> {
        let colors = if self.has_colors() { self.colors.as_slice() } else { &[] };
        let normals = if self.has_normals() { self.normals.as_slice() } else { &[] };
        let uvs = if self.has_tex_coords() { self.tex_coords.as_slice() } else { &[] };

        self.vertices
            .iter()
            .enumerate()
            .map(|(i, p)| PackedVertex {
                position: p.to_array(),
                color: colors.get(i).copied().unwrap_or(Color::WHITE).to_array(),
                normal: normals.get(i).copied().unwrap_or(Vec3::Z).to_array(),
                uv: uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
            })
            .collect()
    }

    // ── derived geometry ──────────────────────────────────────────────────

    /// Index triples of the triangles the current mode assembles.
    ///
    /// Strip triangles are flipped on odd steps so all share one winding.
    /// Point and line modes have none. Triples with an out-of-range index are
    /// skipped.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let n = self.vertices.len();
        let run: Cow<'_, [u32]> = if self.is_indexed() {
            Cow::Borrowed(self.indices.as_slice())
        } else {
            Cow::Owned((0..n as u32).collect())
        };
        let tris: Vec<[u32; 3]> = match self.mode {
            PrimitiveMode::Triangles => run.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
            PrimitiveMode::TriangleStrip => run
                .windows(3)
                .enumerate()
                .map(|(i, t)| if i % 2 == 0 { [t[0], t[1], t[2]] } else { [t[1], t[0], t[2]] })
                .collect(),
            _ => Vec::new(),
        };
        tris.into_iter().filter(|t| t.iter().all(|i| (*i as usize) < n)).collect()
    }

    /// Replaces the normals with the area-weighted sum of the face normals
    /// around each vertex. Meshes without triangles are left unchanged.
    pub fn smooth_normals(&mut self) {
        let tris = self.triangles();
        if tris.is_empty() {
            log::warn!("smooth_normals: {:?} mesh has no triangles", self.mode);
            return;
        }
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for [a, b, c] in tris {
            let face = face_normal(&self.vertices, [a, b, c]);
            for i in [a, b, c] {
                normals[i as usize] += face;
            }
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
        self.use_normals = true;
    }

    /// Gives every triangle its own three vertices carrying the face normal.
    ///
    /// The result is a non-indexed `Triangles` mesh. Colors and texture
    /// coordinates are carried over when they match the vertex count.
    pub fn flat_normals(&mut self) {
        let tris = self.triangles();
        if tris.is_empty() {
            log::warn!("flat_normals: {:?} mesh has no triangles", self.mode);
            return;
        }
        let n = self.vertices.len();
        let keep_colors = self.colors.len() == n;
        let keep_uvs = self.tex_coords.len() == n;

        let mut vertices = Vec::with_capacity(tris.len() * 3);
        let mut normals = Vec::with_capacity(tris.len() * 3);
        let mut colors = Vec::new();
        let mut tex_coords = Vec::new();
        for tri in tris {
            let face = face_normal(&self.vertices, tri).normalize_or_zero();
            for i in tri.map(|i| i as usize) {
                vertices.push(self.vertices[i]);
                normals.push(face);
                if keep_colors {
                    colors.push(self.colors[i]);
                }
                if keep_uvs {
                    tex_coords.push(self.tex_coords[i]);
                }
            }
        }

        self.vertices = vertices;
        self.normals = normals;
        self.colors = colors;
        self.tex_coords = tex_coords;
        self.indices.clear();
        self.mode = PrimitiveMode::Triangles;
        self.use_normals = true;
    }

    /// Collapses vertices with bit-identical positions (`-0.0` equals `0.0`).
    ///
    /// The first occurrence keeps its attributes. Indices are rewritten so the
    /// drawn primitives are unchanged; a non-indexed mesh gains an index run.
    /// Returns the number of vertices removed.
    pub fn merge_duplicate_vertices(&mut self) -> usize {
        let n = self.vertices.len();
        let mut first: HashMap<[u32; 3], u32> = HashMap::with_capacity(n);
        let mut keep: Vec<usize> = Vec::with_capacity(n);
        let mut remap: Vec<u32> = Vec::with_capacity(n);

        for (i, p) in self.vertices.iter().enumerate() {
            let next = keep.len() as u32;
            let slot = *first.entry(position_key(*p)).or_insert_with(|| {
                keep.push(i);
                next
            });
            remap.push(slot);
        }

        let removed = n - keep.len();
        if removed == 0 {
            return 0;
        }

        if self.is_indexed() {
            for index in &mut self.indices {
                if let Some(r) = remap.get(*index as usize) {
                    *index = *r;
                }
            }
        } else {
            self.indices = remap;
            self.use_indices = true;
        }

        self.vertices = keep.iter().map(|i| self.vertices[*i]).collect();
        select(&mut self.colors, &keep, n);
        select(&mut self.normals, &keep, n);
        select(&mut self.tex_coords, &keep, n);
        removed
    }

    /// Replaces the index run with `0..num_vertices`.
    pub fn setup_indices_auto(&mut self) {
        self.indices.clear();
        self.indices.extend(0..self.vertices.len() as u32);
        self.use_indices = true;
    }

    /// Edges of every triangle as an indexed `Lines` mesh over the same
    /// vertices; an edge shared by two triangles appears once.
    ///
    /// Point and line meshes are returned as they are.
    pub fn to_wireframe(&self) -> MeshBuffer {
        if !matches!(self.mode, PrimitiveMode::Triangles | PrimitiveMode::TriangleStrip) {
            return self.clone();
        }

        let mut out = self.clone();
        out.mode = PrimitiveMode::Lines;
        out.indices.clear();
        out.use_indices = true;

        let mut seen = HashSet::new();
        for [a, b, c] in self.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                if u != v && seen.insert((u.min(v), u.max(v))) {
                    out.indices.extend_from_slice(&[u, v]);
                }
            }
        }
        if out.indices.is_empty() {
            out.clear();
        }
        out
    }

    /// Applies `m` to positions and its normal matrix to normals.
    pub fn transform(&mut self, m: Mat4) {
        for p in &mut self.vertices {
            *p = m.transform_point3(*p);
        }
        if !self.normals.is_empty() {
            let nm = m.inverse().transpose();
            for n in &mut self.normals {
                *n = nm.transform_vector3(*n).normalize_or_zero();
            }
        }
    }
}

/// Unnormalized normal of a counter-clockwise triangle.
#[inline]
fn face_normal(vertices: &[Vec3], [a, b, c]: [u32; 3]) -> Vec3 {
    let (pa, pb, pc) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
    (pb - pa).cross(pc - pa)
}

#[inline]
fn position_key(p: Vec3) -> [u32; 3] {
    // Adding zero folds -0.0 into 0.0.
    let p = p + Vec3::ZERO;
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Keeps `keep`'s entries of a per-vertex array. Arrays that do not match the
/// old vertex count are left for `validate` to reject.
fn select<T: Copy>(attr: &mut Vec<T>, keep: &[usize], vertex_count: usize) {
    if attr.len() == vertex_count {
        *attr = keep.iter().map(|i| attr[*i]).collect();
    }
}
