//! Indexed 3D primitives centered on the origin, with normals and UVs.
//!
//! Triangles wind counter-clockwise seen from outside. Round solids are Y-up.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::{MeshBuffer, PrimitiveMode};

/// Grid in the XY plane facing +Z, `columns × rows` cells.
pub fn plane(width: f32, height: f32, columns: u32, rows: u32) -> MeshBuffer {
    let cols = columns.max(1);
    let rows = rows.max(1);
    let mut m = MeshBuffer::with_capacity(
        PrimitiveMode::Triangles,
        grid_vertex_count(cols, rows),
        cols as usize * rows as usize * 6,
    );

    for r in 0..=rows {
        let v = r as f32 / rows as f32;
        for c in 0..=cols {
            let u = c as f32 / cols as f32;
            m.add_vertex(Vec3::new((u - 0.5) * width, (v - 0.5) * height, 0.0));
            m.add_normal(Vec3::Z);
            m.add_tex_coord(Vec2::new(u, v));
        }
    }

    let stride = cols + 1;
    for r in 0..rows {
        for c in 0..cols {
            let i = r * stride + c;
            m.add_triangle(i, i + 1, i + stride + 1);
            m.add_triangle(i, i + stride + 1, i + stride);
        }
    }
    m
}

/// Vertices in a `cols × rows` cell grid, counted in `usize`.
#[inline]
fn grid_vertex_count(cols: u32, rows: u32) -> usize {
    (cols as usize + 1) * (rows as usize + 1)
}

/// Box with one flat-shaded quad per face (24 vertices, 12 triangles).
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshBuffer {
    let h = Vec3::new(width, height, depth) * 0.5;
    let mut m = MeshBuffer::with_capacity(PrimitiveMode::Triangles, 24, 36);

    // (normal, right, up) per face; corners are n ± right ± up.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    for (n, right, up) in faces {
        let base = m.num_vertices() as u32;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (su, sv) in corners {
            m.add_vertex((n + right * su + up * sv) * h);
            m.add_normal(n);
            m.add_tex_coord(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
        }
        m.add_triangle(base, base + 1, base + 2);
        m.add_triangle(base, base + 2, base + 3);
    }
    m
}

/// Latitude/longitude sphere, Y up, `resolution` bands in each direction.
pub fn uv_sphere(radius: f32, resolution: u32) -> MeshBuffer {
    let n = resolution.max(3);
    let mut m = MeshBuffer::with_capacity(
        PrimitiveMode::Triangles,
        grid_vertex_count(n, n),
        n as usize * n as usize * 6,
    );

    for lat in 0..=n {
        let v = lat as f32 / n as f32;
        let (sin_t, cos_t) = (v * PI).sin_cos();
        for lon in 0..=n {
            let u = lon as f32 / n as f32;
            let (sin_p, cos_p) = (u * TAU).sin_cos();
            let dir = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            m.add_vertex(dir * radius);
            m.add_normal(dir);
            m.add_tex_coord(Vec2::new(u, v));
        }
    }

    let stride = n + 1;
    for lat in 0..n {
        for lon in 0..n {
            let a = lat * stride + lon;
            let b = a + stride;
            m.add_triangle(a, a + 1, b);
            m.add_triangle(a + 1, b + 1, b);
        }
    }
    m
}

/// Tube along Y, `segments` around and `rows` along the axis, optionally
/// closed with flat caps.
pub fn cylinder(radius: f32, height: f32, segments: u32, rows: u32, capped: bool) -> MeshBuffer {
    let mut m = MeshBuffer::new(PrimitiveMode::Triangles);
    lathe(&mut m, height, segments, rows, |_| radius, |dir| dir);
    if capped {
        cap(&mut m, radius, height * 0.5, segments, true);
        cap(&mut m, radius, -height * 0.5, segments, false);
    }
    m
}

/// Cone along Y with its apex at `+height / 2`.
pub fn cone(radius: f32, height: f32, segments: u32, rows: u32, capped: bool) -> MeshBuffer {
    let slant = radius.hypot(height);
    let (out, up) = if slant > 0.0 { (height / slant, radius / slant) } else { (1.0, 0.0) };

    let mut m = MeshBuffer::new(PrimitiveMode::Triangles);
    lathe(&mut m, height, segments, rows, |t| radius * (1.0 - t), |dir| dir * out + Vec3::Y * up);
    if capped {
        cap(&mut m, radius, -height * 0.5, segments, false);
    }
    m
}

/// Subdivision levels past this are clamped (6 levels is 40962 vertices).
pub const MAX_ICOSPHERE_SUBDIVISIONS: u32 = 6;

/// Sphere from a recursively subdivided icosahedron: `10·4ⁿ + 2` vertices,
/// `20·4ⁿ` triangles, all of near-equal area.
pub fn icosphere(radius: f32, subdivisions: u32) -> MeshBuffer {
    let levels = subdivisions.min(MAX_ICOSPHERE_SUBDIVISIONS);
    let t = (1.0 + 5.0f32.sqrt()) * 0.5;

    let mut dirs: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    #[rustfmt::skip]
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..levels {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, dirs: &mut Vec<Vec3>| -> u32 {
            *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                let mid = dirs[a as usize].lerp(dirs[b as usize], 0.5).normalize();
                dirs.push(mid);
                dirs.len() as u32 - 1
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut dirs);
            let bc = midpoint(b, c, &mut dirs);
            let ca = midpoint(c, a, &mut dirs);
            next.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }

    let mut m = MeshBuffer::with_capacity(PrimitiveMode::Triangles, dirs.len(), faces.len() * 3);
    for dir in dirs {
        m.add_vertex(dir * radius);
        m.add_normal(dir);
        let u = (dir.z.atan2(dir.x) / TAU).rem_euclid(1.0);
        let v = dir.y.clamp(-1.0, 1.0).acos() / PI;
        m.add_tex_coord(Vec2::new(u, v));
    }
    for [a, b, c] in faces {
        m.add_triangle(a, b, c);
    }
    m
}

/// Surface of revolution around Y, centered on the origin.
///
/// `radius_at(t)` gives the radius for `t` in `[0, 1]` from bottom to top.
/// A zero top radius closes the last row with one triangle per segment.
fn lathe(
    m: &mut MeshBuffer,
    height: f32,
    segments: u32,
    rows: u32,
    radius_at: impl Fn(f32) -> f32,
    normal: impl Fn(Vec3) -> Vec3,
) {
    let segs = segments.max(3);
    let rows = rows.max(1);
    let stride = segs + 1;
    let base = m.num_vertices() as u32;

    for r in 0..=rows {
        let t = r as f32 / rows as f32;
        let radius = radius_at(t);
        for s in 0..=segs {
            let u = s as f32 / segs as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let dir = Vec3::new(cos, 0.0, sin);
            m.add_vertex(dir * radius + Vec3::Y * ((t - 0.5) * height));
            m.add_normal(normal(dir).normalize_or_zero());
            m.add_tex_coord(Vec2::new(u, t));
        }
    }

    let apex = radius_at(1.0) == 0.0;
    for r in 0..rows {
        for s in 0..segs {
            let i = base + r * stride + s;
            let above = i + stride;
            m.add_triangle(i, above, i + 1);
            if !(apex && r == rows - 1) {
                m.add_triangle(i + 1, above, above + 1);
            }
        }
    }
}

/// Flat disc at height `y`, facing +Y when `up`, else -Y.
fn cap(m: &mut MeshBuffer, radius: f32, y: f32, segments: u32, up: bool) {
    let segs = segments.max(3);
    let normal = if up { Vec3::Y } else { Vec3::NEG_Y };

    let center = m.num_vertices() as u32;
    m.add_vertex(Vec3::new(0.0, y, 0.0));
    m.add_normal(normal);
    m.add_tex_coord(Vec2::splat(0.5));
    for s in 0..segs {
        let (sin, cos) = (s as f32 / segs as f32 * TAU).sin_cos();
        m.add_vertex(Vec3::new(cos * radius, y, sin * radius));
        m.add_normal(normal);
        m.add_tex_coord(Vec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin));
    }
    for s in 0..segs {
        let cur = center + 1 + s;
        let next = center + 1 + (s + 1) % segs;
        if up {
            m.add_triangle(center, next, cur);
        } else {
            m.add_triangle(center, cur, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face of a convex solid around the origin points away from it.
    fn assert_outward(m: &MeshBuffer) {
        let v = m.vertices();
        for [a, b, c] in m.triangles() {
            let (pa, pb, pc) = (v[a as usize], v[b as usize], v[c as usize]);
            let face = (pb - pa).cross(pc - pa);
            let centroid = (pa + pb + pc) / 3.0;
            assert!(face.dot(centroid) >= -1e-4, "inward face {a} {b} {c}");
        }
    }

    #[test]
    fn plane_counts() {
        let m = plane(10.0, 4.0, 2, 3);
        assert_eq!(m.num_vertices(), 3 * 4);
        assert_eq!(m.primitive_count(), 2 * 3 * 2);
        assert!(m.validate().is_ok());
        assert_eq!(m.bounds(), Some((Vec3::new(-5.0, -2.0, 0.0), Vec3::new(5.0, 2.0, 0.0))));
    }

    #[test]
    fn cuboid_faces_are_flat_and_outward() {
        let m = cuboid(2.0, 4.0, 6.0);
        assert_eq!(m.num_vertices(), 24);
        assert_eq!(m.primitive_count(), 12);
        assert!(m.validate().is_ok());
        for (p, n) in m.vertices().iter().zip(m.normals()) {
            assert!(p.dot(*n) > 0.0);
        }
        assert_eq!(m.bounds(), Some((Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0))));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let m = uv_sphere(5.0, 8);
        assert!(m.validate().is_ok());
        assert_eq!(m.primitive_count(), 8 * 8 * 2);
        for p in m.vertices() {
            assert!((p.length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn grid_vertex_count_does_not_wrap_u32() {
        let cols = 70_000u32;
        assert!((cols + 1).checked_mul(cols + 1).is_none());
        assert_eq!(grid_vertex_count(cols, cols), 70_001usize * 70_001);
        assert_eq!(grid_vertex_count(2, 3), plane(1.0, 1.0, 2, 3).num_vertices());
    }

    #[test]
    fn solids_wind_outward() {
        assert_outward(&cuboid(1.0, 2.0, 3.0));
        assert_outward(&uv_sphere(2.0, 10));
        assert_outward(&cylinder(1.0, 3.0, 12, 2, true));
        assert_outward(&cone(1.0, 2.0, 12, 3, true));
        assert_outward(&icosphere(1.0, 2));
    }

    #[test]
    fn sphere_normals_agree_with_face_winding() {
        let mut smoothed = uv_sphere(3.0, 12);
        let analytic = smoothed.normals().to_vec();
        smoothed.smooth_normals();
        for (s, a) in smoothed.normals().iter().zip(&analytic) {
            if *s != Vec3::ZERO {
                assert!(s.dot(*a) > 0.9);
            }
        }
    }

    #[test]
    fn cylinder_counts_and_radius() {
        let m = cylinder(2.0, 4.0, 8, 2, true);
        // Body (8+1)·(2+1) plus two caps of 1+8.
        assert_eq!(m.num_vertices(), 27 + 18);
        assert_eq!(m.primitive_count(), 8 * 2 * 2 + 8 * 2);
        assert!(m.validate().is_ok());
        for (p, n) in m.vertices()[..27].iter().zip(m.normals()) {
            assert!((Vec2::new(p.x, p.z).length() - 2.0).abs() < 1e-4);
            assert!(n.y.abs() < 1e-6);
        }
        assert_eq!(m.bounds().map(|(lo, hi)| (lo.y, hi.y)), Some((-2.0, 2.0)));
    }

    #[test]
    fn open_cylinder_has_no_caps() {
        let m = cylinder(1.0, 1.0, 6, 1, false);
        assert_eq!(m.num_vertices(), 7 * 2);
        assert_eq!(m.primitive_count(), 12);
    }

    #[test]
    fn cone_tapers_to_apex() {
        let m = cone(1.0, 2.0, 8, 3, true);
        // Two full rows, one apex row, then the base cap.
        assert_eq!(m.primitive_count(), 8 * 2 * 2 + 8 + 8);
        assert!(m.validate().is_ok());
        let apex = Vec3::new(0.0, 1.0, 0.0);
        let body = 9 * 4;
        for p in &m.vertices()[body - 9..body] {
            assert!(p.abs_diff_eq(apex, 1e-5));
        }
        // Side normals tilt up by the slope of the surface.
        let n = m.normals()[0];
        assert!(n.abs_diff_eq(Vec3::new(2.0, 1.0, 0.0).normalize(), 1e-5));
    }

    #[test]
    fn icosphere_counts_follow_subdivision() {
        for n in 0..3u32 {
            let m = icosphere(4.0, n);
            assert_eq!(m.num_vertices(), 10 * 4usize.pow(n) + 2);
            assert_eq!(m.primitive_count(), 20 * 4usize.pow(n));
            assert!(m.validate().is_ok());
            for p in m.vertices() {
                assert!((p.length() - 4.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn icosphere_subdivisions_are_clamped() {
        let m = icosphere(1.0, 50);
        assert_eq!(m.num_vertices(), 10 * 4usize.pow(MAX_ICOSPHERE_SUBDIVISIONS) + 2);
    }

    #[test]
    fn wireframe_of_merged_cuboid_is_edges_and_diagonals() {
        let mut m = cuboid(1.0, 1.0, 1.0);
        assert_eq!(m.merge_duplicate_vertices(), 16);
        let w = m.to_wireframe();
        assert_eq!(w.primitive_count(), 12 + 6);
    }
}
