//! Polygon fill by ear clipping.
//!
//! Contours are nested by containment and filled with the nonzero rule: each
//! contour's winding adds ±1 to the regions it encloses. A filled region is
//! triangulated together with its directly nested contours, which are bridged
//! into the outer ring as holes. Self-intersecting contours are not resolved.

use glam::{Vec2, Vec3};

use super::contour::{Contour, signed_area};
use crate::mesh::{MeshBuffer, PrimitiveMode};

/// One fillable ring in the shared point pool.
struct Ring {
    /// Indices into the point pool, without a closing duplicate.
    idx: Vec<u32>,
    area: f32,
    parent: Option<usize>,
    winding_number: i32,
}

/// Triangulates the interiors of `contours` into an indexed triangle mesh.
///
/// Open contours are treated as closed. Contours with fewer than three
/// distinct points or no area are skipped.
pub(crate) fn fill_contours(contours: &[Contour]) -> MeshBuffer {
    let mut mesh = MeshBuffer::new(PrimitiveMode::Triangles);
    let mut pool: Vec<Vec3> = Vec::new();
    let mut rings: Vec<Ring> = Vec::new();

    for c in contours {
        let pts = dedup(c.unique_points());
        if pts.len() < 3 {
            continue;
        }
        let area = signed_area(&pts);
        if area.abs() <= f32::EPSILON {
            continue;
        }
        let base = pool.len() as u32;
        pool.extend_from_slice(&pts);
        rings.push(Ring {
            idx: (base..base + pts.len() as u32).collect(),
            area,
            parent: None,
            winding_number: 0,
        });
    }
    if rings.is_empty() {
        return mesh;
    }

    // Parents are the smallest enclosing ring; process big rings first so a
    // parent's winding number is known before its children.
    let mut order: Vec<usize> = (0..rings.len()).collect();
    order.sort_by(|&a, &b| rings[b].area.abs().total_cmp(&rings[a].area.abs()));

    for (pos, &i) in order.iter().enumerate() {
        let probe = pool[rings[i].idx[0] as usize].truncate();
        let parent = order[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&j| ring_contains(&pool, &rings[j].idx, probe));
        let sign = if rings[i].area > 0.0 { 1 } else { -1 };
        let wn = parent.map_or(0, |p| rings[p].winding_number) + sign;
        rings[i].parent = parent;
        rings[i].winding_number = wn;
    }

    mesh.add_vertices(&pool);

    for &i in &order {
        if rings[i].winding_number == 0 {
            continue;
        }
        let mut outer = oriented(&pool, &rings[i].idx, true);
        let mut holes: Vec<Vec<u32>> = rings
            .iter()
            .enumerate()
            .filter(|(_, r)| r.parent == Some(i))
            .map(|(_, r)| oriented(&pool, &r.idx, false))
            .collect();

        // Rightmost holes first keeps earlier bridges out of later ones' way.
        holes.sort_by(|a, b| max_x(&pool, b).total_cmp(&max_x(&pool, a)));
        for (h, hole) in holes.iter().enumerate() {
            bridge_hole(&pool, &mut outer, hole, &holes[h + 1..]);
        }

        ear_clip(&pool, outer, &mut mesh);
    }

    mesh
}

fn dedup(pts: &[Vec3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::with_capacity(pts.len());
    for &p in pts {
        if out.last().is_none_or(|q| q.truncate() != p.truncate()) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].truncate() == out[out.len() - 1].truncate() {
        out.pop();
    }
    out
}

#[inline]
fn xy(pool: &[Vec3], i: u32) -> Vec2 {
    pool[i as usize].truncate()
}

fn ring_area(pool: &[Vec3], ring: &[u32]) -> f32 {
    let mut twice = 0.0;
    for k in 0..ring.len() {
        let a = xy(pool, ring[k]);
        let b = xy(pool, ring[(k + 1) % ring.len()]);
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Copy of `ring` in counter-clockwise (`ccw = true`) or clockwise order.
fn oriented(pool: &[Vec3], ring: &[u32], ccw: bool) -> Vec<u32> {
    let mut r = ring.to_vec();
    if (ring_area(pool, &r) > 0.0) != ccw {
        r.reverse();
    }
    r
}

fn max_x(pool: &[Vec3], ring: &[u32]) -> f32 {
    ring.iter().map(|&i| pool[i as usize].x).fold(f32::NEG_INFINITY, f32::max)
}

fn ring_contains(pool: &[Vec3], ring: &[u32], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (xy(pool, ring[i]), xy(pool, ring[j]));
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Splices `hole` into `outer` through a zero-width bridge from the hole's
/// rightmost vertex to the nearest outer vertex it can see.
fn bridge_hole(pool: &[Vec3], outer: &mut Vec<u32>, hole: &[u32], other_holes: &[Vec<u32>]) {
    let Some((mi, _)) = hole
        .iter()
        .enumerate()
        .max_by(|a, b| pool[*a.1 as usize].x.total_cmp(&pool[*b.1 as usize].x))
    else {
        return;
    };
    let m = xy(pool, hole[mi]);

    let mut candidates: Vec<usize> = (0..outer.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = xy(pool, outer[a]).distance_squared(m);
        let db = xy(pool, outer[b]).distance_squared(m);
        // Prefer vertices to the right of the hole on ties.
        da.total_cmp(&db).then(xy(pool, outer[b]).x.total_cmp(&xy(pool, outer[a]).x))
    });

    let visible = |v: Vec2| {
        let rings = std::iter::once(outer.as_slice())
            .chain(std::iter::once(hole))
            .chain(other_holes.iter().map(Vec::as_slice));
        for ring in rings {
            for k in 0..ring.len() {
                let a = xy(pool, ring[k]);
                let b = xy(pool, ring[(k + 1) % ring.len()]);
                if segments_cross(m, v, a, b) {
                    return false;
                }
            }
        }
        true
    };

    let vi = candidates
        .iter()
        .copied()
        .find(|&c| visible(xy(pool, outer[c])))
        .or_else(|| candidates.first().copied());
    let Some(vi) = vi else {
        return;
    };

    let mut merged = Vec::with_capacity(outer.len() + hole.len() + 2);
    merged.extend_from_slice(&outer[..=vi]);
    merged.extend(hole[mi..].iter().chain(&hole[..=mi]));
    merged.extend_from_slice(&outer[vi..]);
    *outer = merged;
}

/// Proper crossing: the segments intersect at a point interior to both.
fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    if p1 == q1 || p1 == q2 || p2 == q1 || p2 == q2 {
        return false;
    }
    let d1 = (q2 - q1).perp_dot(p1 - q1);
    let d2 = (q2 - q1).perp_dot(p2 - q1);
    let d3 = (p2 - p1).perp_dot(q1 - p1);
    let d4 = (p2 - p1).perp_dot(q2 - p1);
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0) && d1 != 0.0 && d2 != 0.0 && d3 != 0.0 && d4 != 0.0
}

/// Clips ears off a counter-clockwise ring until one triangle remains.
fn ear_clip(pool: &[Vec3], mut ring: Vec<u32>, mesh: &mut MeshBuffer) {
    let mut misses = 0;
    let mut i = 0;

    while ring.len() > 3 {
        let n = ring.len();
        let (ip, inx) = ((i + n - 1) % n, (i + 1) % n);
        let (a, b, c) = (xy(pool, ring[ip]), xy(pool, ring[i]), xy(pool, ring[inx]));
        let cross = (b - a).perp_dot(c - b);

        if cross.abs() <= f32::EPSILON * (b - a).length() * (c - b).length() {
            // Collinear or spike: drop the vertex without emitting area.
            ring.remove(i);
            i %= ring.len();
            misses = 0;
            continue;
        }

        let is_ear = cross > 0.0
            && !ring.iter().any(|&k| {
                let p = xy(pool, k);
                p != a && p != b && p != c && point_in_triangle(p, a, b, c)
            });

        if is_ear || misses >= n {
            // A full lap without an ear means the ring is degenerate; clip
            // anyway so the loop terminates.
            mesh.add_triangle(ring[ip], ring[i], ring[inx]);
            ring.remove(i);
            i = if i == 0 { 0 } else { (i - 1) % ring.len() };
            misses = 0;
        } else {
            i = (i + 1) % n;
            misses += 1;
        }
    }

    if ring.len() == 3 {
        let (a, b, c) = (xy(pool, ring[0]), xy(pool, ring[1]), xy(pool, ring[2]));
        if (b - a).perp_dot(c - a).abs() > f32::EPSILON {
            mesh.add_triangle(ring[0], ring[1], ring[2]);
        }
    }
}

#[inline]
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(pts: &[(f32, f32)], closed: bool) -> Contour {
        Contour::from_points(pts.iter().map(|&(x, y)| Vec3::new(x, y, 0.0)).collect(), closed)
    }

    /// Total unsigned area of the emitted triangles.
    fn tri_area(m: &MeshBuffer) -> f32 {
        m.indices()
            .chunks(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| m.vertices()[i as usize].truncate());
                (b - a).perp_dot(c - a).abs() * 0.5
            })
            .sum()
    }

    #[test]
    fn square_is_two_triangles() {
        let m = fill_contours(&[contour(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true)]);
        assert_eq!(m.primitive_count(), 2);
        assert!((tri_area(&m) - 100.0).abs() < 1e-3);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn concave_polygon_area_is_preserved() {
        // L shape, clockwise order.
        let l = contour(
            &[(0.0, 0.0), (0.0, 20.0), (10.0, 20.0), (10.0, 10.0), (20.0, 10.0), (20.0, 0.0)],
            true,
        );
        let m = fill_contours(&[l]);
        assert_eq!(m.primitive_count(), 4);
        assert!((tri_area(&m) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn opposite_winding_inner_contour_is_a_hole() {
        let outer = contour(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true);
        let inner = contour(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)], true);
        let m = fill_contours(&[outer, inner]);
        assert!((tri_area(&m) - (100.0 - 16.0)).abs() < 1e-3);
    }

    #[test]
    fn same_winding_inner_contour_stays_filled() {
        let outer = contour(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true);
        let inner = contour(&[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)], true);
        let m = fill_contours(&[outer, inner]);
        // Outer ring minus inner, plus inner filled on its own.
        assert!((tri_area(&m) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn two_holes_are_both_cut() {
        let outer = contour(&[(0.0, 0.0), (30.0, 0.0), (30.0, 10.0), (0.0, 10.0)], true);
        let h1 = contour(&[(2.0, 2.0), (2.0, 8.0), (8.0, 8.0), (8.0, 2.0)], true);
        let h2 = contour(&[(20.0, 2.0), (20.0, 8.0), (26.0, 8.0), (26.0, 2.0)], true);
        let m = fill_contours(&[outer, h1, h2]);
        assert!((tri_area(&m) - (300.0 - 72.0)).abs() < 1e-2);
    }

    #[test]
    fn open_contour_is_filled_as_closed() {
        let m = fill_contours(&[contour(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], false)]);
        assert_eq!(m.primitive_count(), 1);
    }

    #[test]
    fn degenerate_contours_produce_nothing() {
        let line = contour(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)], true);
        let dot = contour(&[(1.0, 1.0)], false);
        let m = fill_contours(&[line, dot]);
        assert_eq!(m.primitive_count(), 0);
    }
}
