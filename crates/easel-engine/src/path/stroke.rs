//! Stroke ribbons with round joins.

use glam::{Vec2, Vec3};

use super::contour::Contour;
use crate::mesh::{MeshBuffer, PrimitiveMode};
use crate::tessellate::{self, segments_for_sweep};

/// Stroke tessellation parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeParams {
    pub width: f32,
    /// Joins turning by more than this many degrees get a round cap.
    pub join_threshold_deg: f32,
    /// Full-circle resolution the join arcs are cut from.
    pub circle_resolution: u32,
}

/// Offsets each contour by half the width on both sides.
///
/// Every segment becomes a butt-ended quad; vertices that turn by more than
/// the join threshold get a fan on the outer side of the turn. The result is
/// an indexed triangle list. Zero or negative widths produce an empty mesh.
pub(crate) fn stroke_contours(contours: &[Contour], params: StrokeParams) -> MeshBuffer {
    let mut mesh = MeshBuffer::new(PrimitiveMode::Triangles);
    if !(params.width > 0.0) {
        return mesh;
    }
    for c in contours {
        stroke_one(c, params, &mut mesh);
    }
    mesh
}

fn stroke_one(contour: &Contour, params: StrokeParams, mesh: &mut MeshBuffer) {
    let pts = distinct(contour.points());
    if pts.len() < 2 {
        return;
    }
    let hw = params.width * 0.5;

    let dirs: Vec<Vec2> = pts
        .windows(2)
        .map(|w| (w[1] - w[0]).truncate().normalize_or_zero())
        .collect();

    for (k, w) in pts.windows(2).enumerate() {
        let n = dirs[k].perp().extend(0.0) * hw;
        let base = mesh.num_vertices() as u32;
        mesh.add_vertices(&[w[0] + n, w[0] - n, w[1] - n, w[1] + n]);
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }

    // Interior joins, plus the seam of a closed contour.
    for k in 1..dirs.len() {
        round_join(pts[k], dirs[k - 1], dirs[k], hw, params, mesh);
    }
    if contour.is_closed() && dirs.len() >= 2 {
        round_join(pts[0], dirs[dirs.len() - 1], dirs[0], hw, params, mesh);
    }
}

fn round_join(at: Vec3, d0: Vec2, d1: Vec2, hw: f32, params: StrokeParams, mesh: &mut MeshBuffer) {
    let turn = d0.perp_dot(d1).atan2(d0.dot(d1)).to_degrees();
    if turn.abs() <= params.join_threshold_deg {
        return;
    }

    // The gap opens on the side opposite the turn.
    let outer = if turn > 0.0 { -d0.perp() } else { d0.perp() };
    let start = outer.y.atan2(outer.x).to_degrees();
    let segments = segments_for_sweep(params.circle_resolution, turn);
    let rim = tessellate::arc(at, Vec2::splat(hw), start, start + turn, segments);

    let center = mesh.num_vertices() as u32;
    mesh.add_vertex(at);
    mesh.add_vertices(&rim);
    for i in 0..rim.len().saturating_sub(1) as u32 {
        mesh.add_triangle(center, center + 1 + i, center + 2 + i);
    }
}

fn distinct(pts: &[Vec3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::with_capacity(pts.len());
    for &p in pts {
        if out.last().is_none_or(|q| q.truncate() != p.truncate()) {
            out.push(p);
        }
    }
    out
}
