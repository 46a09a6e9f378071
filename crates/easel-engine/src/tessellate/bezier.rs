use glam::Vec3;

use super::{CurveMode, MAX_SUBDIVISION_DEPTH};
use crate::error::{DrawError, DrawResult, recover};

/// Flattens a cubic Bézier from `p0` to `p3`.
///
/// The first point is exactly `p0` and the last is exactly `p3`.
pub fn cubic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, mode: CurveMode) -> Vec<Vec3> {
    recover(try_cubic_bezier(p0, p1, p2, p3, mode)).unwrap_or_default()
}

pub fn try_cubic_bezier(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    mode: CurveMode,
) -> DrawResult<Vec<Vec3>> {
    if !(p0.is_finite() && p1.is_finite() && p2.is_finite() && p3.is_finite()) {
        return Err(DrawError::invalid_path("bezier control point is not finite"));
    }
    let mode = mode.validated()?;

    let mut out = vec![p0];
    flatten_cubic(p0, p1, p2, p3, mode, &mut out);
    Ok(out)
}

/// Quadratic Bézier, flattened through its exact cubic elevation.
pub fn quadratic_bezier(p0: Vec3, ctrl: Vec3, p2: Vec3, mode: CurveMode) -> Vec<Vec3> {
    let (c1, c2) = elevate(p0, ctrl, p2);
    cubic_bezier(p0, c1, c2, p2, mode)
}

/// Cubic control points equivalent to a quadratic span.
#[inline]
pub(crate) fn elevate(p0: Vec3, ctrl: Vec3, p2: Vec3) -> (Vec3, Vec3) {
    (p0 + (ctrl - p0) * (2.0 / 3.0), p2 + (ctrl - p2) * (2.0 / 3.0))
}

/// Appends the flattened span to `out`, excluding `p0` (assumed to already be
/// the last point in `out`). The appended tail ends exactly at `p3`.
///
/// Points are not validated; see [`try_cubic_bezier`]. The adaptive depth is
/// capped at [`MAX_SUBDIVISION_DEPTH`].
pub fn flatten_cubic(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, mode: CurveMode, out: &mut Vec<Vec3>) {
    match mode {
        CurveMode::Fixed { segments } => {
            let n = segments.max(1);
            out.reserve(n as usize);
            for i in 1..n {
                let t = i as f32 / n as f32;
                out.push(eval(p0, p1, p2, p3, t));
            }
            out.push(p3);
        }
        CurveMode::Adaptive { tolerance, max_depth } => {
            subdivide(p0, p1, p2, p3, tolerance, max_depth, out);
        }
    }
}

#[inline]
fn eval(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
}

type Span = [Vec3; 4];

/// de Casteljau subdivision driven by an explicit work stack.
///
/// The right half is pushed before the left so spans are emitted in curve
/// order. Every split keeps the outer endpoints bit-identical, so the final
/// emitted point is exactly the input `p3`.
fn subdivide(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    tolerance: f32,
    max_depth: u32,
    out: &mut Vec<Vec3>,
) {
    let max_depth = max_depth.min(MAX_SUBDIVISION_DEPTH);
    let mut work: Vec<(Span, u32)> = Vec::with_capacity(max_depth as usize + 1);
    work.push(([p0, p1, p2, p3], 0));

    while let Some((span, depth)) = work.pop() {
        if depth >= max_depth || flatness(&span) <= tolerance {
            out.push(span[3]);
            continue;
        }
        let (left, right) = split(&span);
        work.push((right, depth + 1));
        work.push((left, depth + 1));
    }
}

#[inline]
fn split(s: &Span) -> (Span, Span) {
    let p01 = s[0].lerp(s[1], 0.5);
    let p12 = s[1].lerp(s[2], 0.5);
    let p23 = s[2].lerp(s[3], 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);
    ([s[0], p01, p012, mid], [mid, p123, p23, s[3]])
}

/// Largest distance of the inner control points from the chord.
fn flatness(s: &Span) -> f32 {
    distance_to_segment(s[1], s[0], s[3]).max(distance_to_segment(s[2], s[0], s[3]))
}

#[inline]
pub(crate) fn distance_to_segment(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
