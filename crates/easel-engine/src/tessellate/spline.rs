use glam::Vec3;

use crate::error::{DrawError, DrawResult, recover};

/// Uniform Catmull-Rom spline through `points[1..n-1]`.
///
/// The first and last points only steer the end tangents. Each interior span
/// is split into `segments_per_span` steps. Fewer than four points logs an
/// `InvalidPath` and returns an empty sequence.
pub fn catmull_rom(points: &[Vec3], segments_per_span: u32) -> Vec<Vec3> {
    recover(try_catmull_rom(points, segments_per_span)).unwrap_or_default()
}

pub fn try_catmull_rom(points: &[Vec3], segments_per_span: u32) -> DrawResult<Vec<Vec3>> {
    if points.len() < 4 {
        return Err(DrawError::invalid_path(format!(
            "catmull-rom spline needs at least 4 points, got {}",
            points.len()
        )));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(DrawError::invalid_path("spline point is not finite"));
    }

    let spans = points.len() - 3;
    let mut out = Vec::with_capacity(spans * segments_per_span.max(1) as usize + 1);
    out.push(points[1]);
    for w in points.windows(4) {
        flatten_catmull_span(w[0], w[1], w[2], w[3], segments_per_span, &mut out);
    }
    Ok(out)
}

/// Appends the span from `p1` to `p2` (excluding `p1`, ending exactly at `p2`).
pub fn flatten_catmull_span(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, segments: u32, out: &mut Vec<Vec3>) {
    let n = segments.max(1);
    for i in 1..n {
        let t = i as f32 / n as f32;
        let t2 = t * t;
        let t3 = t2 * t;
        let p = (p1 * 2.0
            + (p2 - p0) * t
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
            + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
            * 0.5;
        out.push(p);
    }
    out.push(p2);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f32, f32)]) -> Vec<Vec3> {
        v.iter().map(|&(x, y)| Vec3::new(x, y, 0.0)).collect()
    }

    #[test]
    fn passes_through_interior_points_only() {
        let cps = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 10.0), (30.0, 10.0), (40.0, 0.0)]);
        let out = catmull_rom(&cps, 4);
        assert_eq!(out.len(), 2 * 4 + 1);
        assert_eq!(out[0], cps[1]);
        assert_eq!(out[4], cps[2]);
        assert_eq!(*out.last().unwrap(), cps[3]);
        assert!(!out.contains(&cps[0]));
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let cps = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        for p in catmull_rom(&cps, 8) {
            assert!(p.y.abs() < 1e-6);
            assert!(p.x >= 1.0 - 1e-6 && p.x <= 2.0 + 1e-6);
        }
    }

    #[test]
    fn fewer_than_four_points_is_empty() {
        let cps = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!(catmull_rom(&cps, 8).is_empty());
        assert!(matches!(
            try_catmull_rom(&cps, 8),
            Err(DrawError::InvalidPath { .. })
        ));
    }
}
