//! Derived contours: simplification, resampling, smoothing.

use glam::Vec3;

use super::contour::{Contour, project_onto_segment};

impl Contour {
    /// Point at arc length `len` from the start, clamped to the contour.
    pub fn point_at_length(&self, len: f32) -> Option<Vec3> {
        let first = self.first()?;
        if len <= 0.0 {
            return Some(first);
        }
        let mut remaining = len;
        for (a, b) in self.segments() {
            let d = a.distance(b);
            if remaining <= d {
                return Some(if d > 0.0 { a.lerp(b, remaining / d) } else { a });
            }
            remaining -= d;
        }
        self.last()
    }

    /// Ramer–Douglas–Peucker simplification.
    ///
    /// Keeps the endpoints and every point farther than `tolerance` from the
    /// chord of its enclosing span.
    pub fn simplify(&self, tolerance: f32) -> Contour {
        let pts = self.points();
        if pts.len() < 3 || !(tolerance > 0.0) {
            return self.clone();
        }

        let mut keep = vec![false; pts.len()];
        keep[0] = true;
        keep[pts.len() - 1] = true;

        let mut work = vec![(0usize, pts.len() - 1)];
        while let Some((start, end)) = work.pop() {
            if end - start < 2 {
                continue;
            }
            let (a, b) = (pts[start], pts[end]);
            let (idx, dist) = (start + 1..end)
                .map(|i| (i, pts[i].distance(project_onto_segment(pts[i], a, b))))
                .fold((start, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });

            if dist > tolerance {
                keep[idx] = true;
                work.push((idx, end));
                work.push((start, idx));
            }
        }

        let kept = pts
            .iter()
            .zip(&keep)
            .filter_map(|(p, &k)| k.then_some(*p))
            .collect();
        Contour::from_raw(kept, self.is_closed())
    }

    /// Points every `spacing` units along the contour, plus the final point.
    pub fn resampled_by_spacing(&self, spacing: f32) -> Contour {
        if self.len() < 2 || !(spacing > 0.0) {
            return self.clone();
        }
        let total = self.perimeter();
        let steps = (total / spacing).floor() as usize;

        let mut out = Contour::new();
        for i in 0..=steps {
            if let Some(p) = self.point_at_length(i as f32 * spacing) {
                out.push(p);
            }
        }
        if let Some(last) = self.last() {
            if out.last().is_some_and(|p| p.distance(last) > spacing * 1e-3) {
                out.push(last);
            }
        }
        out.snap_closed(self.is_closed());
        out
    }

    /// Exactly `count` points evenly spaced by arc length (`count >= 2`).
    pub fn resampled_by_count(&self, count: usize) -> Contour {
        if self.len() < 2 || count < 2 {
            return self.clone();
        }
        let total = self.perimeter();
        let step = total / (count - 1) as f32;

        let mut pts: Vec<Vec3> = (0..count - 1)
            .filter_map(|i| self.point_at_length(i as f32 * step))
            .collect();
        pts.extend(self.last());

        let mut out = Contour::from_raw(pts, false);
        out.snap_closed(self.is_closed());
        out
    }

    /// Moving-average smoothing over `size` neighbours on each side.
    ///
    /// Neighbour `j` steps away weighs `1 - shape * j / size` (floored at 0),
    /// so `shape = 0` is a box filter and `shape = 1` a triangle filter.
    /// Closed contours wrap around; open ones keep their endpoints' reach
    /// truncated.
    pub fn smoothed(&self, size: usize, shape: f32) -> Contour {
        let pts = self.unique_points();
        if pts.len() < 3 || size == 0 {
            return self.clone();
        }
        let n = pts.len() as isize;
        let closed = self.is_closed();
        let reach = size as isize;

        let smoothed = (0..n)
            .map(|i| {
                let mut sum = Vec3::ZERO;
                let mut weight_sum = 0.0;
                for j in -reach..=reach {
                    let idx = i + j;
                    let idx = if closed {
                        idx.rem_euclid(n)
                    } else if idx < 0 || idx >= n {
                        continue;
                    } else {
                        idx
                    };
                    let w = (1.0 - shape * j.unsigned_abs() as f32 / size as f32).max(0.0);
                    sum += pts[idx as usize] * w;
                    weight_sum += w;
                }
                if weight_sum > 0.0 { sum / weight_sum } else { pts[i as usize] }
            })
            .collect();

        Contour::from_points(smoothed, closed)
    }

    /// Re-closes after a rebuild so the closing point is exact.
    fn snap_closed(&mut self, closed: bool) {
        if closed {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Contour {
        let pts = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        Contour::from_points(pts, false)
    }

    #[test]
    fn simplify_collapses_collinear_points() {
        let c = line(10).simplify(0.01);
        assert_eq!(c.points(), &[Vec3::ZERO, Vec3::new(9.0, 0.0, 0.0)]);
    }

    #[test]
    fn simplify_keeps_significant_corner() {
        let c = Contour::from_points(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(5.0, 5.1, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
                Vec3::new(20.0, 10.0, 0.0),
            ],
            false,
        );
        let s = c.simplify(1.0);
        assert_eq!(s.len(), 3);
        assert_eq!(s.points()[1], Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn resample_by_spacing_includes_end() {
        let c = line(2).resampled_by_spacing(0.3);
        // 0, 0.3, 0.6, 0.9, then the end point.
        assert_eq!(c.len(), 5);
        assert_eq!(c.last(), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn resample_by_count_is_exact() {
        let c = line(3).resampled_by_count(5);
        assert_eq!(c.len(), 5);
        assert!(c.points()[1].abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
        assert_eq!(c.last(), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn resampled_closed_contour_stays_closed() {
        let sq = Contour::from_points(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            true,
        );
        let r = sq.resampled_by_spacing(0.25);
        assert!(r.is_closed());
        assert_eq!(r.first(), r.last());
    }

    #[test]
    fn smoothing_a_line_keeps_it_straight() {
        let c = line(6).smoothed(2, 0.5);
        assert_eq!(c.len(), 6);
        assert!(c.points().iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn smoothing_pulls_spike_down() {
        let mut pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        pts[2].y = 10.0;
        let c = Contour::from_points(pts, false).smoothed(1, 0.0);
        assert!(c.points()[2].y < 10.0);
        assert!(c.points()[1].y > 0.0);
    }

    #[test]
    fn point_at_length_clamps() {
        let c = line(3);
        assert_eq!(c.point_at_length(-1.0), Some(Vec3::ZERO));
        assert_eq!(c.point_at_length(99.0), Some(Vec3::new(2.0, 0.0, 0.0)));
    }
}
