use glam::{Vec2, Vec3};

use crate::coords::Rect;

/// Orientation of a contour in the XY plane (x right, y up).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// One polyline within a path.
///
/// Invariant: a closed contour's last point is bit-identical to its first.
/// [`Contour::close`] establishes this; callers never have to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    points: Vec<Vec3>,
    closed: bool,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a pre-built point list, e.g. a decoded glyph outline.
    pub fn from_points(points: Vec<Vec3>, closed: bool) -> Self {
        let mut c = Self { points, closed: false };
        if closed {
            c.close();
        }
        c
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn first(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Appends a point, skipping exact repeats of the last one.
    pub(crate) fn push(&mut self, p: Vec3) {
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }

    pub(crate) fn extend(&mut self, pts: impl IntoIterator<Item = Vec3>) {
        for p in pts {
            self.push(p);
        }
    }

    /// Marks the contour closed and makes its last point equal its first.
    ///
    /// A last point within `1e-6` of the first is snapped onto it instead of
    /// duplicating it.
    pub fn close(&mut self) {
        let Some(first) = self.first() else {
            return;
        };
        self.closed = true;
        if self.points.len() == 1 {
            return;
        }
        let last = self.points.len() - 1;
        if self.points[last].distance_squared(first) <= 1e-12 {
            self.points[last] = first;
        } else {
            self.points.push(first);
        }
    }

    /// Points without the duplicated closing point.
    pub fn unique_points(&self) -> &[Vec3] {
        if self.closed && self.points.len() > 1 {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }

    /// Edges as `(start, end)` pairs. Closed contours include the closing edge.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn perimeter(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Shoelace area in the XY plane; open contours are treated as closed.
    /// Positive for counter-clockwise order.
    pub fn signed_area(&self) -> f32 {
        signed_area(self.unique_points())
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// `None` when the contour encloses no area.
    pub fn winding(&self) -> Option<Winding> {
        let a = self.signed_area();
        if a > f32::EPSILON {
            Some(Winding::CounterClockwise)
        } else if a < -f32::EPSILON {
            Some(Winding::Clockwise)
        } else {
            None
        }
    }

    /// Area centroid in XY. Degenerate contours fall back to the vertex mean.
    pub fn centroid_2d(&self) -> Vec2 {
        let pts = self.unique_points();
        if pts.is_empty() {
            return Vec2::ZERO;
        }

        let mut acc = Vec2::ZERO;
        let mut twice_area = 0.0;
        for i in 0..pts.len() {
            let a = pts[i].truncate();
            let b = pts[(i + 1) % pts.len()].truncate();
            let cross = a.perp_dot(b);
            twice_area += cross;
            acc += (a + b) * cross;
        }

        if twice_area.abs() <= f32::EPSILON {
            let sum: Vec2 = pts.iter().map(|p| p.truncate()).sum();
            return sum / pts.len() as f32;
        }
        acc / (3.0 * twice_area)
    }

    /// XY bounds. Empty contours yield a zero rect.
    pub fn bounding_box(&self) -> Rect {
        let mut it = self.points.iter().map(|p| p.truncate());
        let Some(first) = it.next() else {
            return Rect::default();
        };
        let (lo, hi) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Rect::from_corners(lo, hi)
    }

    /// Even-odd point-in-polygon test in XY. Open contours contain nothing.
    pub fn contains_point(&self, p: Vec2) -> bool {
        if !self.closed {
            return false;
        }
        let pts = self.unique_points();
        if pts.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
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

    /// Nearest point on the contour and the index of the segment it lies on.
    pub fn closest_point(&self, target: Vec3) -> Option<(Vec3, usize)> {
        match self.points.len() {
            0 => None,
            1 => Some((self.points[0], 0)),
            _ => self
                .segments()
                .enumerate()
                .map(|(i, (a, b))| (project_onto_segment(target, a, b), i))
                .min_by(|(p, _), (q, _)| {
                    p.distance_squared(target).total_cmp(&q.distance_squared(target))
                }),
        }
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Vec3] {
        &mut self.points
    }

    pub(crate) fn from_raw(points: Vec<Vec3>, closed: bool) -> Self {
        Self { points, closed }
    }
}

pub(crate) fn signed_area(pts: &[Vec3]) -> f32 {
    if pts.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..pts.len() {
        let a = pts[i].truncate();
        let b = pts[(i + 1) % pts.len()].truncate();
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

#[inline]
pub(crate) fn project_onto_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}
