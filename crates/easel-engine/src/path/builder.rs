use glam::{Mat4, Vec2, Vec3};

use super::contour::Contour;
use super::fill::fill_contours;
use super::stroke::{StrokeParams, stroke_contours};
use crate::coords::{CornerRadii, Rect};
use crate::error::{DrawError, DrawResult, recover};
use crate::mesh::MeshBuffer;
use crate::paint::Color;
use crate::tessellate::{
    self, CurveMode, DEFAULT_CIRCLE_RESOLUTION, flatten_catmull_span, flatten_cubic, segments_for_sweep,
};

/// Default turn angle above which strokes get round joins.
pub const DEFAULT_JOIN_THRESHOLD_DEG: f32 = 15.0;

/// Lifecycle of the contour a [`PathBuilder`] is currently writing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContourState {
    /// No `move_to` yet (or the builder was cleared).
    Empty,
    Open,
    Closed,
}

/// Contours plus the paint and resolution used to render them.
///
/// A consumer fills the path when `filled` is set and strokes it when
/// `stroke_width > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    contours: Vec<Contour>,

    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub filled: bool,

    pub curve_mode: CurveMode,
    pub circle_resolution: u32,
    pub join_threshold_deg: f32,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            contours: Vec::new(),
            fill_color: Color::WHITE,
            stroke_color: Color::WHITE,
            stroke_width: 0.0,
            filled: true,
            curve_mode: CurveMode::default(),
            circle_resolution: DEFAULT_CIRCLE_RESOLUTION,
            join_threshold_deg: DEFAULT_JOIN_THRESHOLD_DEG,
        }
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps pre-built contours, e.g. glyph outlines from a font decoder.
    pub fn from_contours(contours: Vec<Contour>) -> Self {
        Self { contours, ..Self::default() }
    }

    #[inline]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(Contour::is_empty)
    }

    #[inline]
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0
    }

    /// Interior triangles, colored with `fill_color`.
    pub fn fill_mesh(&self) -> MeshBuffer {
        let mut mesh = fill_contours(&self.contours);
        paint(&mut mesh, self.fill_color);
        mesh
    }

    /// Outline ribbon, colored with `stroke_color`. Empty without a stroke.
    pub fn stroke_mesh(&self) -> MeshBuffer {
        let mut mesh = stroke_contours(&self.contours, self.stroke_params(self.stroke_width));
        paint(&mut mesh, self.stroke_color);
        mesh
    }

    pub(crate) fn stroke_params(&self, width: f32) -> StrokeParams {
        StrokeParams {
            width,
            join_threshold_deg: self.join_threshold_deg,
            circle_resolution: self.circle_resolution,
        }
    }

    /// Union of the contours' XY bounds.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.contours
            .iter()
            .filter(|c| !c.is_empty())
            .map(Contour::bounding_box)
            .reduce(Rect::union)
    }

    // ── whole-path edits ──────────────────────────────────────────────────

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(Mat4::from_translation(offset));
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.apply(Mat4::from_scale(Vec3::new(x, y, 1.0)));
    }

    /// Rotates around the origin in the XY plane.
    pub fn rotate_z(&mut self, angle_deg: f32) {
        self.apply(Mat4::from_rotation_z(angle_deg.to_radians()));
    }

    /// Maps every point through `m`.
    pub fn apply(&mut self, m: Mat4) {
        for c in &mut self.contours {
            for p in c.points_mut() {
                *p = m.transform_point3(*p);
            }
        }
    }

    /// Ramer–Douglas–Peucker on every contour.
    pub fn simplify(&mut self, tolerance: f32) {
        for c in &mut self.contours {
            *c = c.simplify(tolerance);
        }
    }
}

fn paint(mesh: &mut MeshBuffer, color: Color) {
    let colors = vec![color; mesh.num_vertices()];
    mesh.add_colors(&colors);
}

/// Incremental path construction with a pen position.
///
/// Every segment starts where the previous one ended. After [`close`] the pen
/// returns to the start of the closed contour, and the next drawing call
/// begins a new contour from there.
///
/// [`close`]: PathBuilder::close
#[derive(Debug, Clone)]
pub struct PathBuilder {
    path: Path,
    state: ContourState,
    pen: Option<Vec3>,
    /// Sliding window of Catmull-Rom control points fed by `curve_to`.
    curve_window: Vec<Vec3>,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::from_path(Path::new())
    }

    /// Starts from `path`'s paint and resolution settings, discarding its
    /// contours.
    pub fn from_path(mut path: Path) -> Self {
        path.contours.clear();
        Self {
            path,
            state: ContourState::Empty,
            pen: None,
            curve_window: Vec::with_capacity(4),
        }
    }

    // ── settings ──────────────────────────────────────────────────────────

    pub fn set_filled(&mut self, filled: bool) -> &mut Self {
        self.path.filled = filled;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.path.fill_color = color.clamped();
        self
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.path.stroke_color = color.clamped();
        self
    }

    /// `0` disables the stroke; negative widths are treated as `0`.
    pub fn set_stroke_width(&mut self, width: f32) -> &mut Self {
        self.path.stroke_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self
    }

    /// Adaptive depth is capped at [`tessellate::MAX_SUBDIVISION_DEPTH`]. An
    /// unusable tolerance is logged here and then fails every curve command
    /// with `InvalidPath` until a valid mode is set.
    pub fn set_curve_mode(&mut self, mode: CurveMode) -> &mut Self {
        self.path.curve_mode = match mode.validated() {
            Ok(mode) => mode,
            Err(err) => {
                err.report();
                mode
            }
        };
        self
    }

    pub fn set_circle_resolution(&mut self, resolution: u32) -> &mut Self {
        self.path.circle_resolution = resolution.max(3);
        self
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> ContourState {
        self.state
    }

    #[inline]
    pub fn current_position(&self) -> Option<Vec3> {
        self.pen
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the path built so far.
    pub fn build(&self) -> Path {
        self.path.clone()
    }

    pub fn into_path(self) -> Path {
        self.path
    }

    /// Drops all contours and the pen. Settings are kept.
    pub fn clear(&mut self) {
        self.path.contours.clear();
        self.state = ContourState::Empty;
        self.pen = None;
        self.curve_window.clear();
    }

    // ── commands ──────────────────────────────────────────────────────────

    /// Starts a new open contour at `p`.
    ///
    /// A previous contour that never got past its first point is replaced.
    pub fn move_to(&mut self, p: Vec3) {
        if self.state == ContourState::Open && self.path.contours.last().is_some_and(|c| c.len() <= 1) {
            self.path.contours.pop();
        }
        let mut c = Contour::new();
        c.push(p);
        self.path.contours.push(c);
        self.state = ContourState::Open;
        self.pen = Some(p);
        self.curve_window.clear();
    }

    pub fn line_to(&mut self, p: Vec3) {
        recover(self.try_line_to(p));
    }

    pub fn try_line_to(&mut self, p: Vec3) -> DrawResult<()> {
        check_finite(&[p])?;
        self.open_contour("line_to")?.push(p);
        self.pen = Some(p);
        self.curve_window.clear();
        Ok(())
    }

    /// Cubic Bézier from the pen through `c1`, `c2` to `p`.
    pub fn bezier_to(&mut self, c1: Vec3, c2: Vec3, p: Vec3) {
        recover(self.try_bezier_to(c1, c2, p));
    }

    pub fn try_bezier_to(&mut self, c1: Vec3, c2: Vec3, p: Vec3) -> DrawResult<()> {
        check_finite(&[c1, c2, p])?;
        let mode = self.path.curve_mode.validated()?;
        let contour = self.open_contour("bezier_to")?;
        let Some(p0) = contour.last() else {
            return Err(DrawError::invalid_path("bezier_to on an empty contour"));
        };
        let mut pts = Vec::new();
        flatten_cubic(p0, c1, c2, p, mode, &mut pts);
        contour.extend(pts);
        self.pen = Some(p);
        self.curve_window.clear();
        Ok(())
    }

    pub fn quad_bezier_to(&mut self, ctrl: Vec3, p: Vec3) {
        recover(self.try_quad_bezier_to(ctrl, p));
    }

    pub fn try_quad_bezier_to(&mut self, ctrl: Vec3, p: Vec3) -> DrawResult<()> {
        let Some(p0) = self.pen.filter(|_| self.state != ContourState::Empty) else {
            return Err(DrawError::invalid_path("quad_bezier_to before move_to"));
        };
        let c1 = p0 + (ctrl - p0) * (2.0 / 3.0);
        let c2 = p + (ctrl - p) * (2.0 / 3.0);
        self.try_bezier_to(c1, c2, p)
    }

    /// Catmull-Rom step.
    ///
    /// Control points accumulate in a window of four; once full, the span
    /// between the middle two is appended (joined to the pen with a line if
    /// needed) and the window slides by one. Any other command resets it, so
    /// a smooth run is `curve_to` repeated, with the first and last points
    /// acting only as tangent anchors.
    pub fn curve_to(&mut self, p: Vec3) {
        recover(self.try_curve_to(p));
    }

    pub fn try_curve_to(&mut self, p: Vec3) -> DrawResult<()> {
        check_finite(&[p])?;
        let segments = match self.path.curve_mode {
            CurveMode::Fixed { segments } => segments,
            CurveMode::Adaptive { .. } => tessellate::DEFAULT_CURVE_RESOLUTION,
        };
        // Validate state before touching the window.
        self.open_contour("curve_to")?;

        self.curve_window.push(p);
        if self.curve_window.len() < 4 {
            return Ok(());
        }
        let [p0, p1, p2, p3] = [0, 1, 2, 3].map(|i| self.curve_window[i]);
        self.curve_window.remove(0);

        let contour = self.open_contour("curve_to")?;
        contour.push(p1);
        let mut pts = Vec::new();
        flatten_catmull_span(p0, p1, p2, p3, segments, &mut pts);
        contour.extend(pts);
        self.pen = Some(p2);
        Ok(())
    }

    /// Counter-clockwise arc (increasing angle) around `center`.
    ///
    /// An `end_deg` below `start_deg` wraps once around. With no current
    /// contour the arc starts one at its first point; otherwise a line joins
    /// the pen to the arc.
    pub fn arc(&mut self, center: Vec3, radii: Vec2, start_deg: f32, end_deg: f32) {
        recover(self.try_arc(center, radii, start_deg, end_deg, false));
    }

    /// Clockwise counterpart of [`PathBuilder::arc`].
    pub fn arc_negative(&mut self, center: Vec3, radii: Vec2, start_deg: f32, end_deg: f32) {
        recover(self.try_arc(center, radii, start_deg, end_deg, true));
    }

    pub fn try_arc(
        &mut self,
        center: Vec3,
        radii: Vec2,
        start_deg: f32,
        end_deg: f32,
        clockwise: bool,
    ) -> DrawResult<()> {
        let mut sweep = end_deg - start_deg;
        if clockwise && sweep > 0.0 {
            sweep -= 360.0;
        } else if !clockwise && sweep < 0.0 {
            sweep += 360.0;
        }
        let segments = segments_for_sweep(self.path.circle_resolution, sweep);
        let pts = tessellate::try_arc(center, radii, start_deg, start_deg + sweep, segments)?;
        let (Some(&first), Some(&last)) = (pts.first(), pts.last()) else {
            return Ok(());
        };

        if self.state == ContourState::Empty {
            self.move_to(first);
        }
        let contour = self.open_contour("arc")?;
        let skip = contour.last().is_some_and(|pen| pen.distance_squared(first) <= 1e-12);
        contour.extend(pts.into_iter().skip(usize::from(skip)));
        self.pen = Some(last);
        self.curve_window.clear();
        Ok(())
    }

    /// Closes the current contour and returns the pen to its start.
    pub fn close(&mut self) {
        recover(self.try_close());
    }

    pub fn try_close(&mut self) -> DrawResult<()> {
        match self.state {
            ContourState::Empty => Err(DrawError::invalid_path("close before move_to")),
            ContourState::Closed => Ok(()),
            ContourState::Open => {
                let Some(contour) = self.path.contours.last_mut() else {
                    return Err(DrawError::invalid_path("close without a contour"));
                };
                contour.close();
                self.pen = contour.first();
                self.state = ContourState::Closed;
                self.curve_window.clear();
                Ok(())
            }
        }
    }

    // ── shapes ────────────────────────────────────────────────────────────

    /// Adds a closed axis-aligned rectangle contour.
    pub fn rectangle(&mut self, r: Rect) {
        let r = r.normalized();
        let (lo, hi) = (r.min(), r.max());
        self.move_to(lo.extend(0.0));
        self.line_to(Vec3::new(hi.x, lo.y, 0.0));
        self.line_to(hi.extend(0.0));
        self.line_to(Vec3::new(lo.x, hi.y, 0.0));
        self.close();
    }

    /// Adds a closed rectangle with quarter-ellipse corners.
    ///
    /// Radii are clamped so opposite corners never overlap; a zero radius
    /// gives a sharp corner.
    pub fn rounded_rectangle(&mut self, r: Rect, radii: CornerRadii) {
        let r = r.normalized();
        let radii = radii.clamped_to(r.width(), r.height());
        if radii.is_square(1e-6) {
            self.rectangle(r);
            return;
        }
        let (lo, hi) = (r.min(), r.max());

        // Corners in increasing-angle order: (center, radius, start angle).
        let corners = [
            (Vec2::new(hi.x - radii.top_right, lo.y + radii.top_right), radii.top_right, 270.0),
            (Vec2::new(hi.x - radii.bottom_right, hi.y - radii.bottom_right), radii.bottom_right, 0.0),
            (Vec2::new(lo.x + radii.bottom_left, hi.y - radii.bottom_left), radii.bottom_left, 90.0),
            (Vec2::new(lo.x + radii.top_left, lo.y + radii.top_left), radii.top_left, 180.0),
        ];

        self.move_to(Vec3::new(lo.x + radii.top_left, lo.y, 0.0));
        for (center, radius, start) in corners {
            if radius > 0.0 {
                self.arc(center.extend(0.0), Vec2::splat(radius), start, start + 90.0);
            } else {
                self.line_to(center.extend(0.0));
            }
        }
        self.close();
    }

    /// Adds a closed ellipse contour at the configured circle resolution.
    pub fn ellipse(&mut self, center: Vec3, radii: Vec2) {
        let pts = tessellate::circle_points(center, radii, self.path.circle_resolution);
        let Some(&first) = pts.first() else {
            return;
        };
        self.move_to(first);
        if let Some(c) = self.path.contours.last_mut() {
            c.extend(pts.into_iter().skip(1));
        }
        self.close();
    }

    #[inline]
    pub fn circle(&mut self, center: Vec3, radius: f32) {
        self.ellipse(center, Vec2::splat(radius));
    }

    /// The contour drawing commands append to, starting a new one after a
    /// close.
    fn open_contour(&mut self, op: &str) -> DrawResult<&mut Contour> {
        match self.state {
            ContourState::Empty => {
                return Err(DrawError::invalid_path(format!("{op} before move_to")));
            }
            ContourState::Closed => {
                let start = self.pen.unwrap_or(Vec3::ZERO);
                let mut c = Contour::new();
                c.push(start);
                self.path.contours.push(c);
                self.state = ContourState::Open;
            }
            ContourState::Open => {}
        }
        self.path
            .contours
            .last_mut()
            .ok_or_else(|| DrawError::invalid_path(format!("{op} without a contour")))
    }
}

fn check_finite(pts: &[Vec3]) -> DrawResult<()> {
    if pts.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(DrawError::invalid_path("path point is not finite"))
    }
}
