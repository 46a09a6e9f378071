use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use crate::camera::OrbitCamera;
use crate::config::EngineConfig;
use crate::coords::{CornerRadii, Rect, Viewport};
use crate::error::{DrawError, StackKind};
use crate::mesh::{MeshBuffer, PrimitiveMode};
use crate::paint::Color;
use crate::path::{
    Contour, DEFAULT_JOIN_THRESHOLD_DEG, Path, PathBuilder, StrokeParams, fill_contours,
    stroke_contours,
};
use crate::render::RenderBackend;
use crate::scene::DrawList;
use crate::style::{BlendMode, StyleStack};
use crate::tessellate::{CurveMode, DEFAULT_CIRCLE_RESOLUTION};
use crate::transform::TransformStack;

/// Depth range of the pixel projection used outside a camera.
const SCREEN_DEPTH: f32 = 1000.0;

/// Tessellation and frame settings a [`RenderContext`] applies to its shapes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderSettings {
    pub circle_resolution: u32,
    pub curve_mode: CurveMode,
    pub join_threshold_deg: f32,
    /// Record a clear at the start of every frame.
    pub auto_clear: bool,
    pub background: Color,
    pub command_capacity: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            circle_resolution: DEFAULT_CIRCLE_RESOLUTION,
            curve_mode: CurveMode::default(),
            join_threshold_deg: DEFAULT_JOIN_THRESHOLD_DEG,
            auto_clear: true,
            background: Color::from_gray8(60, 255),
            command_capacity: 256,
        }
    }
}

impl From<&EngineConfig> for RenderSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            circle_resolution: config.tessellation.circle_resolution,
            curve_mode: config.tessellation.curve_mode(),
            join_threshold_deg: config.tessellation.join_threshold_deg,
            auto_clear: config.frame.auto_clear,
            background: config.frame.background_color(),
            command_capacity: config.frame.command_capacity,
        }
    }
}

/// What [`RenderContext::end_frame`] found.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameReport {
    pub commands: usize,
    /// Transform pushes left open at frame end, not counting the one held by
    /// an open camera.
    pub transform_depth: usize,
    /// Style pushes left open at frame end.
    pub style_depth: usize,
    /// A camera `begin` was never matched by `end`.
    pub camera_open: bool,
}

impl FrameReport {
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.transform_depth == 0 && self.style_depth == 0 && !self.camera_open
    }
}

/// Per-frame drawing state: transform and style stacks plus the command
/// list they feed.
///
/// Every `draw_*` call snapshots the current transform and style into one
/// command. Matrices are recorded in clip space: outside a camera the base
/// transform is the viewport's pixel projection (top-left origin, +Y down).
///
/// Contexts are plain values; any number can coexist.
#[derive(Debug)]
pub struct RenderContext {
    transforms: TransformStack,
    styles: StyleStack,
    list: DrawList,
    settings: RenderSettings,
    viewport: Viewport,
    in_frame: bool,
    camera_open: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl RenderContext {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            transforms: TransformStack::new(),
            styles: StyleStack::new(),
            list: DrawList::with_capacity(settings.command_capacity),
            settings,
            viewport: Viewport::default(),
            in_frame: false,
            camera_open: false,
        }
    }

    #[inline]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    #[inline]
    pub fn transforms_mut(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }

    #[inline]
    pub fn styles(&self) -> &StyleStack {
        &self.styles
    }

    #[inline]
    pub fn styles_mut(&mut self) -> &mut StyleStack {
        &mut self.styles
    }

    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    #[inline]
    pub fn command_count(&self) -> usize {
        self.list.command_count()
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    /// Resets both stacks and the command list for a new frame.
    pub fn begin_frame(&mut self, viewport: Viewport) {
        if self.in_frame {
            log::warn!("begin_frame without end_frame; previous frame discarded");
        }
        self.viewport = viewport;
        self.transforms.reset();
        self.transforms.load_matrix(screen_projection(viewport));
        self.styles.reset();
        self.list.reset();
        self.camera_open = false;
        self.in_frame = true;
    }

    /// Closes the frame. Leftover pushes are reported as `StackImbalance`
    /// and unwound so the next frame starts clean; recorded commands are
    /// untouched.
    pub fn end_frame(&mut self) -> FrameReport {
        if !self.in_frame {
            log::warn!("end_frame without begin_frame");
        }
        self.in_frame = false;

        let depth = self.transforms.depth();
        let report = FrameReport {
            commands: self.list.command_count(),
            transform_depth: depth.saturating_sub(usize::from(self.camera_open)),
            style_depth: self.styles.depth(),
            camera_open: self.camera_open,
        };

        if report.camera_open {
            DrawError::imbalance(StackKind::Camera, "camera begin without end at frame end")
                .report();
            self.camera_open = false;
        }
        if report.transform_depth > 0 {
            DrawError::imbalance(
                StackKind::Transform,
                format!("{} push_matrix left open at frame end", report.transform_depth),
            )
            .report();
        }
        if depth > 0 {
            while self.transforms.try_pop_matrix().is_ok() {}
        }
        if report.style_depth > 0 {
            DrawError::imbalance(
                StackKind::Style,
                format!("{} push_style left open at frame end", report.style_depth),
            )
            .report();
            while self.styles.try_pop_style().is_ok() {}
        }
        report
    }

    /// Lends the recorded list to `backend`, then resets it.
    pub fn submit_to<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        backend.submit(&self.list);
        self.list.reset();
    }

    // ── transform passthroughs ────────────────────────────────────────────

    #[inline]
    pub fn push_matrix(&mut self) {
        self.transforms.push_matrix();
    }

    #[inline]
    pub fn pop_matrix(&mut self) {
        self.transforms.pop_matrix();
    }

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.transforms.translate(x, y, z);
    }

    #[inline]
    pub fn rotate(&mut self, angle_deg: f32, axis: Vec3) {
        self.transforms.rotate(angle_deg, axis);
    }

    #[inline]
    pub fn rotate_z(&mut self, angle_deg: f32) {
        self.transforms.rotate_z(angle_deg);
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.transforms.scale(x, y, z);
    }

    // ── style passthroughs ────────────────────────────────────────────────

    #[inline]
    pub fn push_style(&mut self) {
        self.styles.push_style();
    }

    #[inline]
    pub fn pop_style(&mut self) {
        self.styles.pop_style();
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.styles.set_color(color);
    }

    /// 0–255 entry point; stored as `[0, 1]` floats.
    #[inline]
    pub fn set_color_rgba8(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.styles.set_color(Color::from_rgba8(r, g, b, a));
    }

    #[inline]
    pub fn set_fill(&mut self, fill: bool) {
        self.styles.set_fill(fill);
    }

    #[inline]
    pub fn set_stroke_width(&mut self, width: f32) {
        self.styles.set_stroke_width(width);
    }

    #[inline]
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.styles.set_blend_mode(mode);
    }

    // ── camera ────────────────────────────────────────────────────────────

    /// Switches subsequent draws to `camera`'s view-projection.
    pub fn begin_camera(&mut self, camera: &mut OrbitCamera) {
        if camera.is_active() && !self.camera_open {
            // Left open by an earlier frame whose stacks were reset since.
            camera.abandon();
        }
        if camera.is_active() {
            log::warn!("camera begin while already active; ignored");
            return;
        }
        if self.viewport.is_valid() && camera.viewport() != self.viewport {
            camera.set_viewport(self.viewport);
        }
        camera.begin(&mut self.transforms);
        self.camera_open = true;
    }

    pub fn end_camera(&mut self, camera: &mut OrbitCamera) {
        camera.end(&mut self.transforms);
        self.camera_open = camera.is_active();
    }

    /// Runs `draw` between [`RenderContext::begin_camera`] and
    /// [`RenderContext::end_camera`].
    pub fn with_camera<R>(
        &mut self,
        camera: &mut OrbitCamera,
        draw: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.begin_camera(camera);
        let out = draw(self);
        self.end_camera(camera);
        out
    }

    // ── recording ─────────────────────────────────────────────────────────

    pub fn clear(&mut self, color: Color) {
        self.list.push_clear(color.clamped());
    }

    pub fn set_viewport(&mut self, rect: Rect) {
        self.list.push_viewport(rect.normalized());
    }

    /// Records `mesh` with the current transform and style. The mesh is
    /// copied, so the caller may keep editing it.
    pub fn draw_mesh(&mut self, mesh: &MeshBuffer) {
        self.list.push_mesh(mesh, self.transforms.current(), self.styles.current());
    }

    /// Like [`RenderContext::draw_mesh`] for geometry shared across frames.
    pub fn draw_shared_mesh(&mut self, mesh: Arc<MeshBuffer>) {
        self.list.push_shared_mesh(mesh, self.transforms.current(), self.styles.current());
    }

    /// Records `path` with the current transform. Paint comes from the path.
    pub fn draw_path(&mut self, path: &Path) {
        self.list.push_path(path, self.transforms.current());
    }

    /// A path builder preset with this context's tessellation settings and
    /// the current style's colors.
    pub fn path_builder(&self) -> PathBuilder {
        let style = self.styles.current();
        let mut path = Path::new();
        path.join_threshold_deg = self.settings.join_threshold_deg;
        let mut builder = PathBuilder::from_path(path);
        builder
            .set_curve_mode(self.settings.curve_mode)
            .set_circle_resolution(self.settings.circle_resolution)
            .set_filled(style.fill)
            .set_fill_color(style.color)
            .set_stroke_color(style.color);
        if !style.fill {
            builder.set_stroke_width(style.stroke_width);
        }
        builder
    }

    pub fn draw_rect(&mut self, rect: Rect) {
        let mut b = self.path_builder();
        b.rectangle(rect);
        self.draw_shape(b.path().contours());
    }

    pub fn draw_rect_rounded(&mut self, rect: Rect, radii: CornerRadii) {
        let mut b = self.path_builder();
        b.rounded_rectangle(rect, radii);
        self.draw_shape(b.path().contours());
    }

    pub fn draw_circle(&mut self, center: Vec3, radius: f32) {
        self.draw_ellipse(center, Vec2::splat(radius));
    }

    pub fn draw_ellipse(&mut self, center: Vec3, radii: Vec2) {
        if !(radii.is_finite() && radii.x > 0.0 && radii.y > 0.0) {
            DrawError::invalid_path(format!("ellipse radii {radii}")).report();
            return;
        }
        let mut b = self.path_builder();
        b.ellipse(center, radii);
        self.draw_shape(b.path().contours());
    }

    pub fn draw_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let tri = Contour::from_points(vec![a, b, c, a], true);
        self.draw_shape(std::slice::from_ref(&tri));
    }

    /// Always outlined, whatever the fill flag says.
    pub fn draw_line(&mut self, from: Vec3, to: Vec3) {
        let line = Contour::from_points(vec![from, to], false);
        self.draw_outline(std::slice::from_ref(&line));
    }

    /// Outlines `points`; `closed` adds the segment back to the start.
    pub fn draw_polyline(&mut self, points: &[Vec3], closed: bool) {
        if points.len() < 2 {
            DrawError::invalid_path(format!("polyline with {} point(s)", points.len())).report();
            return;
        }
        let mut pts = points.to_vec();
        if closed {
            pts.push(points[0]);
        }
        let line = Contour::from_points(pts, closed);
        self.draw_outline(std::slice::from_ref(&line));
    }

    /// Fills or outlines according to the current style.
    fn draw_shape(&mut self, contours: &[Contour]) {
        if self.styles.current().fill {
            let mesh = fill_contours(contours);
            self.record(mesh);
        } else {
            self.draw_outline(contours);
        }
    }

    /// Stroke ribbon at the style's width; zero width draws hairlines.
    fn draw_outline(&mut self, contours: &[Contour]) {
        let width = self.styles.current().stroke_width;
        let mesh = if width > 0.0 {
            stroke_contours(
                contours,
                StrokeParams {
                    width,
                    join_threshold_deg: self.settings.join_threshold_deg,
                    circle_resolution: self.settings.circle_resolution,
                },
            )
        } else {
            hairlines(contours)
        };
        self.record(mesh);
    }

    fn record(&mut self, mesh: MeshBuffer) {
        if mesh.is_empty() {
            log::debug!("degenerate shape produced no geometry; not recorded");
            return;
        }
        self.list.push_shared_mesh(
            Arc::new(mesh),
            self.transforms.current(),
            self.styles.current(),
        );
    }
}

/// Maps logical pixels (top-left origin, +Y down) to clip space.
fn screen_projection(viewport: Viewport) -> Mat4 {
    if !viewport.is_valid() {
        log::warn!("invalid viewport {}x{}; using identity projection", viewport.width, viewport.height);
        return Mat4::IDENTITY;
    }
    Mat4::orthographic_rh(0.0, viewport.width, viewport.height, 0.0, -SCREEN_DEPTH, SCREEN_DEPTH)
}

/// One-pixel line list over every contour segment.
fn hairlines(contours: &[Contour]) -> MeshBuffer {
    let mut mesh = MeshBuffer::new(PrimitiveMode::Lines);
    for c in contours.iter().filter(|c| c.len() >= 2) {
        let base = mesh.num_vertices() as u32;
        mesh.add_vertices(c.points());
        for i in 0..c.len() as u32 - 1 {
            mesh.add_indices(&[base + i, base + i + 1]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LoggingBackend;
    use crate::scene::DrawCmd;
    use crate::style::Style;

    fn ctx() -> RenderContext {
        let mut ctx = RenderContext::default();
        ctx.begin_frame(Viewport::new(800.0, 600.0));
        ctx
    }

    fn mesh_cmds(ctx: &RenderContext) -> Vec<&crate::scene::MeshCmd> {
        ctx.draw_list()
            .iter()
            .filter_map(|c| match c {
                DrawCmd::DrawMesh(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    #[test]
    fn n_draws_make_n_commands() {
        let mut ctx = ctx();
        ctx.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.draw_circle(Vec3::new(50.0, 50.0, 0.0), 5.0);
        ctx.draw_line(Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));
        ctx.draw_triangle(Vec3::ZERO, Vec3::X * 10.0, Vec3::Y * 10.0);
        ctx.draw_path(&Path::new());
        ctx.clear(Color::BLACK);

        let report = ctx.end_frame();
        assert!(report.is_balanced());
        assert_eq!(report.commands, 6);
        assert_eq!(ctx.command_count(), 6);

        ctx.submit_to(&mut LoggingBackend::new());
        assert_eq!(ctx.command_count(), 0);
    }

    #[test]
    fn begin_frame_starts_clean() {
        let mut ctx = ctx();
        ctx.translate(5.0, 0.0, 0.0);
        ctx.set_color(Color::BLACK);
        ctx.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        ctx.end_frame();

        ctx.begin_frame(Viewport::new(800.0, 600.0));
        assert_eq!(ctx.command_count(), 0);
        assert_eq!(ctx.styles().current(), Style::default());
        assert_eq!(ctx.transforms().current(), screen_projection(Viewport::new(800.0, 600.0)));
    }

    #[test]
    fn end_frame_reports_and_unwinds_imbalance() {
        let mut ctx = ctx();
        let base = ctx.transforms().current();
        ctx.push_matrix();
        ctx.push_matrix();
        ctx.translate(1.0, 2.0, 3.0);
        ctx.push_style();

        let report = ctx.end_frame();
        assert!(!report.is_balanced());
        assert_eq!(report.transform_depth, 2);
        assert_eq!(report.style_depth, 1);
        assert_eq!(ctx.transforms().depth(), 0);
        assert_eq!(ctx.transforms().current(), base);
    }

    #[test]
    fn extra_pop_leaves_frame_drawable() {
        let mut ctx = ctx();
        ctx.pop_matrix();
        ctx.pop_style();
        ctx.draw_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(ctx.command_count(), 1);
        assert!(ctx.end_frame().is_balanced());
    }

    // ── snapshots ─────────────────────────────────────────────────────────

    #[test]
    fn commands_snapshot_transform_and_style() {
        let mut ctx = ctx();
        let base = ctx.transforms().current();

        ctx.push_matrix();
        ctx.translate(10.0, 0.0, 0.0);
        ctx.set_color_rgba8(255, 0, 0, 255);
        ctx.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        ctx.pop_matrix();
        ctx.set_color(Color::WHITE);
        ctx.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0));

        let cmds = mesh_cmds(&ctx);
        let local = base.inverse() * cmds[0].transform;
        assert!(local.abs_diff_eq(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)), 1e-4));
        assert_eq!(cmds[0].style.color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(cmds[1].transform, base);
        assert_eq!(cmds[1].style.color, Color::WHITE);
    }

    #[test]
    fn nested_scale_is_discarded_by_pop() {
        let mut ctx = ctx();
        let base = ctx.transforms().current();
        ctx.push_matrix();
        ctx.translate(10.0, 0.0, 0.0);
        ctx.push_matrix();
        ctx.scale(2.0, 2.0, 2.0);
        ctx.pop_matrix();
        ctx.translate(5.0, 0.0, 0.0);

        let local = base.inverse() * ctx.transforms().current();
        let (scale, _, translation) = local.to_scale_rotation_translation();
        assert!(translation.abs_diff_eq(Vec3::new(15.0, 0.0, 0.0), 1e-4));
        assert!(scale.abs_diff_eq(Vec3::ONE, 1e-5));
        ctx.pop_matrix();
    }

    #[test]
    fn pixel_projection_maps_corners_to_clip() {
        let ctx = ctx();
        let m = ctx.transforms().current();
        assert!(m.project_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(-1.0, 1.0, 0.5), 1e-5));
        assert!(
            m.project_point3(Vec3::new(800.0, 600.0, 0.0))
                .abs_diff_eq(Vec3::new(1.0, -1.0, 0.5), 1e-5)
        );
    }

    // ── shapes ────────────────────────────────────────────────────────────

    #[test]
    fn fill_flag_selects_fill_or_outline() {
        let mut ctx = ctx();
        ctx.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.set_fill(false);
        ctx.set_stroke_width(2.0);
        ctx.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.set_stroke_width(0.0);
        ctx.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0));

        let cmds = mesh_cmds(&ctx);
        assert_eq!(cmds[0].mesh.primitive_count(), 2);
        assert!(cmds[1].mesh.num_vertices() > 16);
        let (lo, _) = cmds[1].mesh.bounds().unwrap();
        assert!(lo.x < 0.0 && lo.y < 0.0);
        assert_eq!(cmds[2].mesh.mode(), PrimitiveMode::Lines);
        assert_eq!(cmds[2].mesh.primitive_count(), 4);
    }

    #[test]
    fn circle_uses_configured_resolution() {
        let mut ctx = RenderContext::new(RenderSettings { circle_resolution: 12, ..Default::default() });
        ctx.begin_frame(Viewport::new(100.0, 100.0));
        ctx.draw_circle(Vec3::new(50.0, 50.0, 0.0), 10.0);
        let cmds = mesh_cmds(&ctx);
        assert_eq!(cmds[0].mesh.primitive_count(), 10);
        assert!(cmds[0].mesh.validate().is_ok());
    }

    #[test]
    fn rounded_rect_stays_inside_its_bounds() {
        let mut ctx = ctx();
        ctx.draw_rect_rounded(Rect::new(10.0, 10.0, 100.0, 50.0), CornerRadii::all(8.0));
        let cmds = mesh_cmds(&ctx);
        let (lo, hi) = cmds[0].mesh.bounds().unwrap();
        assert!(lo.abs_diff_eq(Vec3::new(10.0, 10.0, 0.0), 1e-3));
        assert!(hi.abs_diff_eq(Vec3::new(110.0, 60.0, 0.0), 1e-3));
    }

    #[test]
    fn degenerate_shapes_record_nothing() {
        let mut ctx = ctx();
        ctx.draw_circle(Vec3::ZERO, -1.0);
        ctx.draw_polyline(&[Vec3::ZERO], false);
        ctx.draw_triangle(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(ctx.command_count(), 0);
    }

    #[test]
    fn closed_polyline_outlines_the_loop() {
        let mut ctx = ctx();
        ctx.set_stroke_width(0.0);
        let pts = [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 0.0)];
        ctx.draw_polyline(&pts, true);
        assert_eq!(mesh_cmds(&ctx)[0].mesh.primitive_count(), 3);
    }

    #[test]
    fn path_builder_inherits_style() {
        let mut ctx = ctx();
        ctx.set_color(Color::BLACK);
        ctx.set_fill(false);
        ctx.set_stroke_width(3.0);
        let b = ctx.path_builder();
        assert!(!b.path().filled);
        assert_eq!(b.path().stroke_color, Color::BLACK);
        assert_eq!(b.path().stroke_width, 3.0);
    }

    // ── camera ────────────────────────────────────────────────────────────

    #[test]
    fn camera_bracket_records_view_projection() {
        let mut ctx = ctx();
        let mut cam = OrbitCamera::new();
        ctx.with_camera(&mut cam, |ctx| {
            ctx.draw_mesh(&crate::mesh::primitives::cuboid(1.0, 1.0, 1.0));
        });
        assert!(!cam.is_active());
        assert_eq!(cam.viewport(), Viewport::new(800.0, 600.0));

        let cmds = mesh_cmds(&ctx);
        assert_eq!(cmds[0].transform, cam.view_projection());
        assert!(ctx.end_frame().is_balanced());
    }

    #[test]
    fn unmatched_camera_is_reported_and_recovered_next_frame() {
        let mut ctx = ctx();
        let mut cam = OrbitCamera::new();
        ctx.begin_camera(&mut cam);
        let report = ctx.end_frame();
        assert!(report.camera_open);
        // The camera's own push is one imbalance, not two.
        assert_eq!(report.transform_depth, 0);
        assert_eq!(ctx.transforms().depth(), 0);

        ctx.begin_frame(Viewport::new(800.0, 600.0));
        ctx.begin_camera(&mut cam);
        assert_eq!(ctx.transforms().depth(), 1);
        ctx.end_camera(&mut cam);
        assert!(ctx.end_frame().is_balanced());
    }

    #[test]
    fn pushes_inside_an_open_camera_are_counted_separately() {
        let mut ctx = ctx();
        let mut cam = OrbitCamera::new();
        ctx.begin_camera(&mut cam);
        ctx.push_matrix();
        ctx.push_matrix();
        let report = ctx.end_frame();
        assert!(report.camera_open);
        assert_eq!(report.transform_depth, 2);
        assert_eq!(ctx.transforms().depth(), 0);
    }
}
