use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::CameraConfig;
use crate::coords::Viewport;
use crate::error::{DrawError, DrawResult, StackKind, recover};
use crate::input::{ButtonState, InputEvent, MouseButton};
use crate::transform::TransformStack;

/// Pitch is kept inside ±this many degrees so the view never flips over a pole.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Orbit degrees per dragged pixel at sensitivity 1.
const ORBIT_DEG_PER_PX: f32 = 0.3;
/// Fraction of the distance covered per dragged pixel in zoom mode.
const ZOOM_PER_PX: f32 = 0.01;
/// Fraction of the distance covered per wheel line.
const ZOOM_PER_LINE: f32 = 0.1;

/// What a pointer drag currently drives.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CameraMode {
    #[default]
    Idle,
    Orbiting,
    Zooming,
    Panning,
}

/// Camera orbiting a target point, Y up.
///
/// The eye sits at `target + distance * dir(yaw, pitch)` where yaw 0 and
/// pitch 0 look down -Z from the +Z side. Angles are in degrees.
///
/// The projection is cached and recomputed by the setters that affect it;
/// the view is cheap and derived on demand.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    yaw_deg: f32,
    pitch_deg: f32,

    fov_deg: f32,
    near: f32,
    far: f32,
    aspect: f32,
    viewport: Viewport,
    ortho: bool,
    projection: Mat4,

    min_distance: f32,
    max_distance: Option<f32>,
    rotation_sensitivity: f32,
    translation_sensitivity: f32,

    mode: CameraMode,
    inertia: bool,
    drag: f32,
    stop_threshold: f32,
    velocity: Vec2,
    coasting: bool,
    drag_button: Option<MouseButton>,
    last_pointer: Option<Vec2>,

    /// Transform-stack depth right after `begin` pushed.
    begin_depth: Option<usize>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a camera from (already sanitized) configuration.
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut cam = Self {
            target: Vec3::ZERO,
            distance: config.distance,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            fov_deg: config.fov_deg,
            near: config.near,
            far: config.far,
            aspect: 1.0,
            viewport: Viewport::default(),
            ortho: false,
            projection: Mat4::IDENTITY,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            rotation_sensitivity: config.rotation_sensitivity,
            translation_sensitivity: config.translation_sensitivity,
            mode: CameraMode::Idle,
            inertia: config.inertia,
            drag: config.drag,
            stop_threshold: config.stop_threshold,
            velocity: Vec2::ZERO,
            coasting: false,
            drag_button: None,
            last_pointer: None,
            begin_depth: None,
        };
        cam.set_distance(config.distance);
        cam.update_projection();
        cam
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw_deg
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch_deg
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_deg
    }

    #[inline]
    pub fn near_far(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// True while inertia keeps moving the camera after a drag ended.
    #[inline]
    pub fn is_coasting(&self) -> bool {
        self.coasting
    }

    /// True between `begin` and `end`.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.begin_depth.is_some()
    }

    pub fn set_target(&mut self, target: Vec3) {
        if target.is_finite() {
            self.target = target;
        } else {
            DrawError::camera(format!("non-finite target {target}")).report();
        }
    }

    /// Sets the eye distance, clamped to `[min_distance, max_distance]`.
    ///
    /// Non-positive requests land on `min_distance`; non-finite ones keep
    /// the current distance. Both are logged.
    pub fn set_distance(&mut self, distance: f32) {
        if !distance.is_finite() {
            DrawError::camera(format!("non-finite distance {distance}")).report();
            return;
        }
        if distance <= 0.0 {
            DrawError::camera(format!(
                "distance {distance} clamped to {}",
                self.min_distance
            ))
            .report();
        }
        let mut d = distance.max(self.min_distance);
        if let Some(max) = self.max_distance {
            d = d.min(max);
        }
        self.distance = d;
        if self.ortho {
            self.update_projection();
        }
    }

    pub fn set_distance_limits(&mut self, min: f32, max: Option<f32>) {
        if !(min.is_finite() && min > 0.0) || max.is_some_and(|m| !(m > min)) {
            DrawError::camera(format!("distance limits {min}..{max:?}")).report();
            return;
        }
        self.min_distance = min;
        self.max_distance = max;
        self.set_distance(self.distance);
    }

    pub fn set_orientation(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw_deg = 0.0;
        self.pitch_deg = 0.0;
        self.orbit(yaw_deg, pitch_deg);
    }

    pub fn set_sensitivity(&mut self, rotation: f32, translation: f32) {
        if rotation > 0.0 && translation > 0.0 {
            self.rotation_sensitivity = rotation;
            self.translation_sensitivity = translation;
        }
    }

    pub fn set_inertia(&mut self, enabled: bool) {
        self.inertia = enabled;
        if !enabled {
            self.stop_coasting();
        }
    }

    // ── motion ────────────────────────────────────────────────────────────

    /// Rotates around the target. Pitch is clamped to ±[`PITCH_LIMIT_DEG`].
    pub fn orbit(&mut self, delta_yaw_deg: f32, delta_pitch_deg: f32) {
        if !(delta_yaw_deg.is_finite() && delta_pitch_deg.is_finite()) {
            return;
        }
        self.yaw_deg = (self.yaw_deg + delta_yaw_deg).rem_euclid(360.0);
        self.pitch_deg = (self.pitch_deg + delta_pitch_deg).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Adds `delta` to the distance; positive moves away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    /// Moves the target along the camera's right and up axes, in world units.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let (right, up) = self.right_up();
        self.set_target(self.target + right * delta_x + up * delta_y);
    }

    /// Centers the target on the box and backs off until its bounding
    /// sphere fits the vertical field of view.
    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3) {
        if !(min.is_finite() && max.is_finite()) {
            DrawError::camera("non-finite bounds").report();
            return;
        }
        self.set_target((min + max) * 0.5);
        let radius = (max - min).length() * 0.5;
        if radius > 0.0 {
            let half_fov = (self.fov_deg * 0.5).to_radians();
            self.set_distance(radius / half_fov.sin());
        }
    }

    // ── projection parameters ─────────────────────────────────────────────

    /// Fails with `CameraDegenerate` unless `0 < near < far`; the previous
    /// planes are kept in that case.
    pub fn try_set_near_far(&mut self, near: f32, far: f32) -> DrawResult<()> {
        if !(near.is_finite() && far.is_finite() && near > 0.0 && far > near) {
            return Err(DrawError::camera(format!("clip planes near {near}, far {far}")));
        }
        self.near = near;
        self.far = far;
        self.update_projection();
        Ok(())
    }

    pub fn set_near_far(&mut self, near: f32, far: f32) {
        recover(self.try_set_near_far(near, far));
    }

    pub fn try_set_fov(&mut self, fov_deg: f32) -> DrawResult<()> {
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(DrawError::camera(format!("field of view {fov_deg}°")));
        }
        self.fov_deg = fov_deg;
        self.update_projection();
        Ok(())
    }

    pub fn set_fov(&mut self, fov_deg: f32) {
        recover(self.try_set_fov(fov_deg));
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if !(aspect.is_finite() && aspect > 0.0) {
            DrawError::camera(format!("aspect ratio {aspect}")).report();
            return;
        }
        self.aspect = aspect;
        self.update_projection();
    }

    /// Resize hook: adopts the viewport's aspect ratio and refreshes the
    /// cached projection. Degenerate viewports are ignored.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        match viewport.aspect_ratio() {
            Some(aspect) => {
                self.viewport = viewport;
                self.aspect = aspect;
                self.update_projection();
            }
            None => DrawError::camera(format!(
                "viewport {}x{}",
                viewport.width, viewport.height
            ))
            .report(),
        }
    }

    /// Orthographic projection sized to show what the perspective one shows
    /// at the target distance.
    pub fn set_ortho(&mut self, ortho: bool) {
        self.ortho = ortho;
        self.update_projection();
    }

    #[inline]
    pub fn is_ortho(&self) -> bool {
        self.ortho
    }

    fn update_projection(&mut self) {
        let half_fov = (self.fov_deg * 0.5).to_radians();
        self.projection = if self.ortho {
            let hh = self.distance * half_fov.tan();
            let hw = hh * self.aspect;
            Mat4::orthographic_rh(-hw, hw, -hh, hh, self.near, self.far)
        } else {
            Mat4::perspective_rh(half_fov * 2.0, self.aspect, self.near, self.far)
        };
    }

    // ── matrices ──────────────────────────────────────────────────────────

    fn direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw_deg.to_radians().sin_cos();
        let (sp, cp) = self.pitch_deg.to_radians().sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    fn right_up(&self) -> (Vec3, Vec3) {
        let forward = -self.direction();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        (right, up)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// `projection * view`: maps world space to clip space.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Projects a world point to viewport pixels (top-left origin).
    ///
    /// `z` carries the depth in `[0, 1]`. Returns `None` for points behind
    /// the eye or when no valid viewport has been set.
    pub fn world_to_screen(&self, world: Vec3) -> Option<Vec3> {
        if !self.viewport.is_valid() {
            return None;
        }
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc.y) * 0.5 * self.viewport.height,
            ndc.z,
        ))
    }

    /// Inverse of [`OrbitCamera::world_to_screen`]; `screen.z` is the depth.
    pub fn screen_to_world(&self, screen: Vec3) -> Option<Vec3> {
        if !self.viewport.is_valid() {
            return None;
        }
        let ndc = Vec4::new(
            screen.x / self.viewport.width * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.height * 2.0,
            screen.z,
            1.0,
        );
        let world = self.view_projection().inverse() * ndc;
        (world.w.abs() > f32::EPSILON).then(|| world.truncate() / world.w)
    }

    // ── transform stack bracket ───────────────────────────────────────────

    /// Pushes the transform stack and replaces its top with
    /// [`OrbitCamera::view_projection`]. A second `begin` before `end` is
    /// logged and ignored.
    pub fn begin(&mut self, transforms: &mut TransformStack) {
        if self.is_active() {
            log::warn!("camera begin while already active; ignored");
            return;
        }
        transforms.push_matrix();
        transforms.load_matrix(self.view_projection());
        self.begin_depth = Some(transforms.depth());
    }

    /// Restores the transform that was current at `begin`.
    ///
    /// Pushes left open inside the bracket are reported and unwound first.
    pub fn try_end(&mut self, transforms: &mut TransformStack) -> DrawResult<()> {
        let Some(depth) = self.begin_depth.take() else {
            return Err(DrawError::imbalance(StackKind::Camera, "end without matching begin"));
        };
        if transforms.depth() < depth {
            return Err(DrawError::imbalance(
                StackKind::Camera,
                "camera matrix was popped before end",
            ));
        }
        if transforms.depth() > depth {
            DrawError::imbalance(
                StackKind::Transform,
                format!("{} push(es) left open inside camera", transforms.depth() - depth),
            )
            .report();
            while transforms.depth() > depth {
                transforms.try_pop_matrix()?;
            }
        }
        transforms.try_pop_matrix()?;
        Ok(())
    }

    pub fn end(&mut self, transforms: &mut TransformStack) {
        recover(self.try_end(transforms));
    }

    /// Forgets an open `begin` without touching any stack.
    ///
    /// Used when the owning frame resets its stacks wholesale.
    pub(crate) fn abandon(&mut self) -> bool {
        self.begin_depth.take().is_some()
    }

    // ── interaction ───────────────────────────────────────────────────────

    /// Starts a drag in `mode`. Cancels any coasting.
    pub fn begin_interaction(&mut self, mode: CameraMode) {
        self.stop_coasting();
        self.mode = mode;
        self.velocity = Vec2::ZERO;
    }

    /// Applies a pointer delta in pixels to the current mode.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if self.mode == CameraMode::Idle || self.coasting {
            return;
        }
        let delta = Vec2::new(dx, dy);
        if !delta.is_finite() {
            return;
        }
        self.apply(self.mode, delta);
        self.velocity = delta;
    }

    /// Ends the drag. With inertia on, the last drag velocity keeps
    /// decaying through [`OrbitCamera::update`]; otherwise the camera is
    /// idle immediately.
    pub fn end_interaction(&mut self) {
        self.drag_button = None;
        self.last_pointer = None;
        if self.inertia && self.mode != CameraMode::Idle && self.is_moving() {
            self.coasting = true;
        } else {
            self.stop_coasting();
        }
    }

    /// Advances inertia by one frame.
    pub fn update(&mut self) {
        if !self.coasting {
            return;
        }
        self.velocity *= self.drag;
        if self.is_moving() {
            self.apply(self.mode, self.velocity);
        } else {
            self.stop_coasting();
        }
    }

    /// Feeds a platform event into the interaction state machine.
    ///
    /// Left drag orbits, middle drag pans, right drag zooms, the wheel
    /// zooms. Resizes update the viewport. Returns true when the event
    /// moved or reconfigured the camera.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerButton { button, state: ButtonState::Pressed, position, .. } => {
                let mode = match button {
                    MouseButton::Left => CameraMode::Orbiting,
                    MouseButton::Middle => CameraMode::Panning,
                    MouseButton::Right => CameraMode::Zooming,
                    MouseButton::Other(_) => return false,
                };
                self.begin_interaction(mode);
                self.drag_button = Some(button);
                self.last_pointer = Some(position);
                true
            }
            InputEvent::PointerButton { button, state: ButtonState::Released, .. } => {
                if self.drag_button != Some(button) {
                    return false;
                }
                self.end_interaction();
                true
            }
            InputEvent::PointerMoved { position } => {
                let last = self.last_pointer.replace(position);
                match last {
                    Some(last) if self.drag_button.is_some() => {
                        let d = position - last;
                        self.drag(d.x, d.y);
                        true
                    }
                    _ => false,
                }
            }
            InputEvent::MouseWheel { delta, .. } => {
                let lines = delta.lines().y;
                if lines == 0.0 {
                    return false;
                }
                self.zoom(-lines * self.distance * ZOOM_PER_LINE * self.translation_sensitivity);
                true
            }
            InputEvent::Resized(viewport) => {
                self.set_viewport(viewport);
                true
            }
            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                if self.drag_button.is_none() {
                    return false;
                }
                self.end_interaction();
                true
            }
            InputEvent::Key { .. } | InputEvent::Focused(true) => false,
        }
    }

    fn apply(&mut self, mode: CameraMode, delta: Vec2) {
        match mode {
            CameraMode::Idle => {}
            CameraMode::Orbiting => {
                let k = ORBIT_DEG_PER_PX * self.rotation_sensitivity;
                self.orbit(-delta.x * k, delta.y * k);
            }
            CameraMode::Panning => {
                let k = self.world_per_pixel() * self.translation_sensitivity;
                self.pan(-delta.x * k, delta.y * k);
            }
            CameraMode::Zooming => {
                self.zoom(delta.y * self.distance * ZOOM_PER_PX * self.translation_sensitivity);
            }
        }
    }

    /// World units covered by one pixel at the target depth.
    fn world_per_pixel(&self) -> f32 {
        if self.viewport.is_valid() {
            2.0 * self.distance * (self.fov_deg * 0.5).to_radians().tan() / self.viewport.height
        } else {
            self.distance * 0.001
        }
    }

    fn is_moving(&self) -> bool {
        self.velocity.abs().max_element() > self.stop_threshold
    }

    fn stop_coasting(&mut self) {
        self.coasting = false;
        self.velocity = Vec2::ZERO;
        self.mode = CameraMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, MouseWheelDelta};

    fn cam() -> OrbitCamera {
        let mut c = OrbitCamera::new();
        c.set_viewport(Viewport::new(800.0, 600.0));
        c
    }

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton {
            button,
            state: ButtonState::Pressed,
            position: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton {
            button,
            state: ButtonState::Released,
            position: Vec2::ZERO,
            modifiers: Modifiers::default(),
        }
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn default_eye_sits_on_positive_z() {
        let c = cam();
        assert!(c.eye_position().abs_diff_eq(Vec3::new(0.0, 0.0, 100.0), 1e-4));
        assert_eq!(c.mode(), CameraMode::Idle);
    }

    #[test]
    fn yaw_there_and_back_restores_view() {
        let mut c = cam();
        c.orbit(20.0, 30.0);
        let before = c.view_matrix();
        c.orbit(90.0, 0.0);
        assert!(!c.view_matrix().abs_diff_eq(before, 1e-3));
        c.orbit(-90.0, 0.0);
        assert!(c.view_matrix().abs_diff_eq(before, 1e-4));
    }

    #[test]
    fn negative_distance_is_clamped_positive() {
        let mut c = cam();
        c.set_distance(-50.0);
        assert!(c.distance() > 0.0);
        c.zoom(-1e6);
        assert!(c.distance() > 0.0);
        c.set_distance(f32::NAN);
        assert!(c.distance() > 0.0);
    }

    #[test]
    fn pitch_is_clamped_at_the_poles() {
        let mut c = cam();
        c.orbit(0.0, 500.0);
        assert_eq!(c.pitch(), PITCH_LIMIT_DEG);
        c.orbit(0.0, -1000.0);
        assert_eq!(c.pitch(), -PITCH_LIMIT_DEG);
        assert!(c.view_matrix().is_finite());
    }

    #[test]
    fn max_distance_caps_zoom_out() {
        let mut c = cam();
        c.set_distance_limits(1.0, Some(200.0));
        c.zoom(1000.0);
        assert_eq!(c.distance(), 200.0);
    }

    #[test]
    fn pan_moves_target_in_view_plane() {
        let mut c = cam();
        c.pan(3.0, 4.0);
        assert!(c.target().abs_diff_eq(Vec3::new(3.0, 4.0, 0.0), 1e-4));
        assert!(c.eye_position().abs_diff_eq(Vec3::new(3.0, 4.0, 100.0), 1e-4));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn near_not_below_far_is_rejected() {
        let mut c = cam();
        let before = c.projection_matrix();
        assert!(matches!(
            c.try_set_near_far(10.0, 5.0),
            Err(DrawError::CameraDegenerate { .. })
        ));
        c.set_near_far(-1.0, 5.0);
        assert_eq!(c.near_far(), (0.1, 10_000.0));
        assert_eq!(c.projection_matrix(), before);
    }

    #[test]
    fn viewport_updates_aspect_and_projection() {
        let mut c = cam();
        let before = c.projection_matrix();
        c.set_viewport(Viewport::new(400.0, 400.0));
        assert_eq!(c.aspect_ratio(), 1.0);
        assert_ne!(c.projection_matrix(), before);

        c.set_viewport(Viewport::new(0.0, 400.0));
        assert_eq!(c.viewport(), Viewport::new(400.0, 400.0));
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let mut c = cam();
        c.set_near_far(1.0, 500.0);
        c.orbit(35.0, -20.0);
        c.set_target(Vec3::new(5.0, -2.0, 1.0));
        let s = c.world_to_screen(c.target()).unwrap();
        assert!(s.truncate().abs_diff_eq(Vec2::new(400.0, 300.0), 1e-2));

        let back = c.screen_to_world(s).unwrap();
        assert!(back.abs_diff_eq(c.target(), 1e-2));
    }

    #[test]
    fn points_behind_the_eye_do_not_project() {
        let c = cam();
        assert_eq!(c.world_to_screen(Vec3::new(0.0, 0.0, 200.0)), None);
    }

    #[test]
    fn fit_to_bounds_keeps_box_on_screen() {
        let mut c = cam();
        c.fit_to_bounds(Vec3::new(-10.0, -10.0, -10.0), Vec3::new(30.0, 10.0, 10.0));
        assert!(c.target().abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-5));
        for corner in [Vec3::new(-10.0, -10.0, 10.0), Vec3::new(30.0, 10.0, 10.0)] {
            let s = c.world_to_screen(corner).unwrap();
            assert!(s.x >= 0.0 && s.x <= 800.0 && s.y >= 0.0 && s.y <= 600.0);
        }
    }

    #[test]
    fn ortho_projection_is_affine() {
        let mut c = cam();
        c.set_ortho(true);
        assert!(c.is_ortho());
        assert_eq!(c.projection_matrix().row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    // ── begin / end ───────────────────────────────────────────────────────

    #[test]
    fn begin_end_restores_transform() {
        let mut c = cam();
        let mut t = TransformStack::new();
        t.translate(5.0, 0.0, 0.0);
        let outer = t.current();

        c.begin(&mut t);
        assert_eq!(t.current(), c.view_projection());
        t.translate(1.0, 2.0, 3.0);
        c.end(&mut t);

        assert_eq!(t.current(), outer);
        assert_eq!(t.depth(), 0);
        assert!(!c.is_active());
    }

    #[test]
    fn end_without_begin_is_an_imbalance() {
        let mut c = cam();
        let mut t = TransformStack::new();
        assert!(matches!(
            c.try_end(&mut t),
            Err(DrawError::StackImbalance { stack: StackKind::Camera, .. })
        ));
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn double_begin_is_ignored() {
        let mut c = cam();
        let mut t = TransformStack::new();
        c.begin(&mut t);
        c.begin(&mut t);
        assert_eq!(t.depth(), 1);
        c.end(&mut t);
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn end_unwinds_pushes_left_inside() {
        let mut c = cam();
        let mut t = TransformStack::new();
        c.begin(&mut t);
        t.push_matrix();
        t.push_matrix();
        assert!(c.try_end(&mut t).is_ok());
        assert_eq!(t.depth(), 0);
        assert_eq!(t.current(), Mat4::IDENTITY);
    }

    // ── interaction ───────────────────────────────────────────────────────

    #[test]
    fn drag_without_inertia_stops_immediately() {
        let mut c = cam();
        c.set_inertia(false);
        c.begin_interaction(CameraMode::Orbiting);
        c.drag(10.0, 0.0);
        let yaw = c.yaw();
        assert_ne!(yaw, 0.0);
        c.end_interaction();
        assert_eq!(c.mode(), CameraMode::Idle);
        c.update();
        assert_eq!(c.yaw(), yaw);
    }

    #[test]
    fn inertia_decays_back_to_idle() {
        let mut c = cam();
        c.begin_interaction(CameraMode::Orbiting);
        c.drag(20.0, 0.0);
        c.end_interaction();
        assert!(c.is_coasting());
        assert_eq!(c.mode(), CameraMode::Orbiting);

        let yaw = c.yaw();
        c.update();
        assert_ne!(c.yaw(), yaw);

        let mut frames = 0;
        while c.is_coasting() {
            c.update();
            frames += 1;
            assert!(frames < 1000, "inertia never settled");
        }
        assert_eq!(c.mode(), CameraMode::Idle);
    }

    #[test]
    fn new_drag_cancels_coasting() {
        let mut c = cam();
        c.begin_interaction(CameraMode::Panning);
        c.drag(5.0, 5.0);
        c.end_interaction();
        c.begin_interaction(CameraMode::Zooming);
        assert!(!c.is_coasting());
        assert_eq!(c.mode(), CameraMode::Zooming);
    }

    #[test]
    fn left_drag_orbits_through_events() {
        let mut c = cam();
        assert!(c.handle_input(&press(MouseButton::Left, 100.0, 100.0)));
        assert_eq!(c.mode(), CameraMode::Orbiting);
        assert!(c.handle_input(&InputEvent::PointerMoved { position: Vec2::new(110.0, 100.0) }));
        assert!(c.yaw() > 180.0);
        assert!(c.handle_input(&release(MouseButton::Left)));
        assert!(c.is_coasting());
    }

    #[test]
    fn middle_drag_pans_by_screen_distance() {
        let mut c = cam();
        c.set_inertia(false);
        c.handle_input(&press(MouseButton::Middle, 0.0, 0.0));
        c.handle_input(&InputEvent::PointerMoved { position: Vec2::new(-100.0, 0.0) });
        // The target follows the grab: dragging left moves the view right.
        assert!(c.target().x > 0.0);
        assert_eq!(c.target().y, 0.0);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut c = cam();
        let d = c.distance();
        c.handle_input(&InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        });
        assert!(c.distance() < d);
    }

    #[test]
    fn hover_does_not_move_camera() {
        let mut c = cam();
        assert!(!c.handle_input(&InputEvent::PointerMoved { position: Vec2::new(1.0, 1.0) }));
        assert!(!c.handle_input(&InputEvent::PointerMoved { position: Vec2::new(50.0, 9.0) }));
        assert_eq!(c.yaw(), 0.0);
    }

    #[test]
    fn resize_event_reaches_projection() {
        let mut c = cam();
        c.handle_input(&InputEvent::Resized(Viewport::new(1000.0, 500.0)));
        assert_eq!(c.aspect_ratio(), 2.0);
    }
}
