use glam::{Mat4, Quat, Vec3};

use crate::error::{DrawError, DrawResult, StackKind, recover};

/// Stack of model transforms.
///
/// Invariant: the stack always holds at least one entry (the base entry), so
/// [`TransformStack::current`] is always defined.
///
/// `translate`/`rotate`/`scale` right-multiply the top matrix, so successive
/// calls compose in child-relative order: `translate(10, 0, 0)` followed by
/// `scale(2, 2, 2)` scales geometry first and then moves it.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self { stack: vec![Mat4::IDENTITY] }
    }

    /// Clears to a single identity entry. Keeps allocated capacity.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.stack[0] = Mat4::IDENTITY;
    }

    /// Top-of-stack matrix.
    #[inline]
    pub fn current(&self) -> Mat4 {
        self.stack[self.stack.len() - 1]
    }

    /// Number of pushes above the base entry.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Duplicates the top entry.
    #[inline]
    pub fn push_matrix(&mut self) {
        let top = self.current();
        self.stack.push(top);
    }

    /// Removes the top entry and returns it.
    ///
    /// Fails with `StackImbalance` when only the base entry is left; the stack
    /// is unchanged in that case.
    pub fn try_pop_matrix(&mut self) -> DrawResult<Mat4> {
        if self.stack.len() <= 1 {
            return Err(DrawError::imbalance(
                StackKind::Transform,
                "pop_matrix without matching push_matrix",
            ));
        }
        Ok(self.stack.pop().unwrap_or(Mat4::IDENTITY))
    }

    /// Restores the previous matrix. An unmatched pop is logged and ignored.
    #[inline]
    pub fn pop_matrix(&mut self) {
        recover(self.try_pop_matrix());
    }

    #[inline]
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    /// Rotates by `angle_deg` degrees around `axis`.
    ///
    /// A zero-length axis leaves the matrix untouched.
    pub fn rotate(&mut self, angle_deg: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            log::debug!("rotate: zero-length axis ignored");
            return;
        }
        self.multiply(Mat4::from_axis_angle(axis, angle_deg.to_radians()));
    }

    #[inline]
    pub fn rotate_x(&mut self, angle_deg: f32) {
        self.multiply(Mat4::from_rotation_x(angle_deg.to_radians()));
    }

    #[inline]
    pub fn rotate_y(&mut self, angle_deg: f32) {
        self.multiply(Mat4::from_rotation_y(angle_deg.to_radians()));
    }

    /// Rotation in the 2D drawing plane.
    #[inline]
    pub fn rotate_z(&mut self, angle_deg: f32) {
        self.multiply(Mat4::from_rotation_z(angle_deg.to_radians()));
    }

    #[inline]
    pub fn rotate_quat(&mut self, q: Quat) {
        self.multiply(Mat4::from_quat(q.normalize()));
    }

    #[inline]
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(Mat4::from_scale(Vec3::new(x, y, z)));
    }

    /// Right-multiplies the top entry by `m`.
    #[inline]
    pub fn multiply(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top *= m;
    }

    /// Replaces the top entry.
    #[inline]
    pub fn load_matrix(&mut self, m: Mat4) {
        *self.top_mut() = m;
    }

    #[inline]
    pub fn load_identity(&mut self) {
        self.load_matrix(Mat4::IDENTITY);
    }

    /// Maps a point through the top entry.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.current().transform_point3(p)
    }

    #[inline]
    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    // ── push / pop ────────────────────────────────────────────────────────

    #[test]
    fn new_stack_is_identity_at_depth_zero() {
        let s = TransformStack::new();
        assert_eq!(s.current(), Mat4::IDENTITY);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn pop_restores_previous_matrix() {
        let mut s = TransformStack::new();
        s.translate(1.0, 2.0, 3.0);
        let before = s.current();
        s.push_matrix();
        s.rotate_z(45.0);
        s.scale(3.0, 3.0, 3.0);
        s.pop_matrix();
        assert_eq!(s.current(), before);
    }

    #[test]
    fn unmatched_pop_leaves_stack_unchanged() {
        let mut s = TransformStack::new();
        s.translate(5.0, 0.0, 0.0);
        let before = s.current();
        s.pop_matrix();
        assert_eq!(s.current(), before);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn try_pop_on_base_entry_is_imbalance() {
        let mut s = TransformStack::new();
        let err = s.try_pop_matrix().unwrap_err();
        assert!(matches!(err, DrawError::StackImbalance { stack: StackKind::Transform, .. }));
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut s = TransformStack::new();
        s.push_matrix();
        s.push_matrix();
        s.translate(1.0, 1.0, 1.0);
        s.reset();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.current(), Mat4::IDENTITY);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn inner_scale_is_discarded_by_pop() {
        let mut s = TransformStack::new();
        s.push_matrix();
        s.translate(10.0, 0.0, 0.0);
        s.push_matrix();
        s.scale(2.0, 2.0, 2.0);
        s.pop_matrix();
        s.translate(5.0, 0.0, 0.0);

        let (scale, _rot, translation) = s.current().to_scale_rotation_translation();
        assert!(translation.abs_diff_eq(Vec3::new(15.0, 0.0, 0.0), EPS));
        assert!(scale.abs_diff_eq(Vec3::ONE, EPS));
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn calls_compose_child_relative() {
        let mut s = TransformStack::new();
        s.translate(10.0, 0.0, 0.0);
        s.scale(2.0, 2.0, 2.0);
        // Scale applies first, then the translation.
        let p = s.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(12.0, 2.0, 0.0), EPS));
    }

    #[test]
    fn rotate_z_turns_x_into_y() {
        let mut s = TransformStack::new();
        s.rotate_z(90.0);
        let p = s.transform_point(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn rotate_with_zero_axis_is_noop() {
        let mut s = TransformStack::new();
        s.rotate(30.0, Vec3::ZERO);
        assert_eq!(s.current(), Mat4::IDENTITY);
    }

    #[test]
    fn load_identity_only_touches_top() {
        let mut s = TransformStack::new();
        s.translate(3.0, 0.0, 0.0);
        let base = s.current();
        s.push_matrix();
        s.load_identity();
        assert_eq!(s.current(), Mat4::IDENTITY);
        s.pop_matrix();
        assert_eq!(s.current(), base);
    }

    // ── properties ────────────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Translate(f32, f32, f32),
        RotateZ(f32),
        Scale(f32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
                .prop_map(|(x, y, z)| Op::Translate(x, y, z)),
            (-360.0f32..360.0).prop_map(Op::RotateZ),
            (0.1f32..4.0).prop_map(Op::Scale),
        ]
    }

    fn apply(s: &mut TransformStack, op: &Op) {
        match *op {
            Op::Translate(x, y, z) => s.translate(x, y, z),
            Op::RotateZ(a) => s.rotate_z(a),
            Op::Scale(k) => s.scale(k, k, k),
        }
    }

    proptest! {
        #[test]
        fn balanced_push_pop_restores_top(
            setup in prop::collection::vec(op(), 0..8),
            nested in prop::collection::vec(op(), 1..16),
        ) {
            let mut s = TransformStack::new();
            for o in &setup {
                apply(&mut s, o);
            }
            let before = s.current();

            for o in &nested {
                s.push_matrix();
                apply(&mut s, o);
            }
            for _ in &nested {
                s.pop_matrix();
            }

            prop_assert!(s.current().abs_diff_eq(before, 1e-4));
            prop_assert_eq!(s.depth(), 0);
        }
    }
}
