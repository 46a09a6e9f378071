/// Per-corner radii for a rounded rectangle (logical pixels).
///
/// Corners follow CSS convention: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    /// No rounding.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    /// Radii limited to `[0, max]`, where `max` is half the shorter side.
    pub fn clamped_to(self, width: f32, height: f32) -> Self {
        let max = (width.abs().min(height.abs()) * 0.5).max(0.0);
        let c = |r: f32| if r.is_finite() { r.clamp(0.0, max) } else { 0.0 };
        Self::new(c(self.top_left), c(self.top_right), c(self.bottom_right), c(self.bottom_left))
    }

    /// True when every corner is (close to) square.
    #[inline]
    pub fn is_square(self, epsilon: f32) -> bool {
        self.top_left < epsilon
            && self.top_right < epsilon
            && self.bottom_right < epsilon
            && self.bottom_left < epsilon
    }
}
