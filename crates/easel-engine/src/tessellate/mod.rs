//! Curve tessellation.
//!
//! Stateless functions that flatten Bézier curves, circular/elliptical arcs and
//! Catmull-Rom splines into point sequences. All angles are in degrees.
//!
//! Each operation has a `try_*` form that reports unusable input as
//! [`crate::error::DrawError::InvalidPath`]; the plain form logs the error and
//! returns an empty sequence.

use crate::error::{DrawError, DrawResult};

mod arc;
mod bezier;
mod spline;

pub use arc::{arc, circle_points, segments_for_sweep, try_arc};
pub use bezier::{cubic_bezier, flatten_cubic, quadratic_bezier, try_cubic_bezier};
pub use spline::{catmull_rom, flatten_catmull_span, try_catmull_rom};

/// Segments used for a full circle when nothing else is configured.
pub const DEFAULT_CIRCLE_RESOLUTION: u32 = 32;

/// Segments per Bézier or spline span when nothing else is configured.
pub const DEFAULT_CURVE_RESOLUTION: u32 = 20;

/// Adaptive subdivision depth when nothing else is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// Hard cap on adaptive subdivision depth. A span never yields more than
/// `2^MAX_SUBDIVISION_DEPTH` segments.
pub const MAX_SUBDIVISION_DEPTH: u32 = 20;

/// How a curve span is split into line segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CurveMode {
    /// Uniform parameter steps. `segments` is clamped to at least 1.
    Fixed { segments: u32 },

    /// Recursive midpoint subdivision until the control polygon lies within
    /// `tolerance` of the chord, or `max_depth` halvings have been applied.
    Adaptive { tolerance: f32, max_depth: u32 },
}

impl Default for CurveMode {
    fn default() -> Self {
        CurveMode::Fixed { segments: DEFAULT_CURVE_RESOLUTION }
    }
}

impl CurveMode {
    #[inline]
    pub const fn fixed(segments: u32) -> Self {
        CurveMode::Fixed { segments }
    }

    #[inline]
    pub const fn adaptive(tolerance: f32) -> Self {
        CurveMode::Adaptive { tolerance, max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Checks the adaptive tolerance and caps the depth at
    /// [`MAX_SUBDIVISION_DEPTH`].
    pub fn validated(self) -> DrawResult<Self> {
        match self {
            CurveMode::Fixed { .. } => Ok(self),
            CurveMode::Adaptive { tolerance, max_depth } => {
                if !(tolerance.is_finite() && tolerance > 0.0) {
                    return Err(DrawError::invalid_path(format!(
                        "adaptive tolerance must be positive, got {tolerance}"
                    )));
                }
                Ok(CurveMode::Adaptive { tolerance, max_depth: max_depth.min(MAX_SUBDIVISION_DEPTH) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_is_always_valid() {
        assert_eq!(CurveMode::fixed(0).validated().unwrap(), CurveMode::fixed(0));
    }

    #[test]
    fn bad_tolerances_are_rejected() {
        for tolerance in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mode = CurveMode::Adaptive { tolerance, max_depth: 4 };
            assert!(matches!(mode.validated(), Err(DrawError::InvalidPath { .. })), "{tolerance}");
        }
    }

    #[test]
    fn depth_is_capped() {
        let mode = CurveMode::Adaptive { tolerance: 0.5, max_depth: 40 }.validated().unwrap();
        assert_eq!(mode, CurveMode::Adaptive { tolerance: 0.5, max_depth: MAX_SUBDIVISION_DEPTH });
    }
}
