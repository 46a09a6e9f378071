//! Draw-style state: fill flag, color, stroke width and blend mode.

mod stack;

pub use stack::StyleStack;

use crate::paint::Color;

/// Per-pixel compositing function applied when drawing over existing color.
///
/// Backends map these onto their blend-state objects.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Source replaces destination.
    None,
    /// `src.rgb * src.a + dst.rgb * (1 - src.a)`
    #[default]
    Alpha,
    /// `src.rgb + dst.rgb`
    Add,
    /// `src.rgb * dst.rgb`
    Multiply,
    /// `dst.rgb - src.rgb`
    Subtract,
    /// `1 - (1 - src.rgb) * (1 - dst.rgb)`
    Screen,
}

/// One complete style record.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Style {
    /// Fill shapes when true, outline them when false.
    pub fill: bool,
    pub color: Color,
    /// Outline width in logical pixels. Never negative.
    pub stroke_width: f32,
    pub blend_mode: BlendMode,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: true,
            color: Color::WHITE,
            stroke_width: 1.0,
            blend_mode: BlendMode::Alpha,
        }
    }
}
