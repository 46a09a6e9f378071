use super::{BlendMode, Style};
use crate::error::{DrawError, DrawResult, StackKind, recover};
use crate::paint::Color;

/// Stack of style records, mirroring [`crate::transform::TransformStack`].
///
/// Setters only touch the top entry; `push_style` duplicates it so a nested
/// block can change anything and `pop_style` puts all of it back.
#[derive(Debug, Clone)]
pub struct StyleStack {
    stack: Vec<Style>,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleStack {
    pub fn new() -> Self {
        Self { stack: vec![Style::default()] }
    }

    /// Clears to a single default entry. Keeps allocated capacity.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.stack[0] = Style::default();
    }

    #[inline]
    pub fn current(&self) -> Style {
        self.stack[self.stack.len() - 1]
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    #[inline]
    pub fn push_style(&mut self) {
        let top = self.current();
        self.stack.push(top);
    }

    pub fn try_pop_style(&mut self) -> DrawResult<Style> {
        if self.stack.len() <= 1 {
            return Err(DrawError::imbalance(
                StackKind::Style,
                "pop_style without matching push_style",
            ));
        }
        Ok(self.stack.pop().unwrap_or_default())
    }

    /// Restores the previous style. An unmatched pop is logged and ignored.
    #[inline]
    pub fn pop_style(&mut self) {
        recover(self.try_pop_style());
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.top_mut().color = color.clamped();
    }

    #[inline]
    pub fn set_fill(&mut self, fill: bool) {
        self.top_mut().fill = fill;
    }

    /// Negative or non-finite widths become 0.
    pub fn set_stroke_width(&mut self, width: f32) {
        let width = if width.is_finite() && width >= 0.0 {
            width
        } else {
            log::warn!("set_stroke_width: invalid width {width}, using 0");
            0.0
        };
        self.top_mut().stroke_width = width;
    }

    #[inline]
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.top_mut().blend_mode = mode;
    }

    #[inline]
    fn top_mut(&mut self) -> &mut Style {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}
