use crate::coords::Viewport;
use crate::input::InputEvent;
use crate::time::FrameTime;

use super::ctx::RenderContext;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`super::FrameLoop`].
///
/// Per tick the loop calls `input` for each queued event, then `update`,
/// then `draw`. `setup` runs once before the first tick, followed by
/// `resized` with the initial viewport.
pub trait App {
    fn setup(&mut self) {}

    /// Called for every event, after the loop's `InputState` has seen it.
    fn input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    fn update(&mut self, time: FrameTime) -> AppControl {
        let _ = time;
        AppControl::Continue
    }

    /// Records this frame's drawing.
    fn draw(&mut self, ctx: &mut RenderContext);

    fn resized(&mut self, viewport: Viewport) {
        let _ = viewport;
    }
}
