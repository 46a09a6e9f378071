use std::time::Instant;

use crate::config::EngineConfig;
use crate::coords::Viewport;
use crate::input::{InputEvent, InputState};
use crate::render::RenderBackend;
use crate::time::{FrameClock, FrameTime};

use super::app::{App, AppControl};
use super::ctx::{FrameReport, RenderContext, RenderSettings};

/// Drives an [`App`] one frame at a time and hands each frame's commands to
/// a backend.
///
/// Per tick: clock → queued input → `update` → `begin_frame` → `draw` →
/// `end_frame` → `submit` → list reset. The host owns the actual event loop
/// and calls [`FrameLoop::tick`] from it.
pub struct FrameLoop<B: RenderBackend> {
    backend: B,
    ctx: RenderContext,
    clock: FrameClock,
    input: InputState,
    pending: Vec<InputEvent>,
    viewport: Viewport,
    started: bool,
    last_report: FrameReport,
}

impl<B: RenderBackend> FrameLoop<B> {
    pub fn new(backend: B, viewport: Viewport, settings: RenderSettings) -> Self {
        Self {
            backend,
            ctx: RenderContext::new(settings),
            clock: FrameClock::new(),
            input: InputState::new(),
            pending: Vec::new(),
            viewport,
            started: false,
            last_report: FrameReport::default(),
        }
    }

    pub fn from_config(backend: B, viewport: Viewport, config: &EngineConfig) -> Self {
        Self::new(backend, viewport, RenderSettings::from(config))
    }

    /// Replaces the clock, e.g. with one started at a fixed instant.
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    #[inline]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.clock.frame_index()
    }

    /// Queues an event for the next tick.
    pub fn push_event(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn tick<A: App + ?Sized>(&mut self, app: &mut A) -> AppControl {
        self.tick_at(app, Instant::now())
    }

    /// One frame with an explicit timestamp.
    pub fn tick_at<A: App + ?Sized>(&mut self, app: &mut A, now: Instant) -> AppControl {
        if !self.started {
            self.started = true;
            app.setup();
            app.resized(self.viewport);
        }

        let time = self.clock.tick_at(now);
        let mut control = self.dispatch_input(app);

        if app.update(time) == AppControl::Exit {
            control = AppControl::Exit;
        }

        self.render(app, time);
        self.input.end_frame();
        control
    }

    /// Ticks until the app exits or `max_frames` frames ran. Returns the
    /// number of frames run.
    pub fn run_frames<A: App + ?Sized>(&mut self, app: &mut A, max_frames: u64) -> u64 {
        for n in 1..=max_frames {
            if self.tick(app) == AppControl::Exit {
                log::info!("app requested exit after {n} frame(s)");
                return n;
            }
        }
        max_frames
    }

    fn dispatch_input<A: App + ?Sized>(&mut self, app: &mut A) -> AppControl {
        let mut control = AppControl::Continue;
        for event in std::mem::take(&mut self.pending) {
            self.input.apply_event(&event);
            if let InputEvent::Resized(viewport) = event {
                if viewport.is_valid() {
                    self.viewport = viewport;
                    app.resized(viewport);
                } else {
                    log::warn!("ignoring resize to {}x{}", viewport.width, viewport.height);
                }
            }
            if app.input(&event) == AppControl::Exit {
                control = AppControl::Exit;
            }
        }
        control
    }

    fn render<A: App + ?Sized>(&mut self, app: &mut A, time: FrameTime) {
        self.ctx.begin_frame(self.viewport);
        if self.ctx.settings().auto_clear {
            let background = self.ctx.settings().background;
            self.ctx.clear(background);
        }

        app.draw(&mut self.ctx);

        let report = self.ctx.end_frame();
        if !report.is_balanced() {
            log::warn!("frame {} ended unbalanced: {report:?}", time.frame_index);
        }
        log::trace!("frame {} recorded {} command(s)", time.frame_index, report.commands);
        self.last_report = report;

        self.ctx.submit_to(&mut self.backend);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;

    use super::*;
    use crate::coords::Rect;
    use crate::input::{ButtonState, Key, Modifiers};
    use crate::render::LoggingBackend;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        resizes: Vec<Viewport>,
        shapes: usize,
        exit_on_escape: bool,
        leave_push_open: bool,
    }

    impl App for Recorder {
        fn setup(&mut self) {
            self.calls.push("setup");
        }

        fn input(&mut self, event: &InputEvent) -> AppControl {
            self.calls.push("input");
            match event {
                InputEvent::Key { key: Key::Escape, state: ButtonState::Pressed, .. }
                    if self.exit_on_escape =>
                {
                    AppControl::Exit
                }
                _ => AppControl::Continue,
            }
        }

        fn update(&mut self, _time: FrameTime) -> AppControl {
            self.calls.push("update");
            AppControl::Continue
        }

        fn draw(&mut self, ctx: &mut RenderContext) {
            self.calls.push("draw");
            for i in 0..self.shapes {
                ctx.draw_rect(Rect::new(i as f32 * 10.0, 0.0, 8.0, 8.0));
            }
            if self.leave_push_open {
                ctx.push_matrix();
            }
        }

        fn resized(&mut self, viewport: Viewport) {
            self.calls.push("resized");
            self.resizes.push(viewport);
        }
    }

    fn frame_loop() -> FrameLoop<LoggingBackend> {
        let start = Instant::now();
        FrameLoop::new(LoggingBackend::new(), Viewport::new(640.0, 480.0), RenderSettings::default())
            .with_clock(FrameClock::starting_at(
                start,
                Duration::from_micros(100),
                Duration::from_millis(250),
            ))
    }

    #[test]
    fn first_tick_runs_setup_then_the_frame_phases() {
        let mut fl = frame_loop();
        let mut app = Recorder::default();
        fl.push_event(InputEvent::PointerMoved { position: Vec2::new(1.0, 1.0) });
        fl.tick(&mut app);
        assert_eq!(app.calls, ["setup", "resized", "input", "update", "draw"]);
        assert_eq!(app.resizes, [Viewport::new(640.0, 480.0)]);

        fl.tick(&mut app);
        assert_eq!(&app.calls[5..], ["update", "draw"]);
    }

    #[test]
    fn each_frame_submits_and_resets_the_list() {
        let mut fl = frame_loop();
        let mut app = Recorder { shapes: 3, ..Recorder::default() };
        fl.tick(&mut app);
        fl.tick(&mut app);

        let stats = fl.backend().last_stats();
        // Auto clear plus three rectangles.
        assert_eq!(stats.commands, 4);
        assert_eq!(stats.clears, 1);
        assert_eq!(stats.meshes, 3);
        assert_eq!(fl.backend().frames(), 2);
        assert_eq!(fl.context().command_count(), 0);
    }

    #[test]
    fn auto_clear_can_be_disabled() {
        let settings = RenderSettings { auto_clear: false, ..RenderSettings::default() };
        let mut fl = FrameLoop::new(LoggingBackend::new(), Viewport::new(10.0, 10.0), settings);
        let mut app = Recorder { shapes: 2, ..Recorder::default() };
        fl.tick(&mut app);
        assert_eq!(fl.backend().last_stats().commands, 2);
    }

    #[test]
    fn resize_event_reaches_app_and_next_frame() {
        let mut fl = frame_loop();
        let mut app = Recorder::default();
        fl.tick(&mut app);
        fl.push_event(InputEvent::Resized(Viewport::new(1024.0, 768.0)));
        fl.push_event(InputEvent::Resized(Viewport::new(0.0, 768.0)));
        fl.tick(&mut app);

        assert_eq!(fl.viewport(), Viewport::new(1024.0, 768.0));
        assert_eq!(fl.context().viewport(), Viewport::new(1024.0, 768.0));
        assert_eq!(app.resizes.last(), Some(&Viewport::new(1024.0, 768.0)));
    }

    #[test]
    fn app_exit_stops_run_frames() {
        let mut fl = frame_loop();
        let mut app = Recorder { exit_on_escape: true, ..Recorder::default() };
        fl.push_event(InputEvent::Key {
            key: Key::Escape,
            state: ButtonState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        assert_eq!(fl.run_frames(&mut app, 10), 1);
    }

    #[test]
    fn unbalanced_frame_is_reported_and_next_is_clean() {
        let mut fl = frame_loop();
        let mut app = Recorder { leave_push_open: true, ..Recorder::default() };
        fl.tick(&mut app);
        assert_eq!(fl.last_report().transform_depth, 1);

        app.leave_push_open = false;
        fl.tick(&mut app);
        assert!(fl.last_report().is_balanced());
    }

    #[test]
    fn per_frame_input_is_cleared_after_tick() {
        let mut fl = frame_loop();
        let mut app = Recorder::default();
        fl.push_event(InputEvent::PointerMoved { position: Vec2::ZERO });
        fl.push_event(InputEvent::PointerMoved { position: Vec2::new(3.0, 4.0) });
        fl.tick(&mut app);
        assert_eq!(fl.input_state().pointer_delta, Vec2::ZERO);
        assert_eq!(fl.input_state().pointer_pos, Some(Vec2::new(3.0, 4.0)));
    }
}
