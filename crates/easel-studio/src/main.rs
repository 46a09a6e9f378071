use std::sync::Arc;

use anyhow::Context;
use easel_engine::camera::OrbitCamera;
use easel_engine::config::EngineConfig;
use easel_engine::coords::{CornerRadii, Rect, Viewport};
use easel_engine::core::{App, AppControl, FrameLoop, RenderContext};
use easel_engine::input::{ButtonState, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta};
use easel_engine::logging::{LoggingConfig, init_logging};
use easel_engine::mesh::{MeshBuffer, primitives};
use easel_engine::paint::Color;
use easel_engine::path::{Path, PathBuilder};
use easel_engine::render::LoggingBackend;
use easel_engine::style::BlendMode;
use easel_engine::time::FrameTime;
use glam::{Vec2, Vec3};

const DEFAULT_FRAMES: u64 = 240;
const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

/// Headless showcase: a 2D overlay plus an orbiting 3D scene, driven by a
/// scripted pointer instead of a window.
struct Showcase {
    camera: OrbitCamera,
    sphere: Arc<MeshBuffer>,
    cube: Arc<MeshBuffer>,
    floor: Arc<MeshBuffer>,
    spire: Arc<MeshBuffer>,
    globe: Arc<MeshBuffer>,
    badge: Path,
    spin: f32,
    elapsed: f64,
}

impl Showcase {
    fn new(config: &EngineConfig) -> Self {
        Self {
            camera: OrbitCamera::from_config(&config.camera),
            sphere: Arc::new(primitives::uv_sphere(40.0, 24)),
            cube: Arc::new(primitives::cuboid(50.0, 50.0, 50.0)),
            floor: Arc::new(primitives::plane(400.0, 400.0, 8, 8)),
            spire: Arc::new(primitives::cone(25.0, 70.0, 24, 1, true)),
            globe: Arc::new(primitives::icosphere(30.0, 2).to_wireframe()),
            badge: badge(config),
            spin: 0.0,
            elapsed: 0.0,
        }
    }
}

/// Rounded badge with a Bézier swoosh and an arc notch, stroked and filled.
fn badge(config: &EngineConfig) -> Path {
    let mut b = PathBuilder::new();
    b.set_curve_mode(config.tessellation.curve_mode())
        .set_circle_resolution(config.tessellation.circle_resolution)
        .set_fill_color(Color::from_hex(0x2d7dd2, 1.0))
        .set_stroke_color(Color::WHITE)
        .set_stroke_width(2.0);

    b.rounded_rectangle(Rect::new(0.0, 0.0, 180.0, 64.0), CornerRadii::all(12.0));

    b.move_to(Vec3::new(20.0, 44.0, 0.0));
    b.bezier_to(Vec3::new(60.0, 4.0, 0.0), Vec3::new(110.0, 70.0, 0.0), Vec3::new(160.0, 20.0, 0.0));
    b.arc(Vec3::new(160.0, 32.0, 0.0), Vec2::splat(12.0), 270.0, 450.0);
    b.close();

    b.into_path()
}

impl App for Showcase {
    fn setup(&mut self) {
        self.camera.set_orientation(30.0, -20.0);
        self.camera.fit_to_bounds(Vec3::new(-200.0, -40.0, -200.0), Vec3::new(200.0, 80.0, 200.0));
        log::info!(
            "showcase ready: camera at {:.1} looking at {:.1}",
            self.camera.eye_position(),
            self.camera.target()
        );
    }

    fn input(&mut self, event: &InputEvent) -> AppControl {
        if let InputEvent::Key { key: Key::Escape, state: ButtonState::Pressed, .. } = event {
            return AppControl::Exit;
        }
        self.camera.handle_input(event);
        AppControl::Continue
    }

    fn update(&mut self, time: FrameTime) -> AppControl {
        self.camera.update();
        self.spin = (self.spin + 45.0 * time.dt) % 360.0;
        self.elapsed = time.elapsed;
        AppControl::Continue
    }

    fn draw(&mut self, ctx: &mut RenderContext) {
        let (sphere, cube, floor) = (self.sphere.clone(), self.cube.clone(), self.floor.clone());
        let (spire, globe) = (self.spire.clone(), self.globe.clone());
        let spin = self.spin;

        ctx.with_camera(&mut self.camera, |ctx| {
            ctx.push_style();
            ctx.set_color(Color::from_gray8(90, 255));
            ctx.push_matrix();
            ctx.rotate(-90.0, Vec3::X);
            ctx.draw_shared_mesh(floor);
            ctx.pop_matrix();

            ctx.set_color(Color::from_hex(0xf4a259, 1.0));
            ctx.push_matrix();
            ctx.translate(-80.0, 40.0, 0.0);
            ctx.draw_shared_mesh(sphere);
            ctx.pop_matrix();

            ctx.set_color(Color::from_hex(0x5b8e7d, 1.0));
            ctx.push_matrix();
            ctx.translate(80.0, 25.0, 0.0);
            ctx.rotate(spin, Vec3::Y);
            ctx.draw_shared_mesh(cube);
            ctx.pop_matrix();

            ctx.set_color(Color::from_hex(0xd7263d, 1.0));
            ctx.push_matrix();
            ctx.translate(0.0, 35.0, -90.0);
            ctx.draw_shared_mesh(spire);
            ctx.pop_matrix();

            ctx.set_color(Color::WHITE.with_alpha(0.6));
            ctx.push_matrix();
            ctx.translate(0.0, 120.0, 0.0);
            ctx.rotate(-spin, Vec3::Y);
            ctx.draw_shared_mesh(globe);
            ctx.pop_matrix();
            ctx.pop_style();
        });

        // Screen-space overlay.
        ctx.push_style();
        ctx.set_blend_mode(BlendMode::Alpha);
        ctx.set_color_rgba8(0, 0, 0, 160);
        ctx.draw_rect_rounded(Rect::new(16.0, 16.0, 260.0, 96.0), CornerRadii::all(8.0));

        ctx.push_matrix();
        ctx.translate(56.0, 32.0, 0.0);
        ctx.draw_path(&self.badge);
        ctx.pop_matrix();

        ctx.set_fill(false);
        ctx.set_stroke_width(3.0);
        ctx.set_color(Color::WHITE.with_alpha(0.8));
        let pulse = 10.0 + 4.0 * (self.elapsed as f32 * 3.0).sin();
        ctx.draw_circle(Vec3::new(36.0, 64.0, 0.0), pulse);
        ctx.draw_polyline(
            &[
                Vec3::new(16.0, 700.0, 0.0),
                Vec3::new(200.0, 680.0, 0.0),
                Vec3::new(400.0, 700.0, 0.0),
            ],
            false,
        );
        ctx.pop_style();
    }

    fn resized(&mut self, viewport: Viewport) {
        self.camera.set_viewport(viewport);
    }
}

/// Scripted pointer: orbit, pan, then zoom, one gesture per second.
fn scripted_input(frame: u64) -> Vec<InputEvent> {
    let mods = Modifiers::default();
    let pointer = |button, state, x, y| InputEvent::PointerButton {
        button,
        state,
        position: Vec2::new(x, y),
        modifiers: mods,
    };
    let at = |x: f32, y: f32| InputEvent::PointerMoved { position: Vec2::new(x, y) };

    let (gesture, step) = ((frame / 60) % 3, frame % 60);
    let drag_button = match gesture {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        _ => MouseButton::Right,
    };
    match step {
        0 => vec![pointer(drag_button, ButtonState::Pressed, 640.0, 360.0)],
        1..=20 => vec![at(640.0 + step as f32 * 6.0, 360.0 - step as f32 * 2.0)],
        21 => vec![pointer(drag_button, ButtonState::Released, 760.0, 320.0)],
        40 => vec![InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: mods,
        }],
        _ => Vec::new(),
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let frames = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid frame count {n:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let config = load_config(config_path.as_deref())?;
    init_logging(LoggingConfig::from(&config.logging));
    let config = config.sanitized();

    let mut app = Showcase::new(&config);
    let mut frame_loop = FrameLoop::from_config(LoggingBackend::new(), VIEWPORT, &config);

    for frame in 0..frames {
        for event in scripted_input(frame) {
            frame_loop.push_event(event);
        }
        if frame_loop.tick(&mut app) == AppControl::Exit {
            break;
        }
    }

    let stats = frame_loop.backend().last_stats();
    log::info!(
        "{} frame(s) submitted; last frame: {} command(s) in {} batch(es), {} vertices, {} primitives",
        frame_loop.backend().frames(),
        stats.commands,
        stats.batches,
        stats.vertices,
        stats.primitives,
    );
    log::info!(
        "camera ended at yaw {:.1}°, pitch {:.1}°, distance {:.1}",
        app.camera.yaw(),
        app.camera.pitch(),
        app.camera.distance()
    );
    Ok(())
}
