//! Engine configuration loaded from TOML.
//!
//! Every section falls back to its defaults, so a partial file (or an empty
//! one) is valid. Call [`EngineConfig::sanitized`] before handing values to
//! the engine; it repairs anything that would put a component into a
//! degenerate state.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::paint::Color;
use crate::path::DEFAULT_JOIN_THRESHOLD_DEG;
use crate::tessellate::{
    CurveMode, DEFAULT_CIRCLE_RESOLUTION, DEFAULT_CURVE_RESOLUTION, DEFAULT_MAX_DEPTH,
    MAX_SUBDIVISION_DEPTH,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingSection,
    pub tessellation: TessellationConfig,
    pub camera: CameraConfig,
    pub frame: FrameConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    /// `env_logger` filter, e.g. `"info"` or `"easel_engine=debug"`.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// Segments for a full circle; arcs take a proportional share.
    pub circle_resolution: u32,
    /// Segments per Bézier or spline span in fixed mode.
    pub curve_resolution: u32,
    /// Switches curves to adaptive flattening with this max deviation.
    pub adaptive_tolerance: Option<f32>,
    pub max_subdivision_depth: u32,
    pub join_threshold_deg: f32,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            circle_resolution: DEFAULT_CIRCLE_RESOLUTION,
            curve_resolution: DEFAULT_CURVE_RESOLUTION,
            adaptive_tolerance: None,
            max_subdivision_depth: DEFAULT_MAX_DEPTH,
            join_threshold_deg: DEFAULT_JOIN_THRESHOLD_DEG,
        }
    }
}

impl TessellationConfig {
    pub fn curve_mode(&self) -> CurveMode {
        match self.adaptive_tolerance {
            Some(tolerance) => CurveMode::Adaptive {
                tolerance,
                max_depth: self.max_subdivision_depth,
            },
            None => CurveMode::Fixed { segments: self.curve_resolution },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub min_distance: f32,
    /// `None` leaves zoom-out unbounded.
    pub max_distance: Option<f32>,
    /// Fraction of velocity kept per frame while coasting.
    pub drag: f32,
    pub inertia: bool,
    /// Coasting stops once every velocity component is below this.
    pub stop_threshold: f32,
    pub rotation_sensitivity: f32,
    pub translation_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 0.1,
            far: 10_000.0,
            distance: 100.0,
            min_distance: 1e-3,
            max_distance: None,
            drag: 0.9,
            inertia: true,
            stop_threshold: 1e-3,
            rotation_sensitivity: 1.0,
            translation_sensitivity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Record a `Clear` with `background` at the start of every frame.
    pub auto_clear: bool,
    /// Straight-alpha RGBA in `[0, 1]`.
    pub background: [f32; 4],
    pub command_capacity: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            auto_clear: true,
            background: Color::from_gray8(60, 255).to_array(),
            command_capacity: 256,
        }
    }
}

impl FrameConfig {
    pub fn background_color(&self) -> Color {
        let [r, g, b, a] = self.background;
        Color::new(r, g, b, a).clamped()
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns a copy with out-of-range values replaced by safe ones.
    ///
    /// Each repair is logged at `warn`.
    pub fn sanitized(mut self) -> Self {
        let t = &mut self.tessellation;
        if t.circle_resolution < 3 {
            log::warn!("tessellation.circle_resolution {} raised to 3", t.circle_resolution);
            t.circle_resolution = 3;
        }
        if t.curve_resolution == 0 {
            log::warn!("tessellation.curve_resolution 0 raised to 1");
            t.curve_resolution = 1;
        }
        if let Some(tol) = t.adaptive_tolerance {
            if !(tol.is_finite() && tol > 0.0) {
                log::warn!("tessellation.adaptive_tolerance {tol} ignored; using fixed segments");
                t.adaptive_tolerance = None;
            }
        }
        let depth = t.max_subdivision_depth.clamp(1, MAX_SUBDIVISION_DEPTH);
        if depth != t.max_subdivision_depth {
            log::warn!("tessellation.max_subdivision_depth {} clamped to {depth}", t.max_subdivision_depth);
            t.max_subdivision_depth = depth;
        }
        if !(t.join_threshold_deg.is_finite() && t.join_threshold_deg >= 0.0) {
            log::warn!("tessellation.join_threshold_deg {} reset", t.join_threshold_deg);
            t.join_threshold_deg = DEFAULT_JOIN_THRESHOLD_DEG;
        }

        let defaults = CameraConfig::default();
        let c = &mut self.camera;
        if !(c.fov_deg > 0.0 && c.fov_deg < 180.0) {
            log::warn!("camera.fov_deg {} reset to {}", c.fov_deg, defaults.fov_deg);
            c.fov_deg = defaults.fov_deg;
        }
        if !(c.near.is_finite() && c.near > 0.0) {
            log::warn!("camera.near {} reset to {}", c.near, defaults.near);
            c.near = defaults.near;
        }
        if !(c.far.is_finite() && c.far > c.near) {
            let far = defaults.far.max(c.near * 1000.0);
            log::warn!("camera.far {} not beyond near {}; using {far}", c.far, c.near);
            c.far = far;
        }
        if !(c.min_distance.is_finite() && c.min_distance > 0.0) {
            log::warn!("camera.min_distance {} reset", c.min_distance);
            c.min_distance = defaults.min_distance;
        }
        if let Some(max) = c.max_distance {
            if !(max > c.min_distance) {
                log::warn!("camera.max_distance {max} not above min_distance; zoom-out unbounded");
                c.max_distance = None;
            }
        }
        if !(c.distance.is_finite() && c.distance > 0.0) {
            log::warn!("camera.distance {} reset to {}", c.distance, defaults.distance);
            c.distance = defaults.distance;
        }
        if !(c.drag >= 0.0 && c.drag < 1.0) {
            log::warn!("camera.drag {} reset to {}", c.drag, defaults.drag);
            c.drag = defaults.drag;
        }
        if !(c.stop_threshold.is_finite() && c.stop_threshold >= 0.0) {
            c.stop_threshold = defaults.stop_threshold;
        }
        for (name, value) in [
            ("rotation_sensitivity", &mut c.rotation_sensitivity),
            ("translation_sensitivity", &mut c.translation_sensitivity),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("camera.{name} {value} reset to 1");
                *value = 1.0;
            }
        }

        let bg = self.frame.background_color();
        if bg.to_array() != self.frame.background {
            log::warn!("frame.background {:?} clamped", self.frame.background);
            self.frame.background = bg.to_array();
        }

        self
    }
}
