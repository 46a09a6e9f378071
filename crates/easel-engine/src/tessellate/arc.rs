use std::f64::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::{DrawError, DrawResult, recover};

/// Number of segments an arc of `sweep_deg` receives when a full circle is
/// drawn with `circle_resolution` segments: `ceil(res * |sweep| / 360)`,
/// never less than 1.
pub fn segments_for_sweep(circle_resolution: u32, sweep_deg: f32) -> u32 {
    if !sweep_deg.is_finite() {
        return 1;
    }
    let n = (f64::from(circle_resolution) * f64::from(sweep_deg.abs()) / 360.0).ceil();
    (n as u32).max(1)
}

/// Points along an elliptical arc in the XY plane at `center.z`.
///
/// Angles are in degrees, measured from +X towards +Y; `end_deg < start_deg`
/// sweeps the other way and sweeps beyond 360° wrap around. Returns
/// `segments + 1` evenly spaced points (at least 2).
pub fn arc(center: Vec3, radii: Vec2, start_deg: f32, end_deg: f32, segments: u32) -> Vec<Vec3> {
    recover(try_arc(center, radii, start_deg, end_deg, segments)).unwrap_or_default()
}

pub fn try_arc(
    center: Vec3,
    radii: Vec2,
    start_deg: f32,
    end_deg: f32,
    segments: u32,
) -> DrawResult<Vec<Vec3>> {
    if !(center.is_finite() && radii.is_finite() && start_deg.is_finite() && end_deg.is_finite()) {
        return Err(DrawError::invalid_path("arc parameter is not finite"));
    }
    if radii.x < 0.0 || radii.y < 0.0 {
        return Err(DrawError::invalid_path(format!("arc radius is negative: {radii}")));
    }

    let n = segments.max(1);
    let start = f64::from(start_deg).to_radians();
    let sweep = f64::from(end_deg - start_deg).to_radians();
    let (rx, ry) = (f64::from(radii.x), f64::from(radii.y));

    let pts = (0..=n)
        .map(|i| {
            let a = start + sweep * f64::from(i) / f64::from(n);
            let (s, c) = a.sin_cos();
            center + Vec3::new((rx * c) as f32, (ry * s) as f32, 0.0)
        })
        .collect();
    Ok(pts)
}

/// `resolution` points around a full ellipse, without repeating the first.
pub fn circle_points(center: Vec3, radii: Vec2, resolution: u32) -> Vec<Vec3> {
    let n = resolution.max(3);
    let (rx, ry) = (f64::from(radii.x), f64::from(radii.y));
    (0..n)
        .map(|i| {
            let (s, c) = (TAU * f64::from(i) / f64::from(n)).sin_cos();
            center + Vec3::new((rx * c) as f32, (ry * s) as f32, 0.0)
        })
        .collect()
}
