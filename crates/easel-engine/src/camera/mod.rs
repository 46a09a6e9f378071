//! Orbit camera.
//!
//! Converts pointer interaction into target/distance/orientation changes and
//! derives view and projection matrices from them. [`OrbitCamera::begin`]
//! and [`OrbitCamera::end`] bracket 3D drawing on a transform stack.

mod orbit;

pub use orbit::{CameraMode, OrbitCamera, PITCH_LIMIT_DEG};
