//! Easel engine crate.
//!
//! Immediate-mode 2D/3D drawing core: applications issue drawing calls each
//! frame through a [`core::RenderContext`], which tessellates geometry and
//! records an ordered, backend-agnostic [`scene::DrawList`] for a
//! [`render::RenderBackend`] to submit.

pub mod camera;
pub mod config;
pub mod coords;
pub mod core;
pub mod error;
pub mod input;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod path;
pub mod render;
pub mod scene;
pub mod style;
pub mod tessellate;
pub mod time;
pub mod transform;
