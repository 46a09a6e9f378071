//! Application-facing engine contracts.
//!
//! [`RenderContext`] holds all drawing state explicitly (no globals), [`App`]
//! is the capability set an application implements, and [`FrameLoop`] ties
//! them to a [`crate::render::RenderBackend`] one tick at a time.

mod app;
mod ctx;
mod runner;

pub use app::{App, AppControl};
pub use ctx::{FrameReport, RenderContext, RenderSettings};
pub use runner::FrameLoop;
