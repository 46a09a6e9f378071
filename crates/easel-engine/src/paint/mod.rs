//! Paint model shared between the drawing API and backends.
//!
//! Scope:
//! - color representation (straight alpha, `f32` in `[0, 1]`)
//! - conversions from the 0–255 and hex forms callers hand in
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
