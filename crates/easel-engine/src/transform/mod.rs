//! Nested model transforms.
//!
//! A [`Transform`] is a plain `glam::Mat4`. The [`TransformStack`] owns one
//! matrix per nesting level; draw calls snapshot the top entry.

mod stack;

pub use stack::TransformStack;

/// 4×4 column-major model transform.
pub type Transform = glam::Mat4;
