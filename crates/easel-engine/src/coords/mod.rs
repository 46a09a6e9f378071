//! Coordinate and geometry types shared across the drawing core.
//!
//! Canonical 2D space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Points and vectors are `glam` types; this module only adds the
//! rectangle-shaped helpers glam does not have.

mod corner_radii;
mod rect;
mod viewport;

pub use corner_radii::CornerRadii;
pub use rect::Rect;
pub use viewport::Viewport;
