//! Paths: contours built from move/line/curve/arc/close commands, plus the
//! fill and stroke geometry derived from them.

mod builder;
mod contour;
mod fill;
mod ops;
mod stroke;

pub use builder::{ContourState, DEFAULT_JOIN_THRESHOLD_DEG, Path, PathBuilder};
pub use contour::{Contour, Winding};
pub use stroke::StrokeParams;

pub(crate) use fill::fill_contours;
pub(crate) use stroke::stroke_contours;
