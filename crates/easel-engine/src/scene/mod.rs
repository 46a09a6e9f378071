//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands as immutable snapshots
//! - keep strict insertion order for consumers
//! - expose adjacent-run batching without reordering

mod batch;
mod cmd;
mod list;

pub use batch::{Batch, BatchKey, Batches};
pub use cmd::{DrawCmd, MeshCmd, PathCmd};
pub use list::{DrawList, ReplayStats};
