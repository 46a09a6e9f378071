//! Frame timing.
//!
//! One `FrameClock` per frame loop; `tick()` once per frame yields the
//! `FrameTime` passed to `App::update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
