//! Input subsystem.
//!
//! Public API is platform-agnostic and does not depend on any windowing crate.
//! The host is responsible for translating platform events into `InputEvent`s.

mod state;
mod types;

pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta};
