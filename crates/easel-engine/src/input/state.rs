use std::collections::HashSet;

use glam::Vec2;

use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Held keys/buttons and pointer tracking, fed one event at a time.
///
/// Per-frame transitions (`*_pressed`, `pointer_delta`, `wheel`) accumulate
/// until [`InputState::end_frame`].
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,

    /// Pointer movement this frame.
    pub pointer_delta: Vec2,
    /// Wheel movement this frame, in lines.
    pub wheel: Vec2,
    pub keys_pressed: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::PointerMoved { position } => {
                if let Some(prev) = self.pointer_pos {
                    self.pointer_delta += position - prev;
                }
                self.pointer_pos = Some(position);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::PointerButton { button, state, position, modifiers } => {
                self.pointer_pos = Some(position);
                self.modifiers = modifiers;
                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(button) {
                            self.buttons_pressed.insert(button);
                        }
                    }
                    ButtonState::Released => {
                        if self.buttons_down.remove(&button) {
                            self.buttons_released.insert(button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = modifiers;
                self.wheel += delta.lines();
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = modifiers;
                match state {
                    ButtonState::Pressed => {
                        if self.keys_down.insert(key) {
                            self.keys_pressed.insert(key);
                        }
                    }
                    ButtonState::Released => {
                        self.keys_down.remove(&key);
                    }
                }
            }

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::Resized(_) => {}
        }
    }

    /// Clears per-frame transitions. Held state is kept.
    pub fn end_frame(&mut self) {
        self.pointer_delta = Vec2::ZERO;
        self.wheel = Vec2::ZERO;
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton {
            button,
            state: ButtonState::Pressed,
            position: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn pointer_delta_accumulates_within_frame() {
        let mut s = InputState::new();
        s.apply_event(&press(MouseButton::Left, 10.0, 10.0));
        s.apply_event(&InputEvent::PointerMoved { position: Vec2::new(15.0, 10.0) });
        s.apply_event(&InputEvent::PointerMoved { position: Vec2::new(20.0, 12.0) });
        assert_eq!(s.pointer_delta, Vec2::new(10.0, 2.0));
        assert!(s.button_down(MouseButton::Left));
        assert!(s.buttons_pressed.contains(&MouseButton::Left));

        s.end_frame();
        assert_eq!(s.pointer_delta, Vec2::ZERO);
        assert!(s.button_down(MouseButton::Left));
        assert!(s.buttons_pressed.is_empty());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::new();
        s.apply_event(&press(MouseButton::Right, 0.0, 0.0));
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.button_down(MouseButton::Right));
    }
}
