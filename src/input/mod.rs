use std::collections::HashSet;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Raw hardware state for a single frame.  The event loop fills this in as
/// winit events arrive; `clear_frame_state` runs at the end of every frame
/// so pressed/released sets only reflect edges from the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_released: HashSet<KeyCode>,

    /// Cursor position in window pixels, y-down.
    pub mouse_pos: [f32; 2],
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_frame_state_keeps_held_keys() {
        let mut input = InputState::new();
        input.keys_held.insert(KeyCode::Space);
        input.keys_pressed.insert(KeyCode::Space);
        input.clear_frame_state();
        assert!(input.is_key_held(KeyCode::Space));
        assert!(!input.is_key_pressed(KeyCode::Space));
    }

    #[test]
    fn clear_frame_state_drops_mouse_edges() {
        let mut input = InputState::new();
        input.mouse_pressed.insert(MouseButton::Left);
        input.mouse_released.insert(MouseButton::Right);
        input.clear_frame_state();
        assert!(!input.is_mouse_pressed(MouseButton::Left));
        assert!(!input.is_mouse_released(MouseButton::Right));
    }
}
