// Input manager - routes window events into the player's action state

use super::action::{default_bindings, Action, InputSource};
use super::player::PlayerInput;
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Maps device events to actions for the local player
pub struct InputManager {
    /// Mapping from input sources to actions
    bindings: HashMap<InputSource, Action>,

    /// Action state read by the simulation
    player: PlayerInput,
}

impl InputManager {
    /// Create a new input manager with the default bindings
    pub fn new() -> Self {
        Self::with_bindings(default_bindings())
    }

    pub fn with_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.apply(InputSource::key(key_code), event.state);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_event(&mut self, button: MouseButton, state: ElementState) {
        self.apply(InputSource::mouse(button), state);
    }

    /// Feed a raw source transition through the bindings
    pub fn apply(&mut self, source: InputSource, state: ElementState) {
        let Some(&action) = self.bindings.get(&source) else {
            return;
        };

        match state {
            ElementState::Pressed => self.player.press(action),
            ElementState::Released => self.player.release(action),
        }
    }

    /// Advance to the next frame; call after the simulation consumed this one
    pub fn update(&mut self) {
        self.player.update();
    }

    /// Get the action state for the local player
    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    /// Get the mutable action state for the local player
    pub fn player_mut(&mut self) -> &mut PlayerInput {
        &mut self.player
    }

    /// Get the action bound to an input source
    pub fn action_for(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    /// Reset all input state (focus loss)
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::player::InputSurface;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bound_key_presses_action() {
        let mut manager = InputManager::new();
        manager.apply(InputSource::key(KeyCode::Space), ElementState::Pressed);

        assert!(manager.player().is_pressed(Action::Jump));
        assert!(manager.player().was_pressed_this_frame(Action::Jump));
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut manager = InputManager::new();
        manager.apply(InputSource::key(KeyCode::F12), ElementState::Pressed);
        assert_eq!(manager.action_for(InputSource::key(KeyCode::F12)), None);
        assert!(!manager.player().is_pressed(Action::Jump));
    }

    #[test]
    fn test_update_clears_edges() {
        let mut manager = InputManager::new();
        manager.process_mouse_event(MouseButton::Left, ElementState::Pressed);
        assert!(manager.player().was_pressed_this_frame(Action::Attack));

        manager.update();
        assert!(!manager.player().was_pressed_this_frame(Action::Attack));
        assert!(manager.player().is_pressed(Action::Attack));
    }

    #[test]
    fn test_release() {
        let mut manager = InputManager::new();
        manager.apply(InputSource::key(KeyCode::KeyD), ElementState::Pressed);
        manager.update();
        manager.apply(InputSource::key(KeyCode::KeyD), ElementState::Released);

        assert!(!manager.player().is_pressed(Action::MoveRight));
        assert!(manager.player().just_released(Action::MoveRight));
    }

    #[test]
    fn test_reset() {
        let mut manager = InputManager::new();
        manager.apply(InputSource::key(KeyCode::KeyA), ElementState::Pressed);
        manager.reset();
        assert!(!manager.player().is_pressed(Action::MoveLeft));
    }
}
