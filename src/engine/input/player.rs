// Per-frame action state and the read-only surface the behaviour core consumes

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Narrow read-only view of player input used by the state graph
pub trait InputSurface {
    /// Action went down this frame
    fn was_pressed_this_frame(&self, action: Action) -> bool;

    /// Action is currently held
    fn is_pressed(&self, action: Action) -> bool;

    /// Movement axis, each component in -1.0..=1.0
    fn read_movement(&self) -> Vec2;
}

/// Input surface that reports nothing; stands in for a disabled controller
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledInput;

impl InputSurface for DisabledInput {
    fn was_pressed_this_frame(&self, _action: Action) -> bool {
        false
    }

    fn is_pressed(&self, _action: Action) -> bool {
        false
    }

    fn read_movement(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Represents the input state for the local player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently held
    pressed: HashSet<Action>,

    /// Actions that went down this frame
    just_pressed: HashSet<Action>,

    /// Actions that went up this frame
    just_released: HashSet<Action>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Swallow the press edge of one action so later readers miss it
    pub fn consume(&mut self, action: Action) -> bool {
        self.just_pressed.remove(&action)
    }

    /// Advance to a new frame: edges are cleared, held actions stay held
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl InputSurface for PlayerInput {
    fn was_pressed_this_frame(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    fn read_movement(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;

        if self.is_pressed(Action::MoveLeft) {
            axis.x -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            axis.x += 1.0;
        }
        if self.is_pressed(Action::MoveDown) {
            axis.y -= 1.0;
        }
        if self.is_pressed(Action::MoveUp) {
            axis.y += 1.0;
        }

        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.was_pressed_this_frame(Action::Jump));
    }

    #[test]
    fn test_consume_clears_one_edge() {
        let mut input = PlayerInput::new();
        input.press(Action::Pause);
        input.press(Action::Jump);

        assert!(input.consume(Action::Pause));
        assert!(!input.consume(Action::Pause));
        assert!(!input.was_pressed_this_frame(Action::Pause));
        assert!(input.is_pressed(Action::Pause));
        assert!(input.was_pressed_this_frame(Action::Jump));
    }

    #[test]
    fn test_edge_cleared_on_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        assert!(input.is_pressed(Action::Jump));
        assert!(!input.was_pressed_this_frame(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(input.just_released(Action::Jump));
    }

    #[test]
    fn test_repeat_press_is_not_a_new_edge() {
        let mut input = PlayerInput::new();
        input.press(Action::Attack);
        input.update();
        input.press(Action::Attack);
        assert!(!input.was_pressed_this_frame(Action::Attack));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new();
        input.release(Action::Jump);
        assert!(!input.just_released(Action::Jump));
    }

    #[test]
    fn test_read_movement() {
        let mut input = PlayerInput::new();
        assert_eq!(input.read_movement(), Vec2::ZERO);

        input.press(Action::MoveRight);
        input.press(Action::MoveDown);
        assert_eq!(input.read_movement(), Vec2::new(1.0, -1.0));

        // Opposite directions cancel out
        input.press(Action::MoveLeft);
        assert_eq!(input.read_movement().x, 0.0);
    }

    #[test]
    fn test_disabled_input_reports_nothing() {
        let input = DisabledInput;
        assert!(!input.is_pressed(Action::Jump));
        assert!(!input.was_pressed_this_frame(Action::Attack));
        assert_eq!(input.read_movement(), Vec2::ZERO);
    }
}
