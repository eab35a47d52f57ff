// Input handling system
//
// The behaviour core never polls devices. It reads actions through the
// `InputSurface` trait: edge queries ("pressed this frame"), level queries
// ("held") and the movement axis.
//
// ## Architecture
//
// - `action`: Game actions and default key bindings
// - `buffer`: Time-windowed action buffering (jump buffer)
// - `player`: Per-frame action state and the `InputSurface` trait
// - `manager`: Routes winit keyboard/mouse events into the player state
//
// ## Usage Example
//
// ```rust
// let mut input = InputManager::new();
//
// // In your event loop
// input.process_keyboard_event(&key_event);
//
// // Run the simulation with the current snapshot, then advance the frame
// arena.tick(input.player(), dt);
// input.update();
// ```

pub mod action;
pub mod buffer;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use buffer::InputBuffer;
pub use manager::InputManager;
pub use player::{DisabledInput, InputSurface, PlayerInput};
