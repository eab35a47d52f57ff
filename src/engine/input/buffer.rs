// Input buffering: remember a press for a short window of time

use super::action::Action;
use std::collections::VecDeque;

/// Maximum number of buffered inputs to store
const MAX_BUFFER_SIZE: usize = 16;

/// Slack for summed frame deltas; a window of N ticks must not last N + 1
const EXPIRY_EPSILON: f32 = 1e-4;

/// Represents a single buffered input
#[derive(Debug, Clone, Copy)]
pub struct BufferedInput {
    pub action: Action,
    /// Seconds left before the press is forgotten
    pub remaining: f32,
}

impl BufferedInput {
    pub fn new(action: Action, window: f32) -> Self {
        Self {
            action,
            remaining: window,
        }
    }

    pub fn age(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= EXPIRY_EPSILON
    }
}

/// Time-windowed input buffer.
///
/// A press stays buffered for `window` seconds so that a state entered a few
/// frames later (typically on landing) can still honour it.
#[derive(Debug)]
pub struct InputBuffer {
    buffer: VecDeque<BufferedInput>,
    window: f32,
}

impl InputBuffer {
    pub fn new(window: f32) -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_BUFFER_SIZE),
            window,
        }
    }

    /// Buffer a press, restarting the window if the action is already buffered
    pub fn push(&mut self, action: Action) {
        if let Some(input) = self.buffer.iter_mut().find(|input| input.action == action) {
            input.remaining = self.window;
            return;
        }

        self.buffer.push_back(BufferedInput::new(action, self.window));
        if self.buffer.len() > MAX_BUFFER_SIZE {
            self.buffer.pop_front();
        }
    }

    /// Check if an action is currently buffered
    pub fn has(&self, action: Action) -> bool {
        self.buffer.iter().any(|input| input.action == action)
    }

    /// Remaining window for an action, if buffered
    pub fn remaining(&self, action: Action) -> Option<f32> {
        self.buffer
            .iter()
            .find(|input| input.action == action)
            .map(|input| input.remaining)
    }

    /// Consume an action from the buffer if it exists
    /// Returns true if the action was found and consumed
    pub fn consume(&mut self, action: Action) -> bool {
        if let Some(pos) = self.buffer.iter().position(|input| input.action == action) {
            self.buffer.remove(pos);
            true
        } else {
            false
        }
    }

    /// Age all inputs by `dt` seconds and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        for input in &mut self.buffer {
            input.age(dt);
        }
        self.buffer.retain(|input| !input.is_expired());
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
