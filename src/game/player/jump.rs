// Jump buffering, coyote time and multi-jump bookkeeping

use crate::core::Countdown;
use crate::engine::input::{Action, InputBuffer};

/// Forgiveness windows around jumping.
///
/// Both windows are refreshed by their triggering condition and counted down
/// once per tick after the state update has run.
#[derive(Debug)]
pub struct JumpAssist {
    buffer: InputBuffer,
    coyote_time: f32,
    coyote: Countdown,
    can_coyote_jump: bool,
    jumps: u32,
}

impl JumpAssist {
    pub fn new(jump_buffer_time: f32, coyote_time: f32) -> Self {
        Self {
            buffer: InputBuffer::new(jump_buffer_time),
            coyote_time,
            coyote: Countdown::new(),
            can_coyote_jump: false,
            jumps: 0,
        }
    }

    /// End-of-tick bookkeeping
    pub fn update(&mut self, jump_pressed: bool, grounded: bool, dt: f32) {
        self.buffer.update(dt);
        if jump_pressed {
            self.buffer.push(Action::Jump);
        }

        if grounded {
            self.coyote.set(self.coyote_time);
            self.can_coyote_jump = true;
        } else {
            self.coyote.tick(dt);
        }
    }

    pub fn has_jump_buffer(&self) -> bool {
        self.buffer.has(Action::Jump)
    }

    pub fn consume_jump_buffer(&mut self) {
        self.buffer.consume(Action::Jump);
    }

    /// Standing on ground, or recently left it without spending the grace jump
    pub fn can_coyote_jump(&self, grounded: bool) -> bool {
        grounded || (self.coyote.is_running() && self.can_coyote_jump)
    }

    /// No further coyote jumps until grounded again
    pub fn consume_coyote_jump(&mut self) {
        self.coyote.clear();
        self.can_coyote_jump = false;
    }

    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    pub fn add_jump(&mut self) {
        self.jumps += 1;
    }

    pub fn reset_jumps(&mut self) {
        self.jumps = 0;
    }

    pub fn has_extra_jump(&self, max_jumps: u32) -> bool {
        self.jumps < max_jumps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_buffer_window() {
        let mut assist = JumpAssist::new(0.2, 0.2);
        assist.update(true, false, DT);
        assert!(assist.has_jump_buffer());

        for _ in 0..11 {
            assist.update(false, false, DT);
        }
        assert!(assist.has_jump_buffer());

        assist.update(false, false, DT);
        assist.update(false, false, DT);
        assert!(!assist.has_jump_buffer());
    }

    #[test]
    fn test_buffer_edge_ticks() {
        // Pressed on tick 0, read by the state update of tick N
        let mut assist = JumpAssist::new(0.2, 0.2);
        assist.update(true, false, DT);
        for _ in 1..12 {
            assist.update(false, false, DT);
        }
        assert!(assist.has_jump_buffer(), "tick 12 is inside the window");

        assist.update(false, false, DT);
        assert!(!assist.has_jump_buffer(), "tick 13 is past it");
    }

    #[test]
    fn test_consume_buffer() {
        let mut assist = JumpAssist::new(0.2, 0.2);
        assist.update(true, true, DT);
        assist.consume_jump_buffer();
        assert!(!assist.has_jump_buffer());
    }

    #[test]
    fn test_coyote_single_shot() {
        let mut assist = JumpAssist::new(0.2, 0.2);
        assist.update(false, true, DT);
        assert!(assist.can_coyote_jump(true));

        // Walked off the ledge
        assist.update(false, false, DT);
        assert!(assist.can_coyote_jump(false));

        assist.consume_coyote_jump();
        assert!(!assist.can_coyote_jump(false));

        // Re-grounding restores it
        assist.update(false, true, DT);
        assert!(assist.can_coyote_jump(false));
    }

    #[test]
    fn test_coyote_expires() {
        let mut assist = JumpAssist::new(0.2, 0.2);
        assist.update(false, true, DT);
        for _ in 0..13 {
            assist.update(false, false, DT);
        }
        assert!(!assist.can_coyote_jump(false));
    }

    #[test]
    fn test_jump_counting() {
        let mut assist = JumpAssist::new(0.2, 0.2);
        assist.add_jump();
        assert!(assist.has_extra_jump(2));
        assist.add_jump();
        assert!(!assist.has_extra_jump(2));
        assist.reset_jumps();
        assert_eq!(assist.jumps(), 0);
    }
}
