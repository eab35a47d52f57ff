/// Fixed-timestep simulation clock
///
/// Wall-clock frame time is accumulated and paid out as whole simulation
/// ticks. Every tick carries the same `dt` plus the simulation time it
/// starts at, so behaviour code never sees a variable delta.
use std::time::{Duration, Instant};

use crate::core::Frame;
use crate::engine::input::{Action, InputManager, PlayerInput};

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks paid out per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated wall time not yet paid out as ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Simulation time at the start of the next tick
    sim_time: f32,

    /// Current frame number
    frame_count: u64,

    /// Total ticks paid out
    tick_count: u64,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            sim_time: 0.0,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Begin a new frame using the wall clock, returns the ticks to run
    pub fn begin_frame(&mut self) -> Vec<Frame> {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Run one redraw: toggle pause on the Pause edge, then pay out ticks.
    /// Input edges are retired after the first tick that saw them, or right
    /// away while paused. Returns the number of ticks run.
    pub fn run_frame<F>(&mut self, input: &mut InputManager, mut tick: F) -> usize
    where
        F: FnMut(&PlayerInput, Frame),
    {
        if input.player_mut().consume(Action::Pause) {
            self.toggle_pause();
        }

        let frames = self.begin_frame();
        for frame in &frames {
            tick(input.player(), *frame);
            input.update();
        }
        if frames.is_empty() && self.paused {
            input.update();
        }
        frames.len()
    }

    /// Feed an explicit amount of wall time into the loop
    pub fn advance(&mut self, frame_time: Duration) -> Vec<Frame> {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return Vec::new();
        }

        self.accumulator += frame_time;

        let mut ticks = Vec::new();
        while self.accumulator >= FIXED_TIMESTEP_DURATION && (ticks.len() as u32) < MAX_TICKS_PER_FRAME
        {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks.push(Frame::new(FIXED_TIMESTEP, self.sim_time));
            self.sim_time += FIXED_TIMESTEP;
        }

        // Drop the backlog we refused to simulate
        if ticks.len() as u32 == MAX_TICKS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!("Simulation fell behind, dropping {:?}", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks.len() as u64;
        ticks
    }

    /// Simulation time at the start of the next tick (in seconds)
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Get the interpolation alpha for smooth presentation between ticks
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Get total number of frames seen
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of ticks executed
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputSurface;
    use approx::assert_relative_eq;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.tick_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_ticks_carry_fixed_dt_and_time() {
        let mut game_loop = GameLoop::new();
        let ticks = game_loop.advance(FIXED_TIMESTEP_DURATION * 3);

        assert_eq!(ticks.len(), 3);
        for (i, tick) in ticks.iter().enumerate() {
            assert_eq!(tick.dt, FIXED_TIMESTEP);
            assert_relative_eq!(tick.time, i as f32 * FIXED_TIMESTEP);
        }
        assert_relative_eq!(game_loop.sim_time(), 3.0 * FIXED_TIMESTEP);
    }

    #[test]
    fn test_partial_frame_carries_over() {
        let mut game_loop = GameLoop::new();
        assert!(game_loop.advance(FIXED_TIMESTEP_DURATION / 2).is_empty());
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION / 2).len(), 1);
    }

    #[test]
    fn test_pause_resume() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert!(game_loop.is_paused());
        assert!(game_loop.advance(Duration::from_millis(100)).is_empty());

        game_loop.resume();
        assert!(!game_loop.is_paused());
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION).len(), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_pause_key_unpauses_for_good() {
        let mut game_loop = GameLoop::new();
        let mut input = InputManager::new();

        input.player_mut().press(Action::Pause);
        game_loop.run_frame(&mut input, |_, _| {});
        assert!(game_loop.is_paused());
        game_loop.run_frame(&mut input, |_, _| {});

        input.player_mut().release(Action::Pause);
        input.player_mut().press(Action::Pause);
        game_loop.run_frame(&mut input, |_, _| {});
        assert!(!game_loop.is_paused());

        // Resume restarts the clock, so these redraws may pay out nothing
        game_loop.run_frame(&mut input, |_, _| {});
        game_loop.run_frame(&mut input, |_, _| {});
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_paused_frames_retire_edges() {
        let mut game_loop = GameLoop::new();
        let mut input = InputManager::new();
        game_loop.pause();

        input.player_mut().press(Action::Jump);
        assert_eq!(game_loop.run_frame(&mut input, |_, _| {}), 0);
        assert!(!input.player().was_pressed_this_frame(Action::Jump));
        assert!(input.player().is_pressed(Action::Jump));
    }

    #[test]
    fn test_max_ticks_limit() {
        let mut game_loop = GameLoop::new();

        // A 300ms hitch would allow 18 ticks
        let ticks = game_loop.advance(Duration::from_millis(300));
        assert_eq!(ticks.len() as u32, MAX_TICKS_PER_FRAME);

        // The backlog is dropped rather than replayed next frame
        assert!(game_loop.advance(Duration::ZERO).is_empty());
    }

    #[test]
    fn test_alpha_range() {
        let mut game_loop = GameLoop::new();
        game_loop.advance(FIXED_TIMESTEP_DURATION / 2);
        let alpha = game_loop.alpha();
        assert!((0.0..=1.0).contains(&alpha));
    }
}
