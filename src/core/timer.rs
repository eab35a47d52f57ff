// Frame-polled countdown timers

/// A countdown that is polled every tick rather than scheduled.
///
/// `set` loads a duration, `tick` subtracts the frame delta. The timer keeps
/// counting below zero so callers can use either `is_running` (> 0) or
/// `has_expired` (< 0) depending on which edge they care about.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Start (or restart) the countdown
    pub fn set(&mut self, duration: f32) {
        self.remaining = duration;
    }

    /// Force the countdown to zero
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    /// Time left before expiry (negative once expired)
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Still inside the window
    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    /// Strictly past the window
    pub fn has_expired(&self) -> bool {
        self.remaining < 0.0
    }
}

/// Timing of one fixed simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds covered by this tick
    pub dt: f32,
    /// Simulation time at the start of this tick, in seconds
    pub time: f32,
}

impl Frame {
    pub fn new(dt: f32, time: f32) -> Self {
        Self { dt, time }
    }

    /// The tick that follows this one
    pub fn next(self) -> Self {
        Self {
            dt: self.dt,
            time: self.time + self.dt,
        }
    }
}
