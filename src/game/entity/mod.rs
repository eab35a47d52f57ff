// Motion controller and environment probes shared by every character
//
// `Entity` is the physics-facing half of a character: its body state,
// facing, smoothed horizontal velocity, ground/wall probes and the knockback
// lock. Players and enemies wrap one and drive it from their states.

pub mod animator;
pub mod combat;
pub mod health;

use glam::Vec2;

use crate::core::math::smooth_damp;
use crate::core::{Countdown, EntityId};
use crate::engine::physics::{BodyState, PhysicsQuery};
use crate::game::config::{MotionConfig, ProbeConfig};
use crate::game::fsm::AnimationEvents;

pub use animator::{AnimationClip, AnimationDriver, Animator};
pub use combat::{
    AttackData, CombatConfig, CombatRequest, DamageResult, DamageSource, Damageable, HitShape,
};
pub use health::{Health, HealthConfig};

/// Length of the on-damage flash cue
const DAMAGE_FLASH_DURATION: f32 = 0.1;

#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub body: BodyState,
    pub motion: MotionConfig,
    pub probes: ProbeConfig,
    pub animator: Animator,
    /// Animation events queued for the next update
    pub events: AnimationEvents,
    /// 1 when facing right, -1 when facing left
    facing: i32,
    /// Reference velocity carried between smoothing calls
    smoothing: Vec2,
    ground_detected: bool,
    wall_detected: bool,
    knockback: Countdown,
    damage_flash: Countdown,
}

impl Entity {
    pub fn new(id: EntityId, spawn: Vec2, motion: MotionConfig, probes: ProbeConfig) -> Self {
        Self {
            id,
            body: BodyState::at(spawn),
            motion,
            probes,
            animator: Animator::new(),
            events: AnimationEvents::new(),
            facing: 1,
            smoothing: Vec2::ZERO,
            ground_detected: false,
            wall_detected: false,
            knockback: Countdown::new(),
            damage_flash: Countdown::new(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn facing_direction(&self) -> i32 {
        self.facing
    }

    pub fn facing_right(&self) -> bool {
        self.facing > 0
    }

    pub fn ground_detected(&self) -> bool {
        self.ground_detected
    }

    pub fn wall_detected(&self) -> bool {
        self.wall_detected
    }

    /// Still locked out of velocity control by a recent hit
    pub fn is_knocked(&self) -> bool {
        self.knockback.is_running()
    }

    /// The on-damage visual cue is showing
    pub fn is_flashing(&self) -> bool {
        self.damage_flash.is_running()
    }

    /// Advance per-entity countdowns; call once at the start of every tick
    pub fn tick(&mut self, dt: f32) {
        self.knockback.tick(dt);
        self.damage_flash.tick(dt);
    }

    /// Approach `(x, y)` with damped smoothing and face the direction of `x`.
    ///
    /// A zero `x` uses the stop smoothing time.
    pub fn set_velocity_x(&mut self, x: f32, y: f32, dt: f32) {
        if self.is_knocked() {
            return;
        }

        let smooth_time = if x == 0.0 {
            self.motion.stop_smooth_time
        } else {
            self.motion.smooth_time
        };
        self.body.velocity = smooth_damp(
            self.body.velocity,
            Vec2::new(x, y),
            &mut self.smoothing,
            smooth_time,
            dt,
        );
        self.handle_flip(x);
    }

    /// Set the velocity outright, no smoothing and no facing change
    pub fn set_velocity_y(&mut self, x: f32, y: f32) {
        if self.is_knocked() {
            return;
        }
        self.body.velocity = Vec2::new(x, y);
    }

    /// Apply a hit's knockback and ignore velocity requests for `duration`
    pub fn receive_knockback(&mut self, velocity: Vec2, duration: f32) {
        self.body.velocity = velocity;
        self.smoothing = Vec2::ZERO;
        self.knockback.set(duration);
    }

    pub fn play_damage_flash(&mut self) {
        self.damage_flash.set(DAMAGE_FLASH_DURATION);
    }

    /// Face the sign of `x_velocity`; zero leaves facing alone.
    /// Returns true when a flip happened.
    pub fn handle_flip(&mut self, x_velocity: f32) -> bool {
        if self.is_knocked() {
            return false;
        }

        let wants_right = x_velocity > 0.0;
        let wants_left = x_velocity < 0.0;
        if (wants_right && !self.facing_right()) || (wants_left && self.facing_right()) {
            self.flip();
            return true;
        }
        false
    }

    /// Turn around unconditionally
    pub fn flip(&mut self) {
        self.facing = -self.facing;
    }

    /// Refresh ground and wall flags from the physics world
    pub fn detect_environment(&mut self, physics: &dyn PhysicsQuery) {
        let probes = self.probes;
        let position = self.body.position;

        self.ground_detected = physics
            .raycast(
                position + self.mirrored(probes.ground_check),
                Vec2::NEG_Y,
                probes.ground_check_distance,
                probes.ground_mask,
            )
            .is_some();

        // A ledge corner only reaches one of the two rays
        let forward = Vec2::new(self.facing as f32, 0.0);
        let high = self.mirrored(probes.wall_check_high);
        let low = self.mirrored(probes.wall_check_low);
        self.wall_detected = physics
            .raycast(position + high, forward, probes.wall_check_distance, probes.wall_mask)
            .is_some()
            && physics
                .raycast(position + low, forward, probes.wall_check_distance, probes.wall_mask)
                .is_some();
    }

    /// Offset relative to the body with x pointing the way the entity faces
    pub fn mirrored(&self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x * self.facing as f32, offset.y)
    }
}
