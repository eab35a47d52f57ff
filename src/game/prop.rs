// Damageable level props

use glam::Vec2;

use crate::core::{Countdown, EntityId};
use crate::engine::physics::BodyState;
use crate::game::entity::{DamageResult, DamageSource, Damageable};

const CHEST_FLASH_DURATION: f32 = 0.1;

/// Footprint of a chest in world units
pub const CHEST_SIZE: Vec2 = Vec2::new(1.0, 0.8);

/// A chest pops open whenever it is struck. It has no health and never dies.
#[derive(Debug, Clone)]
pub struct Chest {
    id: EntityId,
    pub body: BodyState,
    /// Velocity set on every hit
    knockback: Vec2,
    opens: u32,
    flash: Countdown,
}

impl Chest {
    pub fn new(id: EntityId, spawn: Vec2) -> Self {
        Self {
            id,
            body: BodyState::at(spawn),
            knockback: Vec2::new(0.0, 4.0),
            opens: 0,
            flash: Countdown::new(),
        }
    }

    pub fn with_knockback(mut self, knockback: Vec2) -> Self {
        self.knockback = knockback;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Number of hits taken
    pub fn opens(&self) -> u32 {
        self.opens
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_running()
    }

    pub fn tick(&mut self, dt: f32) {
        self.flash.tick(dt);
    }
}

impl Damageable for Chest {
    fn take_damage(&mut self, _amount: f32, source: &DamageSource) -> DamageResult {
        log::info!("Chest {} opened by {}", self.id, source.attacker);
        self.body.velocity = self.knockback;
        self.flash.set(CHEST_FLASH_DURATION);
        self.opens += 1;
        DamageResult::Hit
    }
}
