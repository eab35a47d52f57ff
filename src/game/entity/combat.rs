// Attack hit volumes, strike requests and the damage capability

use glam::Vec2;

use crate::core::EntityId;
use crate::engine::physics::{LayerMask, PhysicsQuery, QueryShape};
use crate::game::config::ConfigError;

/// Outline of an attack's hit volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    /// Rectangle of full `size`
    Rectangle { size: Vec2 },
    Circle { radius: f32 },
}

/// One attack's hit volume, relative to the attacker's target-check point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackData {
    pub shape: HitShape,
    /// Offset from the target-check point
    pub offset: Vec2,
    /// Rotation in degrees
    pub angle: f32,
    /// Negate the angle when facing left
    pub flip_angle_with_facing: bool,
    /// Always project the offset in front of the attacker
    pub offset_in_front_of_character: bool,
}

pub const DEFAULT_ATTACK: AttackData = AttackData {
    shape: HitShape::Rectangle {
        size: Vec2::new(2.0, 1.0),
    },
    offset: Vec2::ZERO,
    angle: 0.0,
    flip_angle_with_facing: true,
    offset_in_front_of_character: true,
};

impl Default for AttackData {
    fn default() -> Self {
        DEFAULT_ATTACK
    }
}

impl AttackData {
    /// Centre of the volume for an attacker facing `facing` (±1)
    pub fn position(&self, target_check: Vec2, facing: i32) -> Vec2 {
        let facing = facing as f32;
        let x = if self.offset_in_front_of_character {
            self.offset.x.abs() * facing
        } else {
            self.offset.x * facing
        };
        target_check + Vec2::new(x, self.offset.y)
    }

    pub fn angle(&self, facing: i32) -> f32 {
        if self.flip_angle_with_facing && facing < 0 {
            -self.angle
        } else {
            self.angle
        }
    }

    /// The overlap query this attack performs
    pub fn volume(&self, target_check: Vec2, facing: i32) -> (Vec2, QueryShape) {
        let shape = match self.shape {
            HitShape::Rectangle { size } => QueryShape::Box {
                size,
                angle: self.angle(facing),
            },
            HitShape::Circle { radius } => QueryShape::Circle { radius },
        };
        (self.position(target_check, facing), shape)
    }

    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let valid = match self.shape {
            HitShape::Rectangle { size } => size.x > 0.0 && size.y > 0.0,
            HitShape::Circle { radius } => radius > 0.0,
        };
        if valid {
            Ok(())
        } else {
            Err(ConfigError::Attack {
                index,
                reason: "hit volume has no area",
            })
        }
    }
}

/// Who attacks what, from where, for how much
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatConfig {
    pub target_mask: LayerMask,
    /// Target-check point relative to the body origin; x is mirrored with facing
    pub target_check: Vec2,
    pub damage: f32,
    /// One entry per combo slot
    pub attacks: &'static [AttackData],
}

impl CombatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.damage < 0.0 {
            return Err(ConfigError::NonPositive("damage"));
        }
        self.attacks
            .iter()
            .enumerate()
            .try_for_each(|(index, attack)| attack.validate(index))
    }

    /// Attack for a combo slot; the index is clamped into the table
    pub fn attack(&self, index: usize) -> Option<&AttackData> {
        if self.attacks.is_empty() {
            log::warn!("No attack data configured, skipping attack");
            return None;
        }
        self.attacks.get(index.min(self.attacks.len() - 1))
    }

    pub fn target_check(&self, position: Vec2, facing: i32) -> Vec2 {
        position + Vec2::new(self.target_check.x * facing as f32, self.target_check.y)
    }

    /// Entities inside the volume of attack `index`, each reported once
    pub fn find_targets(
        &self,
        physics: &dyn PhysicsQuery,
        position: Vec2,
        facing: i32,
        index: usize,
    ) -> Vec<EntityId> {
        let Some(attack) = self.attack(index) else {
            return Vec::new();
        };

        let (center, shape) = attack.volume(self.target_check(position, facing), facing);
        let mut targets: Vec<EntityId> = physics
            .overlap(center, shape, self.target_mask)
            .into_iter()
            .filter_map(|hit| hit.entity)
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }
}

/// Deferred combat work recorded during a state update and resolved once
/// every body has moved for the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatRequest {
    /// Damage everything inside the volume for this combo slot
    Strike { slot: usize },
    /// Stun counterable enemies inside the first attack volume
    Counter,
}

/// The hitting side of a damage exchange
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSource {
    pub attacker: EntityId,
    pub position: Vec2,
    pub from_player: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Target was already dead
    Ignored,
    Hit,
    /// This hit was fatal
    Killed,
}

/// Anything an attack can hurt
pub trait Damageable {
    fn take_damage(&mut self, amount: f32, source: &DamageSource) -> DamageResult;
}
