// Player tunables

use glam::Vec2;

use crate::engine::physics::{CollisionLayer, LayerMask};
use crate::game::combo::DEFAULT_COMBO_LIMIT;
use crate::game::config::{positive, ConfigError, MotionConfig, ProbeConfig, BASE_MOTION, BASE_PROBES};
use crate::game::entity::combat::DEFAULT_ATTACK;
use crate::game::entity::health::BASE_HEALTH;
use crate::game::entity::{AttackData, CombatConfig, HealthConfig, HitShape};

/// Forward push per combo hit: x along facing, y up
pub static PLAYER_ATTACK_VELOCITY: [Vec2; 3] = [
    Vec2::new(3.0, 0.0),
    Vec2::new(1.0, 2.5),
    Vec2::new(5.0, 0.0),
];

pub static PLAYER_ATTACKS: [AttackData; 3] = [
    DEFAULT_ATTACK,
    AttackData {
        offset: Vec2::new(0.2, 0.5),
        angle: 30.0,
        ..DEFAULT_ATTACK
    },
    AttackData {
        shape: HitShape::Rectangle {
            size: Vec2::new(2.5, 1.2),
        },
        offset: Vec2::new(0.4, 0.0),
        ..DEFAULT_ATTACK
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub move_speed: f32,
    /// Fraction of `move_speed` available while airborne
    pub in_air_move_multiplier: f32,
    /// Fall speed multiplier applied each tick while sliding
    pub wall_slide_multiplier: f32,
    pub dash_duration: f32,
    pub dash_speed: f32,
    pub jump_force: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    /// Launch velocity away from the wall
    pub wall_jump_force: Vec2,
    pub max_jumps: u32,
    pub combo_limit: u32,
    /// Seconds after an attack ends before the combo starts over
    pub combo_reset_time: f32,
    pub attack_velocity: &'static [Vec2],
    pub attack_velocity_duration: f32,
    pub counter_duration: f32,
    pub motion: MotionConfig,
    pub probes: ProbeConfig,
    pub health: HealthConfig,
    pub combat: CombatConfig,
}

pub const BASE_PLAYER: PlayerConfig = PlayerConfig {
    move_speed: 10.0,
    in_air_move_multiplier: 0.5,
    wall_slide_multiplier: 0.7,
    dash_duration: 0.25,
    dash_speed: 10.0,
    jump_force: 10.0,
    jump_buffer_time: 0.2,
    coyote_time: 0.2,
    wall_jump_force: Vec2::new(6.0, 12.0),
    max_jumps: 2,
    combo_limit: DEFAULT_COMBO_LIMIT,
    combo_reset_time: 1.0,
    attack_velocity: &PLAYER_ATTACK_VELOCITY,
    attack_velocity_duration: 0.1,
    counter_duration: 1.0,
    motion: BASE_MOTION,
    probes: BASE_PROBES,
    health: BASE_HEALTH,
    combat: CombatConfig {
        target_mask: LayerMask::from_layer(CollisionLayer::Enemy).with(CollisionLayer::Prop),
        target_check: Vec2::new(0.8, 1.0),
        damage: 20.0,
        attacks: &PLAYER_ATTACKS,
    },
};

impl Default for PlayerConfig {
    fn default() -> Self {
        BASE_PLAYER
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.move_speed, "move_speed")?;
        positive(self.dash_duration, "dash_duration")?;
        positive(self.dash_speed, "dash_speed")?;
        positive(self.jump_force, "jump_force")?;
        positive(self.combo_reset_time, "combo_reset_time")?;
        positive(self.attack_velocity_duration, "attack_velocity_duration")?;
        positive(self.counter_duration, "counter_duration")?;
        if self.jump_buffer_time < 0.0 {
            return Err(ConfigError::NonPositive("jump_buffer_time"));
        }
        if self.coyote_time < 0.0 {
            return Err(ConfigError::NonPositive("coyote_time"));
        }
        if self.attack_velocity.is_empty() {
            return Err(ConfigError::Empty("attack_velocity"));
        }

        self.motion.validate()?;
        self.probes.validate()?;
        self.health.validate()?;
        self.combat.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(BASE_PLAYER.validate(), Ok(()));
    }

    #[test]
    fn test_empty_lunge_table_rejected() {
        let config = PlayerConfig {
            attack_velocity: &[],
            ..BASE_PLAYER
        };
        assert_eq!(config.validate(), Err(ConfigError::Empty("attack_velocity")));
    }

    #[test]
    fn test_negative_buffer_rejected() {
        let config = PlayerConfig {
            jump_buffer_time: -0.1,
            ..BASE_PLAYER
        };
        assert!(config.validate().is_err());
    }
}
