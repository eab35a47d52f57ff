// Enemy tunables

use glam::Vec2;

use crate::engine::physics::{CollisionLayer, LayerMask};
use crate::game::combo::DEFAULT_COMBO_LIMIT;
use crate::game::config::{positive, ConfigError, MotionConfig, ProbeConfig, BASE_MOTION, BASE_PROBES};
use crate::game::entity::combat::DEFAULT_ATTACK;
use crate::game::entity::health::BASE_HEALTH;
use crate::game::entity::{AttackData, CombatConfig, HealthConfig};

pub static RONIN_ATTACK_VELOCITY: [Vec2; 3] = [
    Vec2::new(2.0, 0.0),
    Vec2::new(2.0, 0.0),
    Vec2::new(4.0, 0.0),
];

pub static RONIN_ATTACKS: [AttackData; 3] = [
    DEFAULT_ATTACK,
    DEFAULT_ATTACK,
    AttackData {
        offset: Vec2::new(0.3, 0.0),
        ..DEFAULT_ATTACK
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyConfig {
    /// Seconds spent idling before patrolling again
    pub idle_time: f32,
    pub move_speed: f32,
    /// Playback speed for the move clip
    pub move_anim_speed_multiplier: f32,
    pub battle_move_speed: f32,
    pub attack_distance: f32,
    /// Seconds without seeing the player before leaving battle
    pub battle_time_duration: f32,
    pub min_retreat_distance: f32,
    pub retreat_velocity: Vec2,
    /// Origin of the player-detection ray; x is mirrored with facing
    pub player_check: Vec2,
    pub player_check_distance: f32,
    pub player_mask: LayerMask,
    /// Seconds between death and removal
    pub death_duration: f32,
    pub stunned_duration: f32,
    pub stunned_velocity: Vec2,
    /// Reacts to the player's counter attack
    pub counterable: bool,
    pub combo_limit: u32,
    pub combo_reset_time: f32,
    pub attack_velocity: &'static [Vec2],
    pub attack_velocity_duration: f32,
    pub motion: MotionConfig,
    pub probes: ProbeConfig,
    pub health: HealthConfig,
    pub combat: CombatConfig,
}

pub const RONIN: EnemyConfig = EnemyConfig {
    idle_time: 2.0,
    move_speed: 1.4,
    move_anim_speed_multiplier: 1.0,
    battle_move_speed: 5.0,
    attack_distance: 2.0,
    battle_time_duration: 5.0,
    min_retreat_distance: 1.0,
    retreat_velocity: Vec2::new(5.0, 0.0),
    player_check: Vec2::new(0.3, 1.0),
    player_check_distance: 10.0,
    player_mask: LayerMask::from_layer(CollisionLayer::Player),
    death_duration: 2.0,
    stunned_duration: 1.0,
    stunned_velocity: Vec2::new(7.0, 7.0),
    counterable: true,
    combo_limit: DEFAULT_COMBO_LIMIT,
    combo_reset_time: 1.0,
    attack_velocity: &RONIN_ATTACK_VELOCITY,
    attack_velocity_duration: 0.1,
    motion: BASE_MOTION,
    // Ground ray sits under the leading foot so patrols stop at ledges
    probes: ProbeConfig {
        ground_check: Vec2::new(0.5, 0.1),
        ..BASE_PROBES
    },
    health: BASE_HEALTH,
    combat: CombatConfig {
        target_mask: LayerMask::from_layer(CollisionLayer::Player),
        target_check: Vec2::new(0.8, 1.0),
        damage: 10.0,
        attacks: &RONIN_ATTACKS,
    },
};

impl Default for EnemyConfig {
    fn default() -> Self {
        RONIN
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.idle_time, "idle_time")?;
        positive(self.move_speed, "move_speed")?;
        positive(self.battle_move_speed, "battle_move_speed")?;
        positive(self.attack_distance, "attack_distance")?;
        positive(self.battle_time_duration, "battle_time_duration")?;
        positive(self.player_check_distance, "player_check_distance")?;
        positive(self.death_duration, "death_duration")?;
        positive(self.stunned_duration, "stunned_duration")?;
        positive(self.combo_reset_time, "combo_reset_time")?;
        positive(self.attack_velocity_duration, "attack_velocity_duration")?;
        if self.min_retreat_distance < 0.0 {
            return Err(ConfigError::NonPositive("min_retreat_distance"));
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
        assert_eq!(RONIN.validate(), Ok(()));
    }

    #[test]
    fn test_zero_idle_time_rejected() {
        let config = EnemyConfig {
            idle_time: 0.0,
            ..RONIN
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositive("idle_time")));
    }
}
