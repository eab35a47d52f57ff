// Health, damage tiers and knockback

use glam::Vec2;

use crate::game::config::ConfigError;

/// Damage response tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthConfig {
    pub max_health: f32,
    /// Knockback for ordinary hits (x is mirrored away from the attacker)
    pub knockback: Vec2,
    pub knockback_duration: f32,
    /// Knockback once a single hit exceeds the heavy threshold
    pub heavy_knockback: Vec2,
    pub heavy_knockback_duration: f32,
    /// Fraction of max health a single hit must exceed to count as heavy
    pub heavy_damage_threshold: f32,
}

pub const BASE_HEALTH: HealthConfig = HealthConfig {
    max_health: 100.0,
    knockback: Vec2::new(1.5, 0.0),
    knockback_duration: 0.2,
    heavy_knockback: Vec2::new(10.0, 0.0),
    heavy_knockback_duration: 0.5,
    heavy_damage_threshold: 0.3,
};

impl Default for HealthConfig {
    fn default() -> Self {
        BASE_HEALTH
    }
}

impl HealthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0.0 {
            return Err(ConfigError::NonPositive("max_health"));
        }
        if !(0.0..=1.0).contains(&self.heavy_damage_threshold) {
            return Err(ConfigError::HeavyThreshold(self.heavy_damage_threshold));
        }
        if self.knockback_duration < 0.0 {
            return Err(ConfigError::NonPositive("knockback_duration"));
        }
        if self.heavy_knockback_duration < 0.0 {
            return Err(ConfigError::NonPositive("heavy_knockback_duration"));
        }
        Ok(())
    }
}

/// What a landed hit asks the owning entity to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub knockback: Vec2,
    pub knockback_duration: f32,
    pub heavy: bool,
    /// True only for the hit that brought health to zero
    pub died: bool,
}

#[derive(Debug, Clone)]
pub struct Health {
    config: HealthConfig,
    current: f32,
    dead: bool,
}

impl Health {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            current: config.max_health,
            config,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.config.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_heavy(&self, damage: f32) -> bool {
        damage / self.config.max_health > self.config.heavy_damage_threshold
    }

    /// Apply `damage` from an attacker standing at `attacker_x`.
    ///
    /// Returns `None` once dead: health, knockback and death are all left alone.
    pub fn take_damage(&mut self, damage: f32, own_x: f32, attacker_x: f32) -> Option<DamageOutcome> {
        if self.dead {
            return None;
        }

        let heavy = self.is_heavy(damage);
        let direction = if own_x > attacker_x { 1.0 } else { -1.0 };
        let (mut knockback, knockback_duration) = if heavy {
            (self.config.heavy_knockback, self.config.heavy_knockback_duration)
        } else {
            (self.config.knockback, self.config.knockback_duration)
        };
        knockback.x *= direction;

        self.current -= damage;
        let died = self.current <= 0.0;
        if died {
            self.dead = true;
        }

        Some(DamageOutcome {
            knockback,
            knockback_duration,
            heavy,
            died,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_heavy_hit_uses_heavy_tier() {
        let mut health = Health::new(BASE_HEALTH);
        let outcome = health.take_damage(40.0, 0.0, 5.0).expect("alive");

        assert!(outcome.heavy);
        assert_relative_eq!(outcome.knockback.x, -10.0);
        assert_relative_eq!(outcome.knockback_duration, 0.5);
        assert_relative_eq!(health.current(), 60.0);
        assert!(!outcome.died);
    }

    #[test]
    fn test_light_hit_pushes_away_from_attacker() {
        let mut health = Health::new(BASE_HEALTH);
        let outcome = health.take_damage(10.0, 3.0, 1.0).expect("alive");

        assert!(!outcome.heavy);
        assert_relative_eq!(outcome.knockback.x, 1.5);
        assert_relative_eq!(outcome.knockback_duration, 0.2);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let health = Health::new(BASE_HEALTH);
        assert!(!health.is_heavy(30.0));
        assert!(health.is_heavy(31.0));
    }

    #[test]
    fn test_death_is_terminal() {
        let mut health = Health::new(BASE_HEALTH);
        let outcome = health.take_damage(100.0, 0.0, 1.0).expect("alive");
        assert!(outcome.died);
        assert!(health.is_dead());

        assert!(health.take_damage(50.0, 0.0, 1.0).is_none());
        assert_relative_eq!(health.current(), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = HealthConfig {
            heavy_damage_threshold: 1.5,
            ..BASE_HEALTH
        };
        assert!(config.validate().is_err());
        assert!(BASE_HEALTH.validate().is_ok());
    }
}
