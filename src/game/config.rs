// Shared tunables and configuration errors
//
// Every entity is built from a const default block (see `BASE_PLAYER`,
// `RONIN`) that can be overridden field by field with struct update syntax.
// Values are validated once at construction and never change afterwards.

use glam::Vec2;
use thiserror::Error;

use crate::engine::physics::{CollisionLayer, LayerMask};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    #[error("heavy damage threshold {0} is outside 0..=1")]
    HeavyThreshold(f32),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("attack {index}: {reason}")]
    Attack { index: usize, reason: &'static str },
}

/// Check that a tunable is strictly positive
pub(crate) fn positive(value: f32, name: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive(name))
    }
}

/// Velocity smoothing and body dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Smoothing time toward a moving target velocity
    pub smooth_time: f32,
    /// Smoothing time when the horizontal target is exactly zero
    pub stop_smooth_time: f32,
    /// Character width in world units
    pub width: f32,
    /// Character height in world units
    pub height: f32,
}

pub const BASE_MOTION: MotionConfig = MotionConfig {
    smooth_time: 0.1,
    stop_smooth_time: 0.1,
    width: 1.0,
    height: 2.0,
};

impl Default for MotionConfig {
    fn default() -> Self {
        BASE_MOTION
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.smooth_time, "smooth_time")?;
        positive(self.stop_smooth_time, "stop_smooth_time")?;
        positive(self.width, "width")?;
        positive(self.height, "height")
    }
}

/// Ground and wall probe placement, relative to the body origin (feet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    /// Origin of the downward ground ray
    pub ground_check: Vec2,
    pub ground_check_distance: f32,
    pub ground_mask: LayerMask,
    /// Origins of the two forward wall rays; x is mirrored with facing
    pub wall_check_high: Vec2,
    pub wall_check_low: Vec2,
    pub wall_check_distance: f32,
    pub wall_mask: LayerMask,
}

pub const BASE_PROBES: ProbeConfig = ProbeConfig {
    ground_check: Vec2::new(0.0, 0.1),
    ground_check_distance: 0.4,
    ground_mask: LayerMask::from_layer(CollisionLayer::Ground),
    wall_check_high: Vec2::new(0.3, 1.6),
    wall_check_low: Vec2::new(0.3, 0.4),
    wall_check_distance: 0.4,
    wall_mask: LayerMask::from_layer(CollisionLayer::Wall),
};

impl Default for ProbeConfig {
    fn default() -> Self {
        BASE_PROBES
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.ground_check_distance, "ground_check_distance")?;
        positive(self.wall_check_distance, "wall_check_distance")
    }
}
