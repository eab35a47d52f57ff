use super::collision::CollisionLayer;
use glam::Vec2;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Simulation-facing state of an entity's rigid body.
///
/// The behaviour core reads and writes this every tick; the physics world
/// copies it in before a step and back out after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    /// When false the body is removed from simulation (frozen in place)
    pub simulated: bool,
}

impl BodyState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            simulated: true,
        }
    }
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            gravity_scale: 1.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            gravity_scale: 0.0,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (characters must stay upright)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    layer: CollisionLayer,
    offset: Vector<Real>,
    friction: Real,
    restitution: Real,
    density: Real,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real, layer: CollisionLayer) -> Self {
        Self {
            shape: SharedShape::cuboid(half_width, half_height),
            layer,
            offset: Vector::zeros(),
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Create a capsule-shaped collider (good for characters)
    pub fn capsule(half_height: Real, radius: Real, layer: CollisionLayer) -> Self {
        let a = point![0.0, -half_height];
        let b = point![0.0, half_height];
        Self {
            shape: SharedShape::capsule(a, b, radius),
            layer,
            offset: Vector::zeros(),
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Offset the shape from the body origin
    pub fn offset(mut self, x: Real, y: Real) -> Self {
        self.offset = vector![x, y];
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        ColliderBuilder::new(self.shape)
            .translation(self.offset)
            .collision_groups(self.layer.to_interaction_groups())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .build()
    }
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Character body (dynamic, rotation locked, never sleeps).
    /// The body origin sits at the character's feet.
    pub fn character_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Character capsule standing on the body origin
    pub fn character_collider(width: Real, height: Real, layer: CollisionLayer) -> Collider {
        let radius = width / 2.0;
        let half_height = (height / 2.0) - radius;

        ColliderBuilder2D::capsule(half_height, radius, layer)
            .offset(0.0, height / 2.0)
            .friction(0.0) // No friction so walls don't hold characters up
            .build()
    }

    /// Fixed tile of level geometry (ground or wall) centred at x, y
    pub fn tile_collider(
        x: Real,
        y: Real,
        width: Real,
        height: Real,
        layer: CollisionLayer,
    ) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0, layer)
            .offset(x, y)
            .friction(0.3)
            .build()
    }

    /// Loose prop (chest) body
    pub fn prop_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic().position(x, y).build()
    }

    pub fn prop_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0, CollisionLayer::Prop)
            .offset(0.0, height / 2.0)
            .friction(0.6)
            .restitution(0.1)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::new_dynamic().position(10.0, 20.0).build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
    }

    #[test]
    fn test_character_preset() {
        let body = presets::character_body(0.0, 0.0);
        let collider = presets::character_collider(1.0, 2.0, CollisionLayer::Player);

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert!(body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));
        assert_eq!(collider.friction(), 0.0);
        assert_eq!(
            collider.collision_groups().memberships.bits(),
            CollisionLayer::Player.bits()
        );
    }

    #[test]
    fn test_body_state_defaults() {
        let state = BodyState::at(Vec2::new(1.0, 2.0));
        assert_eq!(state.velocity, Vec2::ZERO);
        assert_eq!(state.gravity_scale, 1.0);
        assert!(state.simulated);
    }
}
