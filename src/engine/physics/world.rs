use glam::Vec2;
use rapier2d::parry::shape::{Ball, Cuboid, Shape};
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::BodyState;
use super::collision::{CollisionLayer, LayerMask};
use super::query::{OverlapHit, PhysicsQuery, QueryShape, RayHit};
use crate::core::EntityId;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector, chosen by the owner of the world
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for raycasts and shape overlaps
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Game entity owning each simulated body
    entity_bodies: HashMap<EntityId, RigidBodyHandle>,

    /// Reverse lookup used to report which entity a query hit
    collider_to_entity: HashMap<ColliderHandle, EntityId>,
}

impl PhysicsWorld {
    /// Create a physics world pulling bodies along `gravity`
    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![gravity.x, gravity.y],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            entity_bodies: HashMap::new(),
            collider_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep.
    /// Also refreshes the query pipeline, so call once before the first query.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Register an entity's body and collider
    pub fn add_entity(&mut self, entity: EntityId, body: RigidBody, collider: Collider) {
        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        self.entity_bodies.insert(entity, body_handle);
        self.collider_to_entity.insert(collider_handle, entity);
    }

    /// Add level geometry that belongs to no entity
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Remove an entity's body and all its attached colliders
    pub fn remove_entity(&mut self, entity: EntityId) {
        let Some(handle) = self.entity_bodies.remove(&entity) else {
            return;
        };

        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        self.collider_to_entity.retain(|_, owner| *owner != entity);
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entity_bodies.contains_key(&entity)
    }

    /// Copy an entity's behaviour-side body state into the simulation
    pub fn push_state(&mut self, entity: EntityId, state: &BodyState) {
        let Some(body) = self
            .entity_bodies
            .get(&entity)
            .and_then(|handle| self.rigid_body_set.get_mut(*handle))
        else {
            return;
        };

        body.set_enabled(state.simulated);
        body.set_gravity_scale(state.gravity_scale, true);
        body.set_translation(vector![state.position.x, state.position.y], true);
        body.set_linvel(vector![state.velocity.x, state.velocity.y], true);
    }

    /// Copy the integrated position and velocity back out
    pub fn pull_state(&self, entity: EntityId, state: &mut BodyState) {
        let Some(body) = self
            .entity_bodies
            .get(&entity)
            .and_then(|handle| self.rigid_body_set.get(*handle))
        else {
            return;
        };

        let translation = body.translation();
        let velocity = body.linvel();
        state.position = Vec2::new(translation.x, translation.y);
        state.velocity = Vec2::new(velocity.x, velocity.y);
    }

    /// Current gravity
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    fn layer_of(&self, handle: ColliderHandle) -> Option<CollisionLayer> {
        let collider = self.collider_set.get(handle)?;
        CollisionLayer::from_bits(collider.collision_groups().memberships.bits())
    }
}

impl PhysicsQuery for PhysicsWorld {
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }

        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);
        let filter = QueryFilter::new().groups(mask.query_groups());
        let (handle, toi) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        Some(RayHit {
            entity: self.collider_to_entity.get(&handle).copied(),
            layer: self.layer_of(handle)?,
            distance: toi,
        })
    }

    fn overlap(&self, center: Vec2, shape: QueryShape, mask: LayerMask) -> Vec<OverlapHit> {
        let (iso, query_shape): (Isometry<Real>, Box<dyn Shape>) = match shape {
            QueryShape::Box { size, angle } => (
                Isometry::new(vector![center.x, center.y], angle.to_radians()),
                Box::new(Cuboid::new(vector![size.x / 2.0, size.y / 2.0])),
            ),
            QueryShape::Circle { radius } => (
                Isometry::translation(center.x, center.y),
                Box::new(Ball::new(radius)),
            ),
        };

        let filter = QueryFilter::new().groups(mask.query_groups());
        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &iso,
            query_shape.as_ref(),
            filter,
            |handle| {
                if let Some(layer) = self.layer_of(handle) {
                    hits.push(OverlapHit {
                        entity: self.collider_to_entity.get(&handle).copied(),
                        layer,
                    });
                }
                true
            },
        );
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;

    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::with_gravity(Vec2::new(0.0, -30.0));
        // Floor top surface at y = 0
        world.add_static_collider(presets::tile_collider(
            0.0,
            -0.5,
            40.0,
            1.0,
            CollisionLayer::Ground,
        ));
        world
    }

    #[test]
    fn test_raycast_hits_ground_below() {
        let mut world = world_with_floor();
        world.step();

        let hit = world
            .raycast(
                Vec2::new(0.0, 0.3),
                Vec2::NEG_Y,
                0.4,
                CollisionLayer::Ground.into(),
            )
            .expect("floor should be in range");

        assert_eq!(hit.layer, CollisionLayer::Ground);
        assert_eq!(hit.entity, None);
        assert!((hit.distance - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_raycast_respects_mask() {
        let mut world = world_with_floor();
        world.step();

        let hit = world.raycast(
            Vec2::new(0.0, 0.3),
            Vec2::NEG_Y,
            0.4,
            CollisionLayer::Wall.into(),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_raycast_out_of_range() {
        let mut world = world_with_floor();
        world.step();

        let hit = world.raycast(
            Vec2::new(0.0, 2.0),
            Vec2::NEG_Y,
            0.4,
            CollisionLayer::Ground.into(),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_overlap_reports_entity() {
        let mut world = world_with_floor();
        let enemy = EntityId(7);
        world.add_entity(
            enemy,
            presets::character_body(3.0, 0.0),
            presets::character_collider(1.0, 2.0, CollisionLayer::Enemy),
        );
        world.step();

        let hits = world.overlap(
            Vec2::new(3.0, 1.0),
            QueryShape::Box {
                size: Vec2::new(2.0, 1.0),
                angle: 0.0,
            },
            CollisionLayer::Enemy.into(),
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, Some(enemy));
        assert_eq!(hits[0].layer, CollisionLayer::Enemy);

        let misses = world.overlap(
            Vec2::new(-3.0, 1.0),
            QueryShape::Circle { radius: 0.5 },
            CollisionLayer::Enemy.into(),
        );
        assert!(misses.is_empty());
    }

    #[test]
    fn test_state_round_trip_through_step() {
        let mut world = world_with_floor();
        let id = EntityId(1);
        world.add_entity(
            id,
            presets::character_body(0.0, 5.0),
            presets::character_collider(1.0, 2.0, CollisionLayer::Player),
        );

        let mut state = BodyState::at(Vec2::new(0.0, 5.0));
        state.velocity = Vec2::new(2.0, 0.0);
        world.push_state(id, &state);
        world.step();
        world.pull_state(id, &mut state);

        assert!(state.position.x > 0.0);
        assert!(state.velocity.y < 0.0, "gravity pulls the body down");
    }

    #[test]
    fn test_zero_gravity_scale_holds_height() {
        let mut world = world_with_floor();
        let id = EntityId(1);
        world.add_entity(
            id,
            presets::character_body(0.0, 5.0),
            presets::character_collider(1.0, 2.0, CollisionLayer::Player),
        );

        let mut state = BodyState::at(Vec2::new(0.0, 5.0));
        state.gravity_scale = 0.0;
        for _ in 0..10 {
            world.push_state(id, &state);
            world.step();
            world.pull_state(id, &mut state);
        }

        assert!((state.position.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_remove_entity() {
        let mut world = world_with_floor();
        let id = EntityId(3);
        world.add_entity(
            id,
            presets::character_body(0.0, 0.0),
            presets::character_collider(1.0, 2.0, CollisionLayer::Enemy),
        );
        assert!(world.contains(id));

        world.remove_entity(id);
        world.step();

        assert!(!world.contains(id));
        let hits = world.overlap(
            Vec2::new(0.0, 1.0),
            QueryShape::Circle { radius: 1.0 },
            CollisionLayer::Enemy.into(),
        );
        assert!(hits.is_empty());
    }
}
