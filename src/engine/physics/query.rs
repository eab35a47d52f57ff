// The physics query surface consumed by probes and combat resolution

use super::collision::{CollisionLayer, LayerMask};
use crate::core::EntityId;
use glam::Vec2;

/// First collider hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Game entity owning the collider, if any (level geometry has none)
    pub entity: Option<EntityId>,
    pub layer: CollisionLayer,
    pub distance: f32,
}

/// A collider found inside an overlap volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub entity: Option<EntityId>,
    pub layer: CollisionLayer,
}

/// Volume tested by an overlap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryShape {
    /// Rectangle of full `size`, rotated by `angle` degrees around its centre
    Box { size: Vec2, angle: f32 },
    Circle { radius: f32 },
}

/// Ray and overlap queries against the collision world
pub trait PhysicsQuery {
    /// Cast a ray and return the nearest hit on any layer in `mask`
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask)
        -> Option<RayHit>;

    /// Every collider on a layer in `mask` overlapping `shape` placed at `center`
    fn overlap(&self, center: Vec2, shape: QueryShape, mask: LayerMask) -> Vec<OverlapHit>;
}

/// A world with nothing in it: every ray misses and every overlap is empty
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyWorld;

impl PhysicsQuery for EmptyWorld {
    fn raycast(&self, _origin: Vec2, _direction: Vec2, _max_distance: f32, _mask: LayerMask)
        -> Option<RayHit> {
        None
    }

    fn overlap(&self, _center: Vec2, _shape: QueryShape, _mask: LayerMask) -> Vec<OverlapHit> {
        Vec::new()
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted query backend for state-logic tests.

    use super::*;

    /// Vertical wall segment at `x` spanning `y_min..=y_max`
    #[derive(Debug, Clone, Copy)]
    pub struct WallSpan {
        pub x: f32,
        pub y_min: f32,
        pub y_max: f32,
    }

    /// Axis-aligned actor box
    #[derive(Debug, Clone, Copy)]
    pub struct StubActor {
        pub entity: EntityId,
        pub layer: CollisionLayer,
        pub center: Vec2,
        pub half_extents: Vec2,
    }

    /// Flat world: an optional floor height, wall spans and actor boxes.
    /// Rays are assumed axis aligned and box rotation is ignored.
    #[derive(Debug, Default, Clone)]
    pub struct ProbeStub {
        pub floor: Option<f32>,
        /// Horizontal extent of the floor; unbounded when `None`
        pub floor_span: Option<(f32, f32)>,
        pub walls: Vec<WallSpan>,
        pub actors: Vec<StubActor>,
    }

    impl ProbeStub {
        pub fn with_floor(y: f32) -> Self {
            Self {
                floor: Some(y),
                ..Self::default()
            }
        }

        /// Floor at `y` that only exists between `x_min` and `x_max`
        pub fn ledge(y: f32, x_min: f32, x_max: f32) -> Self {
            Self {
                floor: Some(y),
                floor_span: Some((x_min, x_max)),
                ..Self::default()
            }
        }

        pub fn wall(mut self, x: f32, y_min: f32, y_max: f32) -> Self {
            self.walls.push(WallSpan { x, y_min, y_max });
            self
        }

        pub fn actor(mut self, entity: EntityId, layer: CollisionLayer, center: Vec2) -> Self {
            self.actors.push(StubActor {
                entity,
                layer,
                center,
                half_extents: Vec2::new(0.5, 1.0),
            });
            self
        }
    }

    impl PhysicsQuery for ProbeStub {
        fn raycast(
            &self,
            origin: Vec2,
            direction: Vec2,
            max_distance: f32,
            mask: LayerMask,
        ) -> Option<RayHit> {
            let mut best: Option<RayHit> = None;
            let mut consider = |hit: RayHit| {
                if best.map_or(true, |b| hit.distance < b.distance) {
                    best = Some(hit);
                }
            };

            if direction.y < 0.0 && mask.contains(CollisionLayer::Ground) {
                let over_floor = self
                    .floor_span
                    .map_or(true, |(min, max)| (min..=max).contains(&origin.x));
                if let Some(floor) = self.floor.filter(|_| over_floor) {
                    let distance = origin.y - floor;
                    if (0.0..=max_distance).contains(&distance) {
                        consider(RayHit {
                            entity: None,
                            layer: CollisionLayer::Ground,
                            distance,
                        });
                    }
                }
            }

            if direction.x != 0.0 {
                if mask.contains(CollisionLayer::Wall) {
                    for wall in &self.walls {
                        let distance = (wall.x - origin.x) * direction.x.signum();
                        let in_span = (wall.y_min..=wall.y_max).contains(&origin.y);
                        if in_span && (0.0..=max_distance).contains(&distance) {
                            consider(RayHit {
                                entity: None,
                                layer: CollisionLayer::Wall,
                                distance,
                            });
                        }
                    }
                }

                for actor in self.actors.iter().filter(|a| mask.contains(a.layer)) {
                    let near_face = actor.center.x - actor.half_extents.x * direction.x.signum();
                    let distance = (near_face - origin.x) * direction.x.signum();
                    let in_span = (origin.y - actor.center.y).abs() <= actor.half_extents.y;
                    if in_span && (0.0..=max_distance).contains(&distance) {
                        consider(RayHit {
                            entity: Some(actor.entity),
                            layer: actor.layer,
                            distance,
                        });
                    }
                }
            }

            best
        }

        fn overlap(&self, center: Vec2, shape: QueryShape, mask: LayerMask) -> Vec<OverlapHit> {
            let half = match shape {
                QueryShape::Box { size, .. } => size * 0.5,
                QueryShape::Circle { radius } => Vec2::splat(radius),
            };

            self.actors
                .iter()
                .filter(|a| mask.contains(a.layer))
                .filter(|a| {
                    let delta = (a.center - center).abs();
                    delta.x <= half.x + a.half_extents.x && delta.y <= half.y + a.half_extents.y
                })
                .map(|a| OverlapHit {
                    entity: Some(a.entity),
                    layer: a.layer,
                })
                .collect()
        }
    }
}
