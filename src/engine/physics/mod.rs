// Physics system using rapier2d

pub mod body;
mod collision;
mod query;
mod world;

pub use body::BodyState;
pub use collision::{CollisionLayer, LayerMask};
pub use query::{EmptyWorld, OverlapHit, PhysicsQuery, QueryShape, RayHit};
pub use world::PhysicsWorld;

#[cfg(test)]
pub use query::testing;
