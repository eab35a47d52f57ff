// Core utilities shared by the engine and game layers

pub mod math;
pub mod timer;

pub use timer::{Countdown, Frame};

/// Handle addressing a game entity in the arena registry.
///
/// Holders never own the entity; a stale handle simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
