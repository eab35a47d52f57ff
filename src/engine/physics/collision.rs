use rapier2d::prelude::*;
use std::ops::BitOr;

/// Collision layers for filtering what objects interact
///
/// Probes select layers through a `LayerMask`; colliders belong to exactly one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionLayer {
    /// Walkable floors and platforms
    Ground = 0b0000_0001,

    /// Climbable/slidable walls
    Wall = 0b0000_0010,

    /// The player character
    Player = 0b0000_0100,

    /// Enemy characters
    Enemy = 0b0000_1000,

    /// Breakable or pushable props (chests)
    Prop = 0b0001_0000,
}

impl CollisionLayer {
    pub const ALL: [CollisionLayer; 5] = [
        CollisionLayer::Ground,
        CollisionLayer::Wall,
        CollisionLayer::Player,
        CollisionLayer::Enemy,
        CollisionLayer::Prop,
    ];

    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Recover the layer from a collider's membership bits
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| bits & layer.bits() != 0)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self.bits());

        let filter = match self {
            // Level geometry blocks every moving thing
            CollisionLayer::Ground | CollisionLayer::Wall => {
                LayerMask::of(&[CollisionLayer::Player, CollisionLayer::Enemy, CollisionLayer::Prop])
            }

            // Characters stand on geometry but pass through each other;
            // hits between them go through overlap queries instead
            CollisionLayer::Player | CollisionLayer::Enemy => {
                LayerMask::of(&[CollisionLayer::Ground, CollisionLayer::Wall])
            }

            CollisionLayer::Prop => {
                LayerMask::of(&[CollisionLayer::Ground, CollisionLayer::Wall, CollisionLayer::Prop])
            }
        };

        InteractionGroups::new(memberships, Group::from_bits_truncate(filter.bits()))
    }
}

/// Bit set of collision layers used by ray and overlap queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    pub const fn from_layer(layer: CollisionLayer) -> Self {
        LayerMask(layer as u32)
    }

    /// Add a layer to the mask
    pub const fn with(self, layer: CollisionLayer) -> Self {
        LayerMask(self.0 | layer as u32)
    }

    pub fn of(layers: &[CollisionLayer]) -> Self {
        Self(layers.iter().fold(0, |bits, layer| bits | layer.bits()))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & layer.bits() != 0
    }

    /// Query filter selecting colliders on any layer in this mask
    pub fn query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Group::from_bits_truncate(self.0))
    }
}

impl From<CollisionLayer> for LayerMask {
    fn from(layer: CollisionLayer) -> Self {
        Self(layer.bits())
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitOr<CollisionLayer> for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: CollisionLayer) -> LayerMask {
        LayerMask(self.0 | rhs.bits())
    }
}
