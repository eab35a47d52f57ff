// Enemy AI state graph

mod attack;
mod battle;
mod death;
mod grounded;
mod stunned;

pub use attack::{Attack, ENEMY_ATTACK_INDEX_PARAM};
pub use battle::Battle;
pub use death::Death;
pub use grounded::{Idle, Move};
pub use stunned::Stunned;

use super::{EnemyCtx, EnemyStateId};

/// Patrol states drop everything once the player shows up in front
fn grounded_transition(ctx: &mut EnemyCtx<'_>) -> Option<EnemyStateId> {
    ctx.player_detected().map(|_| EnemyStateId::Battle)
}
