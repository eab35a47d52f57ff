use crate::game::enemy::{EnemyCtx, EnemyStateId};
use crate::game::fsm::{EntityState, Transition};

/// Terminal state; removal is counted down by the enemy itself
#[derive(Debug, Default)]
pub struct Death;

impl<'a> EntityState<EnemyCtx<'a>, EnemyStateId> for Death {
    fn enter(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        log::info!("Enemy {} died", ctx.core.entity.id);
        ctx.core.set_counter_window(false);
        Transition::Halt
    }

    fn update(&mut self, _ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        Transition::Stay
    }
}
