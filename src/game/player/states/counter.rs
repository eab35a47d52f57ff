use crate::core::Countdown;
use crate::game::entity::CombatRequest;
use crate::game::fsm::{EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Parry stance: stuns counterable enemies caught in the first attack volume
#[derive(Debug, Default)]
pub struct CounterAttack {
    timer: Countdown,
}

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for CounterAttack {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        self.timer.set(ctx.core.config.counter_duration);
        ctx.core.request(CombatRequest::Counter);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        self.timer.tick(ctx.frame.dt);
        if self.timer.has_expired() {
            return Transition::Change(PlayerStateId::Idle);
        }
        Transition::Stay
    }
}
