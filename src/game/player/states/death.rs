use glam::Vec2;

use crate::game::fsm::{EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Terminal state: input off, body out of the simulation, machine halted
#[derive(Debug, Default)]
pub struct Death;

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for Death {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        log::info!("Player {} died", ctx.core.entity.id);
        ctx.core.disable_input();
        ctx.core.entity.body.simulated = false;
        ctx.core.entity.body.velocity = Vec2::ZERO;
        Transition::Halt
    }

    fn update(&mut self, _ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        Transition::Stay
    }
}
