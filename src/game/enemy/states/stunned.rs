use glam::Vec2;

use crate::core::Countdown;
use crate::game::enemy::{EnemyCtx, EnemyStateId};
use crate::game::fsm::{EntityState, Transition};

/// Knocked off balance by a counter attack
#[derive(Debug, Default)]
pub struct Stunned {
    timer: Countdown,
}

impl<'a> EntityState<EnemyCtx<'a>, EnemyStateId> for Stunned {
    fn enter(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        ctx.core.set_counter_window(false);
        self.timer.set(ctx.core.config.stunned_duration);

        let stunned = ctx.core.config.stunned_velocity;
        let facing = ctx.core.entity.facing_direction() as f32;
        ctx.core.entity.body.velocity = Vec2::new(stunned.x * -facing, stunned.y);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        self.timer.tick(ctx.frame.dt);
        if self.timer.has_expired() {
            return Transition::Change(EnemyStateId::Idle);
        }
        Transition::Stay
    }
}
