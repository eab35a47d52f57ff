use glam::Vec2;

use crate::game::enemy::{EnemyCtx, EnemyStateId};
use crate::game::fsm::{EntityState, Transition};

/// Chase the target, back off when too close, attack when in range.
/// Leaves after `battle_time_duration` without seeing the player.
#[derive(Debug, Default)]
pub struct Battle {
    last_time_in_battle: f32,
}

impl Battle {
    fn is_over(&self, ctx: &EnemyCtx<'_>) -> bool {
        ctx.frame.time > self.last_time_in_battle + ctx.core.config.battle_time_duration
    }
}

impl<'a> EntityState<EnemyCtx<'a>, EnemyStateId> for Battle {
    fn enter(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        self.last_time_in_battle = ctx.frame.time;

        if ctx.core.target().is_none() {
            let detected = ctx.player_detected();
            ctx.core.set_target(detected);
        }

        if ctx.distance_to_target() < ctx.core.config.min_retreat_distance {
            let direction = ctx.direction_to_target();
            let retreat = ctx.core.config.retreat_velocity.x * -(direction as f32);
            let vy = ctx.velocity().y;
            // Overrides any knockback still in flight
            ctx.core.entity.body.velocity = Vec2::new(retreat, vy);
            ctx.core.entity.handle_flip(direction as f32);
        }
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        let detected = ctx.player_detected().is_some();
        if detected {
            self.last_time_in_battle = ctx.frame.time;
        }

        if self.is_over(ctx) {
            return Transition::Change(EnemyStateId::Idle);
        }

        if detected && ctx.distance_to_target() < ctx.core.config.attack_distance {
            return Transition::Change(EnemyStateId::Attack);
        }

        let speed = ctx.core.config.battle_move_speed * ctx.direction_to_target() as f32;
        let vy = ctx.velocity().y;
        let dt = ctx.frame.dt;
        ctx.core.entity.set_velocity_x(speed, vy, dt);
        Transition::Stay
    }
}
