use super::grounded_transition;
use crate::core::Countdown;
use crate::game::enemy::{EnemyCtx, EnemyStateId};
use crate::game::fsm::{EntityState, Transition};

/// Below this the idle brake stops re-issuing a zero target
const IDLE_VELOCITY_EPSILON: f32 = 0.01;

/// Stand still for `idle_time`, then patrol
#[derive(Debug, Default)]
pub struct Idle {
    timer: Countdown,
}

impl<'a> EntityState<EnemyCtx<'a>, EnemyStateId> for Idle {
    fn enter(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        self.timer.set(ctx.core.config.idle_time);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        self.timer.tick(ctx.frame.dt);
        if let Some(next) = grounded_transition(ctx) {
            return Transition::Change(next);
        }

        let velocity = ctx.velocity();
        if velocity.x.abs() > IDLE_VELOCITY_EPSILON {
            let dt = ctx.frame.dt;
            ctx.core.entity.set_velocity_x(0.0, velocity.y, dt);
        }

        if self.timer.has_expired() {
            return Transition::Change(EnemyStateId::Move);
        }
        Transition::Stay
    }
}

/// Walk forward until the ground ends or a wall blocks the way
#[derive(Debug, Default)]
pub struct Move;

impl<'a> EntityState<EnemyCtx<'a>, EnemyStateId> for Move {
    fn enter(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        let entity = &mut ctx.core.entity;
        if !entity.ground_detected() || entity.wall_detected() {
            entity.flip();
        }
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        if let Some(next) = grounded_transition(ctx) {
            return Transition::Change(next);
        }

        let speed = ctx.core.config.move_speed * ctx.core.entity.facing_direction() as f32;
        let vy = ctx.velocity().y;
        let dt = ctx.frame.dt;
        ctx.core.entity.set_velocity_x(speed, vy, dt);

        let entity = &ctx.core.entity;
        if !entity.ground_detected() || entity.wall_detected() {
            return Transition::Change(EnemyStateId::Idle);
        }
        Transition::Stay
    }
}
