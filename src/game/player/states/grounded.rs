use super::{grounded_enter, grounded_transition};
use crate::core::math::approx_equal;
use crate::game::fsm::{EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Below this the idle brake stops re-issuing a zero target
const IDLE_VELOCITY_EPSILON: f32 = 0.01;

#[derive(Debug, Default)]
pub struct Idle;

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for Idle {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        if let Transition::Change(next) = grounded_enter(ctx) {
            return Transition::Change(next);
        }
        let vy = ctx.velocity().y;
        let dt = ctx.frame.dt;
        ctx.core.entity.set_velocity_x(0.0, vy, dt);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_transition(ctx) {
            return Transition::Change(next);
        }

        let velocity = ctx.velocity();
        if velocity.x.abs() > IDLE_VELOCITY_EPSILON {
            let dt = ctx.frame.dt;
            ctx.core.entity.set_velocity_x(0.0, velocity.y, dt);
        }

        let x = ctx.movement().x;
        let facing = ctx.core.entity.facing_direction() as f32;
        // Pushing into a wall keeps the player idle
        if approx_equal(x, facing, f32::EPSILON) && ctx.core.entity.wall_detected() {
            return Transition::Stay;
        }
        if x != 0.0 {
            return Transition::Change(PlayerStateId::Move);
        }
        Transition::Stay
    }
}

#[derive(Debug, Default)]
pub struct Move;

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for Move {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        grounded_enter(ctx)
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        if let Some(next) = grounded_transition(ctx) {
            return Transition::Change(next);
        }

        let x = ctx.movement().x;
        if x == 0.0 || ctx.core.entity.wall_detected() {
            return Transition::Change(PlayerStateId::Idle);
        }

        let vy = ctx.velocity().y;
        let dt = ctx.frame.dt;
        ctx.core.entity.set_velocity_x(x * ctx.core.config.move_speed, vy, dt);
        Transition::Stay
    }
}
