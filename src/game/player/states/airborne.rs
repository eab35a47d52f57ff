use super::{air_control, try_jump};
use crate::engine::input::Action;
use crate::game::fsm::{EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Rising part of a jump with variable height
#[derive(Debug, Default)]
pub struct Jump {
    /// The button has been let go during this jump
    released: bool,
}

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for Jump {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        self.released = false;
        ctx.core.jump.add_jump();
        let vx = ctx.velocity().x;
        let force = ctx.core.config.jump_force;
        ctx.core.entity.set_velocity_y(vx, force);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        air_control(ctx);

        let velocity = ctx.velocity();
        if velocity.y < 0.0 {
            return Transition::Change(PlayerStateId::Fall);
        }

        // Short hop: cut the rise once, on the first tick the button is up
        if !self.released && !ctx.held(Action::Jump) {
            self.released = true;
            if velocity.y > 0.0 {
                ctx.core.entity.set_velocity_y(velocity.x, velocity.y * 0.5);
            }
        }
        Transition::Stay
    }
}

#[derive(Debug, Default)]
pub struct Fall;

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for Fall {
    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        air_control(ctx);

        if ctx.core.entity.ground_detected() {
            return Transition::Change(PlayerStateId::Idle);
        }
        if try_jump(ctx) {
            return Transition::Change(PlayerStateId::Jump);
        }
        if !ctx.core.entity.wall_detected() {
            return Transition::Stay;
        }
        if ctx.pressed(Action::Jump) {
            return Transition::Change(PlayerStateId::WallJump);
        }
        Transition::Change(PlayerStateId::WallSlide)
    }
}
