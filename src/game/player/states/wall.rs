use crate::engine::input::Action;
use crate::game::fsm::{EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Slide velocity changes smaller than this are not re-applied
const MIN_SLIDE_ADJUSTMENT: f32 = 0.1;

/// Pressed against a wall while airborne
#[derive(Debug, Default)]
pub struct WallSlide;

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for WallSlide {
    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        let input = ctx.movement();
        let vy = ctx.velocity().y;

        // Holding down drops at full speed
        let target = if input.y < 0.0 {
            vy
        } else {
            vy * ctx.core.config.wall_slide_multiplier
        };
        if (target - vy).abs() > MIN_SLIDE_ADJUSTMENT {
            ctx.core.entity.set_velocity_y(input.x, target);
        }

        if ctx.pressed(Action::Jump) {
            return Transition::Change(PlayerStateId::WallJump);
        }
        if ctx.core.entity.ground_detected() {
            if ctx.core.entity.facing_direction() as f32 != input.x {
                ctx.core.entity.flip();
            }
            return Transition::Change(PlayerStateId::Idle);
        }
        if !ctx.core.entity.wall_detected() {
            return Transition::Change(PlayerStateId::Fall);
        }
        Transition::Stay
    }
}

/// Kick off a wall, away from it
#[derive(Debug, Default)]
pub struct WallJump {
    /// A follow-up wall jump was already spent in this chain
    performed: bool,
    /// Set when re-entering from a follow-up wall jump
    chained: bool,
}

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for WallJump {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        if !std::mem::take(&mut self.chained) {
            self.performed = false;
        }

        let facing = ctx.core.entity.facing_direction();
        let direction = -facing;
        let force = ctx.core.config.wall_jump_force;
        ctx.core.entity.set_velocity_y(force.x * direction as f32, force.y);
        if direction != facing {
            ctx.core.entity.flip();
        }
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        if ctx.velocity().y < 0.0 {
            return Transition::Change(PlayerStateId::Fall);
        }
        if !ctx.core.entity.wall_detected() {
            return Transition::Stay;
        }

        if ctx.pressed(Action::Jump) && !self.performed {
            self.performed = true;
            self.chained = true;
            return Transition::Change(PlayerStateId::WallJump);
        }
        Transition::Change(PlayerStateId::WallSlide)
    }
}
