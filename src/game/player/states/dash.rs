use crate::core::math::sign_or_zero;
use crate::core::Countdown;
use crate::game::fsm::{EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Fixed-speed horizontal burst with gravity suspended
#[derive(Debug)]
pub struct Dash {
    direction: i32,
    timer: Countdown,
    /// Gravity scale to restore on exit
    saved_gravity: f32,
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            direction: 1,
            timer: Countdown::new(),
            saved_gravity: 1.0,
        }
    }
}

impl Dash {
    fn push(&self, ctx: &mut PlayerCtx<'_>) {
        let speed = ctx.core.config.dash_speed * self.direction as f32;
        ctx.core.entity.set_velocity_y(speed, 0.0);
    }
}

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for Dash {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        let facing = ctx.core.entity.facing_direction();
        self.direction = match sign_or_zero(ctx.movement().x) {
            0 => facing,
            direction => direction,
        };
        if self.direction != facing {
            ctx.core.entity.flip();
        }

        self.timer.set(ctx.core.config.dash_duration);
        self.saved_gravity = ctx.core.entity.body.gravity_scale;
        ctx.core.entity.body.gravity_scale = 0.0;
        self.push(ctx);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        self.timer.tick(ctx.frame.dt);

        let grounded = ctx.core.entity.ground_detected();
        if ctx.core.entity.wall_detected() {
            return Transition::Change(if grounded {
                PlayerStateId::Idle
            } else {
                PlayerStateId::WallSlide
            });
        }

        self.push(ctx);

        if self.timer.has_expired() {
            return Transition::Change(if grounded {
                PlayerStateId::Idle
            } else {
                PlayerStateId::Fall
            });
        }
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut PlayerCtx<'a>) {
        ctx.core.entity.set_velocity_y(0.0, 0.0);
        ctx.core.entity.body.gravity_scale = self.saved_gravity;
    }
}
