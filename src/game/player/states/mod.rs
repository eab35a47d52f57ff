// Player state graph
//
// Grounded states (Idle, Move) share the jump/fall/attack rules below, and
// airborne states (Jump, Fall) share air control. A shared rule that fires
// ends the tick's update for that state.

mod airborne;
mod attack;
mod counter;
mod dash;
mod death;
mod grounded;
mod wall;

pub use airborne::{Fall, Jump};
pub use attack::{BasicAttack, ATTACK_INDEX_PARAM};
pub use counter::CounterAttack;
pub use dash::Dash;
pub use death::Death;
pub use grounded::{Idle, Move};
pub use wall::{WallJump, WallSlide};

use super::{PlayerCtx, PlayerStateId};
use crate::engine::input::Action;
use crate::game::fsm::Transition;

/// On landing: refill jumps and take a buffered jump if there is one
fn grounded_enter(ctx: &mut PlayerCtx<'_>) -> Transition<PlayerStateId> {
    ctx.core.jump.reset_jumps();
    if ctx.core.jump.has_jump_buffer() {
        ctx.core.jump.consume_jump_buffer();
        return Transition::Change(PlayerStateId::Jump);
    }
    Transition::Stay
}

/// Transitions every grounded state checks first, highest priority first
fn grounded_transition(ctx: &mut PlayerCtx<'_>) -> Option<PlayerStateId> {
    if try_jump(ctx) {
        return Some(PlayerStateId::Jump);
    }
    if !ctx.core.entity.ground_detected() && ctx.velocity().y < 0.0 {
        return Some(PlayerStateId::Fall);
    }
    if ctx.pressed(Action::CounterAttack) {
        return Some(PlayerStateId::CounterAttack);
    }
    if ctx.pressed(Action::Attack) {
        return Some(PlayerStateId::BasicAttack);
    }
    None
}

/// A fresh jump press that is allowed either by coyote time or by a spare
/// air jump. Spends the coyote jump when it was used.
fn try_jump(ctx: &mut PlayerCtx<'_>) -> bool {
    if !ctx.pressed(Action::Jump) {
        return false;
    }

    let grounded = ctx.core.entity.ground_detected();
    let coyote = ctx.core.jump.can_coyote_jump(grounded);
    if !coyote && !ctx.core.jump.has_extra_jump(ctx.core.config.max_jumps) {
        return false;
    }
    if coyote {
        ctx.core.jump.consume_coyote_jump();
    }
    true
}

/// Horizontal steering while airborne
fn air_control(ctx: &mut PlayerCtx<'_>) {
    let x = ctx.movement().x;
    if x == 0.0 {
        return;
    }
    let config = &ctx.core.config;
    let speed = x * config.move_speed * config.in_air_move_multiplier;
    let vy = ctx.velocity().y;
    let dt = ctx.frame.dt;
    ctx.core.entity.set_velocity_x(speed, vy, dt);
}
