use crate::engine::input::Action;
use crate::game::combo::{Combo, Lunge};
use crate::game::fsm::{AnimationEvent, EntityState, Transition};
use crate::game::player::{PlayerCtx, PlayerStateId};

/// Animator integer selecting the clip for the current hit
pub const ATTACK_INDEX_PARAM: &str = "basicAttackIndex";

/// Grounded melee combo.
///
/// The first press during a swing primes it; a second press queues the next
/// hit. A queued hit starts either at the clip's skip point or when it ends.
#[derive(Debug)]
pub struct BasicAttack {
    combo: Combo,
    lunge: Lunge,
    /// First press seen during this swing
    primed: bool,
    /// Follow-up hit requested
    queued: bool,
    /// The clip reached its skip point
    skip_reached: bool,
}

impl BasicAttack {
    pub fn new(combo: Combo) -> Self {
        Self {
            combo,
            lunge: Lunge::default(),
            primed: false,
            queued: false,
            skip_reached: false,
        }
    }

    pub fn combo(&self) -> &Combo {
        &self.combo
    }
}

impl<'a> EntityState<PlayerCtx<'a>, PlayerStateId> for BasicAttack {
    fn enter(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        self.combo.begin(ctx.frame.time);
        self.lunge.enter();
        self.primed = false;
        self.queued = false;
        self.skip_reached = false;

        ctx.core
            .entity
            .animator
            .set_integer(ATTACK_INDEX_PARAM, self.combo.index() as i32);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'a>) -> Transition<PlayerStateId> {
        let slot = self.combo.slot();
        let table = ctx.core.config.attack_velocity;
        let duration = ctx.core.config.attack_velocity_duration;

        let events = ctx.events;
        for event in events.iter() {
            match event {
                AnimationEvent::VelocityStart => self.lunge.start(),
                AnimationEvent::VelocityStop => self.lunge.stop(),
                AnimationEvent::Skip => self.skip_reached = true,
                AnimationEvent::Flip => {
                    let x = ctx.input.read_movement().x;
                    if ctx.core.entity.handle_flip(x) {
                        self.lunge.reapply(&mut ctx.core.entity, table, slot);
                    }
                }
                _ => {}
            }
        }

        self.lunge
            .update(&mut ctx.core.entity, table, slot, duration, ctx.frame.dt);

        if ctx.pressed(Action::Attack) {
            if !self.primed {
                self.primed = true;
            } else if self.combo.can_chain() {
                self.queued = true;
            }
        }

        if self.skip_reached && self.primed && self.queued {
            ctx.core.queue_attack_reentry();
        }

        if events.contains(AnimationEvent::Finished) {
            if self.queued {
                ctx.core.queue_attack_reentry();
            } else {
                return Transition::Change(PlayerStateId::Idle);
            }
        }
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut PlayerCtx<'a>) {
        self.combo.finish(ctx.frame.time);
    }
}
