use crate::game::combo::{Combo, Lunge};
use crate::game::enemy::{EnemyCtx, EnemyStateId};
use crate::game::fsm::{AnimationEvent, EntityState, Transition};

/// Animator integer selecting the enemy's attack clip
pub const ENEMY_ATTACK_INDEX_PARAM: &str = "attackIndex";

/// One swing of the enemy combo; back to Battle when the clip ends
#[derive(Debug)]
pub struct Attack {
    combo: Combo,
    lunge: Lunge,
}

impl Attack {
    pub fn new(combo: Combo) -> Self {
        Self {
            combo,
            lunge: Lunge::default(),
        }
    }

    pub fn combo(&self) -> &Combo {
        &self.combo
    }
}

impl<'a> EntityState<EnemyCtx<'a>, EnemyStateId> for Attack {
    fn enter(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        self.combo.begin(ctx.frame.time);
        self.lunge.enter();
        ctx.core
            .entity
            .animator
            .set_integer(ENEMY_ATTACK_INDEX_PARAM, self.combo.index() as i32);
        Transition::Stay
    }

    fn update(&mut self, ctx: &mut EnemyCtx<'a>) -> Transition<EnemyStateId> {
        let events = ctx.events;
        if events.contains(AnimationEvent::VelocityStart) {
            self.lunge.start();
        }
        if events.contains(AnimationEvent::VelocityStop) {
            self.lunge.stop();
        }

        let config = &ctx.core.config;
        let (table, duration) = (config.attack_velocity, config.attack_velocity_duration);
        self.lunge.update(
            &mut ctx.core.entity,
            table,
            self.combo.slot(),
            duration,
            ctx.frame.dt,
        );

        if events.contains(AnimationEvent::Finished) {
            return Transition::Change(EnemyStateId::Battle);
        }
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut EnemyCtx<'a>) {
        self.combo.finish(ctx.frame.time);
    }
}
