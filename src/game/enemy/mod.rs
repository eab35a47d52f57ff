// Enemy character: patrol, battle and combo AI over the shared motion core
//
// Enemies never hold references to the player. A detected or provoking player
// is remembered by `EntityId` and resolved each tick through `EntityLookup`,
// so a missing target simply reads as "infinitely far, no direction".

mod config;
mod states;

use std::collections::HashMap;

use glam::Vec2;

use crate::core::{Countdown, EntityId, Frame};
use crate::engine::physics::{CollisionLayer, EmptyWorld, PhysicsQuery};
use crate::game::combo::Combo;
use crate::game::config::ConfigError;
use crate::game::entity::{
    CombatRequest, DamageResult, DamageSource, Damageable, Entity, Health,
};
use crate::game::fsm::{AnimationEvent, AnimationEvents, EntityState, StateMachine, StateTable};

pub use config::{EnemyConfig, RONIN, RONIN_ATTACKS, RONIN_ATTACK_VELOCITY};
pub use states::ENEMY_ATTACK_INDEX_PARAM;
use states::{Attack, Battle, Death, Idle, Move, Stunned};

/// Animator float scaling the move clip
pub const MOVE_ANIM_SPEED_PARAM: &str = "moveAnimSpeedMultiplier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyStateId {
    Idle,
    Move,
    Battle,
    Attack,
    Stunned,
    Death,
}

impl EnemyStateId {
    pub fn anim_bool(self) -> &'static str {
        match self {
            EnemyStateId::Idle => "idle",
            EnemyStateId::Move => "move",
            EnemyStateId::Battle => "battle",
            EnemyStateId::Attack => "attack",
            EnemyStateId::Stunned => "stunned",
            EnemyStateId::Death => "death",
        }
    }
}

/// Positions of other entities, by handle
pub trait EntityLookup {
    fn position_of(&self, id: EntityId) -> Option<Vec2>;
}

impl EntityLookup for HashMap<EntityId, Vec2> {
    fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.get(&id).copied()
    }
}

/// Everything the enemy's states read and write
#[derive(Debug)]
pub struct EnemyCore {
    pub entity: Entity,
    pub config: EnemyConfig,
    pub health: Health,
    target: Option<EntityId>,
    counter_window: bool,
    requests: Vec<CombatRequest>,
}

impl EnemyCore {
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    pub fn set_counter_window(&mut self, open: bool) {
        self.counter_window = open;
    }

    /// Cast the detection ray forward. Ground blocks line of sight; only a
    /// player-layer hit counts as a detection.
    pub fn detect_player(&self, physics: &dyn PhysicsQuery) -> Option<EntityId> {
        let entity = &self.entity;
        let origin = entity.position() + entity.mirrored(self.config.player_check);
        let direction = Vec2::new(entity.facing_direction() as f32, 0.0);
        let mask = self.config.player_mask | entity.probes.ground_mask;

        physics
            .raycast(origin, direction, self.config.player_check_distance, mask)
            .filter(|hit| hit.layer == CollisionLayer::Player)
            .and_then(|hit| hit.entity)
    }
}

/// Per-tick context handed to enemy states
pub struct EnemyCtx<'a> {
    pub core: &'a mut EnemyCore,
    pub physics: &'a dyn PhysicsQuery,
    pub lookup: &'a dyn EntityLookup,
    pub events: &'a AnimationEvents,
    pub frame: Frame,
}

impl EnemyCtx<'_> {
    pub fn player_detected(&self) -> Option<EntityId> {
        self.core.detect_player(self.physics)
    }

    pub fn velocity(&self) -> Vec2 {
        self.core.entity.velocity()
    }

    fn target_position(&self) -> Option<Vec2> {
        self.core
            .target
            .and_then(|target| self.lookup.position_of(target))
    }

    /// Horizontal distance to the target, `f32::MAX` without one
    pub fn distance_to_target(&self) -> f32 {
        self.target_position().map_or(f32::MAX, |target| {
            (target.x - self.core.entity.position().x).abs()
        })
    }

    /// 1 or -1 toward the target, 0 without one
    pub fn direction_to_target(&self) -> i32 {
        match self.target_position() {
            Some(target) if target.x > self.core.entity.position().x => 1,
            Some(_) => -1,
            None => 0,
        }
    }
}

#[derive(Debug)]
pub struct EnemyStates {
    idle: Idle,
    moving: Move,
    battle: Battle,
    attack: Attack,
    stunned: Stunned,
    death: Death,
}

impl<'a> StateTable<EnemyCtx<'a>> for EnemyStates {
    type Id = EnemyStateId;

    fn state_mut(&mut self, id: EnemyStateId) -> &mut dyn EntityState<EnemyCtx<'a>, EnemyStateId> {
        match id {
            EnemyStateId::Idle => &mut self.idle,
            EnemyStateId::Move => &mut self.moving,
            EnemyStateId::Battle => &mut self.battle,
            EnemyStateId::Attack => &mut self.attack,
            EnemyStateId::Stunned => &mut self.stunned,
            EnemyStateId::Death => &mut self.death,
        }
    }

    fn on_enter(&mut self, id: EnemyStateId, ctx: &mut EnemyCtx<'a>) {
        let speed = ctx.core.config.move_anim_speed_multiplier;
        let animator = &mut ctx.core.entity.animator;
        animator.set_bool(id.anim_bool(), true);
        animator.set_float(MOVE_ANIM_SPEED_PARAM, speed);
    }

    fn on_exit(&mut self, id: EnemyStateId, ctx: &mut EnemyCtx<'a>) {
        ctx.core.entity.animator.set_bool(id.anim_bool(), false);
    }
}

#[derive(Debug)]
pub struct Enemy {
    core: EnemyCore,
    states: EnemyStates,
    machine: StateMachine<EnemyStateId>,
    frame: Frame,
    /// Counts down to removal once dead
    despawn: Option<Countdown>,
    /// Player that landed a hit since the last `apply_aggro`
    provoked_by: Option<EntityId>,
}

impl Enemy {
    pub fn new(
        id: EntityId,
        spawn: Vec2,
        config: EnemyConfig,
        physics: &dyn PhysicsQuery,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let combo = Combo::new(
            config.combo_limit,
            config.attack_velocity.len(),
            config.combo_reset_time,
        );
        let mut enemy = Self {
            core: EnemyCore {
                entity: Entity::new(id, spawn, config.motion, config.probes),
                health: Health::new(config.health),
                config,
                target: None,
                counter_window: false,
                requests: Vec::new(),
            },
            states: EnemyStates {
                idle: Idle::default(),
                moving: Move,
                battle: Battle::default(),
                attack: Attack::new(combo),
                stunned: Stunned::default(),
                death: Death,
            },
            machine: StateMachine::new("enemy"),
            frame: Frame::new(0.0, 0.0),
            despawn: None,
            provoked_by: None,
        };

        let lookup: HashMap<EntityId, Vec2> = HashMap::new();
        let events = AnimationEvents::new();
        let mut ctx = EnemyCtx {
            core: &mut enemy.core,
            physics,
            lookup: &lookup,
            events: &events,
            frame: enemy.frame,
        };
        enemy
            .machine
            .initialize(&mut enemy.states, &mut ctx, EnemyStateId::Idle);

        log::info!("Enemy {} spawned at {}", id, spawn);
        Ok(enemy)
    }

    pub fn id(&self) -> EntityId {
        self.core.entity.id
    }

    pub fn entity(&self) -> &Entity {
        &self.core.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.core.entity
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.core.config
    }

    pub fn health(&self) -> &Health {
        &self.core.health
    }

    pub fn state(&self) -> Option<EnemyStateId> {
        self.machine.current()
    }

    pub fn is_in(&self, state: EnemyStateId) -> bool {
        self.machine.is_in(state)
    }

    pub fn target(&self) -> Option<EntityId> {
        self.core.target
    }

    pub fn is_dead(&self) -> bool {
        self.core.health.is_dead()
    }

    pub fn is_counterable(&self) -> bool {
        self.core.config.counterable
    }

    /// The counter window is open
    pub fn can_be_stunned(&self) -> bool {
        self.core.counter_window
    }

    /// Death delay has run out; the arena removes the enemy
    pub fn should_despawn(&self) -> bool {
        self.despawn.is_some_and(|timer| timer.has_expired())
    }

    pub fn combo_slot(&self) -> usize {
        self.states.attack.combo().slot()
    }

    pub fn take_requests(&mut self) -> Vec<CombatRequest> {
        std::mem::take(&mut self.core.requests)
    }

    /// Run one simulation tick
    pub fn update(&mut self, physics: &dyn PhysicsQuery, lookup: &dyn EntityLookup, frame: Frame) {
        self.frame = frame;
        let core = &mut self.core;
        core.entity.tick(frame.dt);
        if !self.machine.is_active() {
            core.entity.events.clear();
            return;
        }

        core.entity.detect_environment(physics);

        let events = core.entity.events.take();
        for event in events.iter() {
            match event {
                AnimationEvent::Strike => core.requests.push(CombatRequest::Strike {
                    slot: self.states.attack.combo().slot(),
                }),
                AnimationEvent::CounterWindowOpen => core.set_counter_window(true),
                AnimationEvent::CounterWindowClose => core.set_counter_window(false),
                _ => {}
            }
        }

        let mut ctx = EnemyCtx {
            core,
            physics,
            lookup,
            events: &events,
            frame,
        };
        self.machine.update_active_state(&mut self.states, &mut ctx);
    }

    /// End-of-frame work: the despawn countdown
    pub fn late_update(&mut self, dt: f32) {
        if let Some(timer) = self.despawn.as_mut() {
            timer.tick(dt);
        }
    }

    /// Lock on to `target` and fight, unless already fighting
    pub fn try_enter_battle_state(
        &mut self,
        target: EntityId,
        physics: &dyn PhysicsQuery,
        lookup: &dyn EntityLookup,
    ) {
        if self.is_dead()
            || self.machine.is_in(EnemyStateId::Battle)
            || self.machine.is_in(EnemyStateId::Attack)
        {
            return;
        }
        self.core.target = Some(target);
        self.change_state(EnemyStateId::Battle, physics, lookup);
    }

    /// React to hits taken from the player since the last call
    pub fn apply_aggro(&mut self, physics: &dyn PhysicsQuery, lookup: &dyn EntityLookup) {
        if let Some(attacker) = self.provoked_by.take() {
            self.try_enter_battle_state(attacker, physics, lookup);
        }
    }

    /// Stun if the counter window is open. Returns true when stunned.
    pub fn handle_counter(&mut self, physics: &dyn PhysicsQuery, lookup: &dyn EntityLookup) -> bool {
        if !self.is_counterable() || !self.can_be_stunned() || !self.machine.is_active() {
            return false;
        }
        log::debug!("Enemy {} countered", self.id());
        self.change_state(EnemyStateId::Stunned, physics, lookup);
        true
    }

    /// The player is gone: forget it and calm down
    pub fn on_player_death(&mut self, physics: &dyn PhysicsQuery, lookup: &dyn EntityLookup) {
        self.core.target = None;
        if !self.is_dead() {
            self.change_state(EnemyStateId::Idle, physics, lookup);
        }
    }

    fn change_state(
        &mut self,
        next: EnemyStateId,
        physics: &dyn PhysicsQuery,
        lookup: &dyn EntityLookup,
    ) {
        let events = AnimationEvents::new();
        let mut ctx = EnemyCtx {
            core: &mut self.core,
            physics,
            lookup,
            events: &events,
            frame: self.frame,
        };
        self.machine.change_state(&mut self.states, &mut ctx, next);
    }
}

impl Damageable for Enemy {
    fn take_damage(&mut self, amount: f32, source: &DamageSource) -> DamageResult {
        let own_x = self.core.entity.position().x;
        let Some(outcome) = self.core.health.take_damage(amount, own_x, source.position.x) else {
            return DamageResult::Ignored;
        };

        log::debug!(
            "Enemy {} took {} damage from {} ({} left)",
            self.id(),
            amount,
            source.attacker,
            self.core.health.current()
        );
        self.core
            .entity
            .receive_knockback(outcome.knockback, outcome.knockback_duration);
        self.core.entity.play_damage_flash();

        if outcome.died {
            self.provoked_by = None;
            let mut despawn = Countdown::new();
            despawn.set(self.core.config.death_duration);
            self.despawn = Some(despawn);
            // Entering Death makes no world queries
            let nobody: HashMap<EntityId, Vec2> = HashMap::new();
            self.change_state(EnemyStateId::Death, &EmptyWorld, &nobody);
            return DamageResult::Killed;
        }

        if source.from_player {
            self.provoked_by = Some(source.attacker);
        }
        DamageResult::Hit
    }
}
