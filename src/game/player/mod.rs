// Player character
//
// `Player` owns the motion core, the state table and the machine. Each tick
// `update` probes the world, routes queued animation events, runs the current
// state and then the jump-assist bookkeeping. `late_update` starts a queued
// follow-up attack once combat for the tick has been resolved.

mod config;
mod jump;
mod states;

use glam::Vec2;

use crate::core::{EntityId, Frame};
use crate::engine::input::{Action, DisabledInput, InputSurface};
use crate::engine::physics::PhysicsQuery;
use crate::game::combo::Combo;
use crate::game::config::ConfigError;
use crate::game::entity::{
    CombatRequest, DamageResult, DamageSource, Damageable, Entity, Health,
};
use crate::game::fsm::{AnimationEvent, AnimationEvents, EntityState, StateMachine, StateTable};

pub use config::{PlayerConfig, BASE_PLAYER};
pub use jump::JumpAssist;
pub use states::ATTACK_INDEX_PARAM;
use states::{
    BasicAttack, CounterAttack, Dash, Death, Fall, Idle, Jump, Move, WallJump, WallSlide,
};

/// Animator float mirroring vertical speed
pub const Y_VELOCITY_PARAM: &str = "yVelocity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStateId {
    Idle,
    Move,
    Jump,
    Fall,
    WallSlide,
    WallJump,
    Dash,
    BasicAttack,
    CounterAttack,
    Death,
}

impl PlayerStateId {
    /// Animator bool raised while the state is current
    pub fn anim_bool(self) -> &'static str {
        match self {
            PlayerStateId::Idle => "idle",
            PlayerStateId::Move => "move",
            // One blend clip driven by `yVelocity`
            PlayerStateId::Jump | PlayerStateId::Fall => "jumpFall",
            PlayerStateId::WallSlide => "wallSlide",
            PlayerStateId::WallJump => "wallJump",
            PlayerStateId::Dash => "dash",
            PlayerStateId::BasicAttack => "basicAttack",
            PlayerStateId::CounterAttack => "counterAttack",
            PlayerStateId::Death => "death",
        }
    }
}

/// Everything the player's states read and write
#[derive(Debug)]
pub struct PlayerCore {
    pub entity: Entity,
    pub config: PlayerConfig,
    pub jump: JumpAssist,
    pub health: Health,
    requests: Vec<CombatRequest>,
    input_enabled: bool,
    attack_reentry: bool,
}

impl PlayerCore {
    /// Record combat work for the arena to resolve after physics
    pub fn request(&mut self, request: CombatRequest) {
        self.requests.push(request);
    }

    pub fn disable_input(&mut self) {
        self.input_enabled = false;
    }

    /// Restart the attack state in `late_update`
    pub fn queue_attack_reentry(&mut self) {
        self.entity
            .animator
            .set_bool(PlayerStateId::BasicAttack.anim_bool(), false);
        self.attack_reentry = true;
    }
}

/// Per-tick context handed to player states
pub struct PlayerCtx<'a> {
    pub core: &'a mut PlayerCore,
    pub input: &'a dyn InputSurface,
    /// Animation events delivered this tick
    pub events: &'a AnimationEvents,
    pub frame: Frame,
}

impl PlayerCtx<'_> {
    pub fn movement(&self) -> Vec2 {
        self.input.read_movement()
    }

    /// Fresh press this tick
    pub fn pressed(&self, action: Action) -> bool {
        self.input.was_pressed_this_frame(action)
    }

    pub fn held(&self, action: Action) -> bool {
        self.input.is_pressed(action)
    }

    pub fn velocity(&self) -> Vec2 {
        self.core.entity.velocity()
    }
}

/// Long-lived state instances, one per `PlayerStateId`
#[derive(Debug)]
pub struct PlayerStates {
    idle: Idle,
    moving: Move,
    jump: Jump,
    fall: Fall,
    wall_slide: WallSlide,
    wall_jump: WallJump,
    dash: Dash,
    attack: BasicAttack,
    counter: CounterAttack,
    death: Death,
}

impl PlayerStates {
    fn new(config: &PlayerConfig) -> Self {
        let combo = Combo::new(
            config.combo_limit,
            config.attack_velocity.len(),
            config.combo_reset_time,
        );
        Self {
            idle: Idle,
            moving: Move,
            jump: Jump::default(),
            fall: Fall,
            wall_slide: WallSlide,
            wall_jump: WallJump::default(),
            dash: Dash::default(),
            attack: BasicAttack::new(combo),
            counter: CounterAttack::default(),
            death: Death,
        }
    }
}

impl<'a> StateTable<PlayerCtx<'a>> for PlayerStates {
    type Id = PlayerStateId;

    fn state_mut(&mut self, id: PlayerStateId) -> &mut dyn EntityState<PlayerCtx<'a>, PlayerStateId> {
        match id {
            PlayerStateId::Idle => &mut self.idle,
            PlayerStateId::Move => &mut self.moving,
            PlayerStateId::Jump => &mut self.jump,
            PlayerStateId::Fall => &mut self.fall,
            PlayerStateId::WallSlide => &mut self.wall_slide,
            PlayerStateId::WallJump => &mut self.wall_jump,
            PlayerStateId::Dash => &mut self.dash,
            PlayerStateId::BasicAttack => &mut self.attack,
            PlayerStateId::CounterAttack => &mut self.counter,
            PlayerStateId::Death => &mut self.death,
        }
    }

    /// Dash cuts into any state unless a wall is in the way
    fn after_update(&mut self, current: PlayerStateId, ctx: &mut PlayerCtx<'a>) -> Option<PlayerStateId> {
        let dash = current != PlayerStateId::Dash
            && ctx.pressed(Action::Dash)
            && !ctx.core.entity.wall_detected();
        dash.then_some(PlayerStateId::Dash)
    }

    fn on_enter(&mut self, id: PlayerStateId, ctx: &mut PlayerCtx<'a>) {
        ctx.core.entity.animator.set_bool(id.anim_bool(), true);
    }

    fn on_exit(&mut self, id: PlayerStateId, ctx: &mut PlayerCtx<'a>) {
        ctx.core.entity.animator.set_bool(id.anim_bool(), false);
    }
}

#[derive(Debug)]
pub struct Player {
    core: PlayerCore,
    states: PlayerStates,
    machine: StateMachine<PlayerStateId>,
    /// Timing of the latest tick, reused by transitions made outside `update`
    frame: Frame,
}

impl Player {
    pub fn new(id: EntityId, spawn: Vec2, config: PlayerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let core = PlayerCore {
            entity: Entity::new(id, spawn, config.motion, config.probes),
            jump: JumpAssist::new(config.jump_buffer_time, config.coyote_time),
            health: Health::new(config.health),
            config,
            requests: Vec::new(),
            input_enabled: true,
            attack_reentry: false,
        };
        let mut player = Self {
            core,
            states: PlayerStates::new(&config),
            machine: StateMachine::new("player"),
            frame: Frame::new(0.0, 0.0),
        };

        let events = AnimationEvents::new();
        let mut ctx = PlayerCtx {
            core: &mut player.core,
            input: &DisabledInput,
            events: &events,
            frame: player.frame,
        };
        player
            .machine
            .initialize(&mut player.states, &mut ctx, PlayerStateId::Idle);

        log::info!("Player {} spawned at {}", id, spawn);
        Ok(player)
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

    pub fn config(&self) -> &PlayerConfig {
        &self.core.config
    }

    pub fn health(&self) -> &Health {
        &self.core.health
    }

    pub fn state(&self) -> Option<PlayerStateId> {
        self.machine.current()
    }

    pub fn is_in(&self, state: PlayerStateId) -> bool {
        self.machine.is_in(state)
    }

    pub fn is_dead(&self) -> bool {
        self.core.health.is_dead()
    }

    pub fn is_input_enabled(&self) -> bool {
        self.core.input_enabled
    }

    /// Current combo slot of the attack state
    pub fn combo_slot(&self) -> usize {
        self.states.attack.combo().slot()
    }

    /// Drain combat work recorded since the last call
    pub fn take_requests(&mut self) -> Vec<CombatRequest> {
        std::mem::take(&mut self.core.requests)
    }

    /// Run one simulation tick
    pub fn update(&mut self, physics: &dyn PhysicsQuery, input: &dyn InputSurface, frame: Frame) {
        self.frame = frame;
        let core = &mut self.core;
        core.entity.tick(frame.dt);
        if !self.machine.is_active() {
            core.entity.events.clear();
            return;
        }

        core.entity.detect_environment(physics);

        let input: &dyn InputSurface = if core.input_enabled {
            input
        } else {
            &DisabledInput
        };

        let events = core.entity.events.take();
        let attacking = self.machine.is_in(PlayerStateId::BasicAttack);
        for event in events.iter() {
            match event {
                AnimationEvent::Strike => core.request(CombatRequest::Strike {
                    slot: self.states.attack.combo().slot(),
                }),
                // The attack state flips on its own so it can re-aim the lunge
                AnimationEvent::Flip if !attacking => {
                    core.entity.handle_flip(input.read_movement().x);
                }
                _ => {}
            }
        }

        let mut ctx = PlayerCtx {
            core,
            input,
            events: &events,
            frame,
        };
        self.machine.update_active_state(&mut self.states, &mut ctx);

        let grounded = self.core.entity.ground_detected();
        self.core
            .jump
            .update(input.was_pressed_this_frame(Action::Jump), grounded, frame.dt);

        let vy = self.core.entity.velocity().y;
        self.core.entity.animator.set_float(Y_VELOCITY_PARAM, vy);
    }

    /// Start a queued follow-up attack if the attack state is still current
    pub fn late_update(&mut self) {
        if !std::mem::take(&mut self.core.attack_reentry) {
            return;
        }
        if self.machine.is_active() && self.machine.is_in(PlayerStateId::BasicAttack) {
            self.change_state(PlayerStateId::BasicAttack);
        }
    }

    /// Transition outside the tick's update, with input ignored
    fn change_state(&mut self, next: PlayerStateId) {
        let events = AnimationEvents::new();
        let mut ctx = PlayerCtx {
            core: &mut self.core,
            input: &DisabledInput,
            events: &events,
            frame: self.frame,
        };
        self.machine.change_state(&mut self.states, &mut ctx, next);
    }
}

impl Damageable for Player {
    fn take_damage(&mut self, amount: f32, source: &DamageSource) -> DamageResult {
        let own_x = self.core.entity.position().x;
        let Some(outcome) = self.core.health.take_damage(amount, own_x, source.position.x) else {
            return DamageResult::Ignored;
        };

        log::debug!(
            "Player took {} damage from {} ({} left)",
            amount,
            source.attacker,
            self.core.health.current()
        );
        self.core
            .entity
            .receive_knockback(outcome.knockback, outcome.knockback_duration);
        self.core.entity.play_damage_flash();

        if outcome.died {
            self.change_state(PlayerStateId::Death);
            return DamageResult::Killed;
        }
        DamageResult::Hit
    }
}
