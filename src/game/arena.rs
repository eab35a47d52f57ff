// Entity registry and per-frame orchestration
//
// The arena owns the physics world and every live entity. One `tick`:
//   1. player update, then enemy updates (probes + active state)
//   2. body sync -> rapier step -> sync back
//   3. strike and counter resolution against the settled positions
//   4. aggro, player-death broadcast, late updates, despawns
//   5. animation playback, queueing events for the next tick

use std::collections::HashMap;

use glam::Vec2;

use crate::core::{EntityId, Frame};
use crate::engine::input::InputSurface;
use crate::engine::physics::body::presets;
use crate::engine::physics::{CollisionLayer, PhysicsWorld};
use crate::game::config::ConfigError;
use crate::game::enemy::{Enemy, EnemyConfig, ENEMY_ATTACK_INDEX_PARAM, RONIN};
use crate::game::entity::{
    AnimationClip, AnimationDriver, CombatRequest, DamageResult, DamageSource, Damageable,
};
use crate::game::fsm::AnimationEvent;
use crate::game::player::{Player, PlayerConfig, ATTACK_INDEX_PARAM, BASE_PLAYER};
use crate::game::prop::{Chest, CHEST_SIZE};

/// World gravity, tuned for snappy platforming rather than realism
pub const ARENA_GRAVITY: f32 = -30.0;

/// A resolved swing: who hit, how hard, and everything inside the volume
struct Strike {
    source: DamageSource,
    damage: f32,
    targets: Vec<EntityId>,
}

pub struct Arena {
    physics: PhysicsWorld,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    chests: Vec<Chest>,
    drivers: HashMap<EntityId, AnimationDriver>,
    next_id: u32,
    player_death_handled: bool,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            physics: PhysicsWorld::with_gravity(Vec2::new(0.0, ARENA_GRAVITY)),
            player: None,
            enemies: Vec::new(),
            chests: Vec::new(),
            drivers: HashMap::new(),
            next_id: 1,
            player_death_handled: false,
        }
    }

    /// Small level: a floor between two walls, a platform, two ronin and a chest
    pub fn demo() -> Result<Self, ConfigError> {
        let mut arena = Self::new();
        arena.add_ground(0.0, -0.5, 40.0, 1.0);
        arena.add_ground(6.0, 2.75, 4.0, 0.5);
        arena.add_wall(-20.5, 4.0, 1.0, 8.0);
        arena.add_wall(20.5, 4.0, 1.0, 8.0);

        arena.spawn_player(Vec2::new(-12.0, 0.0), BASE_PLAYER)?;
        arena.spawn_enemy(Vec2::new(2.0, 0.0), RONIN)?;
        arena.spawn_enemy(Vec2::new(12.0, 0.0), RONIN)?;
        arena.spawn_chest(Vec2::new(-6.0, 0.0));

        log::info!(
            "Demo arena ready: {} enemies, {} chests",
            arena.enemies.len(),
            arena.chests.len()
        );
        Ok(arena)
    }

    /// Walkable block centred at `(x, y)`
    pub fn add_ground(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.physics
            .add_static_collider(presets::tile_collider(x, y, width, height, CollisionLayer::Ground));
    }

    /// Slidable wall block centred at `(x, y)`
    pub fn add_wall(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.physics
            .add_static_collider(presets::tile_collider(x, y, width, height, CollisionLayer::Wall));
    }

    pub fn spawn_player(&mut self, spawn: Vec2, config: PlayerConfig) -> Result<EntityId, ConfigError> {
        let id = self.allocate_id();
        let player = Player::new(id, spawn, config)?;
        self.physics.add_entity(
            id,
            presets::character_body(spawn.x, spawn.y),
            presets::character_collider(config.motion.width, config.motion.height, CollisionLayer::Player),
        );
        self.drivers.insert(id, player_animations());

        if self.player.replace(player).is_some() {
            log::warn!("Replaced the existing player with {}", id);
        }
        self.player_death_handled = false;
        Ok(id)
    }

    pub fn spawn_enemy(&mut self, spawn: Vec2, config: EnemyConfig) -> Result<EntityId, ConfigError> {
        let id = self.allocate_id();
        let enemy = Enemy::new(id, spawn, config, &self.physics)?;
        self.physics.add_entity(
            id,
            presets::character_body(spawn.x, spawn.y),
            presets::character_collider(config.motion.width, config.motion.height, CollisionLayer::Enemy),
        );
        self.drivers.insert(id, enemy_animations());
        self.enemies.push(enemy);
        Ok(id)
    }

    pub fn spawn_chest(&mut self, spawn: Vec2) -> EntityId {
        let id = self.allocate_id();
        self.physics.add_entity(
            id,
            presets::prop_body(spawn.x, spawn.y),
            presets::prop_collider(CHEST_SIZE.x, CHEST_SIZE.y),
        );
        self.chests.push(Chest::new(id, spawn));
        id
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id() == id)
    }

    pub fn chest(&self, id: EntityId) -> Option<&Chest> {
        self.chests.iter().find(|chest| chest.id() == id)
    }

    pub fn driver(&self, id: EntityId) -> Option<&AnimationDriver> {
        self.drivers.get(&id)
    }

    /// Run one simulation tick
    pub fn tick(&mut self, input: &dyn InputSurface, frame: Frame) {
        let lookup = self.positions();
        if let Some(player) = self.player.as_mut() {
            player.update(&self.physics, input, frame);
        }
        for enemy in &mut self.enemies {
            enemy.update(&self.physics, &lookup, frame);
        }

        self.integrate(frame.dt);

        // Targets are resolved against this tick's settled positions
        let lookup = self.positions();
        self.resolve_combat(&lookup);
        for enemy in &mut self.enemies {
            enemy.apply_aggro(&self.physics, &lookup);
        }
        self.broadcast_player_death(&lookup);

        if let Some(player) = self.player.as_mut() {
            player.late_update();
        }
        for enemy in &mut self.enemies {
            enemy.late_update(frame.dt);
        }
        for chest in &mut self.chests {
            chest.tick(frame.dt);
        }
        self.despawn_dead();

        self.drive_animations(frame.dt);
    }

    /// Deliver a hit to whatever entity `target` names
    pub fn apply_damage(&mut self, target: EntityId, amount: f32, source: &DamageSource) -> DamageResult {
        let Some(victim) = self.damageable_mut(target) else {
            log::warn!("Hit on unknown entity {}", target);
            return DamageResult::Ignored;
        };

        let result = victim.take_damage(amount, source);
        if result == DamageResult::Killed {
            log::info!("{} killed by {}", target, source.attacker);
        }
        result
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Snapshot of every character's position, by handle
    fn positions(&self) -> HashMap<EntityId, Vec2> {
        let player = self
            .player
            .iter()
            .map(|player| (player.id(), player.entity().position()));
        let enemies = self
            .enemies
            .iter()
            .map(|enemy| (enemy.id(), enemy.entity().position()));
        player.chain(enemies).collect()
    }

    fn damageable_mut(&mut self, id: EntityId) -> Option<&mut dyn Damageable> {
        if let Some(player) = self.player.as_mut().filter(|player| player.id() == id) {
            return Some(player as &mut dyn Damageable);
        }
        if let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id() == id) {
            return Some(enemy as &mut dyn Damageable);
        }
        self.chests
            .iter_mut()
            .find(|chest| chest.id() == id)
            .map(|chest| chest as &mut dyn Damageable)
    }

    /// Copy bodies into rapier, step, and copy the results back
    fn integrate(&mut self, dt: f32) {
        let physics = &mut self.physics;
        physics.set_timestep(dt);

        if let Some(player) = self.player.as_ref() {
            physics.push_state(player.id(), &player.entity().body);
        }
        for enemy in &self.enemies {
            physics.push_state(enemy.id(), &enemy.entity().body);
        }
        for chest in &self.chests {
            physics.push_state(chest.id(), &chest.body);
        }

        physics.step();

        if let Some(player) = self.player.as_mut() {
            let id = player.id();
            physics.pull_state(id, &mut player.entity_mut().body);
        }
        for enemy in &mut self.enemies {
            let id = enemy.id();
            physics.pull_state(id, &mut enemy.entity_mut().body);
        }
        for chest in &mut self.chests {
            physics.pull_state(chest.id(), &mut chest.body);
        }
    }

    fn resolve_combat(&mut self, lookup: &HashMap<EntityId, Vec2>) {
        let mut strikes = Vec::new();
        let mut countered = Vec::new();

        if let Some(player) = self.player.as_mut() {
            let requests = player.take_requests();
            let combat = player.config().combat;
            let entity = player.entity();
            let (position, facing) = (entity.position(), entity.facing_direction());

            for request in requests {
                match request {
                    CombatRequest::Strike { slot } => strikes.push(Strike {
                        source: DamageSource {
                            attacker: player.id(),
                            position,
                            from_player: true,
                        },
                        damage: combat.damage,
                        targets: combat.find_targets(&self.physics, position, facing, slot),
                    }),
                    // The counter probes with the first attack's volume
                    CombatRequest::Counter => {
                        countered.extend(combat.find_targets(&self.physics, position, facing, 0));
                    }
                }
            }
        }

        for enemy in &mut self.enemies {
            let requests = enemy.take_requests();
            let combat = enemy.config().combat;
            let entity = enemy.entity();
            let (position, facing) = (entity.position(), entity.facing_direction());

            for request in requests {
                match request {
                    CombatRequest::Strike { slot } => strikes.push(Strike {
                        source: DamageSource {
                            attacker: enemy.id(),
                            position,
                            from_player: false,
                        },
                        damage: combat.damage,
                        targets: combat.find_targets(&self.physics, position, facing, slot),
                    }),
                    CombatRequest::Counter => {
                        log::warn!("Enemy {} requested a counter, ignoring", enemy.id());
                    }
                }
            }
        }

        for strike in strikes {
            for target in strike.targets {
                if target != strike.source.attacker {
                    self.apply_damage(target, strike.damage, &strike.source);
                }
            }
        }

        for id in countered {
            if let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id() == id) {
                enemy.handle_counter(&self.physics, lookup);
            }
        }
    }

    fn broadcast_player_death(&mut self, lookup: &HashMap<EntityId, Vec2>) {
        let dead = self.player.as_ref().is_some_and(|player| player.is_dead());
        if !dead || self.player_death_handled {
            return;
        }
        self.player_death_handled = true;

        log::info!("Player died, enemies stand down");
        for enemy in &mut self.enemies {
            enemy.on_player_death(&self.physics, lookup);
        }
    }

    fn despawn_dead(&mut self) {
        let gone: Vec<EntityId> = self
            .enemies
            .iter()
            .filter(|enemy| enemy.should_despawn())
            .map(|enemy| enemy.id())
            .collect();
        if gone.is_empty() {
            return;
        }

        for id in &gone {
            self.physics.remove_entity(*id);
            self.drivers.remove(id);
            log::info!("Enemy {} despawned", id);
        }
        self.enemies.retain(|enemy| !gone.contains(&enemy.id()));
    }

    fn drive_animations(&mut self, dt: f32) {
        let drivers = &mut self.drivers;
        let entities = self
            .player
            .iter_mut()
            .map(|player| player.entity_mut())
            .chain(self.enemies.iter_mut().map(|enemy| enemy.entity_mut()));

        for entity in entities {
            if let Some(driver) = drivers.get_mut(&entity.id) {
                driver.update(&entity.animator, dt, &mut entity.events);
            }
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

fn player_attack(name: &str) -> AnimationClip {
    AnimationClip::one_shot(name, 6, 12.0)
        .with_event(1, AnimationEvent::VelocityStart)
        .with_event(2, AnimationEvent::Strike)
        .with_event(3, AnimationEvent::VelocityStop)
        .with_event(4, AnimationEvent::Skip)
}

/// Clip set for the player; attack clips are numbered by combo index
pub fn player_animations() -> AnimationDriver {
    AnimationDriver::new()
        .with_variant_param(ATTACK_INDEX_PARAM)
        .with_clip(AnimationClip::looping("idle", 6, 10.0))
        .with_clip(AnimationClip::looping("move", 8, 12.0))
        .with_clip(AnimationClip::looping("jumpFall", 4, 10.0))
        .with_clip(AnimationClip::looping("wallSlide", 4, 10.0))
        .with_clip(AnimationClip::one_shot("wallJump", 3, 12.0))
        .with_clip(AnimationClip::one_shot("dash", 4, 16.0))
        .with_clip(player_attack("basicAttack1"))
        .with_clip(player_attack("basicAttack2").with_event(2, AnimationEvent::Flip))
        .with_clip(player_attack("basicAttack3"))
        .with_clip(AnimationClip::one_shot("counterAttack", 6, 10.0))
        .with_clip(AnimationClip::one_shot("death", 8, 10.0))
}

fn enemy_attack(name: &str) -> AnimationClip {
    AnimationClip::one_shot(name, 8, 10.0)
        .with_event(1, AnimationEvent::CounterWindowOpen)
        .with_event(3, AnimationEvent::VelocityStart)
        .with_event(4, AnimationEvent::CounterWindowClose)
        .with_event(4, AnimationEvent::Strike)
        .with_event(5, AnimationEvent::VelocityStop)
}

/// Clip set for a ronin
pub fn enemy_animations() -> AnimationDriver {
    AnimationDriver::new()
        .with_variant_param(ENEMY_ATTACK_INDEX_PARAM)
        .with_clip(AnimationClip::looping("idle", 6, 8.0))
        .with_clip(AnimationClip::looping("move", 8, 10.0))
        .with_clip(AnimationClip::looping("battle", 8, 12.0))
        .with_clip(enemy_attack("attack1"))
        .with_clip(enemy_attack("attack2"))
        .with_clip(enemy_attack("attack3"))
        .with_clip(AnimationClip::looping("stunned", 4, 8.0))
        .with_clip(AnimationClip::one_shot("death", 8, 10.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::engine::input::{Action, PlayerInput};
    use crate::game::enemy::EnemyStateId;
    use crate::game::player::PlayerStateId;
    use approx::assert_relative_eq;

    /// Floor with its top at y = 0
    fn flat_arena() -> Arena {
        let mut arena = Arena::new();
        arena.add_ground(0.0, -0.5, 40.0, 1.0);
        arena
    }

    struct Run {
        arena: Arena,
        input: PlayerInput,
        frame: Frame,
    }

    impl Run {
        fn new(arena: Arena) -> Self {
            Self {
                arena,
                input: PlayerInput::new(),
                frame: Frame::new(FIXED_TIMESTEP, 0.0),
            }
        }

        fn tick(&mut self) {
            self.arena.tick(&self.input, self.frame);
            self.input.update();
            self.frame = self.frame.next();
        }

        fn ticks(&mut self, count: usize) {
            for _ in 0..count {
                self.tick();
            }
        }

        fn player(&mut self) -> &mut Player {
            self.arena.player_mut().expect("player spawned")
        }
    }

    fn player_hit(arena: &Arena) -> DamageSource {
        let player = arena.player().expect("player spawned");
        DamageSource {
            attacker: player.id(),
            position: player.entity().position(),
            from_player: true,
        }
    }

    #[test]
    fn test_demo_arena_populates() {
        let arena = Arena::demo().expect("demo config is valid");
        assert!(arena.player().is_some());
        assert_eq!(arena.enemies().len(), 2);
        assert_eq!(arena.chests.len(), 1);
        assert_eq!(arena.drivers.len(), 3);
        assert_eq!(arena.physics().gravity(), Vec2::new(0.0, ARENA_GRAVITY));
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let mut arena = flat_arena();
        let config = EnemyConfig {
            idle_time: 0.0,
            ..RONIN
        };
        assert!(arena.spawn_enemy(Vec2::ZERO, config).is_err());
        assert!(arena.enemies().is_empty());
    }

    #[test]
    fn test_player_strike_damages_and_provokes() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(1.5, 0.0), RONIN).expect("valid");
        let mut run = Run::new(arena);

        run.player().entity_mut().events.push(AnimationEvent::Strike);
        run.tick();

        let enemy = run.arena.enemy(enemy).expect("alive");
        assert_relative_eq!(enemy.health().current(), 80.0);
        assert!(enemy.entity().is_knocked());
        assert_eq!(enemy.state(), Some(EnemyStateId::Battle));
        assert_eq!(enemy.target(), run.arena.player().map(|player| player.id()));
    }

    #[test]
    fn test_enemy_strike_damages_player() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(-1.5, 0.0), RONIN).expect("valid");
        let mut run = Run::new(arena);

        run.arena
            .enemy_mut(enemy)
            .expect("alive")
            .entity_mut()
            .events
            .push(AnimationEvent::Strike);
        run.tick();

        assert_relative_eq!(run.player().health().current(), 90.0);
    }

    #[test]
    fn test_chest_opens_on_strike() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let chest = arena.spawn_chest(Vec2::new(1.3, 0.0));
        let mut run = Run::new(arena);

        run.player().entity_mut().events.push(AnimationEvent::Strike);
        run.tick();

        assert_eq!(run.arena.chest(chest).map(Chest::opens), Some(1));
    }

    #[test]
    fn test_counter_stuns_enemy_with_open_window() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(1.5, 0.0), RONIN).expect("valid");
        let mut run = Run::new(arena);

        run.arena
            .enemy_mut(enemy)
            .expect("alive")
            .entity_mut()
            .events
            .push(AnimationEvent::CounterWindowOpen);
        run.input.press(Action::CounterAttack);
        run.tick();

        assert!(run.player().is_in(PlayerStateId::CounterAttack));
        let enemy = run.arena.enemy(enemy).expect("alive");
        assert_eq!(enemy.state(), Some(EnemyStateId::Stunned));
        assert!(!enemy.can_be_stunned());
    }

    #[test]
    fn test_counter_without_window_does_nothing() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(1.5, 0.0), RONIN).expect("valid");
        let mut run = Run::new(arena);

        run.input.press(Action::CounterAttack);
        run.tick();

        assert_eq!(
            run.arena.enemy(enemy).and_then(Enemy::state),
            Some(EnemyStateId::Idle)
        );
    }

    #[test]
    fn test_attack_clip_strikes_through_driver() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(1.5, 0.0), RONIN).expect("valid");
        let mut run = Run::new(arena);

        run.input.press(Action::Attack);
        run.tick();
        run.input.release(Action::Attack);
        assert!(run.player().is_in(PlayerStateId::BasicAttack));
        let player = run.player().id();
        assert_eq!(
            run.arena.driver(player).and_then(AnimationDriver::current_clip),
            Some("basicAttack1")
        );

        run.ticks(20);
        let health = run.arena.enemy(enemy).map(|enemy| enemy.health().current());
        assert_eq!(health, Some(80.0));
    }

    #[test]
    fn test_dead_enemy_despawns() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::new(-5.0, 0.0), BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(5.0, 0.0), RONIN).expect("valid");
        let source = player_hit(&arena);

        assert_eq!(arena.apply_damage(enemy, 100.0, &source), DamageResult::Killed);
        assert_eq!(arena.apply_damage(enemy, 100.0, &source), DamageResult::Ignored);

        let mut run = Run::new(arena);
        run.ticks(115);
        assert!(run.arena.enemy(enemy).is_some());
        run.ticks(10);
        assert!(run.arena.enemy(enemy).is_none());
        assert!(!run.arena.physics().contains(enemy));
        assert!(run.arena.driver(enemy).is_none());
    }

    #[test]
    fn test_player_death_calms_enemies() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let enemy = arena.spawn_enemy(Vec2::new(1.5, 0.0), RONIN).expect("valid");
        let mut run = Run::new(arena);

        run.player().entity_mut().events.push(AnimationEvent::Strike);
        run.tick();
        assert_eq!(
            run.arena.enemy(enemy).and_then(Enemy::state),
            Some(EnemyStateId::Battle)
        );

        let source = DamageSource {
            attacker: enemy,
            position: Vec2::new(1.5, 0.0),
            from_player: false,
        };
        let player = run.player().id();
        assert_eq!(run.arena.apply_damage(player, 100.0, &source), DamageResult::Killed);
        run.tick();

        let enemy = run.arena.enemy(enemy).expect("alive");
        assert_eq!(enemy.state(), Some(EnemyStateId::Idle));
        assert_eq!(enemy.target(), None);
        assert!(run.arena.player().is_some_and(Player::is_dead));
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::ZERO, BASE_PLAYER).expect("valid");
        let source = player_hit(&arena);
        assert_eq!(
            arena.apply_damage(EntityId(99), 10.0, &source),
            DamageResult::Ignored
        );
    }

    #[test]
    fn test_player_stands_on_rapier_floor() {
        let mut arena = flat_arena();
        arena.spawn_player(Vec2::new(0.0, 1.0), BASE_PLAYER).expect("valid");
        let mut run = Run::new(arena);

        run.ticks(60);
        let player = run.player();
        assert!(player.entity().ground_detected());
        assert!(player.is_in(PlayerStateId::Idle));
        assert_relative_eq!(player.entity().position().y, 0.0, epsilon = 0.05);
    }
}
