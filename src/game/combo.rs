// Attack chains: combo counter and per-hit lunge velocity

use glam::Vec2;

use crate::core::Countdown;
use crate::game::entity::Entity;

/// Combo indices start at 1; the animator's attack clips are numbered from it
pub const FIRST_COMBO_INDEX: u32 = 1;

/// Default number of hits in a chain before it wraps
pub const DEFAULT_COMBO_LIMIT: u32 = 3;

/// Combo counter kept on a long-lived attack state.
///
/// It survives exit/enter cycles and only resets when it runs past the limit
/// or when the previous attack ended longer than `reset_time` ago.
#[derive(Debug, Clone)]
pub struct Combo {
    index: u32,
    limit: u32,
    reset_time: f32,
    last_attack: Option<f32>,
}

impl Combo {
    /// A combo with one hit per entry of the lunge table.
    ///
    /// `limit` is overridden by `lunge_count` when they disagree.
    pub fn new(limit: u32, lunge_count: usize, reset_time: f32) -> Self {
        let mut limit = limit;
        if limit as usize != lunge_count {
            log::warn!(
                "Combo limit {} adjusted to match {} attack velocities",
                limit,
                lunge_count
            );
            limit = lunge_count as u32;
        }

        Self {
            index: FIRST_COMBO_INDEX,
            limit,
            reset_time,
            last_attack: None,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Zero-based slot into per-hit tables
    pub fn slot(&self) -> usize {
        self.index.saturating_sub(FIRST_COMBO_INDEX) as usize
    }

    /// Called on entering the attack: wrap past the limit, reset when stale
    pub fn begin(&mut self, now: f32) {
        let stale = self
            .last_attack
            .map_or(true, |last| now > last + self.reset_time);
        if self.index > self.limit || stale {
            self.index = FIRST_COMBO_INDEX;
        }
    }

    /// Another hit can still be queued after this one
    pub fn can_chain(&self) -> bool {
        self.index < self.limit
    }

    /// Called on leaving the attack
    pub fn finish(&mut self, now: f32) {
        self.index += 1;
        self.last_attack = Some(now);
    }
}

/// Forward push applied during an attack.
///
/// `start` and `stop` latch for the rest of the attack once their animation
/// events arrive; `enter` clears them.
#[derive(Debug, Default, Clone)]
pub struct Lunge {
    timer: Countdown,
    started: bool,
    stopped: bool,
}

impl Lunge {
    pub fn enter(&mut self) {
        self.started = false;
        self.stopped = false;
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Per-tick lunge handling for combo `slot`
    pub fn update(&mut self, entity: &mut Entity, table: &[Vec2], slot: usize, duration: f32, dt: f32) {
        self.timer.tick(dt);

        if self.started {
            self.timer.set(duration);
            Self::push(entity, table, slot);
        }

        if self.stopped || self.timer.has_expired() {
            let vy = entity.velocity().y;
            entity.set_velocity_y(0.0, vy);
        }
    }

    /// Re-apply the push in the current facing (after a flip mid-attack)
    pub fn reapply(&self, entity: &mut Entity, table: &[Vec2], slot: usize) {
        Self::push(entity, table, slot);
    }

    fn push(entity: &mut Entity, table: &[Vec2], slot: usize) {
        let Some(velocity) = table.get(slot.min(table.len().saturating_sub(1))) else {
            return;
        };
        let facing = entity.facing_direction() as f32;
        entity.set_velocity_y(velocity.x * facing, velocity.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::game::config::{BASE_MOTION, BASE_PROBES};
    use approx::assert_relative_eq;

    const LUNGES: [Vec2; 3] = [
        Vec2::new(1.5, 0.0),
        Vec2::new(1.5, 0.0),
        Vec2::new(3.0, 0.0),
    ];

    #[test]
    fn test_combo_increments_within_window() {
        let mut combo = Combo::new(3, 3, 1.0);
        combo.begin(0.0);
        assert_eq!(combo.index(), 1);
        combo.finish(0.5);

        combo.begin(1.2);
        assert_eq!(combo.index(), 2);
        combo.finish(1.4);

        combo.begin(1.6);
        assert_eq!(combo.index(), 3);
        assert!(!combo.can_chain());
        combo.finish(1.8);

        // Past the limit wraps back to the first hit
        combo.begin(1.9);
        assert_eq!(combo.index(), 1);
    }

    #[test]
    fn test_combo_resets_when_stale() {
        let mut combo = Combo::new(3, 3, 1.0);
        combo.begin(0.0);
        combo.finish(0.5);

        combo.begin(1.6);
        assert_eq!(combo.index(), 1);
    }

    #[test]
    fn test_limit_follows_lunge_table() {
        let combo = Combo::new(3, 2, 1.0);
        assert_eq!(combo.limit(), 2);
    }

    #[test]
    fn test_lunge_applies_facing_velocity_then_stops() {
        let mut entity = Entity::new(EntityId(1), Vec2::ZERO, BASE_MOTION, BASE_PROBES);
        entity.flip();
        let mut lunge = Lunge::default();
        lunge.enter();

        lunge.start();
        lunge.update(&mut entity, &LUNGES, 2, 0.1, 1.0 / 60.0);
        assert_relative_eq!(entity.velocity().x, -3.0);

        lunge.stop();
        lunge.update(&mut entity, &LUNGES, 2, 0.1, 1.0 / 60.0);
        assert_relative_eq!(entity.velocity().x, 0.0);
    }

    #[test]
    fn test_lunge_slot_is_clamped() {
        let mut entity = Entity::new(EntityId(1), Vec2::ZERO, BASE_MOTION, BASE_PROBES);
        let lunge = Lunge::default();
        lunge.reapply(&mut entity, &LUNGES[..2], 5);
        assert_relative_eq!(entity.velocity().x, 1.5);
    }
}
