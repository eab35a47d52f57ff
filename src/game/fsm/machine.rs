// State machine executor and the per-state contract

use std::fmt::Debug;

/// Chained transitions allowed from a single `change_state` call
const MAX_CHAINED_TRANSITIONS: usize = 8;

/// Outcome of a state's `enter` or `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<K> {
    /// Keep the current state
    Stay,
    /// Exit the current state and enter `K` (may be the same state)
    Change(K),
    /// Switch the machine off; no further updates reach any state
    Halt,
}

/// Enter/Update/Exit contract every state implements.
///
/// `C` is the per-tick context the owning entity hands in (its motion core,
/// input, frame timing), `K` the entity's state id.
pub trait EntityState<C, K> {
    /// Called when the state becomes current. A returned transition is
    /// applied right after this state has been assigned as current.
    fn enter(&mut self, _ctx: &mut C) -> Transition<K> {
        Transition::Stay
    }

    /// Called once per tick while this state is current
    fn update(&mut self, ctx: &mut C) -> Transition<K>;

    /// Called before the next state's `enter`
    fn exit(&mut self, _ctx: &mut C) {}
}

/// The table of long-lived state instances an entity owns
pub trait StateTable<C> {
    type Id: Copy + Eq + Debug;

    fn state_mut(&mut self, id: Self::Id) -> &mut dyn EntityState<C, Self::Id>;

    /// Rule shared by every state, evaluated after the current state's own
    /// update (and after any transition it caused)
    fn after_update(&mut self, _current: Self::Id, _ctx: &mut C) -> Option<Self::Id> {
        None
    }

    /// Runs before the state's own `enter`
    fn on_enter(&mut self, _id: Self::Id, _ctx: &mut C) {}

    /// Runs after the state's own `exit`
    fn on_exit(&mut self, _id: Self::Id, _ctx: &mut C) {}
}

/// Holds which state is current and whether updates are delivered.
///
/// Legality of transitions is left to the states; any state may change to any
/// other, including itself.
#[derive(Debug)]
pub struct StateMachine<K> {
    label: &'static str,
    current: Option<K>,
    active: bool,
}

impl<K: Copy + Eq + Debug> StateMachine<K> {
    /// `label` names the owner in transition logs
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            current: None,
            active: true,
        }
    }

    /// Enter the initial state. Call exactly once before the first update.
    pub fn initialize<C, T>(&mut self, table: &mut T, ctx: &mut C, initial: K)
    where
        T: StateTable<C, Id = K>,
    {
        debug_assert!(self.current.is_none(), "state machine initialized twice");
        self.current = None;
        self.enter_chain(table, ctx, initial);
    }

    /// Exit the current state, enter `next`, then make it current
    pub fn change_state<C, T>(&mut self, table: &mut T, ctx: &mut C, next: K)
    where
        T: StateTable<C, Id = K>,
    {
        if let Some(current) = self.current {
            table.state_mut(current).exit(ctx);
            table.on_exit(current, ctx);
        }
        self.enter_chain(table, ctx, next);
    }

    /// Run the current state's update; a no-op once switched off
    pub fn update_active_state<C, T>(&mut self, table: &mut T, ctx: &mut C)
    where
        T: StateTable<C, Id = K>,
    {
        if !self.active {
            return;
        }
        let Some(current) = self.current else {
            return;
        };

        match table.state_mut(current).update(ctx) {
            Transition::Stay => {}
            Transition::Change(next) => self.change_state(table, ctx, next),
            Transition::Halt => self.switch_off(),
        }

        if !self.active {
            return;
        }
        if let Some(current) = self.current {
            if let Some(next) = table.after_update(current, ctx) {
                self.change_state(table, ctx, next);
            }
        }
    }

    /// Freeze the machine; the current state stays current but is never updated again
    pub fn switch_off(&mut self) {
        if self.active {
            log::debug!("{}: state machine switched off", self.label);
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Check whether `state` is current
    pub fn is_in(&self, state: K) -> bool {
        self.current == Some(state)
    }

    fn enter_chain<C, T>(&mut self, table: &mut T, ctx: &mut C, mut next: K)
    where
        T: StateTable<C, Id = K>,
    {
        for hop in 0..MAX_CHAINED_TRANSITIONS {
            if hop > 0 {
                if let Some(current) = self.current {
                    table.state_mut(current).exit(ctx);
                    table.on_exit(current, ctx);
                }
            }

            log::debug!("{}: {:?} -> {:?}", self.label, self.current, next);
            table.on_enter(next, ctx);
            let outcome = table.state_mut(next).enter(ctx);
            self.current = Some(next);

            match outcome {
                Transition::Stay => return,
                Transition::Change(following) => next = following,
                Transition::Halt => {
                    self.switch_off();
                    return;
                }
            }
        }

        log::warn!(
            "{}: transition chain exceeded {} hops, settling in {:?}",
            self.label,
            MAX_CHAINED_TRANSITIONS,
            self.current
        );
    }
}
