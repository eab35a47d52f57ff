// Generic state machine executor
//
// The machine never owns states. Each entity keeps a table with one
// long-lived instance per state (so per-state fields such as combo counters
// survive re-entry) and the machine only remembers which id is current.
// Transitions are decided locally inside each state's `enter`/`update` and
// handed back as a `Transition` value.

pub mod events;
pub mod machine;

pub use events::{AnimationEvent, AnimationEvents};
pub use machine::{EntityState, StateMachine, StateTable, Transition};
