// Behaviour core: state machines, characters, combat and the arena that runs them

pub mod arena;
pub mod combo;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod fsm;
pub mod player;
pub mod prop;
