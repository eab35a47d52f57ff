// Engine modules: frame clock, input, physics

pub mod game_loop;
pub mod input;
pub mod physics;
