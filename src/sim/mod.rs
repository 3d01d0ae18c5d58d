mod components;
mod systems;
mod tic;

pub use components::{Class, Heading, InputCmd, Position, Vitals};
pub use tic::{SIM_FPS, TicRunner};
