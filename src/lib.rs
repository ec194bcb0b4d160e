//! Snake on a wrapping grid, either simulated locally or mirrored from a
//! remote authority that owns the game.

pub mod app;
pub mod config;
pub mod engine;
pub mod grid;
pub mod input;
pub mod remote;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod snake;
