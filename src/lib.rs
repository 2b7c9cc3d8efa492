//! The Dot: a tilt-steered arcade game with a fixed-step loop, gravity wells,
//! pursuing enemies and an exit gate.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod formatter;
pub mod game_loop;
pub mod orientation;
pub mod sensor;
pub mod sprite;
pub mod surface;
