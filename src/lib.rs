//! Snake Arcade - classic Snake in the terminal
//!
//! This library provides:
//! - Core game rules and the per-tick simulation (game module)
//! - Session lifecycle, high score and audio hooks (session module)
//! - Terminal input, rendering and the interactive play loop

pub mod audio;
pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod session;
