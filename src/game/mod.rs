//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering dependencies.
//! The session controller drives it; renderers only read the resulting state.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{Consumed, GameEngine, StepInfo, StepResult};
pub use grid::{Bounds, random_position};
pub use state::{CollisionType, GameState, Position, SessionPhase, Snake};
