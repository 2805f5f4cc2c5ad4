//! Session lifecycle: ticking, game over, reset and the high score

pub mod controller;

pub use controller::SessionController;
