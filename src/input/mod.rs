//! Raw terminal input to game intents

pub mod direction;
pub mod handler;

pub use direction::{DirectionInput, SwipeTracker};
pub use handler::{InputHandler, KeyAction};
