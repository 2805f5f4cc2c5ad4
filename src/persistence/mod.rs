//! High-score persistence
//!
//! The game keeps exactly one scalar across runs. Stores are best-effort: the
//! session controller logs and ignores their errors.

pub mod high_score;

pub use high_score::{HIGH_SCORE_KEY, HighScoreStore, JsonFileStore, MemoryStore, default_path};
