//! Memoray Match - memory-matching card game core
//!
//! Core modules:
//! - `sim`: Deal construction, flip/match engine, virtual game clock
//! - `highscores`: Fastest-times leaderboard
//! - `identity`: Player gamertag generation
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `settings`: Persisted game configuration
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod highscores;
pub mod identity;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, StorageError};
pub use highscores::{Leaderboard, ScoreEntry, ScoreStore};
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::{BoardSize, Settings};
pub use sim::{Engine, GameClock, GamePhase, RevealOutcome};
