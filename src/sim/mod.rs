//! Game simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Seeded RNG only
//! - No real clocks; time arrives as `tick` calls and timer callbacks
//! - Storage only through the injected key-value store

pub mod deck;
pub mod engine;
pub mod state;
pub mod tick;

pub use deck::{Catalog, CatalogEntry, ContentKey, new_deal};
pub use engine::{Engine, FlipBackTimer, RevealOutcome, RoundResult};
pub use state::{Card, Deal, EngineSnapshot, GamePhase, TimerHandle};
pub use tick::GameClock;
