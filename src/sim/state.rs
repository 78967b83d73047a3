//! Deal state and core game types

use serde::{Deserialize, Serialize};

use super::deck::ContentKey;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// "How to play" panel is up; the player has not agreed to the rules yet
    AwaitingConsent,
    /// Active gameplay
    Running,
    /// All pairs found
    Complete,
}

/// A single card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Position in the deal (0..N-1)
    pub id: usize,
    /// Face shared with exactly one other card
    pub content_key: ContentKey,
    /// Face-up, either flipped or matched
    pub revealed: bool,
    /// Pair confirmed (terminal)
    pub matched: bool,
}

/// Identifies one armed mismatch flip-back timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerHandle(pub u32);

/// One shuffled round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub cards: Vec<Card>,
    /// Flipped but unresolved cards (0-2)
    pub active_selection: Vec<usize>,
    pub move_count: u32,
    pub elapsed_seconds: u32,
    pub phase: GamePhase,
    /// Round clock started by the first reveal
    pub clock_started: bool,
}

impl Deal {
    /// Lay out cards in the given face order
    pub fn from_faces(faces: &[ContentKey], phase: GamePhase) -> Self {
        let cards = faces
            .iter()
            .enumerate()
            .map(|(id, &content_key)| Card {
                id,
                content_key,
                revealed: false,
                matched: false,
            })
            .collect();

        Self {
            cards,
            active_selection: Vec::with_capacity(2),
            move_count: 0,
            elapsed_seconds: 0,
            phase,
            clock_started: false,
        }
    }

    /// Number of distinct pairs in the deal
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Number of pairs found so far
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }

    /// Round clock is counting seconds
    pub fn clock_running(&self) -> bool {
        self.phase == GamePhase::Running && self.clock_started
    }
}

/// Read-only view of the engine for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: GamePhase,
    pub cards: Vec<Card>,
    pub move_count: u32,
    pub elapsed_seconds: u32,
    pub player_name: String,
    pub clock_running: bool,
    pub pending_flip_back: Option<TimerHandle>,
}
