//! Game engine: flip/match transitions, counters and win detection
//!
//! The engine never touches a real clock. The presentation layer (or
//! [`GameClock`](super::tick::GameClock) in headless runs) calls [`Engine::tick`]
//! once per second and arms the flip-back timer a mismatch asks for, then
//! reports it back through [`Engine::resolve_mismatch`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::deck::{self, Catalog, CatalogEntry};
use super::state::{Card, Deal, EngineSnapshot, GamePhase, TimerHandle};
use crate::error::ConfigError;
use crate::highscores::{Leaderboard, ScoreStore};
use crate::identity;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;

/// Request to hide a mismatched pair after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipBackTimer {
    pub handle: TimerHandle,
    pub delay_ms: u32,
}

/// Final numbers of a completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub elapsed_seconds: u32,
    pub move_count: u32,
    pub player_name: String,
    /// Leaderboard position (1-indexed), None if the round didn't place
    pub rank: Option<usize>,
    pub leaderboard: Leaderboard,
}

/// What a reveal intent did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealOutcome {
    /// Not running, selection full, card selected/matched or out of range
    Ignored,
    /// First card of a pair is face-up
    Flipped,
    /// Pair found, round continues
    Matched,
    /// Pair differs; arm the timer and call `resolve_mismatch` when it fires
    Mismatched(FlipBackTimer),
    /// Last pair found
    Completed(RoundResult),
}

/// Owns the current deal, the leaderboard and the player's gamertag
pub struct Engine<S: KeyValueStore> {
    settings: Settings,
    catalog: Catalog,
    rng: Pcg32,
    deal: Deal,
    consent_granted: bool,
    player_name: String,
    scores: ScoreStore<S>,
    pending_flip_back: Option<TimerHandle>,
    next_timer_id: u32,
    /// Bumped on every deal so clocks can tell rounds apart
    round: u64,
    last_result: Option<RoundResult>,
}

impl<S: KeyValueStore> Engine<S> {
    /// Validate the configuration, load identity and leaderboard, and deal the first round
    pub fn new(settings: Settings, catalog: Catalog, store: S) -> Result<Self, ConfigError> {
        settings.validate(catalog.len())?;

        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let player_name = identity::get_or_create_identity(&store, &mut rng);
        let scores = ScoreStore::load(store);
        let deal = deck::new_deal(settings.pair_count, GamePhase::AwaitingConsent, &mut rng);

        log::info!(
            "Engine ready: {} pairs, seed {}, player {}",
            settings.pair_count,
            seed,
            player_name
        );

        Ok(Self {
            settings,
            catalog,
            rng,
            deal,
            consent_granted: false,
            player_name,
            scores,
            pending_flip_back: None,
            next_timer_id: 1,
            round: 0,
            last_result: None,
        })
    }

    /// Replace the deal with a fresh shuffle
    ///
    /// Any armed flip-back timer is cancelled and returned so the caller can
    /// clear it; the engine would ignore it anyway.
    pub fn new_deal(&mut self) -> Option<TimerHandle> {
        let cancelled = self.pending_flip_back.take();
        let phase = if self.consent_granted {
            GamePhase::Running
        } else {
            GamePhase::AwaitingConsent
        };
        self.deal = deck::new_deal(self.settings.pair_count, phase, &mut self.rng);
        self.round = self.round.wrapping_add(1);
        self.last_result = None;
        log::info!("New deal ({} cards, {:?})", self.deal.cards.len(), phase);
        cancelled
    }

    /// Abandon the current round without recording anything and deal again
    pub fn reset_round(&mut self) -> Option<TimerHandle> {
        if self.deal.phase == GamePhase::Running && self.deal.move_count > 0 {
            log::info!(
                "Round abandoned after {} moves, {}s",
                self.deal.move_count,
                self.deal.elapsed_seconds
            );
        }
        self.new_deal()
    }

    /// Player agreed to the rules; starts the current deal if it was waiting
    pub fn grant_consent(&mut self) {
        if self.consent_granted {
            return;
        }
        self.consent_granted = true;
        if self.deal.phase == GamePhase::AwaitingConsent {
            self.deal.phase = GamePhase::Running;
        }
        log::info!("Rules accepted");
    }

    /// Flip a card
    pub fn reveal_card(&mut self, card_id: usize) -> RevealOutcome {
        let deal = &mut self.deal;
        let ignored = deal.phase != GamePhase::Running
            || deal.active_selection.len() >= 2
            || deal.active_selection.contains(&card_id)
            || deal.cards.get(card_id).is_none_or(|c| c.matched);
        if ignored {
            log::debug!("Ignoring reveal of card {}", card_id);
            return RevealOutcome::Ignored;
        }

        deal.clock_started = true;
        deal.active_selection.push(card_id);
        deal.cards[card_id].revealed = true;

        let [first, second] = match deal.active_selection[..] {
            [a, b] => [a, b],
            _ => return RevealOutcome::Flipped,
        };
        deal.move_count += 1;

        if deal.cards[first].content_key != deal.cards[second].content_key {
            let handle = TimerHandle(self.next_timer_id);
            self.next_timer_id = self.next_timer_id.wrapping_add(1);
            self.pending_flip_back = Some(handle);
            return RevealOutcome::Mismatched(FlipBackTimer {
                handle,
                delay_ms: self.settings.mismatch_delay_ms,
            });
        }

        deal.cards[first].matched = true;
        deal.cards[second].matched = true;
        deal.active_selection.clear();

        if !deal.all_matched() {
            return RevealOutcome::Matched;
        }
        deal.phase = GamePhase::Complete;
        RevealOutcome::Completed(self.record_win())
    }

    /// Hide a mismatched pair once its timer fires
    ///
    /// Returns false (and changes nothing) for a handle that was cancelled or
    /// belongs to an earlier deal.
    pub fn resolve_mismatch(&mut self, handle: TimerHandle) -> bool {
        if self.pending_flip_back != Some(handle) {
            log::debug!("Ignoring stale flip-back timer {:?}", handle);
            return false;
        }
        self.pending_flip_back = None;

        for id in self.deal.active_selection.drain(..) {
            self.deal.cards[id].revealed = false;
        }
        true
    }

    /// Cancel the armed flip-back timer (teardown)
    pub fn cancel_pending_timer(&mut self) -> Option<TimerHandle> {
        self.pending_flip_back.take()
    }

    /// One second of play passed
    pub fn tick(&mut self) {
        if self.deal.clock_running() {
            self.deal.elapsed_seconds += 1;
        }
    }

    /// Swap in a hand-built layout
    #[cfg(test)]
    pub(crate) fn replace_deal(&mut self, deal: Deal) {
        self.deal = deal;
        self.round = self.round.wrapping_add(1);
    }

    fn record_win(&mut self) -> RoundResult {
        let elapsed_seconds = self.deal.elapsed_seconds;
        let move_count = self.deal.move_count;
        log::info!(
            "{} cleared the board in {}s with {} moves",
            self.player_name,
            elapsed_seconds,
            move_count
        );

        let rank = self.scores.leaderboard().potential_rank(elapsed_seconds, move_count);
        let leaderboard = self.scores.record(elapsed_seconds, move_count, &self.player_name);
        let result = RoundResult {
            elapsed_seconds,
            move_count,
            player_name: self.player_name.clone(),
            rank,
            leaderboard,
        };
        self.last_result = Some(result.clone());
        result
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.deal.phase,
            cards: self.deal.cards.clone(),
            move_count: self.deal.move_count,
            elapsed_seconds: self.deal.elapsed_seconds,
            player_name: self.player_name.clone(),
            clock_running: self.deal.clock_running(),
            pending_flip_back: self.pending_flip_back,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.deal.phase
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn cards(&self) -> &[Card] {
        &self.deal.cards
    }

    pub fn active_selection(&self) -> &[usize] {
        &self.deal.active_selection
    }

    pub fn move_count(&self) -> u32 {
        self.deal.move_count
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.deal.elapsed_seconds
    }

    /// Whether the tick source should be running
    pub fn clock_running(&self) -> bool {
        self.deal.clock_running()
    }

    /// Counter identifying the current deal
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn consent_granted(&self) -> bool {
        self.consent_granted
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Face drawn on a card
    pub fn face(&self, card_id: usize) -> Option<&CatalogEntry> {
        let card = self.deal.cards.get(card_id)?;
        self.catalog.get(card.content_key)
    }

    pub fn pending_flip_back(&self) -> Option<TimerHandle> {
        self.pending_flip_back
    }

    /// Result of the round just completed (cleared on the next deal)
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn top_scores(&self) -> Leaderboard {
        self.scores.top_scores()
    }

    pub fn clear_scores(&mut self) {
        self.scores.clear();
    }
}
