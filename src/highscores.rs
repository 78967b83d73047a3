//! Fastest-times leaderboard
//!
//! Persisted through the injected [`KeyValueStore`], keeps the top 5 rounds.
//! Lower is better: time first, then moves. Records use the same camelCase
//! layout as the JavaScript build so both can share one LocalStorage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, LEADERBOARD_KEY};

/// Maximum number of leaderboard entries to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 5;

/// A single completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    #[serde(rename = "timeInSeconds")]
    pub elapsed_seconds: u32,
    /// Elapsed time as `m:ss`, rebuilt on load
    #[serde(default)]
    pub formatted_time: String,
    #[serde(rename = "moves")]
    pub move_count: u32,
    /// When the round was recorded (RFC 3339)
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    pub fn new(
        player_name: &str,
        elapsed_seconds: u32,
        move_count: u32,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player_name: player_name.to_string(),
            elapsed_seconds,
            formatted_time: format_time(elapsed_seconds),
            move_count,
            recorded_at,
        }
    }

    fn sort_key(&self) -> (u32, u32) {
        (self.elapsed_seconds, self.move_count)
    }
}

/// Ranked leaderboard snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a result would make the leaderboard
    pub fn qualifies(&self, elapsed_seconds: u32, move_count: u32) -> bool {
        self.potential_rank(elapsed_seconds, move_count).is_some()
    }

    /// Get the rank a result would achieve (1-indexed, None if it doesn't qualify)
    ///
    /// Ties go below existing entries, matching insertion order.
    pub fn potential_rank(&self, elapsed_seconds: u32, move_count: u32) -> Option<usize> {
        let key = (elapsed_seconds, move_count);
        let rank = self
            .entries
            .iter()
            .position(|e| key < e.sort_key())
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= MAX_LEADERBOARD_ENTRIES).then_some(rank)
    }

    /// Insert an entry, keeping the list sorted and capped
    ///
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.elapsed_seconds, entry.move_count);
        self.entries.push(entry);
        // Stable sort keeps equal results in insertion order
        self.entries.sort_by_key(ScoreEntry::sort_key);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Best entry (if any)
    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }
}

/// Owns the leaderboard and keeps it in sync with storage
pub struct ScoreStore<S: KeyValueStore> {
    store: S,
    leaderboard: Leaderboard,
}

impl<S: KeyValueStore> ScoreStore<S> {
    /// Load the leaderboard; missing or corrupt data starts it empty
    pub fn load(store: S) -> Self {
        let leaderboard = match persistence::load_json::<Leaderboard, _>(&store, LEADERBOARD_KEY) {
            Some(mut scores) => {
                // Stored data may have been edited by hand
                scores.entries.sort_by_key(ScoreEntry::sort_key);
                scores.entries.truncate(MAX_LEADERBOARD_ENTRIES);
                for entry in &mut scores.entries {
                    entry.formatted_time = format_time(entry.elapsed_seconds);
                }
                log::info!("Loaded {} leaderboard entries", scores.entries.len());
                scores
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Leaderboard::new()
            }
        };
        Self { store, leaderboard }
    }

    /// Record a completed round and return the updated leaderboard
    pub fn record(&mut self, elapsed_seconds: u32, move_count: u32, player_name: &str) -> Leaderboard {
        self.record_at(elapsed_seconds, move_count, player_name, Utc::now())
    }

    /// [`record`](Self::record) with an explicit timestamp
    pub fn record_at(
        &mut self,
        elapsed_seconds: u32,
        move_count: u32,
        player_name: &str,
        recorded_at: DateTime<Utc>,
    ) -> Leaderboard {
        let entry = ScoreEntry::new(player_name, elapsed_seconds, move_count, recorded_at);
        match self.leaderboard.insert(entry) {
            Some(rank) => log::info!(
                "{} placed #{} ({}, {} moves)",
                player_name,
                rank,
                format_time(elapsed_seconds),
                move_count
            ),
            None => log::info!("{} did not make the leaderboard", player_name),
        }
        self.save();
        self.leaderboard.clone()
    }

    /// Current leaderboard
    pub fn top_scores(&self) -> Leaderboard {
        self.leaderboard.clone()
    }

    /// Borrow the current leaderboard without cloning
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Remove every entry and persist the empty list
    pub fn clear(&mut self) {
        self.leaderboard.entries.clear();
        self.save();
        log::info!("Leaderboard cleared");
    }

    /// Failures are logged; the in-memory leaderboard stays authoritative
    fn save(&self) {
        match persistence::save_json(&self.store, LEADERBOARD_KEY, &self.leaderboard) {
            Ok(()) => log::debug!("Leaderboard saved ({} entries)", self.leaderboard.len()),
            Err(e) => log::error!("Error saving leaderboard: {}", e),
        }
    }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn times_and_moves(board: &Leaderboard) -> Vec<(u32, u32)> {
        board.entries.iter().map(ScoreEntry::sort_key).collect()
    }

    #[test]
    fn test_ordering_time_then_moves() {
        let mut scores = ScoreStore::load(MemoryStore::new());
        scores.record_at(30, 5, "A", at(0));
        scores.record_at(20, 10, "B", at(0));
        let board = scores.record_at(20, 3, "C", at(0));
        assert_eq!(times_and_moves(&board), vec![(20, 3), (20, 10), (30, 5)]);
    }

    #[test]
    fn test_cap_keeps_best_five() {
        let mut scores = ScoreStore::load(MemoryStore::new());
        for (secs, moves) in [(50, 8), (40, 9), (60, 6), (45, 7), (41, 12), (30, 6)] {
            scores.record_at(secs, moves, "P", at(0));
        }
        let board = scores.top_scores();
        assert_eq!(board.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(
            times_and_moves(&board),
            vec![(30, 6), (40, 9), (41, 12), (45, 7), (50, 8)]
        );
    }

    #[test]
    fn test_equal_results_keep_insertion_order() {
        let mut scores = ScoreStore::load(MemoryStore::new());
        scores.record_at(25, 6, "first", at(0));
        let board = scores.record_at(25, 6, "second", at(0));
        let names: Vec<_> = board.entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_top_scores_is_idempotent() {
        let mut scores = ScoreStore::load(MemoryStore::new());
        scores.record_at(12, 6, "A", at(1));
        assert_eq!(scores.top_scores(), scores.top_scores());
    }

    #[test]
    fn test_persists_and_reloads() {
        let store = Rc::new(MemoryStore::new());
        let mut scores = ScoreStore::load(Rc::clone(&store));
        scores.record_at(33, 7, "SwiftAce12", at(1_700_000_000_000));

        let reloaded = ScoreStore::load(store);
        assert_eq!(reloaded.top_scores(), scores.top_scores());
        assert_eq!(reloaded.leaderboard().best().unwrap().player_name, "SwiftAce12");
    }

    #[test]
    fn test_load_sorts_and_caps_stored_list() {
        let store = MemoryStore::new();
        let stored: Vec<_> = [(90, 9), (20, 8), (75, 4), (20, 6), (300, 2), (45, 12), (61, 7)]
            .into_iter()
            .map(|(secs, moves)| ScoreEntry::new("P", secs, moves, at(0)))
            .collect();
        store
            .set(LEADERBOARD_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let scores = ScoreStore::load(store);
        assert_eq!(
            times_and_moves(scores.leaderboard()),
            vec![(20, 6), (20, 8), (45, 12), (61, 7), (75, 4)]
        );
    }

    #[test]
    fn test_reads_browser_records() {
        let store = MemoryStore::new();
        let json = r#"[
            {"playerName":"MightyBatter7","timeInSeconds":95,"formattedTime":"1:35","moves":9,"date":"2024-05-01T18:30:00.000Z"},
            {"playerName":"SwiftAce12","timeInSeconds":41,"moves":7,"date":"2024-05-02T09:00:00.000Z"}
        ]"#;
        store.set(LEADERBOARD_KEY, json).unwrap();

        let board = ScoreStore::load(store).top_scores();
        let best = board.best().unwrap();
        assert_eq!(best.player_name, "SwiftAce12");
        assert_eq!(best.formatted_time, "0:41");
        assert_eq!(best.recorded_at.to_rfc3339(), "2024-05-02T09:00:00+00:00");
        assert_eq!(times_and_moves(&board), vec![(41, 7), (95, 9)]);
    }

    #[test]
    fn test_writes_browser_layout() {
        let store = Rc::new(MemoryStore::new());
        let mut scores = ScoreStore::load(Rc::clone(&store));
        scores.record_at(75, 8, "SwiftAce12", at(1_714_588_200_000));

        let raw = store.get(LEADERBOARD_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value[0];
        assert_eq!(entry["playerName"], "SwiftAce12");
        assert_eq!(entry["timeInSeconds"], 75);
        assert_eq!(entry["formattedTime"], "1:15");
        assert_eq!(entry["moves"], 8);
        assert!(entry["date"].as_str().unwrap().starts_with("2024-05-01T18:30:00"));
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let store = MemoryStore::new();
        store.set(LEADERBOARD_KEY, "{not json").unwrap();
        let scores = ScoreStore::load(store);
        assert!(scores.top_scores().is_empty());
    }

    #[test]
    fn test_unreadable_store_loads_empty() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        assert!(ScoreStore::load(store).top_scores().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_update() {
        let store = Rc::new(MemoryStore::new());
        let mut scores = ScoreStore::load(Rc::clone(&store));
        store.fail_writes(true);
        let board = scores.record_at(10, 6, "A", at(0));
        assert_eq!(board.len(), 1);
        assert_eq!(scores.top_scores().len(), 1);

        store.fail_writes(false);
        assert_eq!(store.get(LEADERBOARD_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let store = Rc::new(MemoryStore::new());
        let mut scores = ScoreStore::load(Rc::clone(&store));
        scores.record_at(10, 6, "A", at(0));
        scores.clear();
        assert!(scores.top_scores().is_empty());
        assert_eq!(store.get(LEADERBOARD_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_potential_rank() {
        let mut scores = ScoreStore::load(MemoryStore::new());
        assert_eq!(scores.leaderboard().potential_rank(99, 99), Some(1));
        for secs in [10, 20, 30, 40, 50] {
            scores.record_at(secs, 6, "P", at(0));
        }
        let board = scores.leaderboard();
        assert_eq!(board.potential_rank(5, 6), Some(1));
        assert_eq!(board.potential_rank(20, 6), Some(3));
        assert_eq!(board.potential_rank(20, 5), Some(2));
        assert_eq!(board.potential_rank(50, 6), None);
        assert!(!board.qualifies(60, 1));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(75), "1:15");
        assert_eq!(format_time(600), "10:00");
    }

    proptest! {
        #[test]
        fn prop_leaderboard_sorted_and_capped(
            results in proptest::collection::vec((0u32..300, 0u32..60), 0..20)
        ) {
            let mut scores = ScoreStore::load(MemoryStore::new());
            for (secs, moves) in &results {
                scores.record_at(*secs, *moves, "P", at(0));
            }
            let board = scores.top_scores();
            prop_assert_eq!(board.len(), results.len().min(MAX_LEADERBOARD_ENTRIES));

            let mut expected = results.clone();
            expected.sort();
            expected.truncate(MAX_LEADERBOARD_ENTRIES);
            prop_assert_eq!(times_and_moves(&board), expected);
        }
    }
}
