use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::*;

pub const BEST_SCORE_KEY_PREFIX: &str = "bestScore_";

pub const LEADERBOARD_KEY: &str = "minion_leaderboard";

/// String key-value storage, like the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// Volatile store, for tests and hosts without durable storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

pub fn best_score_key(difficulty: Difficulty) -> String {
    format!("{}{}", BEST_SCORE_KEY_PREFIX, difficulty.as_str())
}

/// Best scores per difficulty and the global leaderboard, on top of a [`KeyValueStore`].
///
/// Reads never fail: missing or unreadable data counts as "nothing recorded".
#[derive(Clone, Debug, Default)]
pub struct ScoreBook<S> {
    store: S,
}

impl<S: KeyValueStore> ScoreBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Fewest moves recorded for `difficulty`, 0 when there is none.
    pub fn best_score(&self, difficulty: Difficulty) -> MoveCount {
        let key = best_score_key(difficulty);
        let Some(raw) = self.store.get(&key) else {
            return 0;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unreadable best score {:?} under {}", raw, key);
            0
        })
    }

    /// Stores `candidate` when it beats the current best (or there is none) and returns the best.
    pub fn set_best_score_if_better(
        &mut self,
        difficulty: Difficulty,
        candidate: MoveCount,
    ) -> MoveCount {
        let current = self.best_score(difficulty);
        if current != 0 && candidate >= current {
            return current;
        }

        let key = best_score_key(difficulty);
        if let Err(err) = self.store.set(&key, candidate.to_string()) {
            log::error!("Could not save best score under {}: {}", key, err);
        }
        candidate
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let Some(raw) = self.store.get(LEADERBOARD_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable leaderboard: {}", err);
            Vec::new()
        })
    }

    /// Inserts `entry`, keeps the best [`LEADERBOARD_CAPACITY`] entries and persists them.
    pub fn append_leaderboard_entry(&mut self, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
        let mut entries = self.leaderboard();
        entries.push(entry);
        rank_entries(&mut entries);

        match serde_json::to_string(&entries) {
            Ok(raw) => {
                if let Err(err) = self.store.set(LEADERBOARD_KEY, raw) {
                    log::error!("Could not save leaderboard: {}", err);
                }
            }
            Err(err) => log::error!("Could not serialize leaderboard: {}", err),
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<()> {
            Err(GameError::StorageUnavailable)
        }
    }

    fn entry(id: u32, moves: MoveCount, time: Seconds) -> LeaderboardEntry {
        LeaderboardEntry {
            id: format!("{id}"),
            name: format!("p{id}"),
            moves,
            time,
            difficulty: Difficulty::Medium,
            date: "2024-01-01".to_string(),
        }
    }

    fn book_with(key: &str, value: &str) -> ScoreBook<MemoryStore> {
        let mut store = MemoryStore::new();
        store.set(key, value.to_string()).unwrap();
        ScoreBook::new(store)
    }

    #[test]
    fn key_names() {
        assert_eq!(best_score_key(Difficulty::Easy), "bestScore_EASY");
        assert_eq!(best_score_key(Difficulty::Medium), "bestScore_MEDIUM");
    }

    #[test]
    fn best_score_defaults_to_zero() {
        let book = ScoreBook::new(MemoryStore::new());
        assert_eq!(book.best_score(Difficulty::Easy), 0);
    }

    #[test]
    fn unreadable_best_score_is_zero() {
        let book = book_with("bestScore_EASY", "banana");
        assert_eq!(book.best_score(Difficulty::Easy), 0);
    }

    #[test]
    fn first_score_becomes_best() {
        let mut book = ScoreBook::new(MemoryStore::new());

        assert_eq!(book.set_best_score_if_better(Difficulty::Easy, 9), 9);
        assert_eq!(book.store().get("bestScore_EASY").as_deref(), Some("9"));
    }

    #[test]
    fn worse_score_keeps_best() {
        let mut book = book_with("bestScore_EASY", "12");

        assert_eq!(book.set_best_score_if_better(Difficulty::Easy, 15), 12);
        assert_eq!(book.best_score(Difficulty::Easy), 12);
    }

    #[test]
    fn tie_keeps_best() {
        let mut book = book_with("bestScore_EASY", "9");

        assert_eq!(book.set_best_score_if_better(Difficulty::Easy, 9), 9);
        assert_eq!(book.store().get("bestScore_EASY").as_deref(), Some("9"));
    }

    #[test]
    fn better_score_replaces_best() {
        let mut book = book_with("bestScore_EASY", "12");

        assert_eq!(book.set_best_score_if_better(Difficulty::Easy, 8), 8);
        assert_eq!(book.best_score(Difficulty::Easy), 8);
    }

    #[test]
    fn best_scores_are_per_difficulty() {
        let mut book = ScoreBook::new(MemoryStore::new());

        book.set_best_score_if_better(Difficulty::Easy, 7);

        assert_eq!(book.best_score(Difficulty::Medium), 0);
    }

    #[test]
    fn failed_write_still_reports_candidate() {
        let mut book = ScoreBook::new(ReadOnlyStore(MemoryStore::new()));

        assert_eq!(book.set_best_score_if_better(Difficulty::Easy, 11), 11);
        assert_eq!(book.best_score(Difficulty::Easy), 0);
    }

    #[test]
    fn empty_or_corrupt_leaderboard_is_empty() {
        assert!(ScoreBook::new(MemoryStore::new()).leaderboard().is_empty());
        assert!(book_with(LEADERBOARD_KEY, "{oops").leaderboard().is_empty());
        assert!(book_with(LEADERBOARD_KEY, "42").leaderboard().is_empty());
    }

    #[test]
    fn append_sorts_and_persists() {
        let mut book = ScoreBook::new(MemoryStore::new());

        book.append_leaderboard_entry(entry(0, 20, 10));
        let entries = book.append_leaderboard_entry(entry(1, 12, 90));

        assert_eq!(entries[0].id, "1");
        assert_eq!(book.leaderboard(), entries);
    }

    #[test]
    fn eleven_entries_leave_best_ten() {
        let mut book = ScoreBook::new(MemoryStore::new());

        let mut entries = Vec::new();
        for i in 0..11 {
            // moves descend so every insert lands somewhere new
            entries = book.append_leaderboard_entry(entry(i, 40 - i, 100 + i));
        }

        assert_eq!(entries.len(), 10);
        assert!(entries.windows(2).all(|w| w[0].rank_key() < w[1].rank_key()));
        assert!(entries.iter().all(|e| e.id != "0"));
        assert_eq!(book.leaderboard(), entries);
    }

    #[test]
    fn time_breaks_move_ties() {
        let mut book = ScoreBook::new(MemoryStore::new());

        book.append_leaderboard_entry(entry(0, 10, 50));
        let entries = book.append_leaderboard_entry(entry(1, 10, 20));

        assert_eq!(entries[0].id, "1");
        assert_eq!(entries[1].id, "0");
    }

    #[test]
    fn append_over_corrupt_data_starts_fresh() {
        let mut book = book_with(LEADERBOARD_KEY, "not json");

        let entries = book.append_leaderboard_entry(entry(0, 10, 10));

        assert_eq!(entries.len(), 1);
        assert_eq!(book.leaderboard(), entries);
    }
}
