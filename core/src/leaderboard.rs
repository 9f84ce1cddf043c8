use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub const LEADERBOARD_CAPACITY: usize = 10;

pub const MAX_NAME_CHARS: usize = 12;

/// A trimmed, non-blank player name of at most [`MAX_NAME_CHARS`] characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(GameError::BlankName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(GameError::NameTooLong {
                max: MAX_NAME_CHARS,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity and display date of a record, supplied by whoever knows the wall clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordStamp {
    pub id: String,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub moves: MoveCount,
    pub time: Seconds,
    pub difficulty: Difficulty,
    pub date: String,
}

impl LeaderboardEntry {
    pub fn new(
        name: PlayerName,
        moves: MoveCount,
        time: Seconds,
        difficulty: Difficulty,
        stamp: RecordStamp,
    ) -> Self {
        Self {
            id: stamp.id,
            name: name.0,
            moves,
            time,
            difficulty,
            date: stamp.date,
        }
    }

    pub fn rank_key(&self) -> (MoveCount, Seconds) {
        (self.moves, self.time)
    }
}

/// Sorts by moves then time and drops everything past the capacity.
///
/// The sort is stable, so among equal keys earlier entries stay ahead.
pub fn rank_entries(entries: &mut Vec<LeaderboardEntry>) {
    entries.sort_by_key(LeaderboardEntry::rank_key);
    entries.truncate(LEADERBOARD_CAPACITY);
}
