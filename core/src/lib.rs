#![no_std]

extern crate alloc;

use core::fmt;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use images::*;
pub use leaderboard::*;
pub use shuffle::*;
pub use store::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod images;
mod leaderboard;
mod shuffle;
mod store;
mod types;

/// Countdown ticks (one per second) during which the dealt board is shown face up.
pub const PREVIEW_TICKS: u8 = 5;

/// Interval of both the preview countdown and the elapsed-time clock.
pub const TICK_MILLIS: u32 = 1_000;

/// Delay before a matching pair locks in, long enough to see both faces.
pub const MATCH_DELAY_MILLIS: u32 = 310;

/// Delay before a mismatched pair flips back.
pub const MISMATCH_DELAY_MILLIS: u32 = 800;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
}

impl Difficulty {
    pub const ALL: [Self; 2] = [Self::Easy, Self::Medium];

    pub const fn pair_count(self) -> usize {
        match self {
            Self::Easy => 6,
            Self::Medium => 8,
        }
    }

    pub const fn card_count(self) -> usize {
        self.pair_count() * 2
    }

    /// Name used for storage keys and serialized records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
        }
    }

    pub const fn initial(self) -> char {
        match self {
            Self::Easy => 'E',
            Self::Medium => 'M',
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PairOutcome {
    Match,
    Mismatch,
}

impl PairOutcome {
    pub const fn delay_millis(self) -> u32 {
        match self {
            Self::Match => MATCH_DELAY_MILLIS,
            Self::Mismatch => MISMATCH_DELAY_MILLIS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    NoChange,
    Flipped,
    Pending(PairOutcome),
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Flipped => true,
            Self::Pending(_) => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    NoChange,
    Matched,
    Mismatched,
    Won {
        moves: MoveCount,
        best_score: MoveCount,
        new_best: bool,
    },
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        use ResolveOutcome::*;
        match self {
            NoChange => false,
            Matched => true,
            Mismatched => true,
            Won { .. } => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PreviewOutcome {
    NoChange,
    Countdown(u8),
    Started,
}

impl PreviewOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Timers the engine needs right now. Anything not listed must not be running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerPlan {
    pub preview: bool,
    pub clock: bool,
    pub resolve_after_millis: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_table() {
        assert_eq!(Difficulty::Easy.pair_count(), 6);
        assert_eq!(Difficulty::Easy.card_count(), 12);
        assert_eq!(Difficulty::Medium.pair_count(), 8);
        assert_eq!(Difficulty::Medium.card_count(), 16);
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn difficulty_serializes_as_uppercase_name() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!(
            serde_json::from_str::<Difficulty>("\"EASY\"").unwrap(),
            Difficulty::Easy
        );
    }

    #[test]
    fn pair_outcome_delays() {
        assert_eq!(PairOutcome::Match.delay_millis(), 310);
        assert_eq!(PairOutcome::Mismatch.delay_millis(), 800);
    }
}
