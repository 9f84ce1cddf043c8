use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    #[default]
    Idle,
    Preview,
    Playing,
    Won,
}

impl GameStatus {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the board is on screen.
    pub const fn has_board(self) -> bool {
        matches!(self, Self::Preview | Self::Playing | Self::Won)
    }
}

/// Snapshot of a round. Only [`MatchEngine`] changes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    cards: Vec<Card>,
    flipped_indices: SmallVec<[CardIndex; 2]>,
    moves: MoveCount,
    matches: usize,
    status: GameStatus,
    difficulty: Difficulty,
    best_score: MoveCount,
}

impl GameState {
    fn idle(difficulty: Difficulty, best_score: MoveCount) -> Self {
        Self {
            cards: Vec::new(),
            flipped_indices: SmallVec::new(),
            moves: 0,
            matches: 0,
            status: GameStatus::Idle,
            difficulty,
            best_score,
        }
    }

    fn dealt(difficulty: Difficulty, cards: Vec<Card>, best_score: MoveCount) -> Self {
        Self {
            cards,
            status: GameStatus::Preview,
            ..Self::idle(difficulty, best_score)
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_at(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn flipped_indices(&self) -> &[CardIndex] {
        &self.flipped_indices
    }

    pub fn moves(&self) -> MoveCount {
        self.moves
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Fewest moves on record for this difficulty, 0 when there is none.
    pub fn best_score(&self) -> MoveCount {
        self.best_score
    }

    fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.matches == self.total_pairs()
    }
}

/// Two face-up cards waiting for their outcome to be applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingPair {
    pub first: CardIndex,
    pub second: CardIndex,
    pub outcome: PairOutcome,
}

/// A dealt board that has not been put on the table yet, so its images can be loaded first.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRound {
    difficulty: Difficulty,
    cards: Vec<Card>,
}

impl PreparedRound {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn images(&self) -> Vec<ImageId> {
        distinct_images(&self.cards)
    }
}

/// Lifecycle of a pairs game: `Idle -> Preview -> Playing -> Won -> Idle`.
///
/// Time is driven from outside: the caller runs the timers described by [`Self::timer_plan`]
/// and feeds their ticks back through [`Self::tick_preview`], [`Self::tick_clock`] and
/// [`Self::resolve`]. Ticks that arrive in the wrong state are ignored.
#[derive(Clone, Debug)]
pub struct MatchEngine<S> {
    scores: ScoreBook<S>,
    image_pool: Vec<ImageId>,
    state: GameState,
    pending: Option<PendingPair>,
    preview_left: u8,
    elapsed_secs: Seconds,
}

impl<S: KeyValueStore> MatchEngine<S> {
    pub fn new(store: S) -> Self {
        let scores = ScoreBook::new(store);
        let difficulty = Difficulty::default();
        let best_score = scores.best_score(difficulty);
        Self {
            scores,
            image_pool: Vec::new(),
            state: GameState::idle(difficulty, best_score),
            pending: None,
            preview_left: 0,
            elapsed_secs: 0,
        }
    }

    pub fn with_image_pool(store: S, image_pool: Vec<ImageId>) -> Self {
        let mut engine = Self::new(store);
        engine.set_image_pool(image_pool);
        engine
    }

    pub fn set_image_pool(&mut self, image_pool: Vec<ImageId>) {
        log::debug!("Image pool set to {} images", image_pool.len());
        self.image_pool = image_pool;
    }

    pub fn image_pool(&self) -> &[ImageId] {
        &self.image_pool
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Seconds of preview left, meaningful while in [`GameStatus::Preview`].
    pub fn preview_left(&self) -> u8 {
        self.preview_left
    }

    pub fn elapsed_secs(&self) -> Seconds {
        self.elapsed_secs
    }

    pub fn pending(&self) -> Option<PendingPair> {
        self.pending
    }

    /// Whether a pair is waiting to resolve; clicks are ignored meanwhile.
    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scores(&self) -> &ScoreBook<S> {
        &self.scores
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.scores.leaderboard()
    }

    pub fn timer_plan(&self) -> TimerPlan {
        TimerPlan {
            preview: self.state.status == GameStatus::Preview,
            clock: self.state.status == GameStatus::Playing,
            resolve_after_millis: self.pending.map(|pair| pair.outcome.delay_millis()),
        }
    }

    /// Deals a board for `difficulty` without touching the current round.
    pub fn prepare(&self, difficulty: Difficulty, seed: u64) -> Result<PreparedRound> {
        let cards = RandomBoardGenerator::new(seed).generate(difficulty, &self.image_pool)?;
        Ok(PreparedRound { difficulty, cards })
    }

    /// Replaces whatever is going on with `round`, starting its preview.
    pub fn begin(&mut self, round: PreparedRound) {
        let PreparedRound { difficulty, cards } = round;
        let best_score = self.scores.best_score(difficulty);
        log::info!(
            "New {} round with {} cards, best score {}",
            difficulty,
            cards.len(),
            best_score
        );

        self.state = GameState::dealt(difficulty, cards, best_score);
        self.pending = None;
        self.preview_left = PREVIEW_TICKS;
        self.elapsed_secs = 0;
    }

    pub fn start(&mut self, difficulty: Difficulty, seed: u64) -> Result<()> {
        let round = self.prepare(difficulty, seed)?;
        self.begin(round);
        Ok(())
    }

    /// Starts over with the current difficulty.
    pub fn restart(&mut self, seed: u64) -> Result<()> {
        self.start(self.state.difficulty, seed)
    }

    pub fn tick_preview(&mut self) -> PreviewOutcome {
        use PreviewOutcome::*;

        if self.state.status != GameStatus::Preview {
            log::trace!("stale preview tick in {:?}", self.state.status);
            return NoChange;
        }

        if self.preview_left <= 1 {
            self.preview_left = 0;
            self.elapsed_secs = 0;
            self.state.status = GameStatus::Playing;
            log::debug!("Preview over, playing");
            Started
        } else {
            self.preview_left -= 1;
            Countdown(self.preview_left)
        }
    }

    pub fn tick_clock(&mut self) -> bool {
        if self.state.status != GameStatus::Playing {
            log::trace!("stale clock tick in {:?}", self.state.status);
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    pub fn flip(&mut self, index: CardIndex) -> Result<FlipOutcome> {
        use FlipOutcome::*;

        if index >= self.state.cards.len() {
            return Err(GameError::InvalidPosition);
        }

        if self.state.status != GameStatus::Playing || self.pending.is_some() {
            log::trace!("ignored click on {} while {:?}", index, self.state.status);
            return Ok(NoChange);
        }

        let card = &mut self.state.cards[index];
        if !card.is_selectable() {
            return Ok(NoChange);
        }
        card.is_flipped = true;
        self.state.flipped_indices.push(index);

        let [first, second] = match self.state.flipped_indices.as_slice() {
            &[first, second] => [first, second],
            _ => return Ok(Flipped),
        };

        self.state.moves = self.state.moves.saturating_add(1);
        let cards = &self.state.cards;
        let outcome = if cards[first].matches(&cards[second]) {
            PairOutcome::Match
        } else {
            PairOutcome::Mismatch
        };
        log::debug!("move {}: {:?} on {} and {}", self.state.moves, outcome, first, second);

        self.pending = Some(PendingPair {
            first,
            second,
            outcome,
        });
        Ok(Pending(outcome))
    }

    /// Applies the pending pair, once its delay has passed.
    pub fn resolve(&mut self) -> ResolveOutcome {
        let Some(PendingPair {
            first,
            second,
            outcome,
        }) = self.pending.take()
        else {
            return ResolveOutcome::NoChange;
        };

        self.state.flipped_indices.clear();

        match outcome {
            PairOutcome::Mismatch => {
                self.state.cards[first].is_flipped = false;
                self.state.cards[second].is_flipped = false;
                ResolveOutcome::Mismatched
            }
            PairOutcome::Match => {
                self.state.cards[first].is_matched = true;
                self.state.cards[second].is_matched = true;
                self.state.matches += 1;

                if self.state.is_complete() {
                    self.finish()
                } else {
                    ResolveOutcome::Matched
                }
            }
        }
    }

    fn finish(&mut self) -> ResolveOutcome {
        let difficulty = self.state.difficulty;
        let moves = self.state.moves;
        let previous_best = self.scores.best_score(difficulty);
        let best_score = self.scores.set_best_score_if_better(difficulty, moves);

        self.state.status = GameStatus::Won;
        self.state.best_score = best_score;
        log::info!(
            "Won {} in {} moves and {}s, best {}",
            difficulty,
            moves,
            self.elapsed_secs,
            best_score
        );

        ResolveOutcome::Won {
            moves,
            best_score,
            new_best: previous_best == 0 || moves < previous_best,
        }
    }

    /// Drops the current board and any pending pair.
    pub fn return_to_menu(&mut self) {
        let difficulty = self.state.difficulty;
        self.state = GameState::idle(difficulty, self.scores.best_score(difficulty));
        self.pending = None;
        self.preview_left = 0;
        self.elapsed_secs = 0;
    }

    /// Records the won round on the leaderboard under `name` and goes back to the menu.
    pub fn save_record(
        &mut self,
        name: &str,
        stamp: RecordStamp,
    ) -> Result<Vec<LeaderboardEntry>> {
        if self.state.status != GameStatus::Won {
            return Err(GameError::NotWon);
        }
        let name = PlayerName::parse(name)?;

        let entry = LeaderboardEntry::new(
            name,
            self.state.moves,
            self.elapsed_secs,
            self.state.difficulty,
            stamp,
        );
        let entries = self.scores.append_leaderboard_entry(entry);
        self.return_to_menu();
        Ok(entries)
    }
}
