use alloc::vec::Vec;

use crate::*;

pub trait BoardGenerator {
    fn generate(self, difficulty: Difficulty, image_pool: &[ImageId]) -> Result<Vec<Card>>;
}

/// Picks `pair_count` images from a shuffled pool, deals each twice, then shuffles the deal.
///
/// A pool smaller than the pair count wraps around, so several pairs end up showing the same
/// image while still only matching their own twin.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, difficulty: Difficulty, image_pool: &[ImageId]) -> Result<Vec<Card>> {
        use rand::prelude::*;

        if image_pool.is_empty() {
            return Err(GameError::EmptyImagePool);
        }

        let pair_count = difficulty.pair_count();
        if image_pool.len() < pair_count {
            log::warn!(
                "Image pool too small, {} pairs requested but only {} images, reusing images",
                pair_count,
                image_pool.len()
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let pool = shuffle(image_pool, &mut rng);

        let mut cards = Vec::with_capacity(difficulty.card_count());
        for pair_index in 0..pair_count {
            let image = &pool[pair_index % pool.len()];
            // pair counts are tiny, the casts cannot truncate
            let pair_id = pair_index as PairId;
            let first_id = (pair_index * 2) as CardId;
            cards.push(Card::face_down(first_id, pair_id, image.clone()));
            cards.push(Card::face_down(first_id + 1, pair_id, image.clone()));
        }

        Ok(shuffle(&cards, &mut rng))
    }
}

/// Builds a board for `difficulty` using a generator seeded with `seed`.
pub fn build_board(difficulty: Difficulty, image_pool: &[ImageId], seed: u64) -> Result<Vec<Card>> {
    RandomBoardGenerator::new(seed).generate(difficulty, image_pool)
}

/// Distinct images of a board, in first-seen order.
pub fn distinct_images(cards: &[Card]) -> Vec<ImageId> {
    let mut images: Vec<ImageId> = Vec::with_capacity(cards.len() / 2);
    for card in cards {
        if !images.contains(&card.image) {
            images.push(card.image.clone());
        }
    }
    images
}
