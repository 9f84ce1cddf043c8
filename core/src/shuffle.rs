use alloc::vec::Vec;
use rand::prelude::*;

/// Returns a uniformly shuffled copy of `items` (Fisher–Yates, last index down to 1).
pub fn shuffle<T: Clone>(items: &[T], rng: &mut SmallRng) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Convenience wrapper seeding a fresh generator.
pub fn shuffle_with_seed<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut rng = SmallRng::seed_from_u64(seed);
    shuffle(items, &mut rng)
}
