use criterion::{Criterion, criterion_group, criterion_main};
use minion_match_core::*;
use std::hint::black_box;

fn board_benches(c: &mut Criterion) {
    let pool = ImageSource::default().fallback_pool();

    let mut group = c.benchmark_group("build_board");
    for difficulty in Difficulty::ALL {
        group.bench_function(difficulty.as_str(), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                build_board(black_box(difficulty), black_box(&pool), seed)
            })
        });
    }
    group.finish();

    c.bench_function("shuffle_64", |b| {
        let items: Vec<u32> = (0..64).collect();
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            shuffle_with_seed(black_box(&items), seed)
        })
    });
}

criterion_group!(benches, board_benches);
criterion_main!(benches);
