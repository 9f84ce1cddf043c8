use minion_match_core::*;

fn pool() -> Vec<ImageId> {
    ImageSource::default().fallback_pool()
}

fn stamp(id: u64) -> RecordStamp {
    RecordStamp {
        id: id.to_string(),
        date: "2024-05-01".to_string(),
    }
}

/// Plays a full round, making `misses` wrong guesses first and letting `secs` pass.
fn win_round(
    engine: &mut MatchEngine<MemoryStore>,
    difficulty: Difficulty,
    seed: u64,
    misses: usize,
    secs: u32,
) -> ResolveOutcome {
    engine.start(difficulty, seed).unwrap();
    while engine.tick_preview() != PreviewOutcome::Started {}
    for _ in 0..secs {
        engine.tick_clock();
    }

    let cards = engine.state().cards().to_vec();
    for _ in 0..misses {
        let other = (1..cards.len()).find(|&i| !cards[0].matches(&cards[i])).unwrap();
        engine.flip(0).unwrap();
        engine.flip(other).unwrap();
        assert_eq!(engine.resolve(), ResolveOutcome::Mismatched);
    }

    let mut outcome = ResolveOutcome::NoChange;
    for (i, card) in cards.iter().enumerate() {
        let twin = (i + 1..cards.len()).find(|&j| cards[j].matches(card));
        if let Some(j) = twin {
            engine.flip(i).unwrap();
            engine.flip(j).unwrap();
            outcome = engine.resolve();
        }
    }
    outcome
}

#[test]
fn best_score_survives_new_engine() {
    let mut engine = MatchEngine::with_image_pool(MemoryStore::new(), pool());

    let outcome = win_round(&mut engine, Difficulty::Medium, 1, 2, 30);
    assert_eq!(
        outcome,
        ResolveOutcome::Won {
            moves: 10,
            best_score: 10,
            new_best: true
        }
    );

    let store = engine.scores().store().clone();
    let mut engine = MatchEngine::with_image_pool(store, pool());
    assert_eq!(engine.state().best_score(), 0, "menu starts on easy");

    engine.start(Difficulty::Medium, 2).unwrap();
    assert_eq!(engine.state().best_score(), 10);
}

#[test]
fn tied_score_is_not_a_new_best() {
    let mut engine = MatchEngine::with_image_pool(MemoryStore::new(), pool());

    win_round(&mut engine, Difficulty::Easy, 3, 0, 0);
    let outcome = win_round(&mut engine, Difficulty::Easy, 4, 0, 0);

    assert_eq!(
        outcome,
        ResolveOutcome::Won {
            moves: 6,
            best_score: 6,
            new_best: false
        }
    );
}

#[test]
fn leaderboard_keeps_ten_best_across_rounds() {
    let mut engine = MatchEngine::with_image_pool(MemoryStore::new(), pool());

    for round in 0..11u64 {
        // later rounds miss less, so each one ranks above the previous
        let misses = 11 - round as usize;
        win_round(&mut engine, Difficulty::Easy, round, misses, 20);
        engine
            .save_record(&format!("agent{round}"), stamp(round))
            .unwrap();
    }

    let board = engine.leaderboard();
    assert_eq!(board.len(), 10);
    assert_eq!(board[0].name, "agent10");
    assert_eq!(board[0].moves, 7);
    assert!(board.iter().all(|entry| entry.name != "agent0"));
    assert!(board.windows(2).all(|w| w[0].rank_key() <= w[1].rank_key()));

    let reloaded = ScoreBook::new(engine.scores().store().clone()).leaderboard();
    assert_eq!(reloaded, board);
}

#[test]
fn leaderboard_mixes_difficulties() {
    let mut engine = MatchEngine::with_image_pool(MemoryStore::new(), pool());

    win_round(&mut engine, Difficulty::Medium, 5, 0, 50);
    engine.save_record("Kevin", stamp(1)).unwrap();
    win_round(&mut engine, Difficulty::Easy, 6, 0, 10);
    let board = engine.save_record("Bob", stamp(2)).unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(board[0].name, "Bob");
    assert_eq!(board[0].difficulty, Difficulty::Easy);
    assert_eq!(board[1].name, "Kevin");
    assert_eq!(board[1].difficulty, Difficulty::Medium);
}

#[test]
fn listing_feeds_the_board() {
    let source = ImageSource::default();
    let listing = r#"[
        {"name": "bob.png", "type": "file"},
        {"name": "kevin.png", "type": "file"},
        {"name": "README.md", "type": "file"}
    ]"#;
    let image_pool = source.resolve_pool(Some(listing));
    let engine = MatchEngine::with_image_pool(MemoryStore::new(), image_pool);

    let round = engine.prepare(Difficulty::Easy, 9).unwrap();

    assert_eq!(round.cards().len(), 12);
    let mut images = round.images();
    images.sort();
    assert_eq!(
        images,
        [source.raw_url("bob.png"), source.raw_url("kevin.png")]
    );
}
