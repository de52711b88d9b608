/**
 * Property tests for board generation and the match engine.
 *
 * Invariants covered:
 * - Generated boards hold exactly `pair_count` pair ids, each on exactly two tiles,
 *   and fail with `InsufficientItems` when the filtered pool is too small.
 * - `peeked` and `found` stay disjoint, `peeked` never exceeds two tiles, and two
 *   tiles are peeked only while a mismatch is pending.
 * - Clicks on found or peeked tiles change nothing.
 * - The move counter equals the number of counted clicks.
 * - `GameWon` fires at most once, exactly when every tile is found.
 * - Stale revert tickets never change the board.
 */
use memory_match::engine::{Event, MatchEngine, RevertTicket};
use memory_match::error::GenerateError;
use memory_match::generator::{generate, Difficulty, YearRange};
use memory_match::item::Item;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn pool(size: usize) -> Vec<Item> {
    (0..size)
        .map(|i| {
            Item::new(format!("item-{}", i), 1500 + i as i32, format!("front-{}", i))
                .with_back(format!("back-{}", i))
        })
        .collect()
}

fn board(pairs: usize, seed: u64) -> MatchEngine {
    let mut rng = SmallRng::seed_from_u64(seed);
    let tiles = generate(&pool(pairs), pairs, |_: &Item| true, Difficulty::Easy, &mut rng)
        .expect("pool is large enough");
    MatchEngine::new(tiles)
}

proptest! {
    #[test]
    fn generated_boards_pair_every_id_twice(
        pool_size in 0usize..40,
        pair_count in 1usize..20,
        seed in any::<u64>(),
        hard in any::<bool>(),
    ) {
        let difficulty = if hard { Difficulty::Hard } else { Difficulty::Easy };
        let mut rng = SmallRng::seed_from_u64(seed);
        let result = generate(
            &pool(pool_size),
            pair_count,
            YearRange::ALL.filter(),
            difficulty,
            &mut rng,
        );

        if pool_size < pair_count {
            prop_assert_eq!(
                result,
                Err(GenerateError::InsufficientItems {
                    requested: pair_count,
                    available: pool_size
                })
            );
        } else {
            let tiles = result.unwrap();
            prop_assert_eq!(tiles.len(), 2 * pair_count);
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for (position, tile) in tiles.iter().enumerate() {
                prop_assert_eq!(tile.tile_index, position);
                *counts.entry(tile.pair_id.as_str()).or_insert(0) += 1;
            }
            prop_assert_eq!(counts.len(), pair_count);
            prop_assert!(counts.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn year_filter_is_half_open(start in 1500i32..1540, width in 0i32..20, seed in any::<u64>()) {
        let range = YearRange::new(start, start + width);
        let items = pool(40);
        let eligible = items.iter().filter(|item| range.contains(item.year)).count();
        let mut rng = SmallRng::seed_from_u64(seed);
        match generate(&items, 1, range.filter(), Difficulty::Easy, &mut rng) {
            Ok(tiles) => {
                prop_assert!(eligible >= 1);
                let year = items.iter().find(|item| item.id == tiles[0].pair_id).unwrap().year;
                prop_assert!(start <= year && year < start + width);
            }
            Err(err) => {
                prop_assert_eq!(eligible, 0);
                prop_assert_eq!(
                    err,
                    GenerateError::InsufficientItems { requested: 1, available: 0 }
                );
            }
        }
    }

    #[test]
    fn click_sequences_keep_engine_invariants(
        pairs in 1usize..8,
        seed in any::<u64>(),
        ops in prop::collection::vec((0usize..16, any::<bool>()), 0..200),
    ) {
        let mut engine = board(pairs, seed);
        let tiles = engine.board().len();
        let mut counted = 0u32;
        let mut wins = 0;
        let mut stale: Vec<RevertTicket> = Vec::new();

        for (raw_index, deliver_timeout) in ops {
            if deliver_timeout {
                if let Some(ticket) = engine.board().pending_mismatch() {
                    let events = engine.on_mismatch_timeout(ticket);
                    prop_assert_eq!(events, vec![Event::MismatchResolved(ticket.tiles)]);
                    stale.push(ticket);
                }
            }

            // stale tickets never act
            for ticket in &stale {
                prop_assert!(engine.on_mismatch_timeout(*ticket).is_empty());
            }

            let index = raw_index % tiles;
            let before = engine.board().clone();
            let ignored = before.is_found(index) || before.is_peeked(index);
            let events = engine.on_tile_click(index);
            let after = engine.board();

            if ignored {
                prop_assert!(events.is_empty());
                prop_assert_eq!(after.moves(), before.moves());
                prop_assert_eq!(after.peeked(), before.peeked());
                prop_assert_eq!(after.found(), before.found());
                continue;
            }

            counted += 1;
            prop_assert_eq!(&events[0], &Event::MoveCountChanged(counted));
            prop_assert_eq!(after.moves(), counted);

            if let Some(ticket) = before.pending_mismatch() {
                prop_assert!(events.contains(&Event::MismatchSuperseded(ticket.tiles)));
                stale.push(ticket);
            }

            for event in &events {
                match event {
                    Event::Matched(pair) => {
                        prop_assert!(after.is_found(pair[0]) && after.is_found(pair[1]));
                        prop_assert_eq!(after.found().len(), before.found().len() + 2);
                    }
                    Event::GameWon { moves, .. } => {
                        wins += 1;
                        prop_assert_eq!(*moves, counted);
                        prop_assert!(after.is_won());
                    }
                    _ => {}
                }
            }

            prop_assert!(after.peeked().len() <= 2);
            prop_assert_eq!(after.peeked().len() == 2, after.pending_mismatch().is_some());
            prop_assert!(after.peeked().iter().all(|index| !after.is_found(*index)));
            prop_assert_eq!(after.is_won(), after.found().len() == tiles);
        }

        prop_assert!(wins <= 1);
        prop_assert_eq!(wins == 1, engine.board().is_won());
    }
}
