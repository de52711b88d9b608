//! Automated players.
//!
//! A `Strategy` picks the next tile to click from what is visible on the board. `play_to_completion`
//! drives a `MatchEngine` with a strategy, answering every mismatch with its revert right away as if
//! the delay had elapsed. Used by `autoplay_evaluator` and by tests that need finished games.
use crate::engine::{BoardState, Event, MatchEngine};
use rand::seq::IteratorRandom;
use rand::RngCore;
use std::collections::HashMap;

pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Chooses a selectable tile, or `None` if nothing can be clicked.
    fn choose(&mut self, board: &BoardState, rng: &mut dyn RngCore) -> Option<usize>;

    /// Called after every counted click with the board as it looks right after the click.
    fn observe(&mut self, _board: &BoardState) {}

    /// Forgets everything about the previous board.
    fn reset(&mut self) {}
}

fn random_selectable(board: &BoardState, rng: &mut dyn RngCore) -> Option<usize> {
    (0..board.len())
        .filter(|&index| board.is_selectable(index))
        .choose(rng)
}

/// Clicks uniformly random face-down tiles and remembers nothing.
#[derive(Clone, Debug, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, board: &BoardState, rng: &mut dyn RngCore) -> Option<usize> {
        random_selectable(board, rng)
    }
}

/// Remembers every face it has seen and completes a pair as soon as both halves are known.
///
/// Pairs are recognised by `pair_id`, i.e. the player knows which faces belong together even in
/// hard mode.
#[derive(Clone, Debug, Default)]
pub struct PerfectMemory {
    seen: HashMap<usize, String>,
}

impl PerfectMemory {
    fn known_partner(&self, board: &BoardState, index: usize) -> Option<usize> {
        let pair_id = &board.tile(index).pair_id;
        self.seen
            .iter()
            .filter(|&(&other, id)| other != index && id == pair_id && board.is_selectable(other))
            .map(|(&other, _)| other)
            .min()
    }

    fn known_pair(&self, board: &BoardState) -> Option<usize> {
        let mut candidates: Vec<usize> = self
            .seen
            .keys()
            .copied()
            .filter(|&index| board.is_selectable(index))
            .collect();
        candidates.sort_unstable();
        candidates
            .into_iter()
            .find(|&index| self.known_partner(board, index).is_some())
    }

    fn random_unseen(&self, board: &BoardState, rng: &mut dyn RngCore) -> Option<usize> {
        (0..board.len())
            .filter(|&index| board.is_selectable(index) && !self.seen.contains_key(&index))
            .choose(rng)
    }
}

impl Strategy for PerfectMemory {
    fn name(&self) -> &'static str {
        "perfect-memory"
    }

    fn choose(&mut self, board: &BoardState, rng: &mut dyn RngCore) -> Option<usize> {
        // one tile face-up: finish its pair if we know where the partner is
        if let [open] = board.peeked() {
            if let Some(partner) = self.known_partner(board, *open) {
                return Some(partner);
            }
        } else if let Some(index) = self.known_pair(board) {
            return Some(index);
        }

        self.random_unseen(board, rng).or_else(|| random_selectable(board, rng))
    }

    fn observe(&mut self, board: &BoardState) {
        for &index in board.peeked() {
            self.seen.insert(index, board.tile(index).pair_id.clone());
        }
        self.seen.retain(|index, _| !board.is_found(*index));
    }

    fn reset(&mut self) {
        self.seen.clear();
    }
}

/// Result of an automated game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Sequence of clicked tile indexes, in order.
    pub clicks: Vec<usize>,
    /// Moves counted by the engine.
    pub moves: u32,
    pub won: bool,
}

/// Plays until the board is won, the strategy gives up or `max_clicks` is reached.
pub fn play_to_completion(
    engine: &mut MatchEngine,
    strategy: &mut dyn Strategy,
    rng: &mut dyn RngCore,
    max_clicks: usize,
) -> PlayOutcome {
    let mut clicks = Vec::new();

    while !engine.board().is_won() && clicks.len() < max_clicks {
        let Some(index) = strategy.choose(engine.board(), rng) else {
            break;
        };
        let events = engine.on_tile_click(index);
        clicks.push(index);
        strategy.observe(engine.board());

        for event in events {
            if let Event::MismatchPending(ticket) = event {
                engine.on_mismatch_timeout(ticket);
            }
        }
    }

    PlayOutcome {
        clicks,
        moves: engine.board().moves(),
        won: engine.board().is_won(),
    }
}
