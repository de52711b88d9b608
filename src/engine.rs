//! Match engine for the memory game.
//!
//! This module defines the game's fundamental components:
//! - `Tile`: One face-down card on the board, tagged with the `pair_id` it shares with exactly one other tile.
//! - `BoardState`: The board layout plus which tiles are peeked, which are found, the move counter
//!   and the pending mismatch marker.
//! - `MatchEngine`: The state machine processing tile clicks and mismatch timeouts and reporting
//!   each transition as an `Event`.
//!
//! The engine never sleeps or spawns anything. A mismatch produces a `RevertTicket`; whoever owns the
//! engine is expected to hand that ticket back through `MatchEngine::on_mismatch_timeout` once the
//! delay elapses. Tickets that no longer describe the pending mismatch are dropped.
use log::{debug, info};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Represents one card on the game board.
///
/// Tiles are immutable once generated; all per-round state lives in `BoardState`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Identifier shared by exactly two tiles on a board.
    pub pair_id: String,
    /// Position on the board, equal to the tile's index in `BoardState::tiles`.
    pub tile_index: usize,
    /// Opaque image reference shown when the tile is face-up.
    pub image: String,
}

impl Tile {
    pub fn new(pair_id: impl Into<String>, tile_index: usize, image: impl Into<String>) -> Self {
        Tile {
            pair_id: pair_id.into(),
            tile_index,
            image: image.into(),
        }
    }
}

/// Handle for a scheduled mismatch revert.
///
/// `epoch` is unique per scheduled mismatch within an engine, so a ticket from an
/// earlier mismatch or an earlier round never matches the pending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RevertTicket {
    pub epoch: u64,
    pub tiles: [usize; 2],
}

/// State transitions reported by the engine, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new board was installed; carries the number of tiles.
    BoardRegenerated { tiles: usize },
    /// Emitted on every counted click and on reset.
    MoveCountChanged(u32),
    /// Both tiles moved from peeked to found.
    Matched([usize; 2]),
    /// Two differing tiles are face-up; revert them once the ticket comes back.
    MismatchPending(RevertTicket),
    /// The delay elapsed and the two tiles were turned face-down.
    MismatchResolved([usize; 2]),
    /// A click turned a pending mismatch face-down before its delay elapsed.
    MismatchSuperseded([usize; 2]),
    /// Every tile is found. Emitted once per round.
    GameWon { moves: u32, elapsed: Duration },
}

/// Everything that changes during a round.
///
/// Invariants:
/// - `peeked` and `found` are disjoint.
/// - `peeked` holds at most two indexes, and holds two only while `pending` is set.
/// - `moves` only grows until the next reset.
#[derive(Clone, Debug)]
pub struct BoardState {
    tiles: Vec<Tile>,
    found: BTreeSet<usize>,
    // Reveal order is kept so events report tiles in the order they were clicked.
    peeked: Vec<usize>,
    pending: Option<RevertTicket>,
    moves: u32,
    first_click_at: Option<Instant>,
    won_after: Option<Duration>,
}

impl BoardState {
    /// Creates a fresh round over `tiles`.
    ///
    /// # Panics
    /// Panics if `tiles` is empty or a tile's `tile_index` does not match its position.
    pub fn new(tiles: Vec<Tile>) -> Self {
        assert!(!tiles.is_empty(), "a board needs at least one pair of tiles");
        for (position, tile) in tiles.iter().enumerate() {
            assert_eq!(
                tile.tile_index, position,
                "tile index {} stored at position {}",
                tile.tile_index, position
            );
        }
        BoardState {
            tiles,
            found: BTreeSet::new(),
            peeked: Vec::with_capacity(2),
            pending: None,
            moves: 0,
            first_click_at: None,
            won_after: None,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, tile_index: usize) -> &Tile {
        &self.tiles[tile_index]
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the board has no tiles. Never true for a constructed board.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn found(&self) -> &BTreeSet<usize> {
        &self.found
    }

    /// Peeked tiles in the order they were revealed.
    pub fn peeked(&self) -> &[usize] {
        &self.peeked
    }

    pub fn pending_mismatch(&self) -> Option<RevertTicket> {
        self.pending
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_found(&self, tile_index: usize) -> bool {
        self.found.contains(&tile_index)
    }

    pub fn is_peeked(&self, tile_index: usize) -> bool {
        self.peeked.contains(&tile_index)
    }

    pub fn is_mismatched(&self, tile_index: usize) -> bool {
        self.pending
            .map_or(false, |ticket| ticket.tiles.contains(&tile_index))
    }

    /// Whether a click on `tile_index` would be counted.
    pub fn is_selectable(&self, tile_index: usize) -> bool {
        tile_index < self.tiles.len() && !self.is_found(tile_index) && !self.is_peeked(tile_index)
    }

    pub fn is_won(&self) -> bool {
        self.found.len() == self.tiles.len()
    }

    pub fn pairs_total(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn pairs_found(&self) -> usize {
        self.found.len() / 2
    }

    /// Time since the first counted click, frozen once the round is won.
    /// Zero before the first click.
    pub fn elapsed(&self) -> Duration {
        match (self.won_after, self.first_click_at) {
            (Some(total), _) => total,
            (None, Some(start)) => start.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }
}

impl fmt::Display for BoardState {
    /// Compact one-line summary, mostly for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} pairs, {} moves, peeked {:?}",
            self.pairs_found(),
            self.pairs_total(),
            self.moves,
            self.peeked
        )
    }
}

/// The match-state machine.
///
/// # Examples
///
/// ```
/// use memory_match::engine::{Event, MatchEngine};
/// use memory_match::utils::board_from_str_array;
///
/// let tiles = board_from_str_array(&["AB", "BA"]).unwrap();
/// let mut engine = MatchEngine::new(tiles);
///
/// engine.on_tile_click(0);
/// let events = engine.on_tile_click(3);
/// assert!(events.contains(&Event::Matched([0, 3])));
///
/// engine.on_tile_click(1);
/// let events = engine.on_tile_click(2);
/// assert!(matches!(events.last(), Some(Event::GameWon { moves: 4, .. })));
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine {
    board: BoardState,
    epoch: u64,
}

impl MatchEngine {
    /// Creates an engine for a freshly generated board.
    ///
    /// # Panics
    /// Panics if `tiles` is empty (see `BoardState::new`).
    pub fn new(tiles: Vec<Tile>) -> Self {
        MatchEngine {
            board: BoardState::new(tiles),
            epoch: 0,
        }
    }

    /// Returns an immutable reference to the current round.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Processes a click on `tile_index`.
    ///
    /// Clicks on found or peeked tiles are ignored and return no events. Every other click:
    /// 1. Increments the move counter and emits `MoveCountChanged`.
    /// 2. Turns a still-showing mismatch face-down (`MismatchSuperseded`); its ticket goes stale.
    /// 3. Peeks the tile.
    /// 4. With two tiles peeked, either moves both to found (`Matched`, possibly followed by
    ///    `GameWon`) or marks them as a pending mismatch (`MismatchPending`).
    ///
    /// # Panics
    /// Panics if `tile_index` is not on the board. Callers validate user input first.
    pub fn on_tile_click(&mut self, tile_index: usize) -> Vec<Event> {
        assert!(
            tile_index < self.board.tiles.len(),
            "tile index {} out of range for a board of {} tiles",
            tile_index,
            self.board.tiles.len()
        );

        if !self.board.is_selectable(tile_index) {
            debug!("ignoring click on tile {}: already face-up", tile_index);
            return Vec::new();
        }

        let mut events = Vec::with_capacity(3);
        let board = &mut self.board;

        board.moves += 1;
        if board.first_click_at.is_none() {
            board.first_click_at = Some(Instant::now());
        }
        events.push(Event::MoveCountChanged(board.moves));

        if let Some(ticket) = board.pending.take() {
            board.peeked.retain(|index| !ticket.tiles.contains(index));
            debug!("click on tile {} superseded mismatch {:?}", tile_index, ticket);
            events.push(Event::MismatchSuperseded(ticket.tiles));
        }
        debug_assert!(board.peeked.len() < 2);

        board.peeked.push(tile_index);

        if board.peeked.len() == 2 {
            let pair = [board.peeked[0], board.peeked[1]];
            let (first, second) = (pair[0], pair[1]);
            if board.tiles[first].pair_id == board.tiles[second].pair_id {
                board.peeked.clear();
                board.found.extend(pair);
                debug!("matched tiles {:?} ({})", pair, board.tiles[first].pair_id);
                events.push(Event::Matched(pair));

                if board.is_won() {
                    let elapsed = board.elapsed();
                    board.won_after = Some(elapsed);
                    info!(
                        "board won after {} moves in {}s",
                        board.moves,
                        elapsed.as_secs()
                    );
                    events.push(Event::GameWon {
                        moves: board.moves,
                        elapsed,
                    });
                }
            } else {
                self.epoch += 1;
                let ticket = RevertTicket {
                    epoch: self.epoch,
                    tiles: pair,
                };
                board.pending = Some(ticket);
                debug!("mismatch on tiles {:?}, revert pending", pair);
                events.push(Event::MismatchPending(ticket));
            }
        }

        events
    }

    /// Turns a pending mismatch face-down once its delay elapsed.
    ///
    /// Only acts if `ticket` still describes the pending mismatch. A ticket that was superseded
    /// by a later click, or that belongs to a previous round, is dropped without effect.
    pub fn on_mismatch_timeout(&mut self, ticket: RevertTicket) -> Vec<Event> {
        if self.board.pending != Some(ticket) {
            debug!("dropping stale mismatch timeout {:?}", ticket);
            return Vec::new();
        }

        self.board.pending = None;
        self.board.peeked.retain(|index| !ticket.tiles.contains(index));
        vec![Event::MismatchResolved(ticket.tiles)]
    }

    /// Replaces the round with a fresh board.
    ///
    /// Found and peeked sets are cleared, the move counter returns to zero and any pending
    /// mismatch ticket becomes stale.
    ///
    /// # Panics
    /// Panics if `tiles` is empty.
    pub fn reset(&mut self, tiles: Vec<Tile>) -> Vec<Event> {
        self.board = BoardState::new(tiles);
        self.epoch += 1;
        vec![
            Event::BoardRegenerated {
                tiles: self.board.len(),
            },
            Event::MoveCountChanged(0),
        ]
    }
}
