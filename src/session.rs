//! Session controller.
//!
//! Owns everything a running game needs: the item pool, the active configuration, the random
//! source, the engine and the revert scheduler. Front ends talk only to a `Session`: they feed it
//! clicks, due revert tickets and configuration changes, and receive engine events through
//! registered listeners.
use crate::config::GameConfig;
use crate::engine::{BoardState, Event, MatchEngine, RevertTicket};
use crate::error::SessionError;
use crate::generator::generate;
use crate::item::Item;
use crate::scheduler::RevertScheduler;
use crate::view::{render, ViewModel};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Receives every event the session's engine emits.
pub trait EventListener {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> EventListener for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

pub struct Session<S: RevertScheduler> {
    config: GameConfig,
    pool: Vec<Item>,
    engine: Option<MatchEngine>,
    scheduler: S,
    rng: SmallRng,
    listeners: Vec<Box<dyn EventListener>>,
}

impl<S: RevertScheduler> Session<S> {
    /// Creates a session with an empty pool. It stays not ready until items are loaded.
    pub fn new(config: GameConfig, scheduler: S) -> Result<Self, SessionError> {
        Self::with_rng(config, scheduler, SmallRng::from_entropy())
    }

    /// Like [`Session::new`] with a fixed seed, for reproducible boards.
    pub fn with_seed(config: GameConfig, scheduler: S, seed: u64) -> Result<Self, SessionError> {
        Self::with_rng(config, scheduler, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, scheduler: S, rng: SmallRng) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Session {
            config,
            pool: Vec::new(),
            engine: None,
            scheduler,
            rng,
            listeners: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, listener: impl EventListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn board(&self) -> Option<&BoardState> {
        self.engine.as_ref().map(MatchEngine::board)
    }

    pub fn view(&self) -> Option<ViewModel> {
        self.board().map(render)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Installs the item pool and starts the first round.
    pub fn load_items(&mut self, items: Vec<Item>) -> Result<Vec<Event>, SessionError> {
        info!("loaded {} items", items.len());
        self.pool = items;
        self.new_game()
    }

    /// Replaces the configuration and starts a new round with it.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<Vec<Event>, SessionError> {
        config.validate()?;
        self.config = config;
        self.new_game()
    }

    /// Generates a fresh board from the pool and resets the round.
    ///
    /// Any scheduled revert from the previous round is cancelled. If the board cannot be
    /// generated the session drops the old round and becomes not ready, so no stale board
    /// stays on screen under a configuration it does not match.
    pub fn new_game(&mut self) -> Result<Vec<Event>, SessionError> {
        self.scheduler.cancel_all();

        if self.pool.is_empty() {
            self.engine = None;
            return Err(SessionError::NotReady);
        }

        let tiles = match generate(
            &self.pool,
            self.config.pair_count(),
            self.config.years.filter(),
            self.config.difficulty,
            &mut self.rng,
        ) {
            Ok(tiles) => tiles,
            Err(err) => {
                warn!("cannot generate board: {}", err);
                self.engine = None;
                return Err(err.into());
            }
        };

        let events = match self.engine.as_mut() {
            Some(engine) => engine.reset(tiles),
            None => {
                let engine = MatchEngine::new(tiles);
                let events = vec![
                    Event::BoardRegenerated {
                        tiles: engine.board().len(),
                    },
                    Event::MoveCountChanged(0),
                ];
                self.engine = Some(engine);
                events
            }
        };

        info!(
            "new {}x{} board ({}, {})",
            self.config.board.rows,
            self.config.board.columns,
            self.config.years,
            self.config.difficulty
        );
        self.emit(&events);
        Ok(events)
    }

    /// Forwards a tile click to the engine.
    ///
    /// Schedules a revert for a new mismatch and cancels the timer of a mismatch the click
    /// superseded.
    pub fn click(&mut self, tile_index: usize) -> Result<Vec<Event>, SessionError> {
        let engine = self.engine.as_mut().ok_or(SessionError::NotReady)?;
        let tiles = engine.board().len();
        if tile_index >= tiles {
            return Err(SessionError::InvalidTile {
                index: tile_index,
                tiles,
            });
        }

        let pending_before = engine.board().pending_mismatch();
        let events = engine.on_tile_click(tile_index);

        for event in &events {
            match event {
                Event::MismatchSuperseded(_) => {
                    if let Some(ticket) = pending_before {
                        self.scheduler.cancel(ticket);
                    }
                }
                Event::MismatchPending(ticket) => {
                    self.scheduler.schedule(*ticket, self.config.mismatch_delay());
                }
                _ => {}
            }
        }

        self.emit(&events);
        Ok(events)
    }

    /// Delivers a due revert ticket. Stale tickets and tickets arriving while not ready are
    /// ignored.
    pub fn on_timeout(&mut self, ticket: RevertTicket) -> Vec<Event> {
        let Some(engine) = self.engine.as_mut() else {
            return Vec::new();
        };
        let events = engine.on_mismatch_timeout(ticket);
        self.emit(&events);
        events
    }

    fn emit(&mut self, events: &[Event]) {
        for event in events {
            for listener in self.listeners.iter_mut() {
                listener.on_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardSize;
    use crate::error::GenerateError;
    use crate::generator::YearRange;
    use crate::item::demo_pool;
    use crate::scheduler::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn small_config() -> GameConfig {
        GameConfig {
            board: BoardSize::new(2, 2),
            ..GameConfig::default()
        }
    }

    fn session() -> Session<ManualScheduler> {
        Session::with_seed(small_config(), ManualScheduler::new(), 42).unwrap()
    }

    /// Returns indexes of two tiles that do not match.
    fn mismatching_pair(board: &BoardState) -> [usize; 2] {
        let first = &board.tiles()[0];
        let other = board
            .tiles()
            .iter()
            .find(|tile| tile.pair_id != first.pair_id)
            .unwrap();
        [0, other.tile_index]
    }

    #[test]
    fn test_not_ready_before_items() {
        let mut session = session();
        assert!(!session.is_ready());
        assert_eq!(session.click(0), Err(SessionError::NotReady));
        assert_eq!(session.new_game(), Err(SessionError::NotReady));
        assert!(session.view().is_none());
    }

    #[test]
    fn test_load_items_starts_game() {
        let mut session = session();
        let events = session.load_items(demo_pool()).unwrap();
        assert_eq!(
            events,
            vec![
                Event::BoardRegenerated { tiles: 4 },
                Event::MoveCountChanged(0)
            ]
        );
        assert!(session.is_ready());
        assert_eq!(session.pool_len(), 32);
    }

    #[test]
    fn test_load_empty_pool_is_not_ready() {
        let mut session = session();
        assert_eq!(session.load_items(Vec::new()), Err(SessionError::NotReady));
        assert!(!session.is_ready());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            board: BoardSize::new(3, 3),
            ..GameConfig::default()
        };
        assert!(matches!(
            Session::new(config, ManualScheduler::new()),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_tile_reported() {
        let mut session = session();
        session.load_items(demo_pool()).unwrap();
        assert_eq!(
            session.click(4),
            Err(SessionError::InvalidTile { index: 4, tiles: 4 })
        );
    }

    #[test]
    fn test_mismatch_reverts_after_delay() {
        let mut session = session();
        session.load_items(demo_pool()).unwrap();
        let [a, b] = mismatching_pair(session.board().unwrap());

        session.click(a).unwrap();
        session.click(b).unwrap();
        assert_eq!(session.scheduler().pending(), 1);

        assert!(session
            .scheduler_mut()
            .advance(Duration::from_millis(1999))
            .is_empty());
        let due = session.scheduler_mut().advance(Duration::from_millis(1));
        assert_eq!(due.len(), 1);
        let events = session.on_timeout(due[0]);
        assert_eq!(events, vec![Event::MismatchResolved([a, b])]);
        assert!(session.board().unwrap().peeked().is_empty());
    }

    #[test]
    fn test_superseding_click_cancels_timer() {
        let mut session = session();
        session.load_items(demo_pool()).unwrap();
        let [a, b] = mismatching_pair(session.board().unwrap());
        let third = (0..4).find(|i| *i != a && *i != b).unwrap();

        session.click(a).unwrap();
        session.click(b).unwrap();
        session.click(third).unwrap();
        assert_eq!(session.scheduler().pending(), 0);
        assert_eq!(session.board().unwrap().peeked(), &[third]);
    }

    #[test]
    fn test_listeners_receive_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = session();
        session.subscribe(move |event: &Event| sink.borrow_mut().push(event.clone()));

        session.load_items(demo_pool()).unwrap();
        session.click(0).unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], Event::MoveCountChanged(1));
    }

    #[test]
    fn test_reconfigure_with_too_narrow_range() {
        let mut session = session();
        session.load_items(demo_pool()).unwrap();
        let config = GameConfig {
            years: YearRange::new(1700, 1710),
            ..small_config()
        };
        assert_eq!(
            session.reconfigure(config),
            Err(SessionError::Generate(GenerateError::InsufficientItems {
                requested: 2,
                available: 1
            }))
        );
        assert!(!session.is_ready());
    }

    #[test]
    fn test_new_game_cancels_pending_timer() {
        let mut session = session();
        session.load_items(demo_pool()).unwrap();
        let [a, b] = mismatching_pair(session.board().unwrap());
        session.click(a).unwrap();
        session.click(b).unwrap();

        session.new_game().unwrap();
        assert_eq!(session.scheduler().pending(), 0);
        let board = session.board().unwrap();
        assert_eq!(board.moves(), 0);
        assert!(board.peeked().is_empty());
        assert!(board.found().is_empty());
    }
}
