//! Delayed delivery of mismatch revert tickets.
//!
//! The engine hands out a `RevertTicket` for every mismatch and expects it back after the
//! mismatch delay. A `RevertScheduler` is whatever does the waiting. Cancelling is best effort:
//! a ticket that slips through after being cancelled is still rejected by the engine.
use crate::engine::RevertTicket;
use log::debug;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub trait RevertScheduler {
    /// Arranges for `ticket` to be delivered after `delay`.
    fn schedule(&mut self, ticket: RevertTicket, delay: Duration);
    /// Drops a scheduled ticket if it has not been delivered yet.
    fn cancel(&mut self, ticket: RevertTicket);
    /// Drops every scheduled ticket.
    fn cancel_all(&mut self);
}

/// Scheduler driven by a virtual clock, for tests and simulations.
///
/// ```
/// use memory_match::engine::RevertTicket;
/// use memory_match::scheduler::{ManualScheduler, RevertScheduler};
/// use std::time::Duration;
///
/// let mut scheduler = ManualScheduler::new();
/// let ticket = RevertTicket { epoch: 1, tiles: [0, 1] };
/// scheduler.schedule(ticket, Duration::from_secs(2));
/// assert!(scheduler.advance(Duration::from_millis(1999)).is_empty());
/// assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![ticket]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: Vec<(Duration, RevertTicket)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward and returns the tickets that fell due, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<RevertTicket> {
        self.now += by;
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|(at, _)| *at <= now);
        self.queue = waiting;
        due.sort_by_key(|(at, ticket)| (*at, ticket.epoch));
        due.into_iter().map(|(_, ticket)| ticket).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

impl RevertScheduler for ManualScheduler {
    fn schedule(&mut self, ticket: RevertTicket, delay: Duration) {
        self.queue.push((self.now + delay, ticket));
    }

    fn cancel(&mut self, ticket: RevertTicket) {
        self.queue.retain(|(_, queued)| *queued != ticket);
    }

    fn cancel_all(&mut self) {
        self.queue.clear();
    }
}

/// Scheduler backed by tokio timers.
///
/// Each scheduled ticket is a spawned task that sleeps and then sends the ticket over the
/// channel returned by [`TokioScheduler::new`]. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<RevertTicket>,
    tasks: HashMap<RevertTicket, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RevertTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            TokioScheduler {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }
}

impl RevertScheduler for TokioScheduler {
    fn schedule(&mut self, ticket: RevertTicket, delay: Duration) {
        self.tasks.retain(|_, handle| !handle.is_finished());
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver gone means the session shut down
            let _ = tx.send(ticket);
        });
        if let Some(previous) = self.tasks.insert(ticket, handle) {
            previous.abort();
        }
    }

    fn cancel(&mut self, ticket: RevertTicket) {
        if let Some(handle) = self.tasks.remove(&ticket) {
            debug!("cancelling revert timer for {:?}", ticket);
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
