//! Computer-turn search off the interactive context.
//!
//! A search runs on the blocking pool while a ticker task reports progress.
//! Neither touches table state: both post [`Dispatch`] messages onto one
//! queue, and the table drains that queue on its own context. The queue is
//! the only handoff between the search and the table.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use derive_more::Display;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::engine::GameSnapshot;
use crate::settings::ThinkBudget;

/// Identifies one activation of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("search#{_0}")]
pub struct SearchId(u64);

/// Message posted from a background search to the table.
pub(crate) enum Dispatch<S> {
    /// One progress interval elapsed.
    Tick(SearchId),
    /// The search returned the position after its chosen turn.
    Completed {
        search: SearchId,
        snapshot: S,
    },
    /// The search panicked; the payload is re-raised on the table's context.
    Panicked(Box<dyn Any + Send + 'static>),
}

impl<S> std::fmt::Debug for Dispatch<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Tick(id) => f.debug_tuple("Tick").field(id).finish(),
            Dispatch::Completed { search, .. } => {
                f.debug_struct("Completed").field("search", search).finish_non_exhaustive()
            }
            Dispatch::Panicked(_) => f.write_str("Panicked"),
        }
    }
}

/// The running search and the position it was started from.
struct InFlight<S> {
    id: SearchId,
    origin: Arc<S>,
}

/// Runs at most one best-turn search at a time.
pub(crate) struct TurnScheduler<S> {
    runtime: Handle,
    tx: mpsc::UnboundedSender<Dispatch<S>>,
    rx: mpsc::UnboundedReceiver<Dispatch<S>>,
    in_flight: Option<InFlight<S>>,
    next_id: u64,
}

impl<S: GameSnapshot> TurnScheduler<S> {
    pub(crate) fn new(runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            tx,
            rx,
            in_flight: None,
            next_id: 1,
        }
    }

    /// Search whose completion has not been committed yet.
    pub(crate) fn in_flight(&self) -> Option<SearchId> {
        self.in_flight.as_ref().map(|search| search.id)
    }

    /// Starts searching `snapshot` unless a search is already running.
    #[instrument(skip(self, snapshot))]
    pub(crate) fn activate(&mut self, snapshot: Arc<S>, budget: ThinkBudget) -> Option<SearchId> {
        if let Some(running) = self.in_flight() {
            warn!(%running, "Search already in flight, not starting another");
            return None;
        }

        let id = SearchId(self.next_id);
        self.next_id += 1;
        self.in_flight = Some(InFlight {
            id,
            origin: Arc::clone(&snapshot),
        });

        info!(
            search = %id,
            max_depth = budget.max_depth,
            max_time = ?budget.max_time,
            "Spawning best-turn search"
        );
        self.runtime
            .spawn(run_search(id, snapshot, budget, self.tx.clone()));
        Some(id)
    }

    /// Takes the next queued message without waiting.
    pub(crate) fn try_next(&mut self) -> Option<Dispatch<S>> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next queued message.
    pub(crate) async fn next(&mut self) -> Option<Dispatch<S>> {
        self.rx.recv().await
    }

    /// Whether `id` is in flight and was started from `position`.
    pub(crate) fn is_searching(&self, id: SearchId, position: &Arc<S>) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|search| search.id == id && Arc::ptr_eq(&search.origin, position))
    }

    /// Clears `id` from flight and returns the position it searched.
    ///
    /// Returns `None` for an unknown search.
    pub(crate) fn finish(&mut self, id: SearchId) -> Option<Arc<S>> {
        match self.in_flight.take() {
            Some(search) if search.id == id => Some(search.origin),
            other => {
                self.in_flight = other;
                None
            }
        }
    }
}

#[instrument(skip(snapshot, tx))]
async fn run_search<S: GameSnapshot>(
    id: SearchId,
    snapshot: Arc<S>,
    budget: ThinkBudget,
    tx: mpsc::UnboundedSender<Dispatch<S>>,
) {
    let (stop_tx, stop_rx) = oneshot::channel();
    let ticker = tokio::spawn(tick(id, budget.tick_period(), tx.clone(), stop_rx));

    let outcome = tokio::task::spawn_blocking(move || {
        snapshot.best_turn(budget.max_depth, budget.max_time)
    })
    .await;

    // Ticks must not trail the completion on the queue.
    let _ = stop_tx.send(());
    if let Err(e) = ticker.await {
        warn!(error = %e, "Progress ticker ended abnormally");
    }

    let dispatch = match outcome {
        Ok(next) => {
            debug!("Search returned");
            Dispatch::Completed {
                search: id,
                snapshot: next,
            }
        }
        Err(e) if e.is_panic() => Dispatch::Panicked(e.into_panic()),
        Err(e) => {
            warn!(error = %e, "Search task was cancelled");
            return;
        }
    };

    if tx.send(dispatch).is_err() {
        debug!("Table dropped before the search finished");
    }
}

async fn tick<S>(
    id: SearchId,
    period: Duration,
    tx: mpsc::UnboundedSender<Dispatch<S>>,
    mut stop: oneshot::Receiver<()>,
) {
    let Some(start) = Instant::now().checked_add(period) else {
        warn!(?period, "Tick period out of range, not reporting progress");
        return;
    };
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            _ = interval.tick() => {
                if tx.send(Dispatch::Tick(id)).is_err() {
                    break;
                }
            }
        }
    }
}
