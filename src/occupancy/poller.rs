use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Local};
use tokio::{
    sync::{mpsc, watch, Notify},
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{
    api::{ParkingSpotSummary, SummarySource},
    error::FETCH_FAILED_MESSAGE,
};

/// What the occupancy screen should show
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Success {
        summary: ParkingSpotSummary,
        fetched_at: DateTime<Local>,
    },
    Error(String),
}

impl LoadState {
    pub fn summary(&self) -> Option<&ParkingSpotSummary> {
        match self {
            LoadState::Success { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Tick,
    Retry,
}

/// Shared between the handle and the poll task
struct Shared {
    state_tx: watch::Sender<LoadState>,
    disposed: AtomicBool,
    shutdown: Notify,
}

impl Shared {
    /// Apply a new state unless the screen is already gone.
    /// The flag is read under the watch lock, so it cannot race `close`.
    fn publish(&self, state: LoadState) -> bool {
        let mut applied = false;
        self.state_tx.send_if_modified(|current| {
            if self.disposed.load(Ordering::Acquire) {
                return false;
            }
            *current = state;
            applied = true;
            true
        });
        applied
    }

    /// Mark disposed; once this returns no later `publish` gets through
    fn close(&self) -> bool {
        let first = !self.disposed.swap(true, Ordering::AcqRel);
        // Wait out any publish currently holding the lock
        self.state_tx.send_if_modified(|_| false);
        first
    }
}

/// A running occupancy poll. Dropping it stops the poll.
pub struct PollHandle {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<LoadState>,
    retry_tx: mpsc::UnboundedSender<()>,
    task: Option<JoinHandle<()>>,
}

/// Shortest accepted refresh period
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Start polling `endpoint`: one fetch right away, then one every `interval`.
/// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
pub fn start(source: Arc<dyn SummarySource>, endpoint: &str, interval: Duration) -> PollHandle {
    let interval = if interval < MIN_POLL_INTERVAL {
        tracing::warn!(
            "poll interval {:?} too short, using {:?}",
            interval,
            MIN_POLL_INTERVAL
        );
        MIN_POLL_INTERVAL
    } else {
        interval
    };
    let (state_tx, state_rx) = watch::channel(LoadState::Loading);
    let (retry_tx, retry_rx) = mpsc::unbounded_channel();
    let shared = Arc::new(Shared {
        state_tx,
        disposed: AtomicBool::new(false),
        shutdown: Notify::new(),
    });

    tracing::info!("starting occupancy poll for {} every {:?}", endpoint, interval);
    let task = tokio::spawn(run(
        source,
        endpoint.to_string(),
        interval,
        shared.clone(),
        retry_rx,
    ));

    PollHandle {
        shared,
        state_rx,
        retry_tx,
        task: Some(task),
    }
}

async fn run(
    source: Arc<dyn SummarySource>,
    endpoint: String,
    interval: Duration,
    shared: Arc<Shared>,
    mut retry_rx: mpsc::UnboundedReceiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let trigger = tokio::select! {
            biased;
            _ = shared.shutdown.notified() => break,
            Some(()) = retry_rx.recv() => Trigger::Retry,
            _ = ticker.tick() => Trigger::Tick,
        };
        tracing::debug!("occupancy fetch for {} ({:?})", endpoint, trigger);

        let next = match source.fetch_data(&endpoint).await {
            Some(response) => LoadState::Success {
                summary: response.result,
                fetched_at: Local::now(),
            },
            None => LoadState::Error(FETCH_FAILED_MESSAGE.to_string()),
        };

        if !shared.publish(next) {
            tracing::debug!("discarding response for {} after dispose", endpoint);
            break;
        }
    }
    tracing::debug!("occupancy poll for {} stopped", endpoint);
}

impl PollHandle {
    /// Current state snapshot
    pub fn current(&self) -> LoadState {
        self.state_rx.borrow().clone()
    }

    /// Another receiver over the same state, e.g. for a render loop
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_rx.clone()
    }

    /// Wait for the next state change; `None` once the poll task is gone
    pub async fn changed(&mut self) -> Option<LoadState> {
        self.state_rx.changed().await.ok()?;
        Some(self.state_rx.borrow_and_update().clone())
    }

    /// Reset to `Loading` and fetch once more, outside the regular interval
    pub fn retry(&mut self) {
        if !self.shared.publish(LoadState::Loading) {
            return;
        }
        // The caller already knows about the reset
        let _ = self.state_rx.borrow_and_update();
        if self.retry_tx.send(()).is_err() {
            tracing::warn!("retry requested but the poll task has stopped");
        }
    }

    /// Stop polling. A fetch already in flight finishes but is not applied.
    pub fn dispose(mut self) -> Option<JoinHandle<()>> {
        self.cancel();
        self.task.take()
    }

    fn cancel(&self) {
        if self.shared.close() {
            self.shared.shutdown.notify_one();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
