//! Background access counting.
//!
//! Redirects hand an [`AccessEvent`] to an [`AccessRecorder`], which queues it
//! on a bounded channel. [`run_access_worker`] drains the channel with a fixed
//! number of concurrent increments. When the queue is full or the worker is
//! gone, the recorder falls back to a detached task so the increment is still
//! attempted. Detached tasks are tracked and awaited by [`AccessWorker::drain`].
//!
//! An increment is retried with jittered exponential backoff only when the
//! store reports that the statement was never sent. Timeouts and I/O errors are
//! not retried: the statement may already have committed, and a lost increment
//! is preferable to a double one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc, mpsc::error::TrySendError};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::task::TaskTracker;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const RETRY_BASE_MILLIS: u64 = 10;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRIES: usize = 3;

/// How an access event was handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Queued for the worker pool.
    Queued,
    /// Queue unavailable; running as a detached task.
    Detached,
}

/// Non-blocking entry point used by the redirect handler.
#[derive(Clone)]
pub struct AccessRecorder {
    sender: mpsc::Sender<AccessEvent>,
    repository: Arc<dyn UrlRepository>,
    detached: TaskTracker,
}

impl AccessRecorder {
    pub fn new(sender: mpsc::Sender<AccessEvent>, repository: Arc<dyn UrlRepository>) -> Self {
        Self {
            sender,
            repository,
            detached: TaskTracker::new(),
        }
    }

    /// Schedules one access-count increment for `short_code`.
    ///
    /// Never waits on the store. Must be called from within a tokio runtime.
    pub fn record(&self, short_code: &str) -> Dispatch {
        let event = AccessEvent::new(short_code);

        let event = match self.sender.try_send(event) {
            Ok(()) => return Dispatch::Queued,
            Err(TrySendError::Full(event)) => {
                warn!(short_code, "Access queue full, incrementing in a detached task");
                event
            }
            Err(TrySendError::Closed(event)) => {
                warn!(short_code, "Access queue closed, incrementing in a detached task");
                event
            }
        };

        let repository = self.repository.clone();
        self.detached.spawn(async move {
            let _ = apply_increment(repository.as_ref(), &event).await;
        });

        Dispatch::Detached
    }

    /// Returns true once the worker has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining queue capacity.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

/// Handle on the running access worker and the recorder's detached tasks.
pub struct AccessWorker {
    handle: JoinHandle<()>,
    detached: TaskTracker,
}

impl AccessWorker {
    /// Waits for queued and detached increments to finish.
    ///
    /// Only completes once every [`AccessRecorder`] clone has been dropped.
    ///
    /// # Errors
    ///
    /// Returns the join error if the worker task panicked.
    pub async fn drain(self) -> Result<(), JoinError> {
        let worker = self.handle.await;

        self.detached.close();
        self.detached.wait().await;

        worker
    }
}

/// Creates the access queue and starts [`run_access_worker`] on it.
///
/// The worker stops once every clone of the returned recorder is dropped;
/// call [`AccessWorker::drain`] to let in-flight increments finish.
pub fn spawn_access_worker(
    repository: Arc<dyn UrlRepository>,
    capacity: usize,
    concurrency: usize,
) -> (AccessRecorder, AccessWorker) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(run_access_worker(rx, repository.clone(), concurrency));

    let recorder = AccessRecorder::new(tx, repository);
    let worker = AccessWorker {
        handle,
        detached: recorder.detached.clone(),
    };

    (recorder, worker)
}

/// Consumes access events until every sender is dropped.
///
/// At most `concurrency` increments run at once. Returns after the channel
/// closes and all in-flight increments have finished.
pub async fn run_access_worker(
    mut rx: mpsc::Receiver<AccessEvent>,
    repository: Arc<dyn UrlRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tokio::spawn(async move {
            let _ = apply_increment(repository.as_ref(), &event).await;
            drop(permit);
        });
    }

    let in_flight = u32::try_from(concurrency).unwrap_or(u32::MAX);
    let _ = permits.acquire_many(in_flight).await;
    info!("Access worker stopped");
}

/// Increments the access count for one event, retrying store errors that
/// happened before the statement was sent.
///
/// Failures are logged here and returned for callers that want them; the
/// redirect path ignores them.
pub async fn apply_increment(
    repository: &dyn UrlRepository,
    event: &AccessEvent,
) -> Result<u64, AppError> {
    let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MILLIS)
        .max_delay(RETRY_MAX_DELAY)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        || repository.increment_access_count(&event.short_code),
        |e: &AppError| e.is_retryable(),
    )
    .await;

    match &result {
        Ok(0) => debug!(
            short_code = %event.short_code,
            "Short code removed before its access was counted"
        ),
        Ok(_) => debug!(short_code = %event.short_code, "Access counted"),
        Err(e) => error!(
            short_code = %event.short_code,
            requested_at = %event.requested_at,
            error = %e,
            "Failed to update access count"
        ),
    }

    result
}
