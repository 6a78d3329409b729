use futures::future::{join_all, BoxFuture};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration};
use tracing::{debug, trace, warn};

use crate::models::error::FetchError;

/// A pending unit of work. Holds the request and the channel its result is
/// delivered on; consumed exactly once by the drain loop.
struct QueuedRequest {
    execute: Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>,
    is_abandoned: Box<dyn Fn() -> bool + Send>,
}

struct QueueState {
    pending: VecDeque<QueuedRequest>,
    draining: bool,
}

/// FIFO request queue drained by a single worker in bounded batches.
#[derive(Clone)]
pub struct RequestQueue {
    state: Arc<Mutex<QueueState>>,
    batch_size: usize,
    batch_delay: Duration,
}

impl RequestQueue {
    pub fn new(batch_size: usize, batch_delay_ms: u64) -> Self {
        RequestQueue {
            state: Arc::new(Mutex::new(QueueState {
                pending: VecDeque::new(),
                draining: false,
            })),
            batch_size: batch_size.max(1),
            batch_delay: Duration::from_millis(batch_delay_ms),
        }
    }

    /// Queue `request` and wait for its result.
    ///
    /// Dropping the returned future abandons the request: if it has not been
    /// dispatched yet it is skipped, otherwise its result is discarded.
    pub async fn enqueue<F, Fut, T>(&self, request: F) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<Result<T, FetchError>>();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let watch_tx = tx.clone();

        let item = QueuedRequest {
            execute: Box::new(move || {
                Box::pin(async move {
                    let result = request().await;
                    let sender = tx.lock().ok().and_then(|mut guard| guard.take());
                    if let Some(sender) = sender {
                        if sender.send(result).is_err() {
                            trace!("Discarding result of abandoned request");
                        }
                    }
                })
            }),
            is_abandoned: Box::new(move || {
                watch_tx
                    .lock()
                    .map(|guard| guard.as_ref().map_or(true, |s| s.is_closed()))
                    .unwrap_or(true)
            }),
        };

        let start_worker = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| FetchError::Network("request queue poisoned".to_string()))?;
            state.pending.push_back(item);
            if state.draining {
                false
            } else {
                state.draining = true;
                true
            }
        };

        if start_worker {
            tokio::spawn(self.clone().drain());
        }

        rx.await.map_err(|_| FetchError::Cancelled)?
    }

    /// Queued requests whose callers are still waiting.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .map(|s| s.pending.iter().filter(|item| !(item.is_abandoned)()).count())
            .unwrap_or(0)
    }

    async fn drain(self) {
        let mut guard = DrainGuard {
            queue: self.clone(),
            finished: false,
        };
        loop {
            let batch = self.next_batch();
            if batch.is_empty() {
                guard.finished = true;
                return;
            }

            debug!("Dispatching batch of {} requests", batch.len());
            join_all(batch.into_iter().map(|item| (item.execute)())).await;

            if self.pending() > 0 {
                sleep(self.batch_delay).await;
            }
        }
    }

    /// Takes up to `batch_size` live items. Clears the draining flag under
    /// the same lock when nothing is left so a concurrent enqueue restarts
    /// the worker.
    fn next_batch(&self) -> Vec<QueuedRequest> {
        let Ok(mut state) = self.state.lock() else {
            return Vec::new();
        };
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match state.pending.pop_front() {
                Some(item) if (item.is_abandoned)() => {
                    trace!("Skipping abandoned request");
                }
                Some(item) => batch.push(item),
                None => break,
            }
        }
        if batch.is_empty() {
            state.draining = false;
        }
        batch
    }
}

/// Runs when a worker is torn down before reaching an empty queue, which
/// only happens if a request panicked. Hands the remaining items to a new
/// worker, or clears the draining flag so the next enqueue starts one.
struct DrainGuard {
    queue: RequestQueue,
    finished: bool,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let handle = Handle::try_current().ok();
        let restart = {
            let mut state = self.queue.state.lock().unwrap_or_else(PoisonError::into_inner);
            let restart = handle.is_some() && !state.pending.is_empty();
            state.draining = restart;
            restart
        };
        warn!("Request queue worker stopped mid-batch");
        if let (true, Some(handle)) = (restart, handle) {
            handle.spawn(self.queue.clone().drain());
        }
    }
}
