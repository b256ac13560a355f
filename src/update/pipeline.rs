//! Bounded worker-pool stages connected by hand-off queues.
//!
//! A stage owns `workers` tasks that share one input receiver (fan-out) and
//! clone one output sender (fan-in). The output closes once every worker has
//! returned, which is what tells the next stage its input is exhausted.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of every hand-off queue. A sender waits until the previous item
/// has been taken by a worker.
pub const HANDOFF_CAPACITY: usize = 1;

/// Worker handles of a running stage.
pub struct StageWorkers {
    name: &'static str,
    workers: Vec<JoinHandle<()>>,
}

impl StageWorkers {
    /// Waits for every worker of the stage and logs the ones that panicked.
    ///
    /// Returns the number of workers that did not finish cleanly.
    pub async fn join(self) -> usize {
        let mut failed = 0;
        for handle in self.workers {
            if let Err(e) = handle.await {
                tracing::error!("{} worker failed: {}", self.name, e);
                failed += 1;
            }
        }
        failed
    }
}

/// Feeds `items` into a new hand-off queue from a single generator task.
///
/// Stops early when `cancel` fires or every consumer is gone.
pub fn generate<I: Send + 'static>(
    items: Vec<I>,
    cancel: CancellationToken,
) -> (mpsc::Receiver<I>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(HANDOFF_CAPACITY);

    let handle = tokio::spawn(async move {
        for item in items {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                sent = tx.send(item) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    });

    (rx, handle)
}

/// Starts `workers` tasks that apply `work` to every item of `input`.
///
/// `work` returning `None` drops the item; the worker keeps going. A panicking
/// worker only loses its current item, its siblings keep draining the input.
pub fn spawn_stage<I, O, F, Fut>(
    name: &'static str,
    workers: usize,
    input: mpsc::Receiver<I>,
    cancel: CancellationToken,
    work: F,
) -> (mpsc::Receiver<O>, StageWorkers)
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<O>> + Send + 'static,
{
    let (tx, output) = mpsc::channel(HANDOFF_CAPACITY);
    let input = Arc::new(Mutex::new(input));
    let work = Arc::new(work);

    let handles = (0..workers)
        .map(|worker_id| {
            let input = input.clone();
            let tx = tx.clone();
            let cancel = cancel.clone();
            let work = work.clone();

            tokio::spawn(async move {
                tracing::trace!("{} worker {} started", name, worker_id);

                loop {
                    let item = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        item = async { input.lock().await.recv().await } => item,
                    };
                    let Some(item) = item else { break };

                    let Some(out) = work(item).await else { continue };

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        sent = tx.send(out) => {
                            if sent.is_err() {
                                break;
                            }
                        }
                    }
                }

                tracing::trace!("{} worker {} finished", name, worker_id);
            })
        })
        .collect();

    (
        output,
        StageWorkers {
            name,
            workers: handles,
        },
    )
}
