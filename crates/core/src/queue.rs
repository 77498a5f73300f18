// SPDX-License-Identifier: MIT

//! Bounded-concurrency FIFO write queues
//!
//! One queue instance serves one category of write target (documents or
//! blobs). Items start strictly in submission order; up to the concurrency
//! bound may be in flight at once, so completion order can interleave. A
//! failing item's error reaches only that item's completion and never halts
//! or skips later items.

use crate::store::StoreError;
use std::future::{poll_fn, Future};
use std::sync::Arc;
use std::task::Poll;
use tokio::sync::{mpsc, oneshot, Semaphore};

/// Default backlog bound per queue
pub const DEFAULT_DEPTH: usize = 256;

struct Job<T> {
    item: T,
    done: oneshot::Sender<Result<(), StoreError>>,
}

fn deliver(result: Result<(), StoreError>, done: oneshot::Sender<Result<(), StoreError>>) {
    if let Err(err) = &result {
        tracing::debug!(error = %err, "queued write failed");
    }
    // the submitter may no longer be waiting
    let _ = done.send(result);
}

/// Pending completion for one submitted item
pub struct Pending {
    rx: oneshot::Receiver<Result<(), StoreError>>,
}

impl Pending {
    /// Wait for the item's write to finish
    pub async fn wait(self) -> Result<(), StoreError> {
        self.rx.await.map_err(|_| StoreError::QueueClosed)?
    }
}

/// FIFO queue that dispatches up to `concurrency` writes at a time.
///
/// Depth is bounded: when the backlog is full, submitters wait for a slot
/// instead of growing the queue without limit.
pub struct WriteQueue<T> {
    tx: mpsc::Sender<Job<T>>,
}

impl<T: Send + 'static> WriteQueue<T> {
    /// Create a queue backed by `write`, with at most `concurrency` writes
    /// in flight (zero is treated as one) and at most `depth` items queued
    pub fn new<W, Fut>(concurrency: usize, depth: usize, write: W) -> Self
    where
        W: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Job<T>>(depth.max(1));
        let slots = Arc::new(Semaphore::new(concurrency.max(1)));

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let Ok(permit) = slots.clone().acquire_owned().await else {
                    break;
                };
                let mut write_fut = Box::pin(write(job.item));
                // the first poll happens on the dispatcher itself, so writes
                // start strictly in submission order even when spawned tasks
                // land on different worker threads
                let early = poll_fn(|cx| {
                    Poll::Ready(match write_fut.as_mut().poll(cx) {
                        Poll::Ready(result) => Some(result),
                        Poll::Pending => None,
                    })
                })
                .await;

                match early {
                    Some(result) => {
                        deliver(result, job.done);
                        drop(permit);
                    }
                    None => {
                        let done = job.done;
                        tokio::spawn(async move {
                            let result = write_fut.await;
                            deliver(result, done);
                            drop(permit);
                        });
                    }
                }
            }
        });

        Self { tx }
    }

    /// Submit an item, waiting if the backlog is full.
    ///
    /// Returns a handle for awaiting the item's completion; dropping the
    /// handle does not cancel the write.
    pub async fn submit(&self, item: T) -> Result<Pending, StoreError> {
        let (done, rx) = oneshot::channel();
        self.tx
            .send(Job { item, done })
            .await
            .map_err(|_| StoreError::QueueClosed)?;
        Ok(Pending { rx })
    }

    /// Submit an item and wait for its write to complete
    pub async fn push(&self, item: T) -> Result<(), StoreError> {
        self.submit(item).await?.wait().await
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
