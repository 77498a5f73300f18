// SPDX-License-Identifier: MIT

//! Write coordinator: redact, serialize, fan out to both queues
//!
//! The document queue and the blob queue run independently; there is no
//! ordering guarantee between them. Consumers must tolerate a window where
//! a document is visible before its attachments, or the reverse.

use crate::entry::LogEntry;
use crate::queue::{WriteQueue, DEFAULT_DEPTH};
use crate::redact::{RedactError, Redactor};
use crate::serialize::{serialize, Blob};
use crate::store::{BlobStore, DocumentStore, StoreError, WriteOperation};
use std::sync::Arc;

/// Configuration for the write pipeline
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Simultaneous document writes before queueing (default: 1)
    pub document_concurrency: usize,
    /// Simultaneous blob writes before queueing (default: 1)
    pub blob_concurrency: usize,
    /// Queued items per queue before submitters wait (default: 256)
    pub queue_depth: usize,
    /// Field paths that must not be visible in logs
    /// (e.g. `"data.user.password"`)
    pub masked_fields: Vec<String>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            document_concurrency: 1,
            blob_concurrency: 1,
            queue_depth: DEFAULT_DEPTH,
            masked_fields: Vec::new(),
        }
    }
}

impl WriterOptions {
    /// Set both queues to the same concurrency bound
    pub fn with_concurrency(self, concurrency: usize) -> Self {
        Self {
            document_concurrency: concurrency,
            blob_concurrency: concurrency,
            ..self
        }
    }

    /// Set the masked field paths
    pub fn with_masked_fields<S: Into<String>>(
        self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            masked_fields: fields.into_iter().map(Into::into).collect(),
            ..self
        }
    }
}

/// Coordinates the full write path for one entry: redact, serialize, queue
/// the document and its blobs, and fan in both completions.
pub struct LogWriter {
    redactor: Option<Redactor>,
    blob_store: Option<Arc<dyn BlobStore>>,
    document_queue: WriteQueue<WriteOperation>,
    blob_queue: WriteQueue<Blob>,
}

impl LogWriter {
    /// Build a writer over the given stores.
    ///
    /// Fails only if a masked field path does not parse.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Option<Arc<dyn BlobStore>>,
        options: WriterOptions,
    ) -> Result<Self, RedactError> {
        let redactor = if options.masked_fields.is_empty() {
            None
        } else {
            Some(Redactor::new(&options.masked_fields)?)
        };

        let document_queue =
            WriteQueue::new(options.document_concurrency, options.queue_depth, {
                move |operation| {
                    let documents = documents.clone();
                    async move { documents.write(operation).await }
                }
            });

        let blob_queue = WriteQueue::new(options.blob_concurrency, options.queue_depth, {
            let store = blobs.clone();
            move |blob| {
                let store = store.clone();
                async move {
                    match store {
                        Some(store) => store.write(blob).await,
                        // no blob store configured: blob writes are a no-op
                        None => Ok(()),
                    }
                }
            }
        });

        Ok(Self {
            redactor,
            blob_store: blobs,
            document_queue,
            blob_queue,
        })
    }

    /// Persist one entry.
    ///
    /// Completes when the document write and every blob write have finished.
    /// If several of those fail, the surfaced error is the first in
    /// submission order (document, then blobs in discovery order), not an
    /// aggregate.
    pub async fn enqueue(&self, entry: LogEntry) -> Result<(), StoreError> {
        let mut value = entry.into_value();
        if let Some(redactor) = &self.redactor {
            value = redactor.apply(value);
        }

        let mut blobs = Vec::new();
        let locate = |blob: &Blob| match &self.blob_store {
            Some(store) => store.locate(blob),
            // content hash stands in for a locator when blobs are dropped
            None => blob.hash.clone(),
        };
        let document = serialize(value, &locate, &mut blobs);

        let document_pending = self
            .document_queue
            .submit(WriteOperation {
                value: document,
                blobs: blobs.clone(),
            })
            .await?;

        let mut blob_pending = Vec::with_capacity(blobs.len());
        for blob in blobs {
            blob_pending.push(self.blob_queue.submit(blob).await?);
        }

        let mut first_error = document_pending.wait().await.err();
        for pending in blob_pending {
            let result = pending.wait().await;
            if first_error.is_none() {
                first_error = result.err();
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
