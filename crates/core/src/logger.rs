// SPDX-License-Identifier: MIT

//! Fire-and-forget logging facade
//!
//! The front door for callers that must not block on persistence. Write
//! failures are delivered to the registered observer; with no observer
//! registered they go to the diagnostic stream via `tracing::error!`.

use crate::entry::LogEntry;
use crate::store::StoreError;
use crate::value::Value;
use crate::writer::LogWriter;
use std::sync::{Arc, Mutex};

type ErrorObserver = Box<dyn Fn(&StoreError) + Send + Sync>;

/// Non-blocking logger over a [`LogWriter`]
#[derive(Clone)]
pub struct Logger {
    writer: Arc<LogWriter>,
    observer: Arc<Mutex<Option<ErrorObserver>>>,
}

impl Logger {
    pub fn new(writer: LogWriter) -> Self {
        Self {
            writer: Arc::new(writer),
            observer: Arc::new(Mutex::new(None)),
        }
    }

    /// Route write failures to `observer` instead of the diagnostic stream
    pub fn on_error<F>(&self, observer: F)
    where
        F: Fn(&StoreError) + Send + Sync + 'static,
    {
        *self.observer.lock().unwrap_or_else(|e| e.into_inner()) = Some(Box::new(observer));
    }

    /// Record an event without waiting for persistence.
    ///
    /// The entry is stamped with the current time and handed to the write
    /// pipeline on a background task.
    pub fn log(&self, conversation: impl Into<String>, kind: impl Into<String>, data: Value) {
        let entry = LogEntry::new(conversation, kind, data);
        let writer = self.writer.clone();
        let observer = self.observer.clone();
        tokio::spawn(async move {
            if let Err(err) = writer.enqueue(entry).await {
                let observer = observer.lock().unwrap_or_else(|e| e.into_inner());
                match observer.as_ref() {
                    Some(observer) => observer(&err),
                    None => tracing::error!(error = %err, "log write failed"),
                }
            }
        });
    }

    /// Record an entry and wait for the document and all blobs to persist
    pub async fn write_entry(&self, entry: LogEntry) -> Result<(), StoreError> {
        self.writer.enqueue(entry).await
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
