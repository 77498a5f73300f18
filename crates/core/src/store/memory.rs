// SPDX-License-Identifier: MIT

//! In-memory stores that record writes for inspection
//!
//! Used in tests and as a stand-in backend when no durable store is
//! configured. Both stores support one-shot failure injection for
//! exercising the pipeline's error paths.

use super::traits::{BlobStore, DocumentStore, StoreError, WriteOperation};
use crate::serialize::Blob;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DocumentState {
    operations: Vec<WriteOperation>,
    fail_next: Option<String>,
}

/// Document store that records operations in memory
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<Mutex<DocumentState>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations written so far
    pub fn operations(&self) -> Vec<WriteOperation> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .operations
            .clone()
    }

    /// Make the next write fail with the given message
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_next = Some(message.into());
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn write(&self, operation: WriteOperation) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(message) = state.fail_next.take() {
            return Err(StoreError::Other(message));
        }
        state.operations.push(operation);
        Ok(())
    }
}

#[derive(Default)]
struct BlobState {
    blobs: Vec<Blob>,
    fail_next: Option<String>,
}

/// Blob store that records blobs in memory; locators are the content hash
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    state: Arc<Mutex<BlobState>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All blobs written so far
    pub fn blobs(&self) -> Vec<Blob> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .blobs
            .clone()
    }

    /// Make the next write fail with the given message
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_next = Some(message.into());
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn write(&self, blob: Blob) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(message) = state.fail_next.take() {
            return Err(StoreError::Other(message));
        }
        state.blobs.push(blob);
        Ok(())
    }

    fn locate(&self, blob: &Blob) -> String {
        blob.hash.clone()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
