// SPDX-License-Identifier: MIT

//! Capability traits consumed by the write pipeline
//!
//! The pipeline owns no durable state; documents and blobs land in whatever
//! implements these traits.

use crate::serialize::Blob;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// One serialized document plus the blobs it references, queued as a unit.
///
/// The blobs are also queued individually to the blob store; a document may
/// become visible before its attachments finish persisting, or vice versa.
#[derive(Debug, Clone)]
pub struct WriteOperation {
    pub value: serde_json::Value,
    pub blobs: Vec<Blob>,
}

/// Errors surfaced by stores and the write pipeline
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("initialization failed: {0}")]
    Init(#[source] Arc<StoreError>),
    #[error("initialization interrupted")]
    InitInterrupted,
    #[error("write queue closed")]
    QueueClosed,
    #[error("{0}")]
    Other(String),
}

/// Primary store for serialized documents.
///
/// Must tolerate redelivery: the pipeline performs no retries, but callers
/// may resubmit an operation after a failure.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn write(&self, operation: WriteOperation) -> Result<(), StoreError>;
}

/// Attachment store for extracted blobs
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    async fn write(&self, blob: Blob) -> Result<(), StoreError>;

    /// Locator string embedded in documents that reference `blob`.
    ///
    /// Must be a pure function of the blob's content identity: no I/O, and
    /// no dependency on whether the write has happened. Documents embed
    /// locators before their blobs are persisted.
    fn locate(&self, blob: &Blob) -> String;
}
