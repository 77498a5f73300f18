// SPDX-License-Identifier: MIT

//! Filesystem document store
//!
//! Appends each write operation as one JSON line. The parent directory is
//! created on first write through the store's init gate; a failed init
//! poisons the store and every later write surfaces the cached error.

use async_trait::async_trait;
use chatlog_core::{DocumentStore, LazyInit, StoreError, WriteOperation};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// One persisted line of the document log
#[derive(Debug, Serialize)]
struct DocumentRecord<'a> {
    value: &'a serde_json::Value,
    /// Hashes of the blobs the document references
    blob_hashes: Vec<&'a str>,
}

/// Append-only JSONL document store
pub struct FsDocumentStore {
    path: PathBuf,
    init: LazyInit,
}

impl FsDocumentStore {
    /// Store documents in the file at `path`; missing parent directories
    /// are created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            init: LazyInit::new(),
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn write(&self, operation: WriteOperation) -> Result<(), StoreError> {
        let parent = self.path.parent().map(PathBuf::from);
        self.init
            .after_init(|| async move {
                if let Some(parent) = parent {
                    tokio::fs::create_dir_all(&parent).await?;
                    tracing::debug!(path = %parent.display(), "document directory ready");
                }
                Ok(())
            })
            .await?;

        let record = DocumentRecord {
            value: &operation.value,
            blob_hashes: operation.blobs.iter().map(|b| b.hash.as_str()).collect(),
        };
        let mut line = serde_json::to_string(&record).map_err(StoreError::Json)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
