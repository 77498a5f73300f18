// SPDX-License-Identifier: MIT

//! Filesystem blob store
//!
//! Stores each blob as a file named by its content hash. Locators are the
//! target path, computed from content identity alone, so documents can
//! embed them before the blob is persisted.

use async_trait::async_trait;
use chatlog_core::{Blob, BlobStore, LazyInit, StoreError};
use std::path::PathBuf;

/// Content-addressed blob directory store
pub struct FsBlobStore {
    root: PathBuf,
    init: LazyInit,
}

impl FsBlobStore {
    /// Store blobs under `root`, created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            init: LazyInit::new(),
        }
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        self.root.join(hash)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, blob: Blob) -> Result<(), StoreError> {
        let root = self.root.clone();
        self.init
            .after_init(|| async move {
                tokio::fs::create_dir_all(&root).await?;
                tracing::debug!(path = %root.display(), "blob directory ready");
                Ok(())
            })
            .await?;

        // identical bytes land at the same path; rewriting is harmless
        tokio::fs::write(self.blob_path(&blob.hash), &blob.data).await?;
        Ok(())
    }

    fn locate(&self, blob: &Blob) -> String {
        self.blob_path(&blob.hash).display().to_string()
    }
}

#[cfg(test)]
#[path = "blob_tests.rs"]
mod tests;
