// SPDX-License-Identifier: MIT

//! Store capability traits and in-memory implementations

pub mod memory;
pub mod traits;

pub use memory::{MemoryBlobStore, MemoryDocumentStore};
pub use traits::{BlobStore, DocumentStore, StoreError, WriteOperation};
