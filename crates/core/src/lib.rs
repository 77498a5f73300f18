// SPDX-License-Identifier: MIT

//! chatlog-core: durable structured event recording for conversational
//! processes
//!
//! This crate provides:
//! - A closed tagged value model and a serializer that extracts binary
//!   payloads into content-addressed blobs
//! - Field-path redaction of sensitive values before persistence
//! - A one-shot async initialization gate for backing-store adapters
//! - Bounded-concurrency FIFO write queues
//! - A write coordinator and a fire-and-forget logger facade

pub mod entry;
pub mod init;
pub mod logger;
pub mod queue;
pub mod redact;
pub mod serialize;
pub mod store;
pub mod value;
pub mod writer;

// Re-exports
pub use entry::LogEntry;
pub use init::LazyInit;
pub use logger::Logger;
pub use queue::WriteQueue;
pub use redact::{RedactError, Redactor};
pub use serialize::{content_hash, serialize, Blob, DEFAULT_CONTENT_TYPE};
pub use store::{
    BlobStore, DocumentStore, MemoryBlobStore, MemoryDocumentStore, StoreError, WriteOperation,
};
pub use value::Value;
pub use writer::{LogWriter, WriterOptions};
