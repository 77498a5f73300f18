// SPDX-License-Identifier: MIT

//! chatlog-storage: filesystem-backed stores for the chatlog pipeline
//!
//! This crate provides:
//! - An append-only JSONL document store
//! - A content-addressed blob directory store
//!
//! Both stores gate their writes behind a one-shot init that creates the
//! target directory tree on first use.

pub mod blob;
pub mod document;

pub use blob::FsBlobStore;
pub use document::FsDocumentStore;
