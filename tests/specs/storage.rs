//! End-to-end specs over the filesystem stores.

use chatlog_core::{content_hash, LogEntry, LogWriter, Logger, Value, WriterOptions};
use chatlog_storage::{FsBlobStore, FsDocumentStore};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::time::{sleep, Duration};

#[tokio::test]
async fn pipeline_persists_documents_and_blobs_to_disk() {
    let tmp = TempDir::new().unwrap();
    let document_path = tmp.path().join("log").join("documents.jsonl");
    let blob_root = tmp.path().join("blobs");
    let writer = LogWriter::new(
        Arc::new(FsDocumentStore::new(&document_path)),
        Some(Arc::new(FsBlobStore::new(&blob_root))),
        WriterOptions::default().with_masked_fields(["data.secret"]),
    )
    .unwrap();

    let payload = b"binary attachment".to_vec();
    let data = Value::mapping([
        ("secret", Value::from("s3cret")),
        ("media", Value::binary(payload.clone())),
    ]);
    writer
        .enqueue(LogEntry::new("conv-7", "upload", data))
        .await
        .unwrap();

    // document on disk, secret masked, locator pointing into the blob root
    let contents = std::fs::read_to_string(&document_path).unwrap();
    let record: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!(record["value"]["data"]["secret"], json!("******"));
    let hash = content_hash(&payload);
    let locator = record["value"]["data"]["media"]["$blob"].as_str().unwrap();
    assert_eq!(locator, blob_root.join(&hash).display().to_string());

    // blob on disk under its hash
    let stored = std::fs::read(blob_root.join(&hash)).unwrap();
    assert_eq!(stored, payload);
}

#[tokio::test]
async fn logger_facade_drains_to_disk_in_background() {
    let tmp = TempDir::new().unwrap();
    let document_path = tmp.path().join("documents.jsonl");
    let writer = LogWriter::new(
        Arc::new(FsDocumentStore::new(&document_path)),
        None,
        WriterOptions::default(),
    )
    .unwrap();
    let logger = Logger::new(writer);

    for n in 0..3i64 {
        logger.log("conv-9", "tick", Value::mapping([("n", Value::from(n))]));
    }

    // fire-and-forget: wait for the background writes to drain
    let mut lines = 0;
    for _ in 0..50 {
        sleep(Duration::from_millis(10)).await;
        lines = std::fs::read_to_string(&document_path)
            .map(|s| s.lines().count())
            .unwrap_or(0);
        if lines == 3 {
            break;
        }
    }
    assert_eq!(lines, 3);
}
