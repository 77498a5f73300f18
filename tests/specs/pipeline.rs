//! End-to-end pipeline specs over in-memory stores.

use chatlog_core::{
    content_hash, BlobStore, LogEntry, LogWriter, MemoryBlobStore, MemoryDocumentStore, Value,
    WriterOptions,
};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn binary_field_and_masked_token_end_to_end() {
    let documents = MemoryDocumentStore::new();
    let blobs = MemoryBlobStore::new();
    let writer = LogWriter::new(
        Arc::new(documents.clone()),
        Some(Arc::new(blobs.clone())),
        WriterOptions::default().with_masked_fields(["data.token"]),
    )
    .unwrap();

    let payload = b"0123456789".to_vec();
    let data = Value::mapping([
        ("token", Value::from("hunter2")),
        ("image", Value::binary(payload.clone())),
    ]);
    writer
        .enqueue(LogEntry::new("conv-42", "attachment", data))
        .await
        .unwrap();

    // exactly one document, token fully redacted, binary replaced by locator
    let operations = documents.operations();
    assert_eq!(operations.len(), 1);
    let document = &operations[0].value;
    assert_eq!(document["data"]["token"], json!("*******"));
    let expected_hash = content_hash(&payload);
    assert_eq!(document["data"]["image"], json!({ "$blob": expected_hash }));

    // exactly one blob, hash matching the payload
    let stored = blobs.blobs();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].hash, expected_hash);
    assert_eq!(stored[0].data, payload);
}

#[tokio::test]
async fn locators_are_computed_before_blobs_persist() {
    // a blob store that records locate calls happening before any write
    let blobs = MemoryBlobStore::new();
    let blob = chatlog_core::Blob::from_bytes(b"attachment".to_vec());
    let locator = blobs.locate(&blob);
    assert!(blobs.blobs().is_empty());
    assert_eq!(locator, blob.hash);
}

#[tokio::test]
async fn concurrent_entries_keep_document_submission_order() {
    let documents = MemoryDocumentStore::new();
    let writer = Arc::new(
        LogWriter::new(
            Arc::new(documents.clone()),
            None,
            WriterOptions::default(),
        )
        .unwrap(),
    );

    for n in 0..5i64 {
        writer
            .enqueue(LogEntry::new(
                "conv-1",
                "tick",
                Value::mapping([("n", Value::from(n))]),
            ))
            .await
            .unwrap();
    }

    let seen: Vec<_> = documents
        .operations()
        .iter()
        .map(|op| op.value["data"]["n"].as_i64().unwrap())
        .collect();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}
