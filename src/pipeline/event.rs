//! Object-created event payloads (S3 notification shape) → [`FileNotification`]s.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::FileNotification;

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "Records", default)]
    records: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: BucketRef,
    object: ObjectRef,
}

#[derive(Debug, Deserialize)]
struct BucketRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectRef {
    /// Percent-encoded, `+` for space.
    key: String,
    #[serde(default)]
    size: Option<u64>,
}

/// Parse an event document into notifications, in record order. Keys are decoded here.
pub fn notifications_from_json(json: &str) -> Result<Vec<FileNotification>> {
    let envelope: EventEnvelope = serde_json::from_str(json).context("parse event JSON")?;
    Ok(envelope
        .records
        .into_iter()
        .map(|r| {
            FileNotification::from_encoded(r.s3.bucket.name, &r.s3.object.key, r.s3.object.size)
        })
        .collect())
}
