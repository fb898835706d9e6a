//! Public and internal types for the tabmeta API and pipeline.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::config::{MAX_OBJECT_BYTES, TABULAR_EXTENSION};

/// One arrived object, as announced by an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileNotification {
    pub container_id: String,
    /// Decoded key; may contain spaces, slashes and any UTF-8.
    pub object_key: String,
    /// Size announced by the event. May be stale or absent; the fetched size is authoritative.
    pub declared_size: Option<u64>,
}

impl FileNotification {
    pub fn new(container_id: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            object_key: object_key.into(),
            declared_size: None,
        }
    }

    /// Build from the raw event key: `+` is a space, `%XX` sequences are UTF-8 bytes.
    /// Invalid UTF-8 after decoding is replaced rather than rejected.
    pub fn from_encoded(
        container_id: impl Into<String>,
        encoded_key: &str,
        declared_size: Option<u64>,
    ) -> Self {
        let plus_decoded = encoded_key.replace('+', " ");
        let object_key = percent_decode_str(&plus_decoded)
            .decode_utf8_lossy()
            .into_owned();
        Self {
            container_id: container_id.into(),
            object_key,
            declared_size,
        }
    }

    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = Some(size);
        self
    }
}

/// Fetched payload. `size_bytes` is always the exact payload length.
#[derive(Clone, Debug)]
pub struct RawObject {
    pub bytes: Vec<u8>,
    pub size_bytes: u64,
}

impl RawObject {
    pub fn new(bytes: Vec<u8>) -> Self {
        let size_bytes = bytes.len() as u64;
        Self { bytes, size_bytes }
    }
}

/// Persisted unit: one per object key. Same shape as a row in the metadata DB.
///
/// Serialized with camelCase keys (`ingestedAt`, `sizeBytes`, ...) for JSON output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    /// The object key; primary key in the store.
    pub id: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub ingested_at: String,
    pub size_bytes: u64,
    /// Data rows, header excluded.
    pub row_count: u64,
    /// Always `column_names.len()`.
    pub column_count: u64,
    /// Header row verbatim, in order.
    pub column_names: Vec<String>,
}

/// Counts for a batch that ran to completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub persisted: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.persisted + self.skipped
    }
}

/// Full options (CLI + `.tabmeta.toml`).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Metadata DB path. When None, uses `root.join(<package db filename>)` (e.g. `.tabmeta`).
    pub db_path: Option<PathBuf>,
    /// Admitted key suffix, compared case-insensitively.
    pub extension: String,
    /// Size ceiling in bytes; objects at or above it are rejected.
    pub max_bytes: u64,
    /// Debug-level logging.
    pub verbose: bool,
    /// Encrypt the metadata DB with SQLCipher.
    pub encrypt: bool,
    /// Print every stored record after the run.
    pub list_records: bool,
    /// When false, records go to an in-memory store and are printed instead of persisted.
    pub write_to_db: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            db_path: None,
            extension: TABULAR_EXTENSION.to_string(),
            max_bytes: MAX_OBJECT_BYTES,
            verbose: false,
            encrypt: false,
            list_records: false,
            write_to_db: true,
        }
    }
}
