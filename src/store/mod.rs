//! Seams to the external collaborators: the object store (byte source) and the metadata store (sink).
//!
//! The pipeline only sees these traits; the CLI wires in [`LocalObjectStore`] and the SQLite
//! [`SqliteMetadataStore`](crate::engine::db_ops::SqliteMetadataStore), tests and `--dry-run` use
//! the [`memory`] stores.

pub mod local;
pub mod memory;

use thiserror::Error;

use crate::{MetadataRecord, RawObject};

pub use local::LocalObjectStore;
pub use memory::{MemoryMetadataStore, MemoryObjectStore};

/// Infrastructure failure reported by a store. Always fatal for the batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only byte source.
pub trait ObjectStore {
    /// Fetch the full payload of `object_key` in `container_id`.
    fn fetch(&self, container_id: &str, object_key: &str) -> Result<RawObject, StoreError>;

    /// Size of the object without reading its payload, when the store can tell cheaply.
    /// `None` means unknown; the size is then only known after `fetch`.
    fn head(&self, _container_id: &str, _object_key: &str) -> Result<Option<u64>, StoreError> {
        Ok(None)
    }
}

/// Key-value sink keyed by [`MetadataRecord::id`]. `put` overwrites any existing record.
pub trait MetadataStore {
    fn put(&self, record: &MetadataRecord) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<MetadataRecord>, StoreError>;
}
