//! In-memory stores: `--dry-run` sink and test doubles. Failures can be injected per store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{MetadataStore, ObjectStore, StoreError};
use crate::{MetadataRecord, RawObject};

/// Objects keyed by (container, key). Counts fetches so callers can assert nothing was read.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    denied: Mutex<Vec<(String, String)>>,
    fetches: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, container_id: &str, object_key: &str, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert(
                (container_id.to_string(), object_key.to_string()),
                bytes.into(),
            );
        }
    }

    /// Make every fetch of this object fail with [`StoreError::AccessDenied`].
    pub fn deny(&self, container_id: &str, object_key: &str) {
        if let Ok(mut denied) = self.denied.lock() {
            denied.push((container_id.to_string(), object_key.to_string()));
        }
    }

    /// Keys fetched so far, in order.
    pub fn fetched_keys(&self) -> Vec<String> {
        self.fetches.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn fetch(&self, container_id: &str, object_key: &str) -> Result<RawObject, StoreError> {
        if let Ok(mut fetches) = self.fetches.lock() {
            fetches.push(object_key.to_string());
        }
        let id = (container_id.to_string(), object_key.to_string());
        let location = format!("{container_id}/{object_key}");
        if self.denied.lock().is_ok_and(|d| d.contains(&id)) {
            return Err(StoreError::AccessDenied(location));
        }
        let objects = self
            .objects
            .lock()
            .map_err(|_| StoreError::Unavailable("object map poisoned".to_string()))?;
        objects
            .get(&id)
            .map(|bytes| RawObject::new(bytes.clone()))
            .ok_or(StoreError::NotFound(location))
    }
}

/// Records keyed by id, ordered for stable listing. `set_unavailable(true)` makes every put fail.
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: Mutex<BTreeMap<String, MetadataRecord>>,
    unavailable: Mutex<bool>,
    puts: Mutex<usize>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut flag) = self.unavailable.lock() {
            *flag = unavailable;
        }
    }

    pub fn records(&self) -> Vec<MetadataRecord> {
        self.records
            .lock()
            .map(|r| r.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of put calls that reached the store (successful or not).
    pub fn put_count(&self) -> usize {
        self.puts.lock().map(|p| *p).unwrap_or(0)
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn put(&self, record: &MetadataRecord) -> Result<(), StoreError> {
        if let Ok(mut puts) = self.puts.lock() {
            *puts += 1;
        }
        if self.unavailable.lock().is_ok_and(|f| *f) {
            return Err(StoreError::Unavailable(format!("put {}", record.id)));
        }
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record map poisoned".to_string()))?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<MetadataRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record map poisoned".to_string()))?;
        Ok(records.get(id).cloned())
    }
}
