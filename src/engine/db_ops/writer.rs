//! SQLite-backed [`MetadataStore`]: one row per object key, upserted.

use anyhow::Context;
use rusqlite::{Connection, ErrorCode, OptionalExtension};

use crate::MetadataRecord;
use crate::store::{MetadataStore, StoreError};

use super::{SELECT_RECORD_COLUMNS, UPSERT_RECORD_SQL};
use super::connection::row_to_record;

pub struct SqliteMetadataStore {
    conn: Connection,
}

impl SqliteMetadataStore {
    /// Wrap a connection opened with [`open_db`](super::open_db) or
    /// [`open_db_in_memory`](super::open_db_in_memory) (schema already applied).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Truncate the WAL after a run.
    pub fn checkpoint(&self) -> anyhow::Result<()> {
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .context("WAL checkpoint")
    }
}

/// Read-only and permission failures are access errors; everything else means the store is unusable.
fn to_store_error(op: &str, id: &str, e: rusqlite::Error) -> StoreError {
    let msg = format!("{op} {id}: {e}");
    match e.sqlite_error_code() {
        Some(
            ErrorCode::ReadOnly
            | ErrorCode::PermissionDenied
            | ErrorCode::AuthorizationForStatementDenied,
        ) => StoreError::AccessDenied(msg),
        _ => StoreError::Unavailable(msg),
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn put(&self, record: &MetadataRecord) -> Result<(), StoreError> {
        let names = serde_json::to_string(&record.column_names)
            .map_err(|e| StoreError::Unavailable(format!("encode column names: {e}")))?;
        self.conn
            .execute(
                UPSERT_RECORD_SQL,
                (
                    record.id.as_str(),
                    record.ingested_at.as_str(),
                    record.size_bytes as i64,
                    record.row_count as i64,
                    record.column_count as i64,
                    names.as_str(),
                ),
            )
            .map_err(|e| to_store_error("put", &record.id, e))?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<MetadataRecord>, StoreError> {
        let sql = format!("{SELECT_RECORD_COLUMNS} WHERE id = ?1");
        self.conn
            .query_row(&sql, [id], row_to_record)
            .optional()
            .map_err(|e| to_store_error("get", id, e))
    }
}
