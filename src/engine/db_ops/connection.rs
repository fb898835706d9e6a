//! Open and load the metadata database.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::MetadataRecord;
use crate::utils::get_passphrase;

use super::{SCHEMA, SELECT_RECORD_COLUMNS, WAL_PRAGMAS};

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(())
}

/// Open or create the metadata DB and ensure schema + WAL.
/// If `passphrase` is Some, set SQLCipher PRAGMA key before any other operations.
pub fn open_db(path: &Path, passphrase: Option<&str>) -> Result<Connection> {
    let conn = Connection::open(path).context("open database")?;

    if let Some(key) = passphrase {
        conn.pragma_update(None, "key", key)
            .context("set SQLCipher key")?;
    }

    apply_wal_and_schema(&conn)?;
    Ok(conn)
}

/// Open an existing DB, detecting encryption: try without key first; if the read fails, load the
/// passphrase (env → .env in `dir` → prompt) and reopen with it. Returns (connection, passphrase_used).
pub fn open_db_or_detect_encrypted(
    path: &Path,
    dir: &Path,
) -> Result<(Connection, Option<String>)> {
    let conn = Connection::open(path).context("open database")?;
    if conn
        .query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
        .is_ok()
    {
        apply_wal_and_schema(&conn)?;
        return Ok((conn, None));
    }
    drop(conn);
    let pass = get_passphrase(dir, path, false)?;
    let conn = open_db(path, Some(pass.as_str()))?;
    Ok((conn, Some(pass)))
}

/// Open an in-memory DB with the same schema (no WAL pragmas needed).
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory database")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(conn)
}

/// Map one `metadata` row back to a record. Bad JSON in `column_names` surfaces as a
/// conversion error on that column.
pub(crate) fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MetadataRecord> {
    let names_json: String = row.get(5)?;
    let column_names: Vec<String> = serde_json::from_str(&names_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let size: i64 = row.get(2)?;
    let rows: i64 = row.get(3)?;
    let cols: i64 = row.get(4)?;
    Ok(MetadataRecord {
        id: row.get(0)?,
        ingested_at: row.get(1)?,
        size_bytes: size.max(0) as u64,
        row_count: rows.max(0) as u64,
        column_count: cols.max(0) as u64,
        column_names,
    })
}

/// Load every record, ordered by id.
pub fn load_records(conn: &Connection) -> Result<Vec<MetadataRecord>> {
    let sql = format!("{SELECT_RECORD_COLUMNS} ORDER BY id");
    let mut stmt = conn.prepare(&sql).context("prepare load")?;
    let rows = stmt.query_map([], row_to_record)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row.context("read record")?);
    }
    Ok(records)
}

/// Fetch one record by id.
pub fn get_record(conn: &Connection, id: &str) -> Result<Option<MetadataRecord>> {
    let sql = format!("{SELECT_RECORD_COLUMNS} WHERE id = ?1");
    conn.query_row(&sql, [id], row_to_record)
        .optional()
        .context("read record")
}

/// Number of rows in the metadata table, or None if the query fails.
pub fn record_count(conn: &Connection) -> Option<u64> {
    conn.query_row("SELECT COUNT(*) FROM metadata", [], |row| row.get::<_, i64>(0))
        .ok()
        .map(|n| n.max(0) as u64)
}
