//! Database operations: schema, open/load, record upsert.

mod connection;
mod writer;

pub use connection::{
    get_record, load_records, open_db, open_db_in_memory, open_db_or_detect_encrypted,
    record_count,
};
pub use writer::SqliteMetadataStore;

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Upsert for the metadata table: a second write for the same id replaces the row.
pub const UPSERT_RECORD_SQL: &str = "INSERT OR REPLACE INTO metadata \
     (id, ingested_at, size_bytes, row_count, column_count, column_names) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub(crate) const SELECT_RECORD_COLUMNS: &str =
    "SELECT id, ingested_at, size_bytes, row_count, column_count, column_names FROM metadata";

/// Schema for the metadata table. `column_names` is a JSON array.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS metadata (
    id TEXT PRIMARY KEY,
    ingested_at TEXT NOT NULL,
    size_bytes INTEGER NOT NULL,
    row_count INTEGER NOT NULL,
    column_count INTEGER NOT NULL,
    column_names TEXT NOT NULL
);
"#;
