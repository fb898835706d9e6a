//! End-to-end runs against a directory-backed object store.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use tabmeta::engine::{get_record, open_db, record_count};
use tabmeta::ingest::{db_path_for, dry_run_batch, ingest_batch, scan_container};
use tabmeta::pipeline::{
    AdmissionPolicy, FileOutcome, Orchestrator, PipelineContext, SkipReason, SystemClock,
    notifications_from_json,
};
use tabmeta::store::{LocalObjectStore, MemoryMetadataStore, ObjectStore, StoreError};
use tabmeta::{FileNotification, Opts, RawObject};

/// Fresh directory under the system temp dir, unique per test.
fn fixture_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("tabmeta_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    root
}

fn write_object(root: &Path, container: &str, key: &str, body: &[u8]) {
    let path = root.join(container).join(key);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

// --- local object store ---

#[test]
fn test_local_fetch_reads_exact_bytes() {
    let root = fixture_root("local_fetch");
    write_object(&root, "uploads", "data/q1 sales.csv", b"id\n1\n");
    let store = LocalObjectStore::new(&root);

    let raw = store.fetch("uploads", "data/q1 sales.csv").unwrap();
    assert_eq!(raw.bytes, b"id\n1\n");
    assert_eq!(raw.size_bytes, 5);

    assert!(matches!(
        store.fetch("uploads", "data/missing.csv"),
        Err(StoreError::NotFound(_))
    ));
    let _ = std::fs::remove_dir_all(&root);
}

/// Local store that counts payload reads.
struct CountingStore {
    inner: LocalObjectStore,
    reads: Cell<usize>,
}

impl ObjectStore for CountingStore {
    fn fetch(&self, container_id: &str, object_key: &str) -> Result<RawObject, StoreError> {
        self.reads.set(self.reads.get() + 1);
        self.inner.fetch(container_id, object_key)
    }

    fn head(&self, container_id: &str, object_key: &str) -> Result<Option<u64>, StoreError> {
        self.inner.head(container_id, object_key)
    }
}

#[test]
fn test_oversized_local_object_is_never_read() {
    let root = fixture_root("local_oversize");
    write_object(&root, "uploads", "big.csv", b"a\n1\n2\n3\n4\n5\n");
    write_object(&root, "uploads", "small.csv", b"a\n1\n");
    let objects = CountingStore {
        inner: LocalObjectStore::new(&root),
        reads: Cell::new(0),
    };
    let records = MemoryMetadataStore::new();
    let clock = SystemClock;
    let policy = AdmissionPolicy {
        max_bytes: 8,
        ..AdmissionPolicy::default()
    };
    let orch =
        Orchestrator::new(PipelineContext::new(&objects, &records, &clock).with_policy(policy));

    // No declared size: the event did not carry one.
    assert!(matches!(
        orch.process_file(&FileNotification::new("uploads", "big.csv")),
        FileOutcome::Skipped(SkipReason::TooLarge { size_bytes: 12 })
    ));
    // A stale declared size does not force a read either.
    let stale = FileNotification::new("uploads", "big.csv").with_declared_size(3);
    assert!(matches!(
        orch.process_file(&stale),
        FileOutcome::Skipped(SkipReason::TooLarge { .. })
    ));
    assert_eq!(objects.reads.get(), 0);

    let summary = orch
        .process(&[FileNotification::new("uploads", "small.csv")])
        .unwrap();
    assert_eq!(summary.persisted, 1);
    assert_eq!(objects.reads.get(), 1);
    let _ = std::fs::remove_dir_all(&root);
}

// --- event-driven ingest ---

#[test]
fn test_ingest_event_batch_into_db() {
    let root = fixture_root("ingest_events");
    write_object(
        &root,
        "uploads",
        "data/q1 sales.csv",
        b"id,name,amount\n1,a,10\n2,b,20\n",
    );
    write_object(&root, "uploads", "report.txt", b"not a table");

    let events = r#"{"Records": [
        {"s3": {"bucket": {"name": "uploads"}, "object": {"key": "data/q1+sales.csv", "size": 29}}},
        {"s3": {"bucket": {"name": "uploads"}, "object": {"key": "report.txt", "size": 11}}}
    ]}"#;
    let batch = notifications_from_json(events).unwrap();
    let opts = Opts::default();

    let summary = ingest_batch(&root, &batch, &opts).unwrap();
    assert_eq!(summary.persisted, 1);
    assert_eq!(summary.skipped, 1);

    let conn = open_db(&db_path_for(&root, &opts), None).unwrap();
    assert_eq!(record_count(&conn), Some(1));
    let record = get_record(&conn, "data/q1 sales.csv").unwrap().unwrap();
    assert_eq!(record.row_count, 2);
    assert_eq!(record.column_names, vec!["id", "name", "amount"]);
    assert_eq!(record.size_bytes, 29);
    drop(conn);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_ingest_twice_keeps_latest() {
    let root = fixture_root("ingest_twice");
    let opts = Opts::default();
    let batch = vec![FileNotification::new("uploads", "daily.csv")];

    write_object(&root, "uploads", "daily.csv", b"a\n1\n");
    ingest_batch(&root, &batch, &opts).unwrap();
    write_object(&root, "uploads", "daily.csv", b"a,b\n1,2\n3,4\n5,6\n");
    ingest_batch(&root, &batch, &opts).unwrap();

    let conn = open_db(&db_path_for(&root, &opts), None).unwrap();
    assert_eq!(record_count(&conn), Some(1));
    let record = get_record(&conn, "daily.csv").unwrap().unwrap();
    assert_eq!(record.row_count, 3);
    assert_eq!(record.column_count, 2);
    drop(conn);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_ingest_missing_object_fails() {
    let root = fixture_root("ingest_missing");
    std::fs::create_dir_all(root.join("uploads")).unwrap();
    let batch = vec![FileNotification::new("uploads", "ghost.csv")];

    let err = ingest_batch(&root, &batch, &Opts::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotFound(_))
    ));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_escaping_key_is_denied() {
    let root = fixture_root("ingest_escape");
    write_object(&root, "other", "secret.csv", b"a\n1\n");
    let batch = vec![FileNotification::new("uploads", "../other/secret.csv")];

    let err = ingest_batch(&root, &batch, &Opts::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::AccessDenied(_))
    ));
    let _ = std::fs::remove_dir_all(&root);
}

// --- backfill scan ---

#[test]
fn test_scan_lists_files_with_sizes() {
    let root = fixture_root("scan");
    write_object(&root, "uploads", "b.csv", b"x\n");
    write_object(&root, "uploads", "nested/a.csv", b"x\n1\n");
    write_object(&root, "uploads", ".DS_Store", b"junk");
    write_object(&root, "uploads", "notes.txt", b"hello");

    let batch = scan_container(&root, "uploads").unwrap();
    let keys: Vec<&str> = batch.iter().map(|n| n.object_key.as_str()).collect();
    assert_eq!(keys, vec!["b.csv", "nested/a.csv", "notes.txt"]);
    assert_eq!(batch[1].declared_size, Some(4));
    assert!(batch.iter().all(|n| n.container_id == "uploads"));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_scan_missing_container_is_error() {
    let root = fixture_root("scan_missing");
    assert!(scan_container(&root, "nope").is_err());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_scan_respects_max_bytes() {
    let root = fixture_root("scan_max");
    write_object(&root, "uploads", "small.csv", b"a\n1\n");
    write_object(&root, "uploads", "large.csv", b"a\n1\n2\n3\n4\n5\n");
    let opts = Opts {
        max_bytes: 8,
        ..Opts::default()
    };

    let batch = scan_container(&root, "uploads").unwrap();
    let records = dry_run_batch(&root, &batch, &opts).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "small.csv");
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_ingest_counts_blank_lines_as_rows() {
    let root = fixture_root("ingest_blank_lines");
    write_object(&root, "uploads", "padded.csv", b"id,v\n1,2\n\n\n");
    let opts = Opts::default();
    let batch = vec![FileNotification::new("uploads", "padded.csv")];

    ingest_batch(&root, &batch, &opts).unwrap();
    let conn = open_db(&db_path_for(&root, &opts), None).unwrap();
    let record = get_record(&conn, "padded.csv").unwrap().unwrap();
    assert_eq!(record.row_count, 3);
    assert_eq!(record.column_names, vec!["id", "v"]);
    drop(conn);
    let _ = std::fs::remove_dir_all(&root);
}

// --- dry run ---

#[test]
fn test_dry_run_does_not_create_db() {
    let root = fixture_root("dry_run");
    write_object(&root, "uploads", "a.csv", b"h1,h2\n1,2\n");
    let opts = Opts {
        write_to_db: false,
        ..Opts::default()
    };
    let batch = vec![FileNotification::new("uploads", "a.csv")];

    let records = dry_run_batch(&root, &batch, &opts).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].column_names, vec!["h1", "h2"]);
    assert!(!db_path_for(&root, &opts).exists());
    let _ = std::fs::remove_dir_all(&root);
}
