//! Batch runs against a local object-store root: event loading, backfill scan, DB wiring.

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::db_ops::{
    SqliteMetadataStore, load_records, open_db, open_db_or_detect_encrypted,
};
use crate::engine::tools::{is_os_hidden_file, path_relative_to, path_to_object_key};
use crate::pipeline::{
    AdmissionPolicy, Orchestrator, PipelineContext, SystemClock, notifications_from_json,
};
use crate::store::{LocalObjectStore, MemoryMetadataStore};
use crate::utils::config::PackagePaths;
use crate::utils::get_passphrase;
use crate::{BatchSummary, FileNotification, MetadataRecord, Opts};

/// Read an event document from `path`, or stdin when `path` is None or `-`.
pub fn read_events(path: Option<&Path>) -> Result<Vec<FileNotification>> {
    let json = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("read events from {}", p.display()))?,
        _ => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read events from stdin")?;
            s
        }
    };
    notifications_from_json(&json)
}

/// One notification per regular file under `root/container`, sorted by key. Sizes come from
/// the filesystem, so oversized files are rejected before they are read.
pub fn scan_container(root: &Path, container: &str) -> Result<Vec<FileNotification>> {
    let base = root.join(container);
    if !base.is_dir() {
        anyhow::bail!("container directory not found: {}", base.display());
    }
    let db_name = PackagePaths::get().output_filename();
    let mut batch = Vec::new();
    for entry in WalkDir::new(&base).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", base.display()))?;
        if !entry.file_type().is_file() || is_os_hidden_file(entry.path()) {
            continue;
        }
        if entry.file_name().to_str().is_some_and(|n| n.starts_with(db_name)) {
            continue;
        }
        let Some(rel) = path_relative_to(entry.path(), &base) else {
            continue;
        };
        let size = entry.metadata().ok().map(|m| m.len());
        let mut notification = FileNotification::new(container, path_to_object_key(&rel));
        notification.declared_size = size;
        batch.push(notification);
    }
    debug!("Scanned {} objects in {}", batch.len(), base.display());
    Ok(batch)
}

/// Resolved DB path: explicit option, else the package DB filename in `root`.
pub fn db_path_for(root: &Path, opts: &Opts) -> PathBuf {
    opts.db_path
        .clone()
        .unwrap_or_else(|| root.join(PackagePaths::get().output_filename()))
}

/// Open the metadata DB. A new DB is keyed when `encrypt` is set; an existing one is probed
/// and the passphrase loaded only if it turns out to be encrypted.
fn open_metadata_db(db_path: &Path, root: &Path, encrypt: bool) -> Result<Connection> {
    if db_path.exists() {
        let (conn, pass) = open_db_or_detect_encrypted(db_path, root)?;
        if pass.is_some() {
            debug!("Opened encrypted metadata DB");
        }
        return Ok(conn);
    }
    let pass = if encrypt {
        Some(get_passphrase(root, db_path, true)?)
    } else {
        None
    };
    open_db(db_path, pass.as_deref())
}

/// Run `batch` against `root` and persist records to the metadata DB. Returns the counts, or
/// the first fatal error (remaining notifications are not processed).
pub fn ingest_batch(root: &Path, batch: &[FileNotification], opts: &Opts) -> Result<BatchSummary> {
    let db_path = db_path_for(root, opts);
    let conn = open_metadata_db(&db_path, root, opts.encrypt)
        .with_context(|| format!("open metadata DB {}", db_path.display()))?;
    let records = SqliteMetadataStore::new(conn);
    let objects = LocalObjectStore::new(root);
    let clock = SystemClock;

    let ctx = PipelineContext::new(&objects, &records, &clock)
        .with_policy(AdmissionPolicy::from(opts));
    let summary = Orchestrator::new(ctx).process(batch)?;
    records.checkpoint()?;

    info!(
        "Processed {} notifications: {} stored, {} skipped",
        summary.total(),
        summary.persisted,
        summary.skipped
    );
    if opts.list_records {
        print_records(&load_records(records.connection())?)?;
    }
    Ok(summary)
}

/// Run `batch` against `root` into an in-memory store and return the records that would be written.
pub fn dry_run_batch(
    root: &Path,
    batch: &[FileNotification],
    opts: &Opts,
) -> Result<Vec<MetadataRecord>> {
    let records = MemoryMetadataStore::new();
    let objects = LocalObjectStore::new(root);
    let clock = SystemClock;

    let ctx = PipelineContext::new(&objects, &records, &clock)
        .with_policy(AdmissionPolicy::from(opts));
    let summary = Orchestrator::new(ctx).process(batch)?;
    info!(
        "Dry run: {} records would be stored, {} skipped",
        summary.persisted, summary.skipped
    );
    Ok(records.records())
}

/// Print records as JSON lines on stdout.
pub fn print_records(records: &[MetadataRecord]) -> Result<()> {
    for record in records {
        println!(
            "{}",
            serde_json::to_string(record).context("serialize record")?
        );
    }
    Ok(())
}
