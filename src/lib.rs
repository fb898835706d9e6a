//! tabmeta: structural metadata for CSV objects landing in an object store

pub mod engine;
pub mod ingest;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;

use crate::pipeline::{Orchestrator, PipelineContext, SystemClock};
use crate::store::{MetadataStore, ObjectStore};

/// Result alias used by public tabmeta API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run `batch` through admission → fetch → decode → parse → put with the
/// default policy and the system clock.
///
/// Files that are unsuitable (wrong extension, too large, undecodable, empty) are logged and
/// counted as skipped. A fetch or put failure is returned at once and the rest of the batch is
/// left unprocessed; re-delivering the whole batch is safe because `put` overwrites by key.
///
/// For a custom policy or clock, build a [`PipelineContext`] and use [`Orchestrator`] directly.
pub fn process_batch(
    objects: &dyn ObjectStore,
    records: &dyn MetadataStore,
    batch: &[FileNotification],
) -> Result<BatchSummary> {
    debug!(
        "{}: processing batch of {}",
        env!("CARGO_PKG_NAME"),
        batch.len()
    );
    let clock = SystemClock;
    Orchestrator::new(PipelineContext::new(objects, records, &clock)).process(batch)
}
