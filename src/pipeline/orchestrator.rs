use anyhow::{Context, Result};
use log::debug;

use crate::engine::encoding::{decode_text, detect_encoding};
use crate::engine::tabular::{Parsed, parse_table};
use crate::engine::ContentError;
use crate::{BatchSummary, FileNotification};

use super::admission::Decision;
use super::context::PipelineContext;
use super::error_handler::{FileOutcome, SkipReason, log_outcome};
use super::metadata::build_record;

/// Runs batches of notifications sequentially against one [`PipelineContext`].
pub struct Orchestrator<'a> {
    ctx: PipelineContext<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(ctx: PipelineContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &PipelineContext<'a> {
        &self.ctx
    }

    /// Process every notification in order. Skips are logged and counted; the first fatal
    /// (fetch/put) error is returned immediately and the rest of the batch is not attempted.
    pub fn process(&self, batch: &[FileNotification]) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        for notification in batch {
            let outcome = self.process_file(notification);
            log_outcome(&notification.object_key, &outcome);
            match outcome {
                FileOutcome::Accepted(_) => summary.persisted += 1,
                FileOutcome::Skipped(_) => summary.skipped += 1,
                FileOutcome::Fatal(e) => return Err(e),
            }
        }
        debug!(
            "Batch done: {} persisted, {} skipped",
            summary.persisted, summary.skipped
        );
        Ok(summary)
    }

    /// Received → Admitted → Parsed → Persisted, or dropped at the first failing stage.
    /// The size ceiling is checked on the declared size, the stored size, then the fetched size.
    pub fn process_file(&self, notification: &FileNotification) -> FileOutcome {
        let key = notification.object_key.as_str();

        if let Decision::Reject(reason) = self.ctx.policy.admit(key, notification.declared_size) {
            return FileOutcome::Skipped(reason);
        }

        let container = notification.container_id.as_str();

        // No read when the store already knows the object is too large.
        let stored_size = match self
            .ctx
            .objects
            .head(container, key)
            .with_context(|| format!("stat {}/{}", container, key))
        {
            Ok(size) => size,
            Err(e) => return FileOutcome::Fatal(e),
        };
        if let Some(size) = stored_size
            && let Decision::Reject(reason) = self.ctx.policy.check_size(size)
        {
            return FileOutcome::Skipped(reason);
        }

        let raw = match self
            .ctx
            .objects
            .fetch(container, key)
            .with_context(|| format!("fetch {}/{}", container, key))
        {
            Ok(raw) => raw,
            Err(e) => return FileOutcome::Fatal(e),
        };

        // The declared size may be stale or missing.
        if let Decision::Reject(reason) = self.ctx.policy.check_size(raw.size_bytes) {
            return FileOutcome::Skipped(reason);
        }

        let encoding = detect_encoding(&raw.bytes);
        debug!("{}: detected encoding {}", key, encoding.name());
        let text = match decode_text(&raw.bytes, encoding) {
            Ok(text) => text,
            Err(e) => return FileOutcome::Skipped(content_skip(e)),
        };

        let (header, data_row_count) = match parse_table(&text) {
            Ok(Parsed::Table {
                header,
                data_row_count,
            }) => (header, data_row_count),
            Ok(Parsed::Empty) => return FileOutcome::Skipped(SkipReason::EmptyContent),
            Err(e) => return FileOutcome::Skipped(content_skip(e)),
        };
        drop(text);

        let record = build_record(
            key,
            raw.size_bytes,
            header,
            data_row_count,
            self.ctx.clock.now(),
        );
        drop(raw);

        match self
            .ctx
            .records
            .put(&record)
            .with_context(|| format!("put metadata for {}", key))
        {
            Ok(()) => FileOutcome::Accepted(record),
            Err(e) => FileOutcome::Fatal(e),
        }
    }
}

fn content_skip(e: ContentError) -> SkipReason {
    match e {
        ContentError::Decode { encoding } => SkipReason::DecodeFailed { encoding },
        ContentError::Parse(e) => SkipReason::ParseFailed {
            message: e.to_string(),
        },
    }
}
