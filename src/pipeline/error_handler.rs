//! Per-file outcome classification and the log line for each skip or failure.

use std::fmt;

use crate::MetadataRecord;

/// Why a file produced no record. Every variant is recoverable: the batch continues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Key does not carry the tabular extension.
    UnsupportedType,
    /// Declared or fetched size at or above the ceiling.
    TooLarge { size_bytes: u64 },
    /// Bytes are malformed under the detected encoding.
    DecodeFailed { encoding: &'static str },
    /// The CSV reader rejected the text.
    ParseFailed { message: String },
    /// No header line.
    EmptyContent,
}

impl SkipReason {
    /// Short stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::UnsupportedType => "unsupported-type",
            SkipReason::TooLarge { .. } => "too-large",
            SkipReason::DecodeFailed { .. } => "decode-failed",
            SkipReason::ParseFailed { .. } => "parse-failed",
            SkipReason::EmptyContent => "empty-content",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge { size_bytes } => {
                write!(f, "{} ({} bytes)", self.code(), size_bytes)
            }
            SkipReason::DecodeFailed { encoding } => write!(f, "{} ({})", self.code(), encoding),
            SkipReason::ParseFailed { message } => write!(f, "{} ({})", self.code(), message),
            _ => f.write_str(self.code()),
        }
    }
}

/// Result of running one notification through the pipeline. Only `Fatal` stops the batch.
#[derive(Debug)]
pub enum FileOutcome {
    Accepted(MetadataRecord),
    Skipped(SkipReason),
    Fatal(anyhow::Error),
}

/// Emit the single log line for a finished file.
pub fn log_outcome(object_key: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Accepted(record) => log::info!(
            "Metadata stored for {}: {} rows, {} columns",
            object_key,
            record.row_count,
            record.column_count
        ),
        FileOutcome::Skipped(reason) => log::info!("Skipping {}: {}", object_key, reason),
        FileOutcome::Fatal(e) => log::error!("Error processing {}: {:#}", object_key, e),
    }
}
