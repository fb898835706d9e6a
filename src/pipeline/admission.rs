//! Admission gate: decides from key and size alone whether a file is worth fetching and parsing.

use crate::Opts;
use crate::engine::tools::has_extension;
use crate::utils::config::{MAX_OBJECT_BYTES, TABULAR_EXTENSION};

use super::error_handler::SkipReason;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject(SkipReason),
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub extension: String,
    /// Exclusive ceiling: `size >= max_bytes` is rejected.
    pub max_bytes: u64,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            extension: TABULAR_EXTENSION.to_string(),
            max_bytes: MAX_OBJECT_BYTES,
        }
    }
}

impl From<&Opts> for AdmissionPolicy {
    fn from(opts: &Opts) -> Self {
        Self {
            extension: opts.extension.clone(),
            max_bytes: opts.max_bytes,
        }
    }
}

impl AdmissionPolicy {
    /// Extension first, then size. An unknown size passes here and is checked again after fetch.
    pub fn admit(&self, object_key: &str, size_bytes: Option<u64>) -> Decision {
        if !has_extension(object_key, &self.extension) {
            return Decision::Reject(SkipReason::UnsupportedType);
        }
        match size_bytes {
            Some(size) => self.check_size(size),
            None => Decision::Accept,
        }
    }

    pub fn check_size(&self, size_bytes: u64) -> Decision {
        if size_bytes >= self.max_bytes {
            Decision::Reject(SkipReason::TooLarge { size_bytes })
        } else {
            Decision::Accept
        }
    }
}
