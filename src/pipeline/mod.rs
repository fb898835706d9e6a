//! Pipeline components: admission, context, record assembly, orchestration, event decoding.

pub mod admission;
pub mod context;
pub mod error_handler;
pub mod event;
pub mod metadata;
pub mod orchestrator;

pub use admission::{AdmissionPolicy, Decision};
pub use context::PipelineContext;
pub use error_handler::{FileOutcome, SkipReason, log_outcome};
pub use event::notifications_from_json;
pub use metadata::{Clock, FixedClock, SystemClock, build_record, format_timestamp};
pub use orchestrator::Orchestrator;
