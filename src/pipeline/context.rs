//! Pipeline context: the collaborators and policy one batch runs against.

use crate::store::{MetadataStore, ObjectStore};

use super::admission::AdmissionPolicy;
use super::metadata::Clock;

/// Shared context for a batch. Built by the caller (CLI or embedding program) and handed to
/// [`Orchestrator::new`](super::Orchestrator::new); the pipeline holds no other state.
pub struct PipelineContext<'a> {
    pub objects: &'a dyn ObjectStore,
    pub records: &'a dyn MetadataStore,
    pub clock: &'a dyn Clock,
    pub policy: AdmissionPolicy,
}

impl<'a> PipelineContext<'a> {
    /// Context with the default admission policy.
    pub fn new(
        objects: &'a dyn ObjectStore,
        records: &'a dyn MetadataStore,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            objects,
            records,
            clock,
            policy: AdmissionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }
}
