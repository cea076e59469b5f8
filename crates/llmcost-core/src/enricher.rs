//! Enricher trait and the ordered chain that runs enrichers
//!
//! An [`Enricher`] is one post-processing step applied to every record before
//! export. Steps are composed through [`EnricherChain`], which only ever
//! appends; no step can replace or remove another.

use crate::record::UsageRecord;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// A post-processing step over telemetry records
///
/// Implementations must be infallible from the caller's point of view: any
/// problem with a record's data leaves the record as it was.
pub trait Enricher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Add fields to `record`
    fn enrich(&self, record: &mut UsageRecord);
}

impl<E: Enricher + ?Sized> Enricher for Arc<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn enrich(&self, record: &mut UsageRecord) {
        (**self).enrich(record)
    }
}

/// Ordered list of enrichers applied to each record
///
/// # Examples
/// ```
/// use llmcost_core::enricher::{Enricher, EnricherChain};
/// use llmcost_core::record::UsageRecord;
///
/// struct Tag;
///
/// impl Enricher for Tag {
///     fn name(&self) -> &str {
///         "tag"
///     }
///
///     fn enrich(&self, record: &mut UsageRecord) {
///         record.set_attribute("tagged", true);
///     }
/// }
///
/// let mut chain = EnricherChain::new();
/// chain.push(Tag);
///
/// let mut record = UsageRecord::new();
/// chain.apply(&mut record);
/// assert!(record.attribute("tagged").is_some());
/// ```
#[derive(Default, Clone)]
pub struct EnricherChain {
    steps: Vec<Arc<dyn Enricher>>,
}

impl EnricherChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step after all existing ones
    pub fn push<E: Enricher + 'static>(&mut self, enricher: E) -> &mut Self {
        debug!("Registering enricher '{}'", enricher.name());
        self.steps.push(Arc::new(enricher));
        self
    }

    /// Append a step that is already shared elsewhere
    pub fn push_shared(&mut self, enricher: Arc<dyn Enricher>) -> &mut Self {
        debug!("Registering enricher '{}'", enricher.name());
        self.steps.push(enricher);
        self
    }

    /// Names of the registered steps, in execution order
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step on one record
    pub fn apply(&self, record: &mut UsageRecord) {
        for step in &self.steps {
            step.enrich(record);
        }
    }

    /// Run every step on a batch of independent records in parallel
    pub fn apply_batch(&self, records: &mut [UsageRecord]) {
        records.par_iter_mut().for_each(|record| self.apply(record));
    }
}

impl Enricher for EnricherChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn enrich(&self, record: &mut UsageRecord) {
        self.apply(record);
    }
}

impl std::fmt::Debug for EnricherChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnricherChain")
            .field("steps", &self.names())
            .finish()
    }
}
