//! Cost enrichment for telemetry records
//!
//! [`CostEnricher`] reads the provider, model and token counts from a
//! [`UsageRecord`], resolves a price through the matcher, and writes the
//! input, output and total cost attributes.
//!
//! # Examples
//!
//! ```
//! use llmcost_core::attributes;
//! use llmcost_core::enricher::Enricher;
//! use llmcost_core::record::UsageRecord;
//! use llmcost_pricing::{CostEnricher, PriceTable};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let table = PriceTable::build(&json!({
//!     "openai": {"gpt-4o": {"input_price": 0.0000025, "output_price": 0.00001}}
//! }))
//! .unwrap();
//! let enricher = CostEnricher::new(Arc::new(table));
//!
//! let mut record = UsageRecord::new();
//! record.set_attribute(attributes::PROVIDER, "openai");
//! record.set_attribute(attributes::RESPONSE_MODEL, "gpt-4o");
//! record.set_attribute(attributes::INPUT_TOKENS, 1000i64);
//! record.set_attribute(attributes::OUTPUT_TOKENS, 500i64);
//!
//! enricher.enrich(&mut record);
//! assert!(record.attribute(attributes::COST).is_some());
//! ```

use crate::matcher::{self, PriceMatch};
use crate::price_table::PriceTable;
use llmcost_core::attributes;
use llmcost_core::enricher::Enricher;
use llmcost_core::record::UsageRecord;
use llmcost_core::types::CostResult;
use std::sync::Arc;
use tracing::{debug, trace};

/// Enricher that attaches cost attributes to records
#[derive(Debug, Clone)]
pub struct CostEnricher {
    table: Arc<PriceTable>,
}

impl CostEnricher {
    /// Create an enricher over a shared price table
    pub fn new(table: Arc<PriceTable>) -> Self {
        Self { table }
    }

    /// The price table this enricher resolves against
    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    /// Resolve a price for a model without computing anything
    pub fn resolve(&self, provider: &str, model: &str) -> Option<PriceMatch<'_>> {
        matcher::resolve(&self.table, provider, model)
    }

    /// Price a call directly
    ///
    /// Returns `None` when the model cannot be resolved. Missing token counts
    /// are priced as zero.
    pub fn compute(
        &self,
        provider: &str,
        model: &str,
        input_tokens: Option<u64>,
        output_tokens: Option<u64>,
    ) -> Option<(PriceMatch<'_>, CostResult)> {
        let found = self.resolve(provider, model)?;
        let cost = CostResult::from_entry(found.entry, input_tokens, output_tokens);
        Some((found, cost))
    }
}

impl Enricher for CostEnricher {
    fn name(&self) -> &str {
        "cost"
    }

    fn enrich(&self, record: &mut UsageRecord) {
        let Some(provider) = record.provider() else {
            trace!("Skipping cost enrichment: no provider");
            return;
        };
        let Some(model) = record.model() else {
            trace!("Skipping cost enrichment: no model");
            return;
        };

        let input_tokens = record.input_tokens();
        let output_tokens = record.output_tokens();
        if input_tokens.is_none() && output_tokens.is_none() {
            trace!("Skipping cost enrichment for '{}': no token counts", model);
            return;
        }

        let Some((found, cost)) = self.compute(provider, model, input_tokens, output_tokens)
        else {
            return;
        };

        debug!(
            "Priced '{}/{}' via {} match on '{}': {}",
            provider, model, found.tier, found.canonical_name, cost
        );

        record.set_attribute(attributes::INPUT_COST, cost.input_cost());
        record.set_attribute(attributes::OUTPUT_COST, cost.output_cost());
        record.set_attribute(attributes::COST, cost.total_cost());
    }
}
