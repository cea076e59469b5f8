//! Price table, model matching, and cost enrichment for llmcost
//!
//! This crate loads model pricing (bundled or operator-supplied), resolves
//! model identifiers to prices, and attaches cost attributes to telemetry
//! records.

pub mod cost_enricher;
pub mod loader;
pub mod matcher;
pub mod price_table;

pub use cost_enricher::CostEnricher;
pub use loader::{PricingLoader, PricingSource};
pub use matcher::{MatchTier, PriceMatch};
pub use price_table::PriceTable;
