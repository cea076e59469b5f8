//! llmcost - Attach per-call LLM cost attributes to telemetry records
//!
//! This library provides functionality to:
//! - Load model pricing from a bundled table or an operator-supplied file
//! - Resolve versioned, aliased, or date-suffixed model names to prices
//! - Enrich telemetry records with input, output, and total cost attributes
//! - Stream JSONL records through an enrichment chain
//!
//! # Examples
//!
//! ```no_run
//! use llmcost::{
//!     config::PricingConfig,
//!     pipeline::{build_chain, enrich_stream},
//! };
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> llmcost::Result<()> {
//!     let chain = build_chain(&PricingConfig::from_env()).await;
//!     let stdin = BufReader::new(tokio::io::stdin());
//!     enrich_stream(&chain, stdin, tokio::io::stdout(), 512).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod pipeline;

// Re-export the workspace crates' modules under one roof
pub use llmcost_core::{attributes, config, enricher, error, record, types};
pub use llmcost_pricing::{cost_enricher, loader, matcher, price_table};

// Re-export commonly used types
pub use llmcost_core::{
    AttributeValue, CostResult, Enricher, EnricherChain, LlmcostError, PriceEntry, PricingConfig,
    Result, UsageRecord,
};
pub use llmcost_pricing::{
    CostEnricher, MatchTier, PriceMatch, PriceTable, PricingLoader, PricingSource,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
