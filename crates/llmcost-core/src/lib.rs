//! Core types, traits, and utilities for llmcost
//!
//! This crate provides the error type, price and cost types, the telemetry
//! record model, the [`Enricher`](enricher::Enricher) capability, and the
//! environment configuration shared by the other llmcost crates.

pub mod attributes;
pub mod config;
pub mod enricher;
pub mod error;
pub mod record;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::PricingConfig;
pub use enricher::{Enricher, EnricherChain};
pub use error::{LlmcostError, Result};
pub use record::{AttributeValue, UsageRecord};
pub use types::{ANY_PROVIDER, CostResult, PriceEntry};
