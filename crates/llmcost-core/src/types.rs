//! Core domain types for llmcost
//!
//! Price entries and cost results. Prices are USD per single token; the
//! loader is responsible for converting any per-1K source into this unit.

use crate::error::{LlmcostError, Result};
use serde::Serialize;
use std::fmt;

/// Provider id under which provider-less (custom file) prices are stored.
///
/// Lookups fall back to this namespace only after the record's own provider
/// namespace produced no match.
pub const ANY_PROVIDER: &str = "*";

/// Per-token price for one canonical model
///
/// Both prices are finite and non-negative. The fields are private so a
/// `PriceEntry` can only be obtained through [`PriceEntry::new`].
///
/// # Examples
/// ```
/// use llmcost_core::types::PriceEntry;
///
/// let entry = PriceEntry::new(0.0000025, 0.00001).unwrap();
/// assert_eq!(entry.input_price(), 0.0000025);
/// assert!(PriceEntry::new(-1.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceEntry {
    input_price: f64,
    output_price: f64,
}

impl PriceEntry {
    /// Create a new entry, rejecting negative or non-finite prices
    pub fn new(input_price: f64, output_price: f64) -> Result<Self> {
        for (field, value) in [("input_price", input_price), ("output_price", output_price)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LlmcostError::malformed(
                    field,
                    format!("price must be a finite non-negative number, got {value}"),
                ));
            }
        }
        Ok(Self {
            input_price,
            output_price,
        })
    }

    /// USD per input token
    pub fn input_price(&self) -> f64 {
        self.input_price
    }

    /// USD per output token
    pub fn output_price(&self) -> f64 {
        self.output_price
    }
}

/// Computed cost for one call
///
/// `total_cost` is always `input_cost + output_cost`; there is no way to
/// construct a `CostResult` with an independently supplied total.
///
/// # Examples
/// ```
/// use llmcost_core::types::{CostResult, PriceEntry};
///
/// let entry = PriceEntry::new(0.000001, 0.000002).unwrap();
/// let cost = CostResult::from_entry(&entry, Some(1000), None);
/// assert_eq!(cost.output_cost(), 0.0);
/// assert_eq!(cost.total_cost(), cost.input_cost() + cost.output_cost());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostResult {
    input_cost: f64,
    output_cost: f64,
    total_cost: f64,
}

impl CostResult {
    /// Build a result from the two component costs
    pub fn new(input_cost: f64, output_cost: f64) -> Self {
        Self {
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
        }
    }

    /// Price a call; absent token counts count as zero
    pub fn from_entry(
        entry: &PriceEntry,
        input_tokens: Option<u64>,
        output_tokens: Option<u64>,
    ) -> Self {
        let input_cost = input_tokens.unwrap_or(0) as f64 * entry.input_price();
        let output_cost = output_tokens.unwrap_or(0) as f64 * entry.output_price();
        Self::new(input_cost, output_cost)
    }

    pub fn input_cost(&self) -> f64 {
        self.input_cost
    }

    pub fn output_cost(&self) -> f64 {
        self.output_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

impl fmt::Display for CostResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:.6} (input ${:.6}, output ${:.6})",
            self.total_cost, self.input_cost, self.output_cost
        )
    }
}
