//! Error types for llmcost
//!
//! This module defines the error types used throughout the llmcost crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Only load-time failures are represented here. A record that cannot be
//! priced is not an error; enrichment simply leaves it untouched.
//!
//! # Example
//!
//! ```
//! use llmcost_core::error::{LlmcostError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to LlmcostError
//!     let _file = std::fs::read_to_string("nonexistent.json")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for llmcost operations
#[derive(Error, Debug)]
pub enum LlmcostError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operator-supplied price file does not exist
    #[error("Pricing file not found: {}", .0.display())]
    PricingFileNotFound(PathBuf),

    /// Price data does not have the expected structure
    #[error("Malformed price data at {path}: {reason}")]
    MalformedPriceData {
        /// Location inside the document, e.g. `openai.gpt-4o.input_price`
        path: String,
        /// What was wrong with it
        reason: String,
    },
}

impl LlmcostError {
    /// Shorthand for building a [`LlmcostError::MalformedPriceData`]
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPriceData {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results in llmcost
pub type Result<T> = std::result::Result<T, LlmcostError>;
