//! CLI interface for llmcost
//!
//! This module defines the command-line interface using clap.
//!
//! # Example
//!
//! ```bash
//! # Attach cost attributes to exported spans
//! llmcost enrich --input spans.jsonl > priced.jsonl
//!
//! # Explain how a model name resolves
//! llmcost lookup anthropic claude-3-5-sonnet-20241022
//!
//! # Price a single call against a custom price file
//! llmcost --pricing-file prices.json cost openai my-model --input-tokens 1000
//! ```

use crate::pipeline::DEFAULT_BATCH_SIZE;
use clap::{Parser, Subcommand};
use llmcost_core::config::PricingConfig;
use std::path::PathBuf;

/// Attach per-call LLM cost attributes to telemetry records
#[derive(Parser, Debug, Clone)]
#[command(name = "llmcost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default shows only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Price file replacing the bundled table (overrides LLMCOST_PRICING_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub pricing_file: Option<PathBuf>,

    /// Disable cost enrichment (overrides LLMCOST_PRICING_ENABLED)
    #[arg(long, global = true)]
    pub no_pricing: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Pricing configuration from the environment and these flags
    pub fn pricing_config(&self) -> PricingConfig {
        PricingConfig::from_cli(self.pricing_file.clone(), self.no_pricing)
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read JSONL records, attach cost attributes, write JSONL to stdout
    Enrich {
        /// Input file (defaults to stdin)
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,

        /// Number of records enriched together
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_batch_size)]
        batch_size: usize,
    },

    /// Show which price a model name resolves to, and why
    Lookup {
        /// Provider id, e.g. "openai"
        provider: String,

        /// Model identifier as reported by the provider
        model: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the cost of a single call
    Cost {
        /// Provider id, e.g. "openai"
        provider: String,

        /// Model identifier as reported by the provider
        model: String,

        /// Input (prompt) token count
        #[arg(long)]
        input_tokens: Option<u64>,

        /// Output (completion) token count
        #[arg(long)]
        output_tokens: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the configured price table and summarize it
    Validate,
}

/// Parse a batch size, which must be at least 1
pub fn parse_batch_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid batch size: {s}")),
    }
}
