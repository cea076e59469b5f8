//! Loading price data
//!
//! Price data comes either from the table compiled into the binary or from an
//! operator-supplied file that replaces it. Two file shapes are understood:
//!
//! - the canonical provider-grouped, per-token shape accepted by
//!   [`PriceTable::build`];
//! - the flat custom shape, `model → { promptPrice, completionPrice }` in USD
//!   per 1K tokens, optionally wrapped in a `chat` section. Custom prices are
//!   converted to per-token and stored under the catch-all
//!   [`ANY_PROVIDER`] namespace.

use crate::price_table::PriceTable;
use llmcost_core::config::PricingConfig;
use llmcost_core::error::{LlmcostError, Result};
use llmcost_core::types::ANY_PROVIDER;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Embedded default pricing data
const EMBEDDED_PRICING: &str = include_str!("../embedded/default_pricing.json");

const CHAT_SECTION: &str = "chat";
const EMBEDDINGS_SECTION: &str = "embeddings";
const PROMPT_PRICE: &str = "promptPrice";
const COMPLETION_PRICE: &str = "completionPrice";

/// Custom files quote prices per this many tokens
const CUSTOM_PRICE_UNIT: f64 = 1000.0;

/// Where price data is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingSource {
    /// The table compiled into the binary
    Bundled,
    /// An operator-supplied file, replacing the bundled table
    File(PathBuf),
}

impl PricingSource {
    /// Source selected by a configuration
    pub fn from_config(config: &PricingConfig) -> Self {
        match &config.pricing_file {
            Some(path) => Self::File(path.clone()),
            None => Self::Bundled,
        }
    }
}

/// Loads price data and builds price tables
#[derive(Debug, Clone)]
pub struct PricingLoader {
    source: PricingSource,
}

impl PricingLoader {
    /// Create a loader for a source
    pub fn new(source: PricingSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &PricingSource {
        &self.source
    }

    /// Load raw price data in the canonical per-token shape
    ///
    /// # Errors
    ///
    /// - [`LlmcostError::PricingFileNotFound`] if a custom file is missing
    /// - [`LlmcostError::Json`] if the file is not valid JSON
    /// - [`LlmcostError::MalformedPriceData`] if a custom-format file is
    ///   missing prices
    pub async fn load(&self) -> Result<Value> {
        match &self.source {
            PricingSource::Bundled => {
                debug!("Using embedded pricing data");
                Self::bundled()
            }
            PricingSource::File(path) => Self::load_file(path).await,
        }
    }

    /// Load and build the price table
    pub async fn load_table(&self) -> Result<PriceTable> {
        let raw = self.load().await?;
        let table = PriceTable::build(&raw)?;
        info!(
            "Loaded {} models ({} aliases) across {} providers",
            table.len(),
            table.alias_count(),
            table.providers().count()
        );
        Ok(table)
    }

    /// Parse the embedded default data
    pub fn bundled() -> Result<Value> {
        Ok(serde_json::from_str(EMBEDDED_PRICING)?)
    }

    async fn load_file(path: &Path) -> Result<Value> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LlmcostError::PricingFileNotFound(path.to_path_buf())
            } else {
                LlmcostError::Io(e)
            }
        })?;

        let value: Value = serde_json::from_str(&contents)?;
        if is_custom_format(&value) {
            info!("Loading custom per-1K pricing from {}", path.display());
            normalize_custom(&value)
        } else {
            info!("Loading pricing from {}", path.display());
            Ok(value)
        }
    }
}

/// Whether a document uses the flat per-1K custom shape
///
/// True when it has a `chat` section, or when any top-level entry carries a
/// `promptPrice` or `completionPrice` field.
pub fn is_custom_format(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    if object.get(CHAT_SECTION).is_some_and(Value::is_object) {
        return true;
    }
    object.values().any(|entry| {
        entry
            .as_object()
            .is_some_and(|e| e.contains_key(PROMPT_PRICE) || e.contains_key(COMPLETION_PRICE))
    })
}

/// Convert the flat per-1K custom shape to the canonical per-token shape
///
/// All models land under the [`ANY_PROVIDER`] namespace. An `embeddings`
/// section is accepted and ignored.
///
/// # Examples
/// ```
/// use llmcost_pricing::loader::normalize_custom;
/// use serde_json::json;
///
/// let custom = json!({"my-model": {"promptPrice": 1.0, "completionPrice": 2.0}});
/// let canonical = normalize_custom(&custom).unwrap();
/// assert_eq!(canonical["*"]["my-model"]["input_price"], 0.001);
/// assert_eq!(canonical["*"]["my-model"]["output_price"], 0.002);
/// ```
pub fn normalize_custom(raw: &Value) -> Result<Value> {
    let root = raw
        .as_object()
        .ok_or_else(|| LlmcostError::malformed("$", "expected an object of models"))?;

    let models = match root.get(CHAT_SECTION) {
        Some(chat) => {
            if root.contains_key(EMBEDDINGS_SECTION) {
                debug!("Ignoring embeddings section of custom pricing");
            }
            chat.as_object().ok_or_else(|| {
                LlmcostError::malformed(CHAT_SECTION, "expected an object of models")
            })?
        }
        None => root,
    };

    let mut normalized = Map::with_capacity(models.len());
    for (model, prices) in models {
        let input = custom_price(model, prices, PROMPT_PRICE)?;
        let output = custom_price(model, prices, COMPLETION_PRICE)?;
        normalized.insert(
            model.clone(),
            json!({
                "input_price": input / CUSTOM_PRICE_UNIT,
                "output_price": output / CUSTOM_PRICE_UNIT,
            }),
        );
    }

    let mut canonical = Map::with_capacity(1);
    canonical.insert(ANY_PROVIDER.to_string(), Value::Object(normalized));
    Ok(Value::Object(canonical))
}

fn custom_price(model: &str, prices: &Value, field: &str) -> Result<f64> {
    let prices = prices
        .as_object()
        .ok_or_else(|| LlmcostError::malformed(model, "expected an object with prices"))?;
    match prices.get(field) {
        Some(value) => value.as_f64().ok_or_else(|| {
            LlmcostError::malformed(format!("{model}.{field}"), "price must be a number")
        }),
        None => Err(LlmcostError::malformed(model, format!("missing {field}"))),
    }
}
