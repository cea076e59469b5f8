//! In-memory price table
//!
//! A [`PriceTable`] holds provider → canonical model → [`PriceEntry`] data
//! together with a precomputed alias index. It is built once from a raw JSON
//! value and never mutated afterwards, so it can be shared across threads
//! behind an `Arc` without locking.
//!
//! The expected shape is:
//!
//! ```json
//! {
//!   "openai": {
//!     "gpt-4o": {
//!       "input_price": 0.0000025,
//!       "output_price": 0.00001,
//!       "aliases": ["gpt-4o-2024-08-06"]
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use llmcost_core::error::{LlmcostError, Result};
use llmcost_core::types::PriceEntry;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

const INPUT_PRICE: &str = "input_price";
const OUTPUT_PRICE: &str = "output_price";
const ALIASES: &str = "aliases";

/// Immutable provider/model price table with alias index
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    /// provider → canonical model → entry, in source order
    models: IndexMap<String, IndexMap<String, PriceEntry>>,
    /// provider → alias → canonical model
    aliases: HashMap<String, HashMap<String, String>>,
}

impl PriceTable {
    /// Build a table from provider-grouped, per-token price data
    ///
    /// # Errors
    ///
    /// Returns [`LlmcostError::MalformedPriceData`] if the document does not
    /// have the expected structure. Providers without models and models
    /// without aliases are accepted.
    pub fn build(raw: &Value) -> Result<Self> {
        let providers = raw
            .as_object()
            .ok_or_else(|| LlmcostError::malformed("$", "expected an object of providers"))?;

        let mut table = Self::default();

        for (provider, models) in providers {
            let models = models.as_object().ok_or_else(|| {
                LlmcostError::malformed(provider.as_str(), "expected an object of models")
            })?;

            let mut provider_models = IndexMap::with_capacity(models.len());
            let mut provider_aliases: HashMap<String, String> = HashMap::new();

            for (model, spec) in models {
                let path = format!("{provider}.{model}");
                let (entry, aliases) = parse_model(&path, spec)?;
                provider_models.insert(model.clone(), entry);

                for alias in aliases {
                    let previous = provider_aliases
                        .insert(alias.clone(), model.clone())
                        .filter(|previous| previous != model);
                    if let Some(previous) = previous {
                        warn!(
                            "Alias '{}' for provider '{}' is declared by both '{}' and '{}'; using '{}'",
                            alias, provider, previous, model, model
                        );
                    }
                }
            }

            debug!(
                "Loaded {} models and {} aliases for provider '{}'",
                provider_models.len(),
                provider_aliases.len(),
                provider
            );

            table.models.insert(provider.clone(), provider_models);
            if !provider_aliases.is_empty() {
                table.aliases.insert(provider.clone(), provider_aliases);
            }
        }

        Ok(table)
    }

    /// Canonical lookup
    pub fn lookup_exact(&self, provider: &str, model: &str) -> Option<&PriceEntry> {
        self.models.get(provider)?.get(model)
    }

    /// Canonical lookup returning the table's own copy of the model name
    pub fn get_entry(&self, provider: &str, model: &str) -> Option<(&str, &PriceEntry)> {
        self.models
            .get(provider)?
            .get_key_value(model)
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Alias lookup through the precomputed index
    pub fn lookup_alias(&self, provider: &str, alias: &str) -> Option<&PriceEntry> {
        let canonical = self.canonical_for_alias(provider, alias)?;
        self.lookup_exact(provider, canonical)
    }

    /// Canonical model name an alias points to
    pub fn canonical_for_alias(&self, provider: &str, alias: &str) -> Option<&str> {
        self.aliases
            .get(provider)?
            .get(alias)
            .map(String::as_str)
    }

    /// Canonical model names of a provider, in source order
    pub fn all_model_names<'a>(
        &'a self,
        provider: &str,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.models
            .get(provider)
            .into_iter()
            .flat_map(|models| models.keys().map(String::as_str))
    }

    /// Canonical entries of a provider, in source order
    pub fn entries<'a>(
        &'a self,
        provider: &str,
    ) -> impl Iterator<Item = (&'a str, &'a PriceEntry)> + use<'a> {
        self.models
            .get(provider)
            .into_iter()
            .flat_map(|models| models.iter().map(|(name, entry)| (name.as_str(), entry)))
    }

    /// Provider ids, in source order
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn contains_provider(&self, provider: &str) -> bool {
        self.models.contains_key(provider)
    }

    /// Total number of canonical models across all providers
    pub fn len(&self) -> usize {
        self.models.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of aliases across all providers
    pub fn alias_count(&self) -> usize {
        self.aliases.values().map(HashMap::len).sum()
    }
}

fn parse_model(path: &str, spec: &Value) -> Result<(PriceEntry, Vec<String>)> {
    let spec = spec
        .as_object()
        .ok_or_else(|| LlmcostError::malformed(path, "expected an object with prices"))?;

    let input_price = parse_price(path, spec.get(INPUT_PRICE), INPUT_PRICE)?;
    let output_price = parse_price(path, spec.get(OUTPUT_PRICE), OUTPUT_PRICE)?;
    let entry = PriceEntry::new(input_price, output_price).map_err(|e| match e {
        LlmcostError::MalformedPriceData { path: field, reason } => {
            LlmcostError::malformed(format!("{path}.{field}"), reason)
        }
        other => other,
    })?;

    let aliases = match spec.get(ALIASES) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut aliases = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some("") => debug!("Ignoring empty alias at {}", path),
                    Some(alias) => aliases.push(alias.to_string()),
                    None => {
                        return Err(LlmcostError::malformed(
                            format!("{path}.{ALIASES}"),
                            "aliases must be strings",
                        ));
                    }
                }
            }
            aliases
        }
        Some(_) => {
            return Err(LlmcostError::malformed(
                format!("{path}.{ALIASES}"),
                "expected an array of strings",
            ));
        }
    };

    Ok((entry, aliases))
}

fn parse_price(path: &str, value: Option<&Value>, field: &str) -> Result<f64> {
    match value {
        Some(value) => value.as_f64().ok_or_else(|| {
            LlmcostError::malformed(format!("{path}.{field}"), "price must be a number")
        }),
        None => Err(LlmcostError::malformed(path, format!("missing {field}"))),
    }
}
