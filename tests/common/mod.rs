//! Common test utilities and helpers for llmcost tests
//!
//! Record builders and a small fixed price table shared by the integration
//! tests.

use llmcost::{
    PriceTable, UsageRecord, attributes,
    record::AttributeValue,
};
use serde_json::json;

/// Price table used across tests; prices are per token
pub fn test_table() -> PriceTable {
    PriceTable::build(&json!({
        "openai": {
            "gpt-4o": {
                "input_price": 0.0000025,
                "output_price": 0.00001,
                "aliases": ["gpt-4o-2024-08-06"]
            },
            "gpt-4o-mini": {
                "input_price": 0.00000015,
                "output_price": 0.0000006
            }
        },
        "anthropic": {
            "claude-3-5-sonnet": {
                "input_price": 0.000003,
                "output_price": 0.000015
            }
        }
    }))
    .unwrap()
}

/// Builder for creating test UsageRecord instances
pub struct RecordBuilder {
    provider: Option<String>,
    response_model: Option<String>,
    request_model: Option<String>,
    input_tokens: Option<i64>,
    output_tokens: Option<i64>,
    extra: Vec<(String, AttributeValue)>,
}

impl RecordBuilder {
    /// Create a builder for an openai gpt-4o call with 1000/500 tokens
    pub fn new() -> Self {
        Self {
            provider: Some("openai".to_string()),
            response_model: Some("gpt-4o".to_string()),
            request_model: None,
            input_tokens: Some(1000),
            output_tokens: Some(500),
            extra: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: Option<&str>) -> Self {
        self.provider = provider.map(str::to_string);
        self
    }

    pub fn with_response_model(mut self, model: Option<&str>) -> Self {
        self.response_model = model.map(str::to_string);
        self
    }

    #[allow(dead_code)]
    pub fn with_request_model(mut self, model: Option<&str>) -> Self {
        self.request_model = model.map(str::to_string);
        self
    }

    pub fn with_tokens(mut self, input: Option<i64>, output: Option<i64>) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    #[allow(dead_code)]
    pub fn with_attribute(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.extra.push((key.to_string(), value.into()));
        self
    }

    pub fn build(self) -> UsageRecord {
        let mut record = UsageRecord::new();
        if let Some(provider) = self.provider {
            record.set_attribute(attributes::PROVIDER, provider);
        }
        if let Some(model) = self.response_model {
            record.set_attribute(attributes::RESPONSE_MODEL, model);
        }
        if let Some(model) = self.request_model {
            record.set_attribute(attributes::REQUEST_MODEL, model);
        }
        if let Some(tokens) = self.input_tokens {
            record.set_attribute(attributes::INPUT_TOKENS, tokens);
        }
        if let Some(tokens) = self.output_tokens {
            record.set_attribute(attributes::OUTPUT_TOKENS, tokens);
        }
        for (key, value) in self.extra {
            record.set_attribute(key, value);
        }
        record
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a numeric attribute, panicking if it is missing
#[allow(dead_code)]
pub fn cost_attr(record: &UsageRecord, key: &str) -> f64 {
    record
        .attribute(key)
        .and_then(AttributeValue::as_f64)
        .unwrap_or_else(|| panic!("missing attribute {key}"))
}

/// Whether any of the three cost attributes is present
#[allow(dead_code)]
pub fn has_cost_fields(record: &UsageRecord) -> bool {
    [attributes::COST, attributes::INPUT_COST, attributes::OUTPUT_COST]
        .iter()
        .any(|key| record.attribute(key).is_some())
}
