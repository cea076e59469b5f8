//! Telemetry records as seen by enrichers
//!
//! A [`UsageRecord`] is one exported span-like object: a typed attribute map
//! plus whatever other fields the producer attached, which are carried
//! through untouched.

use crate::attributes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute value
///
/// Mirrors the scalar shapes of an OpenTelemetry attribute. Serialized
/// untagged, so JSON `1000` is an `Int` and `1000.0` a `Double`. Arrays,
/// nulls, and anything else land in `Other` and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Other(serde_json::Value),
}

impl AttributeValue {
    /// String contents, if this is a non-empty string
    pub fn as_non_empty_str(&self) -> Option<&str> {
        match self {
            Self::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a token count
    ///
    /// Accepts non-negative integers and integral doubles. Anything else is
    /// treated as an absent count rather than an error.
    pub fn as_token_count(&self) -> Option<u64> {
        match *self {
            Self::Int(n) => u64::try_from(n).ok(),
            Self::Double(d) if d.is_finite() && d >= 0.0 && d.fract() == 0.0 => Some(d as u64),
            _ => None,
        }
    }

    /// Numeric value as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(n) => Some(n as f64),
            Self::Double(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One telemetry record flowing through the enrichment chain
///
/// Enrichers may insert or overwrite attributes; nothing in this crate
/// removes or renames existing ones. Fields other than `attributes` are kept
/// verbatim in `other`.
///
/// # Examples
/// ```
/// use llmcost_core::record::UsageRecord;
///
/// let mut record = UsageRecord::new();
/// record.set_attribute("gen_ai.system", "openai");
/// record.set_attribute("gen_ai.usage.input_tokens", 1000i64);
///
/// assert_eq!(record.provider(), Some("openai"));
/// assert_eq!(record.input_tokens(), Some(1000));
/// assert_eq!(record.model(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Typed attribute map
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeValue>,
    /// Every other field of the source object, preserved as-is
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl UsageRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute by key
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Insert or overwrite an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Provider id (`gen_ai.system`)
    pub fn provider(&self) -> Option<&str> {
        self.attribute(attributes::PROVIDER)
            .and_then(AttributeValue::as_non_empty_str)
    }

    /// Model identifier, preferring the response model over the request model
    pub fn model(&self) -> Option<&str> {
        self.attribute(attributes::RESPONSE_MODEL)
            .and_then(AttributeValue::as_non_empty_str)
            .or_else(|| {
                self.attribute(attributes::REQUEST_MODEL)
                    .and_then(AttributeValue::as_non_empty_str)
            })
    }

    pub fn input_tokens(&self) -> Option<u64> {
        self.attribute(attributes::INPUT_TOKENS)
            .and_then(AttributeValue::as_token_count)
    }

    pub fn output_tokens(&self) -> Option<u64> {
        self.attribute(attributes::OUTPUT_TOKENS)
            .and_then(AttributeValue::as_token_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_model_preferred() {
        let mut record = UsageRecord::new();
        record.set_attribute(attributes::REQUEST_MODEL, "gpt-4o");
        record.set_attribute(attributes::RESPONSE_MODEL, "gpt-4o-2024-08-06");
        assert_eq!(record.model(), Some("gpt-4o-2024-08-06"));
    }

    #[test]
    fn test_request_model_fallback() {
        let mut record = UsageRecord::new();
        record.set_attribute(attributes::REQUEST_MODEL, "gpt-4o");
        assert_eq!(record.model(), Some("gpt-4o"));

        // An empty response model does not shadow the request model
        record.set_attribute(attributes::RESPONSE_MODEL, "");
        assert_eq!(record.model(), Some("gpt-4o"));
    }

    #[test]
    fn test_token_count_shapes() {
        assert_eq!(AttributeValue::Int(42).as_token_count(), Some(42));
        assert_eq!(AttributeValue::Double(42.0).as_token_count(), Some(42));
        assert_eq!(AttributeValue::Double(42.5).as_token_count(), None);
        assert_eq!(AttributeValue::Int(-1).as_token_count(), None);
        assert_eq!(AttributeValue::from("42").as_token_count(), None);
    }

    #[test]
    fn test_deserialize_keeps_other_fields() {
        let json = r#"{"name":"chat gpt-4o","trace_id":"abc","attributes":{"gen_ai.system":"openai","gen_ai.usage.input_tokens":10,"sampled":true,"temperature":0.5}}"#;
        let record: UsageRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.provider(), Some("openai"));
        assert_eq!(record.input_tokens(), Some(10));
        assert_eq!(record.attribute("sampled"), Some(&AttributeValue::Bool(true)));
        assert_eq!(
            record.attribute("temperature"),
            Some(&AttributeValue::Double(0.5))
        );
        assert_eq!(record.other["name"], "chat gpt-4o");
        assert_eq!(record.other["trace_id"], "abc");
    }

    #[test]
    fn test_non_scalar_attributes_round_trip() {
        let json = r#"{"attributes":{"gen_ai.system":"openai","gen_ai.request.model":null,"gen_ai.response.model":"gpt-4o","gen_ai.response.finish_reasons":["stop"],"gen_ai.usage.input_tokens":10}}"#;
        let record: UsageRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.attribute("gen_ai.response.finish_reasons"),
            Some(&AttributeValue::Other(serde_json::json!(["stop"])))
        );
        assert_eq!(
            record.attribute(attributes::REQUEST_MODEL),
            Some(&AttributeValue::Other(serde_json::Value::Null))
        );
        assert_eq!(record.model(), Some("gpt-4o"));
        assert_eq!(record.input_tokens(), Some(10));
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn test_null_model_counts_as_absent() {
        let record: UsageRecord =
            serde_json::from_str(r#"{"attributes":{"gen_ai.response.model":null}}"#).unwrap();
        assert_eq!(record.model(), None);
        assert_eq!(
            AttributeValue::Other(serde_json::json!({"k": 1})).as_token_count(),
            None
        );
    }

    #[test]
    fn test_record_without_attributes() {
        let record: UsageRecord = serde_json::from_str(r#"{"name":"noop"}"#).unwrap();
        assert!(record.attributes.is_empty());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"name":"noop"}"#);
    }
}
