//! Model matching
//!
//! Resolves a (provider, model) pair to a price entry by trying, in order:
//!
//! 1. exact canonical name
//! 2. alias
//! 3. canonical name after stripping a trailing `-YYYY-MM-DD` / `-YYYYMMDD`
//!    date (exact lookup only)
//! 4. longest canonical name that is a literal prefix of the model
//!
//! The first tier that hits wins. If the provider's own namespace has no
//! match, the same tiers run against the catch-all [`ANY_PROVIDER`]
//! namespace that holds provider-less custom prices.
//!
//! Within one namespace the prefix tier cannot tie: canonical names are
//! unique, and two different strings of the same length can't both be
//! prefixes of one model name. Equal-length candidates would therefore be
//! the same name; the implementation keeps the first in source order.

use crate::price_table::PriceTable;
use llmcost_core::types::{ANY_PROVIDER, PriceEntry};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Alias,
    DateSuffixStripped,
    Prefix,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Alias => write!(f, "alias"),
            Self::DateSuffixStripped => write!(f, "date-suffix-stripped"),
            Self::Prefix => write!(f, "prefix"),
        }
    }
}

/// Namespace a match was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// The record's own provider
    Provider,
    /// The catch-all namespace for provider-less prices
    CatchAll,
}

/// A resolved price with the reason it was chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceMatch<'a> {
    pub canonical_name: &'a str,
    pub entry: &'a PriceEntry,
    pub tier: MatchTier,
    pub namespace: Namespace,
}

/// Resolve the price entry for a model
///
/// Returns `None` when nothing matches; an unknown model is an expected
/// outcome, not an error.
pub fn resolve<'a>(table: &'a PriceTable, provider: &str, model: &str) -> Option<PriceMatch<'a>> {
    if model.is_empty() {
        return None;
    }

    if let Some(found) = resolve_in(table, provider, model, Namespace::Provider) {
        return Some(found);
    }

    if provider != ANY_PROVIDER && table.contains_provider(ANY_PROVIDER) {
        if let Some(found) = resolve_in(table, ANY_PROVIDER, model, Namespace::CatchAll) {
            return Some(found);
        }
    }

    trace!("No price for provider '{}' model '{}'", provider, model);
    None
}

fn resolve_in<'a>(
    table: &'a PriceTable,
    provider: &str,
    model: &str,
    namespace: Namespace,
) -> Option<PriceMatch<'a>> {
    let hit = |(canonical_name, entry), tier| PriceMatch {
        canonical_name,
        entry,
        tier,
        namespace,
    };

    if let Some(found) = table.get_entry(provider, model) {
        return Some(hit(found, MatchTier::Exact));
    }

    if let Some(found) = table
        .canonical_for_alias(provider, model)
        .and_then(|canonical| table.get_entry(provider, canonical))
    {
        return Some(hit(found, MatchTier::Alias));
    }

    let stripped = strip_date_suffix(model);
    if stripped != model {
        if let Some(found) = table.get_entry(provider, stripped) {
            return Some(hit(found, MatchTier::DateSuffixStripped));
        }
    }

    longest_prefix(table, provider, model).map(|found| hit(found, MatchTier::Prefix))
}

/// Longest canonical name that `model` starts with
///
/// Empty canonical names never participate. Ties keep the earliest entry.
fn longest_prefix<'a>(
    table: &'a PriceTable,
    provider: &str,
    model: &str,
) -> Option<(&'a str, &'a PriceEntry)> {
    let mut best: Option<(&'a str, &'a PriceEntry)> = None;

    for (name, entry) in table.entries(provider) {
        if name.is_empty() || !model.starts_with(name) {
            continue;
        }
        if best.is_none_or(|(current, _)| name.len() > current.len()) {
            best = Some((name, entry));
        }
    }

    best
}

/// Remove a trailing `-YYYY-MM-DD` and then a trailing `-YYYYMMDD`
///
/// Only the digit layout is checked, not whether the date exists. Returns
/// the input unchanged when neither suffix is present.
///
/// # Examples
/// ```
/// use llmcost_pricing::matcher::strip_date_suffix;
///
/// assert_eq!(strip_date_suffix("gpt-4o-2024-08-06"), "gpt-4o");
/// assert_eq!(strip_date_suffix("claude-3-5-sonnet-20241022"), "claude-3-5-sonnet");
/// assert_eq!(strip_date_suffix("gpt-4o"), "gpt-4o");
/// ```
pub fn strip_date_suffix(model: &str) -> &str {
    let model = strip_suffix_shaped(model, "-dddd-dd-dd");
    strip_suffix_shaped(model, "-dddddddd")
}

/// Strip a suffix whose bytes follow `shape`: `d` is an ASCII digit, any
/// other byte must match literally
fn strip_suffix_shaped<'a>(s: &'a str, shape: &str) -> &'a str {
    let shape = shape.as_bytes();
    let bytes = s.as_bytes();
    if bytes.len() < shape.len() {
        return s;
    }

    let split = bytes.len() - shape.len();
    let matches = bytes[split..]
        .iter()
        .zip(shape)
        .all(|(&b, &expected)| match expected {
            b'd' => b.is_ascii_digit(),
            _ => b == expected,
        });

    // The suffix is pure ASCII, so `split` is on a char boundary
    if matches { &s[..split] } else { s }
}
