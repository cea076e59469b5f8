//! Pricing configuration
//!
//! Whether cost enrichment runs, and which price file to load, is decided
//! from the environment and may be overridden by command-line flags.

use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Enables or disables cost enrichment (`true` unless set to something else)
pub const ENV_PRICING_ENABLED: &str = "LLMCOST_PRICING_ENABLED";

/// Path to an operator-supplied price file that replaces the bundled table
pub const ENV_PRICING_FILE: &str = "LLMCOST_PRICING_FILE";

/// Configuration for the pricing subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Whether the cost enricher should be registered at all
    pub enabled: bool,
    /// Custom price file; `None` selects the bundled default table
    pub pricing_file: Option<PathBuf>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pricing_file: None,
        }
    }
}

impl PricingConfig {
    /// Read the configuration from environment variables
    pub fn from_env() -> Self {
        let enabled = env_flag(ENV_PRICING_ENABLED, true);
        let pricing_file = env::var_os(ENV_PRICING_FILE)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        debug!(
            "Pricing config from environment: enabled={}, file={:?}",
            enabled, pricing_file
        );

        Self {
            enabled,
            pricing_file,
        }
    }

    /// Environment configuration with command-line overrides applied
    ///
    /// An explicit `pricing_file` wins over `LLMCOST_PRICING_FILE`, and
    /// `disable` wins over `LLMCOST_PRICING_ENABLED`.
    pub fn from_cli(pricing_file: Option<PathBuf>, disable: bool) -> Self {
        let mut config = Self::from_env();
        if pricing_file.is_some() {
            config.pricing_file = pricing_file;
        }
        if disable {
            config.enabled = false;
        }
        config
    }

    /// Human-readable description of the price source
    pub fn source_name(&self) -> String {
        match &self.pricing_file {
            Some(path) => path.display().to_string(),
            None => "bundled default".to_string(),
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value.eq_ignore_ascii_case("true"),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::EnvScope;

    #[test]
    fn test_defaults_without_env() {
        let mut env = EnvScope::lock();
        env.remove(ENV_PRICING_ENABLED);
        env.remove(ENV_PRICING_FILE);

        assert_eq!(PricingConfig::from_env(), PricingConfig::default());
    }

    #[test]
    fn test_enabled_flag_parsing() {
        let mut env = EnvScope::lock();
        env.remove(ENV_PRICING_FILE);

        env.set(ENV_PRICING_ENABLED, "TRUE");
        assert!(PricingConfig::from_env().enabled);

        env.set(ENV_PRICING_ENABLED, "false");
        assert!(!PricingConfig::from_env().enabled);

        env.set(ENV_PRICING_ENABLED, "0");
        assert!(!PricingConfig::from_env().enabled);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut env = EnvScope::lock();
        env.set(ENV_PRICING_ENABLED, "true");
        env.set(ENV_PRICING_FILE, "/etc/llmcost/env.json");

        let config = PricingConfig::from_cli(Some(PathBuf::from("/tmp/cli.json")), true);
        assert!(!config.enabled);
        assert_eq!(config.pricing_file, Some(PathBuf::from("/tmp/cli.json")));

        let config = PricingConfig::from_cli(None, false);
        assert!(config.enabled);
        assert_eq!(
            config.pricing_file,
            Some(PathBuf::from("/etc/llmcost/env.json"))
        );
    }

    #[test]
    fn test_source_name() {
        assert_eq!(PricingConfig::default().source_name(), "bundled default");
    }
}
