// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tiergate.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tiergate_core::{ModelConfig, Tier};

/// Top-level Tiergate configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiergateConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Routing behavior.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Per-tier backend configuration.
    #[serde(default)]
    pub tiers: TiersConfig,

    /// Usage ledger and reporting settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Routing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Route every request to this tier, bypassing classification.
    /// A per-call override still takes precedence.
    #[serde(default)]
    pub force_tier: Option<Tier>,
}

/// Backend configuration for each tier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiersConfig {
    #[serde(default = "default_simple_tier")]
    pub simple: ModelConfig,

    #[serde(default = "default_medium_tier")]
    pub medium: ModelConfig,

    #[serde(default = "default_complex_tier")]
    pub complex: ModelConfig,
}

impl TiersConfig {
    /// Configuration for the given tier.
    pub fn get(&self, tier: Tier) -> &ModelConfig {
        match tier {
            Tier::Simple => &self.simple,
            Tier::Medium => &self.medium,
            Tier::Complex => &self.complex,
        }
    }

    /// Mutable configuration for the given tier.
    pub fn get_mut(&mut self, tier: Tier) -> &mut ModelConfig {
        match tier {
            Tier::Simple => &mut self.simple,
            Tier::Medium => &mut self.medium,
            Tier::Complex => &mut self.complex,
        }
    }
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            simple: default_simple_tier(),
            medium: default_medium_tier(),
            complex: default_complex_tier(),
        }
    }
}

fn default_simple_tier() -> ModelConfig {
    Tier::Simple.default_config()
}

fn default_medium_tier() -> ModelConfig {
    Tier::Medium.default_config()
}

fn default_complex_tier() -> ModelConfig {
    Tier::Complex.default_config()
}

/// Which rates the "everything on the premium tier" baseline is priced at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// The tier with the highest combined input+output rate right now.
    #[default]
    MostExpensive,
    /// Always the COMPLEX tier's current rates.
    ComplexTier,
}

/// Usage ledger and reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Rates used for the savings baseline.
    #[serde(default)]
    pub baseline: BaselinePolicy,

    /// Number of most recent attempts listed at the end of the text report.
    #[serde(default = "default_recent_in_report")]
    pub recent_in_report: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            baseline: BaselinePolicy::default(),
            recent_in_report: default_recent_in_report(),
        }
    }
}

fn default_recent_in_report() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tier_defaults() {
        let config = TiergateConfig::default();
        for tier in Tier::ALL {
            assert_eq!(config.tiers.get(tier), &tier.default_config());
        }
        assert!(config.routing.force_tier.is_none());
        assert_eq!(config.ledger.baseline, BaselinePolicy::MostExpensive);
        assert_eq!(config.ledger.recent_in_report, 5);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn force_tier_parses_lowercase() {
        let config: TiergateConfig = toml::from_str(
            r#"
[routing]
force_tier = "medium"
"#,
        )
        .unwrap();
        assert_eq!(config.routing.force_tier, Some(Tier::Medium));
    }

    #[test]
    fn baseline_policy_parses_snake_case() {
        let config: TiergateConfig = toml::from_str(
            r#"
[ledger]
baseline = "complex_tier"
"#,
        )
        .unwrap();
        assert_eq!(config.ledger.baseline, BaselinePolicy::ComplexTier);
    }

    #[test]
    fn get_mut_edits_the_right_tier() {
        let mut tiers = TiersConfig::default();
        tiers.get_mut(Tier::Medium).backend_id = "local-llm".to_string();
        assert_eq!(tiers.medium.backend_id, "local-llm");
        assert_ne!(tiers.simple.backend_id, "local-llm");
    }
}
