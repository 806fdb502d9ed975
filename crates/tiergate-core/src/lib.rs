// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Tiergate.
//!
//! This crate provides the error type, the tier and model-configuration
//! types, and the backend adapter trait used throughout the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TiergateError;
pub use traits::BackendAdapter;
pub use types::{
    BackendOptions, BackendRequest, BackendResponse, ModelConfig, ModelConfigPatch, Tier,
    TokenUsage, estimate_tokens,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_escalation_order() {
        assert_eq!(Tier::Simple.next(), Some(Tier::Medium));
        assert_eq!(Tier::Medium.next(), Some(Tier::Complex));
        assert_eq!(Tier::Complex.next(), None);
        assert!(Tier::Simple < Tier::Medium && Tier::Medium < Tier::Complex);
    }

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(Tier::Simple.to_string(), "SIMPLE");
        assert_eq!(Tier::Complex.to_string(), "COMPLEX");
        assert_eq!(Tier::parse("medium").unwrap(), Tier::Medium);
        assert_eq!(Tier::parse(" Complex ").unwrap(), Tier::Complex);
    }

    #[test]
    fn unknown_tier_is_a_configuration_error() {
        let err = Tier::parse("ULTRA").unwrap_err();
        assert!(matches!(err, TiergateError::UnknownTier { ref name } if name == "ULTRA"));
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn tier_serde_accepts_both_cases() {
        let json = serde_json::to_string(&Tier::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
        let lower: Tier = serde_json::from_str("\"complex\"").unwrap();
        assert_eq!(lower, Tier::Complex);
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut config = Tier::Simple.default_config();
        let before = config.clone();
        ModelConfigPatch {
            cost_per_m_input: Some(1.27),
            ..Default::default()
        }
        .apply_to(&mut config);

        assert!((config.cost_per_m_input - 1.27).abs() < f64::EPSILON);
        assert_eq!(config.backend_id, before.backend_id);
        assert_eq!(config.display_name, before.display_name);
        assert_eq!(config.cost_per_m_output, before.cost_per_m_output);
        assert_eq!(config.max_retries, before.max_retries);
    }

    #[test]
    fn patch_accepts_negative_and_zero_costs() {
        let mut config = Tier::Complex.default_config();
        ModelConfigPatch {
            cost_per_m_input: Some(0.0),
            cost_per_m_output: Some(-1.0),
            ..Default::default()
        }
        .apply_to(&mut config);
        assert_eq!(config.cost_per_m_input, 0.0);
        assert_eq!(config.cost_per_m_output, -1.0);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ModelConfigPatch::default().is_empty());
        let patch = ModelConfigPatch {
            max_retries: Some(0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("What's 2+2?"), 3);
    }

    #[test]
    fn token_usage_total() {
        let usage = TokenUsage::new(120, 60);
        assert_eq!(usage.total_tokens, 180);
    }

    #[test]
    fn default_configs_ascend_in_cost() {
        let rates: Vec<f64> = Tier::ALL
            .iter()
            .map(|t| t.default_config().combined_rate())
            .collect();
        assert!(rates[0] < rates[1] && rates[1] < rates[2]);
    }
}
