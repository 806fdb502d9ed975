// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.
//! Tier costs are not range-checked: zero or negative rates are
//! a legitimate override. Only non-finite values are rejected.

use tiergate_core::Tier;

use crate::diagnostic::ConfigError;
use crate::model::TiergateConfig;

/// Upper bound on a tier's transport-level retry budget.
pub const MAX_TIER_RETRIES: u32 = 10;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors (does not fail fast).
pub fn validate_config(config: &TiergateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for tier in Tier::ALL {
        let key = tier.to_string().to_lowercase();
        let tier_config = config.tiers.get(tier);

        if tier_config.backend_id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("tiers.{key}.backend_id must not be empty"),
            });
        }

        if tier_config.display_name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("tiers.{key}.display_name must not be empty"),
            });
        }

        if !tier_config.cost_per_m_input.is_finite() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "tiers.{key}.cost_per_m_input must be a finite number, got {}",
                    tier_config.cost_per_m_input
                ),
            });
        }

        if !tier_config.cost_per_m_output.is_finite() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "tiers.{key}.cost_per_m_output must be a finite number, got {}",
                    tier_config.cost_per_m_output
                ),
            });
        }

        if tier_config.max_retries > MAX_TIER_RETRIES {
            errors.push(ConfigError::Validation {
                message: format!(
                    "tiers.{key}.max_retries must be at most {MAX_TIER_RETRIES}, got {}",
                    tier_config.max_retries
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = TiergateConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_backend_id_fails_validation() {
        let mut config = TiergateConfig::default();
        config.tiers.medium.backend_id = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "tiers.medium.backend_id"));
    }

    #[test]
    fn nan_cost_fails_validation() {
        let mut config = TiergateConfig::default();
        config.tiers.complex.cost_per_m_output = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "tiers.complex.cost_per_m_output"));
    }

    #[test]
    fn negative_and_zero_costs_are_allowed() {
        let mut config = TiergateConfig::default();
        config.tiers.simple.cost_per_m_input = 0.0;
        config.tiers.simple.cost_per_m_output = -2.5;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = TiergateConfig::default();
        config.log.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "log.level"));
    }

    #[test]
    fn excessive_retries_fail_validation() {
        let mut config = TiergateConfig::default();
        config.tiers.simple.max_retries = 50;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "tiers.simple.max_retries"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = TiergateConfig::default();
        config.log.level = "loud".to_string();
        config.tiers.simple.display_name = String::new();
        config.tiers.complex.backend_id = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
