// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Tiergate configuration system.

use std::io::Write;

use tiergate_config::diagnostic::{ConfigError, suggest_key};
use tiergate_config::model::{BaselinePolicy, TiergateConfig};
use tiergate_config::{
    load_and_validate_path, load_and_validate_str, load_config, load_config_from_str,
};
use tiergate_core::Tier;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_tiergate_config() {
    let toml = r#"
[log]
level = "debug"

[routing]
force_tier = "MEDIUM"

[tiers.simple]
backend_id = "grok-4-fast"
display_name = "Grok 4 Fast"
cost_per_m_input = 1.27
cost_per_m_output = 1.27
max_retries = 1

[tiers.complex]
backend_id = "claude-opus-4-20250514"
display_name = "Opus"
cost_per_m_input = 15.0
cost_per_m_output = 75.0
max_retries = 3

[ledger]
baseline = "complex_tier"
recent_in_report = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.routing.force_tier, Some(Tier::Medium));
    assert_eq!(config.tiers.simple.backend_id, "grok-4-fast");
    assert_eq!(config.tiers.simple.display_name, "Grok 4 Fast");
    assert!((config.tiers.simple.cost_per_m_output - 1.27).abs() < f64::EPSILON);
    assert_eq!(config.tiers.simple.max_retries, 1);
    assert_eq!(config.tiers.medium, Tier::Medium.default_config());
    assert_eq!(config.ledger.baseline, BaselinePolicy::ComplexTier);
    assert_eq!(config.ledger.recent_in_report, 10);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.log.level, "info");
    assert!(config.routing.force_tier.is_none());
    for tier in Tier::ALL {
        assert_eq!(config.tiers.get(tier), &tier.default_config());
    }
    assert_eq!(config.ledger.baseline, BaselinePolicy::MostExpensive);
}

/// Unknown field in a tier section is rejected.
#[test]
fn unknown_field_in_tier_produces_error() {
    let toml = r#"
[tiers.medium]
cost_per_m_inptu = 2.0
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("cost_per_m_inptu"),
        "error should mention the unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key produces a diagnostic with a suggestion and the valid keys.
#[test]
fn diagnostic_error_includes_unknown_key_and_suggestion() {
    let toml = r#"
[log]
levle = "debug"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "levle" && suggestion.as_deref() == Some("level") && valid_keys.contains("level")
        })
    });
    assert!(found, "expected UnknownKey for `levle`, got: {errors:?}");
}

/// A tier name that is not one of the three tiers is reported as an invalid value.
#[test]
fn unknown_force_tier_is_rejected() {
    let toml = r#"
[routing]
force_tier = "ULTRA"
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown tier should fail");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::InvalidValue { detail, .. } if detail.contains("ULTRA")
        ) || matches!(e, ConfigError::Other(msg) if msg.contains("ULTRA"))),
        "expected an error mentioning ULTRA, got: {errors:?}"
    );
}

/// String where a number is expected produces a type error.
#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[tiers.simple]
cost_per_m_input = "cheap"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected InvalidType, got: {errors:?}"
    );
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn validation_catches_empty_backend_id() {
    let toml = r#"
[tiers.complex]
backend_id = ""
"#;

    let errors = load_and_validate_str(toml).expect_err("empty backend id should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("tiers.complex.backend_id"))
    }));
}

/// ConfigError implements miette::Diagnostic with code and help.
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "levle".to_string(),
        suggestion: Some("level".to_string()),
        valid_keys: "level".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `level`"), "got: {help}");
}

#[test]
fn suggest_key_matches_routing_field() {
    assert_eq!(
        suggest_key("force_teir", &["force_tier"]),
        Some("force_tier".to_string())
    );
}

/// Explicit config file path is honored.
#[test]
fn load_and_validate_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[tiers.medium]
backend_id = "local-mixtral"
"#
    )
    .unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should validate");
    assert_eq!(config.tiers.medium.backend_id, "local-mixtral");
}

/// `TIERGATE_*` env vars and `./tiergate.toml` layer over defaults.
#[test]
fn env_and_local_file_layer_over_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "tiergate.toml",
            r#"
[log]
level = "warn"

[tiers.simple]
backend_id = "from-file"
"#,
        )?;
        jail.set_env("TIERGATE_ROUTING_FORCE_TIER", "complex");
        jail.set_env("TIERGATE_TIERS_SIMPLE_COST_PER_M_INPUT", "1.27");

        let config: TiergateConfig = load_config()?;
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.tiers.simple.backend_id, "from-file");
        assert!((config.tiers.simple.cost_per_m_input - 1.27).abs() < f64::EPSILON);
        assert_eq!(config.routing.force_tier, Some(Tier::Complex));
        Ok(())
    });
}
