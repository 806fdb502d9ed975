// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiergate config` command implementation.

use tiergate_config::TiergateConfig;
use tiergate_core::TiergateError;

/// Render the effective configuration as TOML.
pub fn render_config(config: &TiergateConfig) -> Result<String, TiergateError> {
    toml::to_string_pretty(config)
        .map_err(|e| TiergateError::Internal(format!("failed to serialize config: {e}")))
}

/// Run the `tiergate config` command.
pub fn run_config(config: &TiergateConfig) -> Result<(), TiergateError> {
    print!("{}", render_config(config)?);
    Ok(())
}
