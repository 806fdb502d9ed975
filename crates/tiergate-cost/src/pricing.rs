// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tier pricing and cost calculation.
//!
//! Rates are USD per million tokens and come from the tier registry, so a
//! caller override is reflected in the very next cost calculation.

use serde::Serialize;
use tiergate_core::{ModelConfig, TokenUsage};

/// Pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPricing {
    /// Cost per million input tokens.
    pub input_per_mtok: f64,
    /// Cost per million output tokens.
    pub output_per_mtok: f64,
}

impl From<&ModelConfig> for ModelPricing {
    fn from(config: &ModelConfig) -> Self {
        Self {
            input_per_mtok: config.cost_per_m_input,
            output_per_mtok: config.cost_per_m_output,
        }
    }
}

/// Calculate cost in USD for a given token usage and pricing.
///
/// Formula: `(input / 1e6) * input_rate + (output / 1e6) * output_rate`.
pub fn calculate_cost(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    cost_for_tokens(usage.input_tokens, usage.output_tokens, pricing)
}

/// Same as [`calculate_cost`] for raw token counts.
pub fn cost_for_tokens(input_tokens: u64, output_tokens: u64, pricing: &ModelPricing) -> f64 {
    let input = (input_tokens as f64 / 1_000_000.0) * pricing.input_per_mtok;
    let output = (output_tokens as f64 / 1_000_000.0) * pricing.output_per_mtok;
    input + output
}
