// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the classifier, dispatcher, ledger and config.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TiergateError;

/// Cost/capability class a request is routed to.
///
/// Variants are declared cheapest first; the derived ordering is the
/// escalation order used by the fallback chain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Short lookups and small talk.
    #[serde(alias = "simple")]
    Simple,
    /// General questions, light code, moderate analysis.
    #[serde(alias = "medium")]
    Medium,
    /// Multi-step reasoning, design work, large inputs.
    #[serde(alias = "complex")]
    Complex,
}

impl Tier {
    /// All tiers in escalation order.
    pub const ALL: [Tier; 3] = [Tier::Simple, Tier::Medium, Tier::Complex];

    /// The tier a failed attempt escalates to, if any.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Simple => Some(Tier::Medium),
            Tier::Medium => Some(Tier::Complex),
            Tier::Complex => None,
        }
    }

    /// Parse a tier name, case-insensitively.
    pub fn parse(name: &str) -> Result<Tier, TiergateError> {
        Tier::from_str(name.trim()).map_err(|_| TiergateError::UnknownTier {
            name: name.to_string(),
        })
    }

    /// Default backend configuration for this tier.
    pub fn default_config(self) -> ModelConfig {
        match self {
            Tier::Simple => ModelConfig {
                backend_id: "claude-haiku-4-5-20250901".to_string(),
                display_name: "Claude Haiku 4.5".to_string(),
                cost_per_m_input: 0.80,
                cost_per_m_output: 4.0,
                max_retries: 2,
            },
            Tier::Medium => ModelConfig {
                backend_id: "claude-sonnet-4-20250514".to_string(),
                display_name: "Claude Sonnet 4".to_string(),
                cost_per_m_input: 3.0,
                cost_per_m_output: 15.0,
                max_retries: 2,
            },
            Tier::Complex => ModelConfig {
                backend_id: "claude-opus-4-20250514".to_string(),
                display_name: "Claude Opus 4".to_string(),
                cost_per_m_input: 15.0,
                cost_per_m_output: 75.0,
                max_retries: 3,
            },
        }
    }
}

/// Backend configuration owned by a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Identifier passed to the backend (e.g. a model name).
    pub backend_id: String,
    /// Human-readable name used in reports.
    pub display_name: String,
    /// USD per million input tokens.
    pub cost_per_m_input: f64,
    /// USD per million output tokens.
    pub cost_per_m_output: f64,
    /// Transport-level retry budget handed to the backend.
    pub max_retries: u32,
}

impl ModelConfig {
    /// Combined per-million rate, used to rank tiers by expense.
    pub fn combined_rate(&self) -> f64 {
        self.cost_per_m_input + self.cost_per_m_output
    }
}

/// Partial update for a [`ModelConfig`].
///
/// Each `Some` field replaces the corresponding field; `None` fields are
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfigPatch {
    #[serde(default)]
    pub backend_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub cost_per_m_input: Option<f64>,
    #[serde(default)]
    pub cost_per_m_output: Option<f64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl ModelConfigPatch {
    /// Merge the provided fields over `config`.
    pub fn apply_to(self, config: &mut ModelConfig) {
        if let Some(backend_id) = self.backend_id {
            config.backend_id = backend_id;
        }
        if let Some(display_name) = self.display_name {
            config.display_name = display_name;
        }
        if let Some(input) = self.cost_per_m_input {
            config.cost_per_m_input = input;
        }
        if let Some(output) = self.cost_per_m_output {
            config.cost_per_m_output = output;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.backend_id.is_none()
            && self.display_name.is_none()
            && self.cost_per_m_input.is_none()
            && self.cost_per_m_output.is_none()
            && self.max_retries.is_none()
    }
}

/// Token usage reported for one backend call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Estimate the token count of `text` at four characters per token.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Per-call options handed to the backend alongside the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOptions {
    /// Tier the call is being made for.
    pub tier: Tier,
    /// The tier's transport-level retry budget.
    pub max_retries: u32,
}

/// A single backend invocation.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub backend_id: String,
    pub text: String,
    pub options: BackendOptions,
}

/// A successful backend reply.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub content: String,
    pub usage: TokenUsage,
}
