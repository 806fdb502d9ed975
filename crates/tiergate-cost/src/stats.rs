// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate statistics derived from the usage ledger.
//!
//! Statistics are recomputed from the full record sequence on every call and
//! never stored, so two calls with no append in between are identical.

use std::collections::BTreeMap;

use serde::Serialize;
use tiergate_core::Tier;

use crate::ledger::UsageRecord;
use crate::pricing::{ModelPricing, cost_for_tokens};

/// Per-tier slice of the statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierBreakdown {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub cost_usd: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Totals, savings against the all-premium baseline, and per-tier breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of recorded attempts.
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_cost_usd: f64,
    /// What the successful token volume would have cost at the baseline rates.
    pub baseline_cost_usd: f64,
    /// `baseline - actual`.
    pub savings_usd: f64,
    /// `savings / baseline * 100`, or 0 when the baseline is 0.
    pub savings_percent: f64,
    /// `baseline / actual`, or 0 when the actual cost is 0.
    pub cost_multiplier: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    /// Rates the baseline was priced at.
    pub baseline_pricing: ModelPricing,
    /// Every tier, including those with no attempts.
    pub by_tier: BTreeMap<Tier, TierBreakdown>,
}

impl Statistics {
    /// Derive statistics from `records`, pricing the baseline at `baseline`.
    pub fn from_records(records: &[UsageRecord], baseline: &ModelPricing) -> Self {
        let mut by_tier: BTreeMap<Tier, TierBreakdown> = Tier::ALL
            .iter()
            .map(|tier| (*tier, TierBreakdown::default()))
            .collect();

        let mut successful = 0u64;
        let mut total_cost = 0.0;
        let mut baseline_cost = 0.0;
        let mut total_input = 0u64;
        let mut total_output = 0u64;

        for record in records {
            let slot = by_tier.entry(record.tier).or_default();
            slot.attempts += 1;
            slot.cost_usd += record.cost_usd;
            slot.input_tokens += record.input_tokens;
            slot.output_tokens += record.output_tokens;

            total_cost += record.cost_usd;
            total_input += record.input_tokens;
            total_output += record.output_tokens;

            if record.success {
                slot.successes += 1;
                successful += 1;
                baseline_cost +=
                    cost_for_tokens(record.input_tokens, record.output_tokens, baseline);
            } else {
                slot.failures += 1;
            }
        }

        let total = records.len() as u64;
        let savings = baseline_cost - total_cost;
        let savings_percent = if baseline_cost != 0.0 {
            savings / baseline_cost * 100.0
        } else {
            0.0
        };
        let cost_multiplier = if total_cost != 0.0 {
            baseline_cost / total_cost
        } else {
            0.0
        };

        Self {
            total_requests: total,
            successful_requests: successful,
            failed_requests: total - successful,
            total_cost_usd: total_cost,
            baseline_cost_usd: baseline_cost,
            savings_usd: savings,
            savings_percent,
            cost_multiplier,
            total_input_tokens: total_input,
            total_output_tokens: total_output,
            baseline_pricing: *baseline,
            by_tier,
        }
    }
}
