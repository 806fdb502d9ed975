// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tier backend configuration.
//!
//! The table is published through an [`ArcSwap`], so readers take a cheap
//! snapshot and never block behind a writer. An in-flight `route` call may or
//! may not observe an override made while it runs.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tiergate_config::model::TiersConfig;
use tiergate_core::{ModelConfig, ModelConfigPatch, Tier, TiergateError};
use tracing::info;

/// Mutable mapping from tier to backend configuration.
#[derive(Debug)]
pub struct TierRegistry {
    tiers: ArcSwap<TiersConfig>,
}

impl TierRegistry {
    /// Registry populated with the built-in defaults.
    pub fn new() -> Self {
        Self::from_config(&TiersConfig::default())
    }

    /// Registry populated from the `[tiers]` configuration section.
    pub fn from_config(tiers: &TiersConfig) -> Self {
        Self {
            tiers: ArcSwap::from_pointee(tiers.clone()),
        }
    }

    /// Current configuration of `tier`.
    pub fn get(&self, tier: Tier) -> ModelConfig {
        self.tiers.load().get(tier).clone()
    }

    /// Look up a tier by name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Result<ModelConfig, TiergateError> {
        let tier = Tier::parse(name)?;
        Ok(self.get(tier))
    }

    /// Consistent snapshot of all three tiers.
    pub fn snapshot(&self) -> Arc<TiersConfig> {
        self.tiers.load_full()
    }

    /// Merge `patch` over the current configuration of `tier` and return the result.
    ///
    /// Fields absent from the patch are left untouched. Costs are not
    /// validated; zero and negative rates are accepted.
    pub fn set_config(&self, tier: Tier, patch: ModelConfigPatch) -> ModelConfig {
        self.tiers.rcu(|current| {
            let mut next = TiersConfig::clone(current);
            patch.clone().apply_to(next.get_mut(tier));
            next
        });

        let updated = self.get(tier);
        info!(
            tier = %tier,
            backend_id = %updated.backend_id,
            cost_per_m_input = updated.cost_per_m_input,
            cost_per_m_output = updated.cost_per_m_output,
            max_retries = updated.max_retries,
            "tier configuration updated"
        );
        updated
    }

    /// Tier with the highest combined per-million rate. Ties go to the higher tier.
    pub fn most_expensive(&self) -> (Tier, ModelConfig) {
        let snapshot = self.tiers.load();
        let tier = Tier::ALL
            .into_iter()
            .max_by(|a, b| {
                snapshot
                    .get(*a)
                    .combined_rate()
                    .total_cmp(&snapshot.get(*b).combined_rate())
            })
            .unwrap_or(Tier::Complex);
        (tier, snapshot.get(tier).clone())
    }
}

impl Default for TierRegistry {
    fn default() -> Self {
        Self::new()
    }
}
