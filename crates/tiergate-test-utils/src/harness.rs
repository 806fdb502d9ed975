// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing tests.
//!
//! `TestHarness` assembles a dispatcher over a [`MockBackend`] with a fresh
//! ledger, an optional TOML configuration and a temp directory for exports.

use std::path::PathBuf;
use std::sync::Arc;

use tiergate_config::TiergateConfig;
use tiergate_config::model::BaselinePolicy;
use tiergate_core::{ModelConfigPatch, Tier, TiergateError};
use tiergate_cost::write_csv;
use tiergate_router::{DispatchResult, Dispatcher, RouteOptions};

use crate::mock_backend::MockBackend;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    failing_tiers: Vec<Tier>,
    config_toml: Option<String>,
    force_tier: Option<Tier>,
    baseline: Option<BaselinePolicy>,
    overrides: Vec<(Tier, ModelConfigPatch)>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            failing_tiers: Vec::new(),
            config_toml: None,
            force_tier: None,
            baseline: None,
            overrides: Vec::new(),
        }
    }

    /// Set mock backend responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Make the backend fail every call for `tier`.
    pub fn with_failing_tier(mut self, tier: Tier) -> Self {
        self.failing_tiers.push(tier);
        self
    }

    /// Load configuration from TOML (validated like a config file).
    pub fn with_config_toml(mut self, toml: &str) -> Self {
        self.config_toml = Some(toml.to_string());
        self
    }

    /// Set the global `[routing] force_tier`.
    pub fn with_force_tier(mut self, tier: Tier) -> Self {
        self.force_tier = Some(tier);
        self
    }

    pub fn with_baseline(mut self, baseline: BaselinePolicy) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Apply a tier override after the dispatcher is built.
    pub fn with_tier_config(mut self, tier: Tier, patch: ModelConfigPatch) -> Self {
        self.overrides.push((tier, patch));
        self
    }

    /// Build the test harness.
    pub fn build(self) -> Result<TestHarness, TiergateError> {
        let mut config = match &self.config_toml {
            Some(toml) => tiergate_config::load_and_validate_str(toml).map_err(|errors| {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                TiergateError::Config(messages.join("; "))
            })?,
            None => TiergateConfig::default(),
        };
        if let Some(tier) = self.force_tier {
            config.routing.force_tier = Some(tier);
        }
        if let Some(baseline) = self.baseline {
            config.ledger.baseline = baseline;
        }

        let temp_dir = tempfile::TempDir::new().map_err(|e| TiergateError::Export {
            source: Box::new(e),
        })?;

        let mock_backend = Arc::new(
            MockBackend::with_responses(self.responses).with_failing_tiers(&self.failing_tiers),
        );
        let dispatcher = Dispatcher::from_config(&config, mock_backend.clone());
        for (tier, patch) in self.overrides {
            dispatcher.set_tier_config(tier, patch);
        }

        Ok(TestHarness {
            mock_backend,
            dispatcher,
            config,
            temp_dir,
        })
    }
}

/// A complete routing environment over a mock backend.
pub struct TestHarness {
    /// The mock backend, for failure injection and call assertions.
    pub mock_backend: Arc<MockBackend>,
    /// Dispatcher under test.
    pub dispatcher: Dispatcher,
    /// Effective configuration.
    pub config: TiergateConfig,
    /// Temp directory for exports, removed on drop.
    temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Route `text` with no per-call override.
    pub async fn route(&self, text: &str) -> Result<DispatchResult, TiergateError> {
        self.dispatcher.route(text, RouteOptions::default()).await
    }

    /// Route `text` starting at `tier`.
    pub async fn route_forced(
        &self,
        text: &str,
        tier: Tier,
    ) -> Result<DispatchResult, TiergateError> {
        self.dispatcher.route(text, RouteOptions::forced(tier)).await
    }

    /// Export the ledger as CSV into the temp directory and return the path.
    pub fn export_csv(&self, file_name: &str) -> Result<PathBuf, TiergateError> {
        let path = self.temp_dir.path().join(file_name);
        let file = std::fs::File::create(&path).map_err(|e| TiergateError::Export {
            source: Box::new(e),
        })?;
        write_csv(&self.dispatcher.export_records(), file)?;
        Ok(path)
    }
}
