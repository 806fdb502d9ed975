// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered dispatch with escalating fallback and cost accounting.
//!
//! Start tier priority: per-call override > global `force_tier` > classifier.
//! Each attempt invokes the tier's backend exactly once. A failure is
//! recorded, then the request escalates SIMPLE -> MEDIUM -> COMPLEX until a
//! backend succeeds, the chain ends, or [`MAX_ATTEMPTS`] is reached. The same
//! tier is never tried twice within one call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tiergate_config::TiergateConfig;
use tiergate_config::model::BaselinePolicy;
use tiergate_core::{
    BackendAdapter, BackendOptions, BackendRequest, ModelConfig, ModelConfigPatch, Tier,
    TiergateError, TokenUsage,
};
use tiergate_cost::{
    AttemptRecord, ExportRow, ModelPricing, Statistics, UsageLedger, UsageRecord,
    calculate_cost, render_report,
};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::classifier::{Analysis, ComplexityClassifier};
use crate::registry::TierRegistry;

/// Hard ceiling on backend attempts per `route` call.
pub const MAX_ATTEMPTS: u32 = 3;

/// Per-call routing options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptions {
    /// Start at this tier instead of the classifier's recommendation.
    pub force_tier: Option<Tier>,
}

impl RouteOptions {
    pub fn forced(tier: Tier) -> Self {
        Self {
            force_tier: Some(tier),
        }
    }
}

/// Outcome of a successful `route` call.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    /// Correlates this result with its ledger records.
    pub request_id: String,
    pub success: bool,
    /// Tier that finally served the request.
    pub tier: Tier,
    pub backend_id: String,
    pub display_name: String,
    pub content: String,
    pub usage: TokenUsage,
    pub cost_usd: f64,
    /// Wall-clock time across all attempts.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Classifier output; `None` when a forced tier skipped classification.
    pub analysis: Option<Analysis>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Routes requests to tier backends and keeps the usage ledger.
pub struct Dispatcher {
    classifier: ComplexityClassifier,
    registry: Arc<TierRegistry>,
    ledger: Arc<UsageLedger>,
    backend: Arc<dyn BackendAdapter>,
    force_tier: Option<Tier>,
    baseline: BaselinePolicy,
    recent_in_report: usize,
}

impl Dispatcher {
    /// Dispatcher with default tiers, a fresh ledger and no global override.
    pub fn new(backend: Arc<dyn BackendAdapter>) -> Self {
        Self::from_config(&TiergateConfig::default(), backend)
    }

    /// Dispatcher configured from a loaded [`TiergateConfig`].
    pub fn from_config(config: &TiergateConfig, backend: Arc<dyn BackendAdapter>) -> Self {
        Self {
            classifier: ComplexityClassifier::new(),
            registry: Arc::new(TierRegistry::from_config(&config.tiers)),
            ledger: Arc::new(UsageLedger::new()),
            backend,
            force_tier: config.routing.force_tier,
            baseline: config.ledger.baseline,
            recent_in_report: config.ledger.recent_in_report,
        }
    }

    /// Share `registry` with other dispatchers.
    pub fn with_registry(mut self, registry: Arc<TierRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Record into `ledger` instead of a private one.
    pub fn with_ledger(mut self, ledger: Arc<UsageLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn registry(&self) -> &Arc<TierRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }

    /// Classify `text` without dispatching it.
    pub fn classify(&self, text: &str) -> Analysis {
        self.classifier.analyze(text)
    }

    /// Route `text` to a tier backend, escalating on failure.
    ///
    /// Returns [`TiergateError::AllTiersExhausted`] carrying the last backend
    /// error when no tier in the chain could serve the request.
    pub async fn route(
        &self,
        text: &str,
        options: RouteOptions,
    ) -> Result<DispatchResult, TiergateError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("route", request_id = %request_id);
        self.dispatch(text, options, request_id)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        text: &str,
        options: RouteOptions,
        request_id: String,
    ) -> Result<DispatchResult, TiergateError> {
        let started = Instant::now();
        let forced = options.force_tier.or(self.force_tier);
        let (mut tier, analysis) = match forced {
            Some(tier) => {
                debug!(start_tier = %tier, "forced tier, classification skipped");
                (tier, None)
            }
            None => {
                let analysis = self.classifier.analyze(text);
                debug!(
                    recommended = %analysis.tier,
                    score = analysis.metrics.complexity_score,
                    confidence = analysis.confidence,
                    "request classified"
                );
                (analysis.tier, Some(analysis))
            }
        };

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let config = self.registry.get(tier);
            let request = BackendRequest {
                backend_id: config.backend_id.clone(),
                text: text.to_string(),
                options: BackendOptions {
                    tier,
                    max_retries: config.max_retries,
                },
            };

            let attempt_started = Instant::now();
            match self.backend.invoke(request).await {
                Ok(response) => {
                    let cost = calculate_cost(&response.usage, &ModelPricing::from(&config));
                    self.ledger.append(AttemptRecord::success(
                        &request_id,
                        tier,
                        &config.backend_id,
                        &response.usage,
                        cost,
                        attempt_started.elapsed(),
                        attempts,
                    ));

                    info!(
                        tier = %tier,
                        backend_id = %config.backend_id,
                        attempt = attempts,
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        cost_usd = cost,
                        "request served"
                    );

                    return Ok(DispatchResult {
                        request_id,
                        success: true,
                        tier,
                        backend_id: config.backend_id,
                        display_name: config.display_name,
                        content: response.content,
                        usage: response.usage,
                        cost_usd: cost,
                        duration: started.elapsed(),
                        analysis,
                        attempts,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    self.ledger.append(AttemptRecord::failure(
                        &request_id,
                        tier,
                        &config.backend_id,
                        attempt_started.elapsed(),
                        attempts,
                        message.clone(),
                    ));

                    match tier.next() {
                        Some(next) if attempts < MAX_ATTEMPTS => {
                            warn!(
                                tier = %tier,
                                backend_id = %config.backend_id,
                                attempt = attempts,
                                next_tier = %next,
                                error = %message,
                                "tier attempt failed, escalating"
                            );
                            tier = next;
                        }
                        _ => {
                            error!(
                                tier = %tier,
                                attempts,
                                error = %message,
                                "all tiers exhausted"
                            );
                            return Err(TiergateError::AllTiersExhausted {
                                attempts,
                                last_error: message,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Merge `patch` over the configuration of `tier`.
    pub fn set_tier_config(&self, tier: Tier, patch: ModelConfigPatch) -> ModelConfig {
        self.registry.set_config(tier, patch)
    }

    pub fn tier_config(&self, tier: Tier) -> ModelConfig {
        self.registry.get(tier)
    }

    /// Name-based lookup; unknown names are a configuration error.
    pub fn tier_config_by_name(&self, name: &str) -> Result<ModelConfig, TiergateError> {
        self.registry.get_by_name(name)
    }

    /// Record an attempt made outside `route`. Returns its sequence id.
    pub fn log_attempt(&self, attempt: AttemptRecord) -> u64 {
        self.ledger.append(attempt)
    }

    /// Rates the savings baseline is priced at, per the configured policy.
    pub fn baseline_pricing(&self) -> ModelPricing {
        match self.baseline {
            BaselinePolicy::MostExpensive => ModelPricing::from(&self.registry.most_expensive().1),
            BaselinePolicy::ComplexTier => ModelPricing::from(&self.registry.get(Tier::Complex)),
        }
    }

    pub fn statistics(&self) -> Statistics {
        self.ledger.stats(&self.baseline_pricing())
    }

    /// Plain-text report of the statistics and the most recent attempts.
    pub fn report(&self) -> String {
        let stats = self.statistics();
        let recent = self.ledger.recent(self.recent_in_report);
        render_report(&stats, &recent)
    }

    pub fn recent(&self, n: usize) -> Vec<UsageRecord> {
        self.ledger.recent(n)
    }

    /// Discard every ledger record.
    pub fn clear(&self) {
        self.ledger.clear();
    }

    pub fn export_records(&self) -> Vec<ExportRow> {
        self.ledger.export_records()
    }
}
