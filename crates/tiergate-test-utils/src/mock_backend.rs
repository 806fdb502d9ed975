// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend adapter for deterministic testing.
//!
//! `MockBackend` implements `BackendAdapter` with pre-configured responses
//! and failure injection, enabling fast fallback tests without real services.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tiergate_core::{
    BackendAdapter, BackendRequest, BackendResponse, Tier, TiergateError, TokenUsage,
    estimate_tokens,
};

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<String>,
    failing_tiers: HashSet<Tier>,
    fail_all: bool,
    usage: Option<TokenUsage>,
    calls: Vec<BackendRequest>,
}

/// A mock backend that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Token usage defaults to
/// `ceil(chars / 4)` input and half that output.
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    /// Create a new mock backend with an empty response queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Create a mock backend pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            state: Mutex::new(MockState {
                responses: VecDeque::from(responses),
                ..MockState::default()
            }),
        }
    }

    /// Make every call for `tiers` fail.
    pub fn with_failing_tiers(self, tiers: &[Tier]) -> Self {
        let mut state = self.state.into_inner();
        state.failing_tiers.extend(tiers.iter().copied());
        Self {
            state: Mutex::new(state),
        }
    }

    /// Report `usage` for every successful call instead of the estimate.
    pub fn with_usage(self, usage: TokenUsage) -> Self {
        let mut state = self.state.into_inner();
        state.usage = Some(usage);
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.state.lock().await.responses.push_back(text);
    }

    /// Start failing calls for `tier`.
    pub async fn fail_tier(&self, tier: Tier) {
        self.state.lock().await.failing_tiers.insert(tier);
    }

    /// Stop failing calls for `tier`.
    pub async fn recover_tier(&self, tier: Tier) {
        self.state.lock().await.failing_tiers.remove(&tier);
    }

    /// Fail (or stop failing) every call regardless of tier.
    pub async fn set_fail_all(&self, fail: bool) {
        self.state.lock().await.fail_all = fail;
    }

    /// Every request received so far, in order.
    pub async fn calls(&self) -> Vec<BackendRequest> {
        self.state.lock().await.calls.clone()
    }

    /// Tiers of every request received so far, in order.
    pub async fn tiers_called(&self) -> Vec<Tier> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .map(|r| r.options.tier)
            .collect()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    async fn invoke(&self, request: BackendRequest) -> Result<BackendResponse, TiergateError> {
        let mut state = self.state.lock().await;
        let tier = request.options.tier;
        let fails = state.fail_all || state.failing_tiers.contains(&tier);
        let usage = state.usage.unwrap_or_else(|| {
            let input = estimate_tokens(&request.text);
            TokenUsage::new(input, input / 2)
        });
        let backend_id = request.backend_id.clone();
        state.calls.push(request);

        if fails {
            return Err(TiergateError::backend(format!(
                "mock failure for {tier} ({backend_id})"
            )));
        }

        let content = state
            .responses
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string());
        Ok(BackendResponse { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use tiergate_core::BackendOptions;

    use super::*;

    fn request(tier: Tier, text: &str) -> BackendRequest {
        BackendRequest {
            backend_id: format!("{tier}-model").to_lowercase(),
            text: text.to_string(),
            options: BackendOptions {
                tier,
                max_retries: 0,
            },
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let backend = MockBackend::new();
        let resp = backend.invoke(request(Tier::Simple, "hi")).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(resp.usage, TokenUsage::new(1, 0));
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let backend = MockBackend::with_responses(vec!["first".to_string(), "second".to_string()]);
        let req = || request(Tier::Medium, "question");

        assert_eq!(backend.invoke(req()).await.unwrap().content, "first");
        assert_eq!(backend.invoke(req()).await.unwrap().content, "second");
        assert_eq!(backend.invoke(req()).await.unwrap().content, "mock response");
    }

    #[tokio::test]
    async fn failing_tier_does_not_consume_responses() {
        let backend =
            MockBackend::with_responses(vec!["kept".to_string()]).with_failing_tiers(&[Tier::Simple]);

        let err = backend.invoke(request(Tier::Simple, "x")).await.unwrap_err();
        assert!(err.to_string().contains("mock failure for SIMPLE"));

        let ok = backend.invoke(request(Tier::Medium, "x")).await.unwrap();
        assert_eq!(ok.content, "kept");
    }

    #[tokio::test]
    async fn failure_injection_can_be_toggled() {
        let backend = MockBackend::new();
        backend.set_fail_all(true).await;
        assert!(backend.invoke(request(Tier::Complex, "x")).await.is_err());
        backend.set_fail_all(false).await;

        backend.fail_tier(Tier::Complex).await;
        assert!(backend.invoke(request(Tier::Complex, "x")).await.is_err());
        backend.recover_tier(Tier::Complex).await;
        assert!(backend.invoke(request(Tier::Complex, "x")).await.is_ok());
    }

    #[tokio::test]
    async fn calls_are_captured() {
        let backend = MockBackend::new().with_usage(TokenUsage::new(10, 20));
        let resp = backend.invoke(request(Tier::Medium, "one")).await.unwrap();
        assert_eq!(resp.usage.total_tokens, 30);
        backend.invoke(request(Tier::Complex, "two")).await.unwrap();

        let calls = backend.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].text, "one");
        assert_eq!(calls[1].backend_id, "complex-model");
        assert_eq!(backend.tiers_called().await, vec![Tier::Medium, Tier::Complex]);
    }
}
