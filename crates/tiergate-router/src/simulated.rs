// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline backend that fabricates replies and token counts.

use std::time::Duration;

use async_trait::async_trait;
use tiergate_core::{
    BackendAdapter, BackendRequest, BackendResponse, TiergateError, TokenUsage, estimate_tokens,
};

/// Backend that never leaves the process.
///
/// Input tokens are `ceil(chars / 4)` and output tokens half of that,
/// rounded down. An optional latency is slept before every reply.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    latency: Option<Duration>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `latency` before answering each call.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }

    /// Token usage the simulation reports for `text`.
    pub fn usage_for(text: &str) -> TokenUsage {
        let input = estimate_tokens(text);
        TokenUsage::new(input, input / 2)
    }
}

#[async_trait]
impl BackendAdapter for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn invoke(&self, request: BackendRequest) -> Result<BackendResponse, TiergateError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let usage = Self::usage_for(&request.text);
        Ok(BackendResponse {
            content: format!(
                "[{}] simulated {} response to {} input tokens",
                request.backend_id, request.options.tier, usage.input_tokens
            ),
            usage,
        })
    }
}
