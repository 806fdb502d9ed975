// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend adapter trait for the services that actually answer requests.

use async_trait::async_trait;

use crate::error::TiergateError;
use crate::types::{BackendRequest, BackendResponse};

/// Capability the dispatcher uses to invoke a tier's backend.
///
/// Implementations may be real network clients or simulations. The
/// dispatcher does not inspect the error it gets back: any `Err` triggers
/// the same fallback path.
#[async_trait]
pub trait BackendAdapter: Send + Sync + 'static {
    /// Human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Send `request.text` to the backend named by `request.backend_id`.
    async fn invoke(&self, request: BackendRequest) -> Result<BackendResponse, TiergateError>;
}
