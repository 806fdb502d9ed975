// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tiergate routing core.

use thiserror::Error;

/// The primary error type used across Tiergate crates.
#[derive(Debug, Error)]
pub enum TiergateError {
    /// Configuration errors (invalid values, unknown sections).
    #[error("configuration error: {0}")]
    Config(String),

    /// A tier name that does not map to any known tier.
    #[error("configuration error: unknown tier `{name}` (expected SIMPLE, MEDIUM or COMPLEX)")]
    UnknownTier { name: String },

    /// The backend for a tier could not serve the request.
    ///
    /// Raised by backend adapters. The dispatcher treats every variant of
    /// backend failure the same way and escalates to the next tier.
    #[error("tier backend unavailable: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Every tier in the fallback chain failed, or the attempt ceiling was hit.
    #[error("all tiers exhausted after {attempts} attempt(s): {last_error}")]
    AllTiersExhausted { attempts: u32, last_error: String },

    /// Failure while serializing usage records for export.
    #[error("export error: {source}")]
    Export {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TiergateError {
    /// Shorthand for a backend failure without an underlying source.
    pub fn backend(message: impl Into<String>) -> Self {
        TiergateError::Backend {
            message: message.into(),
            source: None,
        }
    }
}
