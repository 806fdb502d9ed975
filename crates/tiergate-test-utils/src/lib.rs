// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tiergate integration tests.
//!
//! Provides a mock backend and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without real backends.
//!
//! # Components
//!
//! - [`MockBackend`] - Mock backend with queued responses, failure injection and call capture
//! - [`TestHarness`] - Dispatcher over a mock backend with a fresh ledger

pub mod harness;
pub mod mock_backend;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::MockBackend;
