// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request classification and tiered dispatch for Tiergate.
//!
//! This crate provides:
//! - [`ComplexityClassifier`]: Heuristic complexity scoring (no model call, no I/O)
//! - [`TierRegistry`]: Per-tier backend configuration with partial overrides
//! - [`Dispatcher`]: Fallback state machine that records every attempt in the usage ledger
//! - [`SimulatedBackend`]: Offline backend for demos and tests
//!
//! The dispatcher picks a start tier (per-call override, global override or
//! classifier recommendation), invokes that tier's backend and escalates
//! SIMPLE -> MEDIUM -> COMPLEX on failure, at most three attempts per call.

pub mod classifier;
pub mod dispatcher;
pub mod registry;
pub mod simulated;

pub use classifier::{Analysis, ComplexityClassifier, ComplexityMetrics};
pub use dispatcher::{DispatchResult, Dispatcher, MAX_ATTEMPTS, RouteOptions};
pub use registry::TierRegistry;
pub use simulated::SimulatedBackend;
