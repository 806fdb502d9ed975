// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost accounting for Tiergate.
//!
//! This crate provides:
//! - **Pricing**: per-million-token cost calculation from tier rates
//! - **Usage ledger**: append-only, thread-safe record of every backend attempt
//! - **Statistics**: totals, per-tier breakdowns and savings against a baseline
//! - **Export**: tabular rows and CSV output for external persistence

pub mod export;
pub mod ledger;
pub mod pricing;
pub mod report;
pub mod stats;

pub use export::{EXPORT_COLUMNS, ExportRow, export_rows, write_csv};
pub use ledger::{AttemptRecord, UsageLedger, UsageRecord};
pub use pricing::{ModelPricing, calculate_cost, cost_for_tokens};
pub use report::render_report;
pub use stats::{Statistics, TierBreakdown};
