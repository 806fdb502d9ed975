// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory, append-only usage ledger.
//!
//! Every backend attempt (successful or not) becomes one [`UsageRecord`].
//! Appends are serialized behind a mutex and stamped with a sequence number
//! that increases strictly for the lifetime of the ledger, including across
//! [`UsageLedger::clear`].

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tiergate_core::{Tier, TokenUsage};
use tracing::debug;

use crate::export::{ExportRow, export_rows};
use crate::pricing::ModelPricing;
use crate::stats::Statistics;

/// An attempt as reported by the dispatcher, before the ledger stamps it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    /// Correlates all attempts made by one `route` call.
    pub request_id: String,
    pub tier: Tier,
    pub backend_id: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
    pub duration: Duration,
    pub success: bool,
    /// 1-based attempt number within the `route` call.
    pub attempt: u32,
    /// Error text; empty on success.
    pub error: String,
}

impl AttemptRecord {
    /// A successful attempt with its usage and computed cost.
    pub fn success(
        request_id: impl Into<String>,
        tier: Tier,
        backend_id: impl Into<String>,
        usage: &TokenUsage,
        cost_usd: f64,
        duration: Duration,
        attempt: u32,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            tier,
            backend_id: backend_id.into(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cost_usd,
            duration,
            success: true,
            attempt,
            error: String::new(),
        }
    }

    /// A failed attempt. Tokens and cost are zero.
    pub fn failure(
        request_id: impl Into<String>,
        tier: Tier,
        backend_id: impl Into<String>,
        duration: Duration,
        attempt: u32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            tier,
            backend_id: backend_id.into(),
            input_tokens: 0,
            output_tokens: 0,
            cost_usd: 0.0,
            duration,
            success: false,
            attempt,
            error: error.into(),
        }
    }
}

/// One ledger row. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Sequence number assigned at append time.
    pub id: u64,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub tier: Tier,
    pub backend_id: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
    pub duration_ms: u64,
    pub success: bool,
    pub attempt: u32,
    pub error: String,
}

#[derive(Debug)]
struct LedgerState {
    next_id: u64,
    records: Vec<UsageRecord>,
}

/// Thread-safe append-only store of usage records.
#[derive(Debug)]
pub struct UsageLedger {
    state: Mutex<LedgerState>,
}

impl UsageLedger {
    /// Create an empty ledger. The first record gets id 1.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }

    /// Lock the state, ignoring poisoning: the state is never left half-updated.
    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an attempt and return the sequence id it was given.
    pub fn append(&self, attempt: AttemptRecord) -> u64 {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;

        let record = UsageRecord {
            id,
            request_id: attempt.request_id,
            timestamp: Utc::now(),
            tier: attempt.tier,
            backend_id: attempt.backend_id,
            input_tokens: attempt.input_tokens,
            output_tokens: attempt.output_tokens,
            cost_usd: attempt.cost_usd,
            duration_ms: attempt.duration.as_millis().try_into().unwrap_or(u64::MAX),
            success: attempt.success,
            attempt: attempt.attempt,
            error: attempt.error,
        };

        debug!(
            id,
            request_id = %record.request_id,
            tier = %record.tier,
            backend_id = %record.backend_id,
            success = record.success,
            cost_usd = record.cost_usd,
            "usage recorded"
        );

        state.records.push(record);
        id
    }

    /// Snapshot of every record in append order.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.state().records.clone()
    }

    /// The last `n` records in append order.
    pub fn recent(&self, n: usize) -> Vec<UsageRecord> {
        let state = self.state();
        let start = state.records.len().saturating_sub(n);
        state.records[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().records.is_empty()
    }

    /// Discard every record. Sequence numbering continues where it left off.
    pub fn clear(&self) {
        let mut state = self.state();
        let dropped = state.records.len();
        state.records.clear();
        debug!(dropped, "usage ledger cleared");
    }

    /// Aggregate statistics over all records appended so far.
    pub fn stats(&self, baseline: &ModelPricing) -> Statistics {
        let state = self.state();
        Statistics::from_records(&state.records, baseline)
    }

    /// Row-per-record tabular form for external persistence.
    pub fn export_records(&self) -> Vec<ExportRow> {
        export_rows(&self.state().records)
    }
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn ok(tier: Tier, input: u64, output: u64, cost: f64) -> AttemptRecord {
        AttemptRecord::success(
            "req-1",
            tier,
            "backend",
            &TokenUsage::new(input, output),
            cost,
            Duration::from_millis(12),
            1,
        )
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let ledger = UsageLedger::new();
        let a = ledger.append(ok(Tier::Simple, 10, 5, 0.1));
        let b = ledger.append(ok(Tier::Medium, 10, 5, 0.2));
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        let records = ledger.records();
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].tier, Tier::Medium);
        assert_eq!(records[0].duration_ms, 12);
    }

    #[test]
    fn failure_records_zero_tokens_and_cost() {
        let ledger = UsageLedger::new();
        ledger.append(AttemptRecord::failure(
            "req-9",
            Tier::Medium,
            "claude-sonnet",
            Duration::from_millis(3),
            1,
            "tier backend unavailable: boom",
        ));
        let record = &ledger.records()[0];
        assert!(!record.success);
        assert_eq!(record.input_tokens, 0);
        assert_eq!(record.output_tokens, 0);
        assert_eq!(record.cost_usd, 0.0);
        assert_eq!(record.error, "tier backend unavailable: boom");
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let ledger = UsageLedger::new();
        for i in 0..5 {
            ledger.append(ok(Tier::Simple, i, 0, 0.0));
        }
        let recent = ledger.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, 4);
        assert_eq!(recent[1].id, 5);
        assert_eq!(ledger.recent(100).len(), 5);
        assert!(ledger.recent(0).is_empty());
    }

    #[test]
    fn clear_discards_records_but_not_numbering() {
        let ledger = UsageLedger::new();
        ledger.append(ok(Tier::Simple, 1, 1, 0.0));
        ledger.append(ok(Tier::Simple, 1, 1, 0.0));
        ledger.clear();
        assert!(ledger.is_empty());
        let id = ledger.append(ok(Tier::Simple, 1, 1, 0.0));
        assert_eq!(id, 3);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn concurrent_appends_get_unique_ids() {
        let ledger = Arc::new(UsageLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        ledger.append(ok(Tier::Simple, 1, 1, 0.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = ledger.records();
        assert_eq!(records.len(), 400);
        assert!(records.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(records.last().unwrap().id, 400);
    }
}
