// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tabular export of ledger records.

use std::io;

use serde::Serialize;
use tiergate_core::TiergateError;

use crate::ledger::UsageRecord;

/// Column order of an exported row.
pub const EXPORT_COLUMNS: [&str; 11] = [
    "id",
    "timestamp",
    "tier",
    "backend_id",
    "input_tokens",
    "output_tokens",
    "cost",
    "duration_ms",
    "success",
    "attempt",
    "error",
];

/// One exported ledger row. Field order matches [`EXPORT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub id: u64,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    pub tier: String,
    pub backend_id: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Cost in USD with eight decimal places.
    pub cost: String,
    pub duration_ms: u64,
    pub success: bool,
    pub attempt: u32,
    pub error: String,
}

impl From<&UsageRecord> for ExportRow {
    fn from(record: &UsageRecord) -> Self {
        Self {
            id: record.id,
            timestamp: record
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            tier: record.tier.to_string(),
            backend_id: record.backend_id.clone(),
            input_tokens: record.input_tokens,
            output_tokens: record.output_tokens,
            cost: format!("{:.8}", record.cost_usd),
            duration_ms: record.duration_ms,
            success: record.success,
            attempt: record.attempt,
            error: record.error.clone(),
        }
    }
}

/// Convert records to export rows, preserving order.
pub fn export_rows(records: &[UsageRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from).collect()
}

/// Write `rows` as CSV with a header line.
pub fn write_csv<W: io::Write>(rows: &[ExportRow], writer: W) -> Result<(), TiergateError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(EXPORT_COLUMNS).map_err(export_error)?;
    for row in rows {
        csv.serialize(row).map_err(export_error)?;
    }
    csv.flush().map_err(|e| TiergateError::Export {
        source: Box::new(e),
    })
}

fn export_error(e: csv::Error) -> TiergateError {
    TiergateError::Export {
        source: Box::new(e),
    }
}
