// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiergate batch` command implementation.
//!
//! Routes one request per non-blank input line, sequentially, then prints
//! the usage report and optionally exports the ledger as CSV.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tiergate_core::{Tier, TiergateError};
use tiergate_cost::{Statistics, write_csv};
use tiergate_router::{DispatchResult, Dispatcher, RouteOptions};

use crate::output::{format_cost, print_json, tier_label, use_color};

/// Options for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Input file; stdin when `None`.
    pub input: Option<PathBuf>,
    pub tier: Option<Tier>,
    /// CSV destination for the ledger export.
    pub export: Option<PathBuf>,
    pub json: bool,
    pub plain: bool,
}

/// Outcome of one input line.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    /// 1-based input line number.
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DispatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured batch output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct BatchOutput {
    pub entries: Vec<BatchEntry>,
    pub statistics: Statistics,
}

/// Read non-blank request lines, keeping their 1-based line numbers.
pub fn read_requests<R: Read>(reader: R) -> Result<Vec<(usize, String)>, TiergateError> {
    let mut requests = Vec::new();
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| TiergateError::Internal(format!("failed to read input: {e}")))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            requests.push((index + 1, trimmed.to_string()));
        }
    }
    Ok(requests)
}

/// Route every request in order. A line that exhausts all tiers is recorded
/// as an error entry and the batch continues.
pub async fn route_all(
    dispatcher: &Dispatcher,
    requests: Vec<(usize, String)>,
    tier: Option<Tier>,
) -> Vec<BatchEntry> {
    let mut entries = Vec::with_capacity(requests.len());
    for (line, text) in requests {
        let entry = match dispatcher.route(&text, RouteOptions { force_tier: tier }).await {
            Ok(result) => BatchEntry {
                line,
                result: Some(result),
                error: None,
            },
            Err(e) => BatchEntry {
                line,
                result: None,
                error: Some(e.to_string()),
            },
        };
        entries.push(entry);
    }
    entries
}

/// Write the dispatcher's ledger to `path` as CSV.
pub fn export_csv(dispatcher: &Dispatcher, path: &Path) -> Result<(), TiergateError> {
    let file = std::fs::File::create(path).map_err(|e| TiergateError::Export {
        source: Box::new(e),
    })?;
    write_csv(&dispatcher.export_records(), file)
}

/// Run the `tiergate batch` command.
pub async fn run_batch(dispatcher: &Dispatcher, options: &BatchOptions) -> Result<(), TiergateError> {
    let requests = match &options.input {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|e| {
                TiergateError::Internal(format!("failed to open {}: {e}", path.display()))
            })?;
            read_requests(file)?
        }
        None => read_requests(std::io::stdin().lock())?,
    };

    let entries = route_all(dispatcher, requests, options.tier).await;

    if let Some(path) = &options.export {
        export_csv(dispatcher, path)?;
        tracing::info!(path = %path.display(), "usage ledger exported");
    }

    if options.json {
        print_json(&BatchOutput {
            entries,
            statistics: dispatcher.statistics(),
        });
    } else {
        let use_color = use_color(options.plain);
        println!();
        for entry in &entries {
            print_entry(entry, use_color);
        }
        println!();
        print!("{}", dispatcher.report());
        println!();
    }
    Ok(())
}

fn print_entry(entry: &BatchEntry, use_color: bool) {
    match (&entry.result, &entry.error) {
        (Some(result), _) => println!(
            "    {:>4}  {:<8} {} attempt(s)  {}",
            entry.line,
            tier_label(result.tier, use_color),
            result.attempts,
            format_cost(result.cost_usd)
        ),
        (None, Some(error)) => {
            if use_color {
                use colored::Colorize;
                println!("    {:>4}  {} {error}", entry.line, "FAILED".red());
            } else {
                println!("    {:>4}  FAILED {error}", entry.line);
            }
        }
        (None, None) => {}
    }
}
