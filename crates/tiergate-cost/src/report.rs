// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text usage report.

use std::fmt::Write;

use crate::ledger::UsageRecord;
use crate::stats::Statistics;

/// Render statistics and the most recent records as a plain-text report.
pub fn render_report(stats: &Statistics, recent: &[UsageRecord]) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "  tiergate usage report");
    let _ = writeln!(out, "  {}", "-".repeat(35));
    let _ = writeln!(
        out,
        "    Requests:   {} total, {} ok, {} failed",
        stats.total_requests, stats.successful_requests, stats.failed_requests
    );
    let _ = writeln!(
        out,
        "    Tokens:     {} in / {} out",
        stats.total_input_tokens, stats.total_output_tokens
    );
    let _ = writeln!(out, "    Cost:       ${:.6}", stats.total_cost_usd);
    let _ = writeln!(out, "    Baseline:   ${:.6}", stats.baseline_cost_usd);
    let _ = writeln!(
        out,
        "    Savings:    ${:.6} ({:.1}%)",
        stats.savings_usd, stats.savings_percent
    );
    if stats.cost_multiplier > 0.0 {
        let _ = writeln!(out, "    Multiplier: {:.1}x cheaper", stats.cost_multiplier);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  By tier");
    let _ = writeln!(out, "  {}", "-".repeat(35));
    for (tier, slice) in &stats.by_tier {
        let _ = writeln!(
            out,
            "    {:<8} {:>4} ok {:>4} failed  {:>8} in {:>8} out  ${:.6}",
            tier.to_string(),
            slice.successes,
            slice.failures,
            slice.input_tokens,
            slice.output_tokens,
            slice.cost_usd
        );
    }

    if !recent.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Recent");
        let _ = writeln!(out, "  {}", "-".repeat(35));
        for record in recent {
            let status = if record.success { "OK" } else { "FAIL" };
            let _ = write!(
                out,
                "    #{:<5} [{}] {:<8} {} attempt {} ${:.6} {}ms",
                record.id,
                status,
                record.tier.to_string(),
                record.backend_id,
                record.attempt,
                record.cost_usd,
                record.duration_ms
            );
            if !record.error.is_empty() {
                let _ = write!(out, " ({})", record.error);
            }
            let _ = writeln!(out);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tiergate_core::Tier;

    use super::*;
    use crate::pricing::ModelPricing;

    fn record(id: u64, tier: Tier, success: bool) -> UsageRecord {
        UsageRecord {
            id,
            request_id: "req".to_string(),
            timestamp: Utc::now(),
            tier,
            backend_id: "backend-x".to_string(),
            input_tokens: if success { 100 } else { 0 },
            output_tokens: if success { 50 } else { 0 },
            cost_usd: if success { 0.001 } else { 0.0 },
            duration_ms: 5,
            success,
            attempt: 1,
            error: if success {
                String::new()
            } else {
                "tier backend unavailable: down".to_string()
            },
        }
    }

    fn baseline() -> ModelPricing {
        ModelPricing {
            input_per_mtok: 15.0,
            output_per_mtok: 75.0,
        }
    }

    #[test]
    fn report_lists_every_tier() {
        let stats = Statistics::from_records(&[], &baseline());
        let text = render_report(&stats, &[]);
        assert!(text.contains("0 total"));
        for tier in ["SIMPLE", "MEDIUM", "COMPLEX"] {
            assert!(text.contains(tier), "missing {tier} in:\n{text}");
        }
        assert!(!text.contains("Recent"));
        assert!(!text.contains("Multiplier"));
    }

    #[test]
    fn report_includes_recent_failures_with_error_text() {
        let records = vec![record(1, Tier::Medium, false), record(2, Tier::Complex, true)];
        let stats = Statistics::from_records(&records, &baseline());
        let text = render_report(&stats, &records);
        assert!(text.contains("2 total, 1 ok, 1 failed"));
        assert!(text.contains("[FAIL]"));
        assert!(text.contains("(tier backend unavailable: down)"));
        assert!(text.contains("#2"));
    }
}
