// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared terminal output helpers.

use std::io::IsTerminal;

use serde::Serialize;
use tiergate_core::Tier;

/// Colors are used only when not disabled and stdout is a TTY.
pub fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

/// Print a section heading with a rule underneath.
pub fn print_heading(title: &str) {
    println!();
    println!("  {title}");
    println!("  {}", "-".repeat(35));
}

/// Tier label, colored by expense when `use_color` is set.
pub fn tier_label(tier: Tier, use_color: bool) -> String {
    if !use_color {
        return tier.to_string();
    }
    use colored::Colorize;
    match tier {
        Tier::Simple => tier.to_string().green().to_string(),
        Tier::Medium => tier.to_string().yellow().to_string(),
        Tier::Complex => tier.to_string().red().to_string(),
    }
}

/// Format a USD amount with eight decimal places.
pub fn format_cost(usd: f64) -> String {
    format!("${usd:.8}")
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}
