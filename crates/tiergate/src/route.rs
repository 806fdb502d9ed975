// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiergate route` command implementation.

use tiergate_core::{Tier, TiergateError};
use tiergate_router::{DispatchResult, Dispatcher, RouteOptions};

use crate::output::{format_cost, print_heading, print_json, tier_label, use_color};

/// Run the `tiergate route` command.
///
/// A request that exhausts every tier is returned as an error after the
/// failed attempts are recorded.
pub async fn run_route(
    dispatcher: &Dispatcher,
    text: &str,
    tier: Option<Tier>,
    json: bool,
    plain: bool,
) -> Result<(), TiergateError> {
    let result = dispatcher
        .route(text, RouteOptions { force_tier: tier })
        .await?;

    if json {
        print_json(&result);
    } else {
        print_result(&result, use_color(plain));
    }
    Ok(())
}

fn print_result(result: &DispatchResult, use_color: bool) {
    print_heading("tiergate route");
    println!(
        "    Tier:      {} ({})",
        tier_label(result.tier, use_color),
        result.display_name
    );
    println!("    Backend:   {}", result.backend_id);
    println!("    Attempts:  {}", result.attempts);
    println!(
        "    Tokens:    {} in / {} out",
        result.usage.input_tokens, result.usage.output_tokens
    );
    println!("    Cost:      {}", format_cost(result.cost_usd));
    println!("    Duration:  {}ms", result.duration.as_millis());
    println!("    Request:   {}", result.request_id);
    println!();
    println!("  {}", result.content);
    println!();
}
