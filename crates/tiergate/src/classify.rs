// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiergate classify` command implementation.

use tiergate_router::{Analysis, ComplexityClassifier};

use crate::output::{print_heading, print_json, tier_label, use_color};

/// Run the `tiergate classify` command.
pub fn run_classify(text: &str, json: bool, plain: bool) {
    let analysis = ComplexityClassifier::new().analyze(text);
    if json {
        print_json(&analysis);
    } else {
        print_analysis(&analysis, use_color(plain));
    }
}

fn print_analysis(analysis: &Analysis, use_color: bool) {
    let m = &analysis.metrics;
    print_heading("tiergate classify");
    println!(
        "    Tier:       {} (confidence {:.2})",
        tier_label(analysis.tier, use_color),
        analysis.confidence
    );
    println!("    Score:      {}/100", m.complexity_score);
    println!("    Tokens:     {}", m.tokens);
    println!("    Code:       {}", if m.has_code { "yes" } else { "no" });
    println!("    Reasoning:  {}/10", m.reasoning_level);
    println!("    Sentences:  {} ({} questions)", m.sentences, m.questions);
    for clause in &analysis.reasoning {
        println!("    - {clause}");
    }
    println!();
}
