// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic request complexity classification.
//!
//! Scores request text on length, code presence, reasoning vocabulary and
//! question density, then maps the metrics to a tier with a fixed decision
//! table. Pure and deterministic: no model call, no I/O.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tiergate_core::{Tier, estimate_tokens};

/// Patterns whose presence marks the text as containing code.
static CODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Fenced code blocks
        Regex::new(r"```").unwrap(),
        // function foo(
        Regex::new(r"\bfunction\s+\w+\s*\(").unwrap(),
        // class Foo
        Regex::new(r"\bclass\s+[A-Z]\w*").unwrap(),
        // import x / from x import y / use a::b
        Regex::new(r"(?m)^\s*(import\s+\w+|from\s+\w+(\.\w+)*\s+import|use\s+\w+::)").unwrap(),
        // const x = / let x = / var x =
        Regex::new(r"\b(const|let|var)\s+\w+\s*=").unwrap(),
        // fn foo( / def foo(
        Regex::new(r"\b(fn|def)\s+\w+\s*\(").unwrap(),
        // Arrow functions
        Regex::new(r"=>").unwrap(),
        // Brace-delimited blocks
        Regex::new(r"\{[^{}]*\}").unwrap(),
    ]
});

/// Numbered list items at the start of a line: `1.` or `2)`.
static NUMBERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s").unwrap());

/// Sequencing words at a word start. Matched against lowercased text.
///
/// No trailing boundary: appending text must never unmatch a marker.
static SEQUENCE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(step|first|then|next|finally)").unwrap());

/// Vocabulary that signals analytical or multi-step work.
const REASONING_KEYWORDS: &[&str] = &[
    "analyze",
    "analyse",
    "explain",
    "compare",
    "evaluate",
    "assess",
    "debug",
    "optimize",
    "strategy",
    "design",
    "architecture",
    "implement",
    "refactor",
    "trade-off",
    "investigate",
    "justify",
    "reasoning",
];

/// Vocabulary that signals a request for breadth or depth.
const COMPLEX_KEYWORDS: &[&str] = &[
    "comprehensive",
    "detailed",
    "in-depth",
    "thorough",
    "multiple",
    "various",
    "several",
    "complex",
];

const MAX_REASONING_LEVEL: u32 = 10;
const MAX_SCORE: u32 = 100;
const MULTI_STEP_BONUS: u32 = 2;

/// Feature snapshot of one request text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityMetrics {
    /// Estimated tokens at four characters per token.
    pub tokens: u64,
    pub has_code: bool,
    /// 0-10.
    pub reasoning_level: u32,
    /// 0-100.
    pub complexity_score: u32,
    pub sentences: usize,
    pub questions: usize,
}

/// Classifier output: the recommended tier and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub tier: Tier,
    pub metrics: ComplexityMetrics,
    /// Advisory confidence in the recommendation (0.0-1.0).
    pub confidence: f64,
    /// Human-readable clauses explaining the decision, in a fixed order.
    pub reasoning: Vec<String>,
}

/// Heuristic complexity classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityClassifier;

impl ComplexityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Analyze `text` and recommend a tier. Never fails; empty text is SIMPLE.
    pub fn analyze(&self, text: &str) -> Analysis {
        let metrics = Self::metrics(text);
        let tier = Self::decide(&metrics);
        let confidence = Self::confidence(tier, metrics.complexity_score);
        let reasoning = Self::explain(&metrics);

        Analysis {
            tier,
            metrics,
            confidence,
            reasoning,
        }
    }

    fn metrics(text: &str) -> ComplexityMetrics {
        let chars = text.chars().count();
        let lower = text.to_lowercase();

        let tokens = estimate_tokens(text);
        let has_code = CODE_PATTERNS.iter().any(|p| p.is_match(text));
        let reasoning_level = Self::reasoning_level(text, &lower);
        let questions = text.matches('?').count();
        let sentences = text.matches(['.', '!', '?']).count();

        let mut score: u32 = 0;
        if chars > 500 {
            score += 20;
        }
        if chars > 1000 {
            score += 20;
        }
        if has_code {
            score += 25;
        }
        score += 3 * reasoning_level;
        score += 5 * count_distinct(&lower, COMPLEX_KEYWORDS);
        if questions > 1 {
            let questions = u32::try_from(questions).unwrap_or(u32::MAX);
            score = score.saturating_add(questions.saturating_mul(5));
        }

        ComplexityMetrics {
            tokens,
            has_code,
            reasoning_level,
            complexity_score: score.min(MAX_SCORE),
            sentences,
            questions,
        }
    }

    fn reasoning_level(text: &str, lower: &str) -> u32 {
        let mut level = count_distinct(lower, REASONING_KEYWORDS);
        if NUMBERED_LIST.is_match(text) {
            level += MULTI_STEP_BONUS;
        }
        if SEQUENCE_WORDS.is_match(lower) {
            level += MULTI_STEP_BONUS;
        }
        level.min(MAX_REASONING_LEVEL)
    }

    /// First matching rule wins.
    fn decide(m: &ComplexityMetrics) -> Tier {
        if m.complexity_score >= 60 {
            Tier::Complex
        } else if m.has_code && m.reasoning_level >= 5 {
            Tier::Complex
        } else if m.tokens > 500 {
            Tier::Complex
        } else if m.complexity_score >= 30 {
            Tier::Medium
        } else if m.has_code {
            Tier::Medium
        } else if m.reasoning_level >= 3 {
            Tier::Medium
        } else if m.tokens > 200 {
            Tier::Medium
        } else {
            Tier::Simple
        }
    }

    fn confidence(tier: Tier, score: u32) -> f64 {
        match tier {
            Tier::Complex if score >= 70 => 0.95,
            Tier::Complex if score >= 60 => 0.85,
            Tier::Medium if (30..60).contains(&score) => 0.90,
            Tier::Simple if score < 25 => 0.92,
            _ => 0.75,
        }
    }

    fn explain(m: &ComplexityMetrics) -> Vec<String> {
        let mut clauses = Vec::new();
        if m.complexity_score >= 60 {
            clauses.push(format!("high complexity score ({})", m.complexity_score));
        }
        if m.has_code {
            clauses.push("contains code".to_string());
        }
        if m.reasoning_level >= 5 {
            clauses.push(format!("high reasoning level ({})", m.reasoning_level));
        }
        if m.tokens > 500 {
            clauses.push(format!("large token count ({})", m.tokens));
        }
        if clauses.is_empty() {
            clauses.push("no strong complexity signals".to_string());
        }
        clauses
    }
}

/// Number of `keywords` that occur at least once in `haystack`.
fn count_distinct(haystack: &str, keywords: &[&str]) -> u32 {
    keywords.iter().filter(|k| haystack.contains(*k)).count() as u32
}
