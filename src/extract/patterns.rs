// File: ./src/extract/patterns.rs
// Keyword and phrase tables for the rule-based extractor. Matching is
// case-insensitive and substring based ("smaller" counts as "small").
use crate::model::Priority;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    // Only ever called with the literals below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

pub const HIGH_PRIORITY_KEYWORDS: &[&str] =
    &["urgent", "critical", "high priority", "important", "asap"];
pub const LOW_PRIORITY_KEYWORDS: &[&str] = &["low priority", "minor", "small", "whenever"];

pub const LEADING_FILLERS: &[&str] = &[
    "create",
    "add",
    "remind me to",
    "make a task to",
    "a task to",
    "task to",
];
pub const TRAILING_FILLERS: &[&str] = &["task", "by", "before", "due"];

fn keyword_class(words: &[&str]) -> Regex {
    let alternation: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    compile(&format!("(?i){}", alternation.join("|")))
}

/// Checked in order; the first class that matches decides the priority.
pub static PRIORITY_CLASSES: Lazy<Vec<(Priority, Regex)>> = Lazy::new(|| {
    vec![
        (Priority::High, keyword_class(HIGH_PRIORITY_KEYWORDS)),
        (Priority::Low, keyword_class(LOW_PRIORITY_KEYWORDS)),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    Tomorrow,
    Today,
    NextWeek,
    /// Capture group 1 holds the day count.
    InDays,
    /// Group 1 is the optional `next`/`on`/`this` qualifier, group 2 the weekday name.
    Weekday,
}

/// Checked in order; first match wins.
pub static DATE_RULES: Lazy<Vec<(DateRule, Regex)>> = Lazy::new(|| {
    vec![
        (DateRule::Tomorrow, compile(r"(?i)tomorrow")),
        (DateRule::Today, compile(r"(?i)today")),
        (DateRule::NextWeek, compile(r"(?i)next\s+week")),
        (DateRule::InDays, compile(r"(?i)in\s+(\d+)\s+days?")),
        (
            DateRule::Weekday,
            compile(
                r"(?i)(?:\b(next|on|this)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)",
            ),
        ),
    ]
});

fn filler_alternation(words: &[&str]) -> String {
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    escaped.join("|")
}

pub static LEADING_FILLER: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)^(?:{})\s+", filler_alternation(LEADING_FILLERS))));

pub static TRAILING_FILLER: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\s+(?:{})\s*$", filler_alternation(TRAILING_FILLERS))));

pub static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\s+"));

/// Greedy: spans from the first `{` to the last `}` of a model reply.
pub static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)\{.*\}"));
