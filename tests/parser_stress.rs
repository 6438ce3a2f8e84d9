// File: tests/parser_stress.rs
use chrono::{Duration, NaiveDate};
use taskvoice::extract::{Extraction, RuleBasedExtractor};
use taskvoice::model::{MAX_TITLE_CHARS, Priority};

fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn extract(input: &str) -> Extraction {
    RuleBasedExtractor::new().extract_at(input, reference_day())
}

#[test]
fn test_very_long_transcript_is_truncated() {
    let input = format!("{}urgent", "word ".repeat(5000));
    let out = extract(&input);
    assert_eq!(out.priority, Priority::High);
    assert!(out.title.chars().count() <= MAX_TITLE_CHARS);
    assert!(out.title.starts_with("Word word"));
}

#[test]
fn test_non_ascii_text() {
    assert_eq!(
        extract("überweisung bezahlen").title,
        "Überweisung bezahlen"
    );
    let out = extract("🎉 party friday");
    assert_eq!(out.title, "🎉 party");
    assert_eq!(out.due_date, Some(reference_day() + Duration::days(2)));
}

#[test]
fn test_punctuation_only() {
    let out = extract("!!! ???");
    assert_eq!(out.title, "!!! ???");
    assert_eq!(out.priority, Priority::Medium);
    assert_eq!(out.due_date, None);
}

#[test]
fn test_newlines_count_as_whitespace() {
    assert_eq!(extract("remind me to\ncall mom\n").title, "Call mom");
}

#[test]
fn test_date_past_calendar_end() {
    let out = RuleBasedExtractor::new().extract_at("party tomorrow", NaiveDate::MAX);
    assert_eq!(out.due_date, None);
    assert_eq!(out.title, "Party");
}

#[test]
fn test_keyword_soup_never_leaves_blank_title() {
    let words = [
        "urgent", "small", "tomorrow", "today", "next week", "in 2 days", "friday", "add",
        "task", "by", "due", "asap",
    ];
    for a in words {
        for b in words {
            let input = format!("{} {}", a, b);
            let out = extract(&input);
            assert!(!out.title.is_empty(), "blank title for {input:?}");
            assert_eq!(out.title.trim(), out.title, "untrimmed title for {input:?}");
        }
    }
}
