// File: ./src/extract/rules.rs
use crate::extract::Extraction;
use crate::extract::dates::{add_days, local_today, next_weekday, parse_weekday};
use crate::extract::patterns::{
    DATE_RULES, DateRule, LEADING_FILLER, PRIORITY_CLASSES, TRAILING_FILLER, WHITESPACE_RUN,
};
use crate::model::{MAX_TITLE_CHARS, Priority};
use chrono::NaiveDate;
use regex::Captures;

/// Local, deterministic extraction. Total over every input string.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, transcript: &str) -> Extraction {
        self.extract_at(transcript, local_today())
    }

    /// Same as [`extract`](Self::extract) with relative dates resolved against `today`.
    pub fn extract_at(&self, transcript: &str, today: NaiveDate) -> Extraction {
        let mut title = transcript.to_string();

        // 1. Priority
        let mut priority = Priority::default();
        for (level, re) in PRIORITY_CLASSES.iter() {
            if re.is_match(transcript) {
                priority = *level;
                title = re.replace_all(&title, "").into_owned();
                break;
            }
        }

        // 2. Due date
        let mut due_date = None;
        for (rule, re) in DATE_RULES.iter() {
            if let Some(caps) = re.captures(transcript) {
                due_date = resolve_date(*rule, &caps, today);
                title = re.replace_all(&title, "").into_owned();
                break;
            }
        }

        // 3. Fillers and whitespace
        let mut title = clean_title(&title);

        // 4. Capitalization and length
        if title.is_empty() {
            title = normalize_whitespace(transcript);
        }
        let title = truncate_chars(&capitalize_first(&title), MAX_TITLE_CHARS);

        log::debug!(
            "rule-based extraction: priority={} due={:?} title={:?}",
            priority,
            due_date,
            title
        );

        Extraction {
            title,
            priority,
            due_date,
        }
    }
}

fn resolve_date(rule: DateRule, caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    match rule {
        DateRule::Tomorrow => add_days(today, 1),
        DateRule::Today => Some(today),
        DateRule::NextWeek => add_days(today, 7),
        DateRule::InDays => {
            let days = caps.get(1)?.as_str().parse::<u64>().ok()?;
            add_days(today, days)
        }
        DateRule::Weekday => {
            let target = parse_weekday(caps.get(2)?.as_str())?;
            let strictly_after = caps
                .get(1)
                .is_some_and(|q| q.as_str().eq_ignore_ascii_case("next"));
            next_weekday(today, target, strictly_after)
        }
    }
}

/// Strips leading/trailing filler phrases (repeatedly) and collapses whitespace.
pub fn clean_title(raw: &str) -> String {
    let mut title = raw.trim_start().to_string();

    loop {
        let stripped = LEADING_FILLER.replace(&title, "").into_owned();
        if stripped == title {
            break;
        }
        title = stripped;
    }
    loop {
        let stripped = TRAILING_FILLER.replace(&title, "").into_owned();
        if stripped == title {
            break;
        }
        title = stripped;
    }

    normalize_whitespace(&title)
}

pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect::<String>().trim_end().to_string()
}
