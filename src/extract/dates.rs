// File: ./src/extract/dates.rs
//! Calendar arithmetic for relative date phrases.
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Weekday};

/// The reference day used when a caller does not supply one.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// `None` only when the result falls off chrono's calendar.
pub fn add_days(from: NaiveDate, days: u64) -> Option<NaiveDate> {
    from.checked_add_days(Days::new(days))
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mo" | "mon" | "monday" => Some(Weekday::Mon),
        "tu" | "tue" | "tuesday" => Some(Weekday::Tue),
        "we" | "wed" | "wednesday" => Some(Weekday::Wed),
        "th" | "thu" | "thursday" => Some(Weekday::Thu),
        "fr" | "fri" | "friday" => Some(Weekday::Fri),
        "sa" | "sat" | "saturday" => Some(Weekday::Sat),
        "su" | "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Days from `from` until `target`: `(target - from + 7) mod 7`.
///
/// With `strictly_after` a zero offset becomes a full week, so "next friday"
/// said on a Friday is not today.
pub fn weekday_offset(from: NaiveDate, target: Weekday, strictly_after: bool) -> u64 {
    let today = from.weekday().num_days_from_sunday() as u64;
    let wanted = target.num_days_from_sunday() as u64;
    let offset = (wanted + 7 - today) % 7;
    if offset == 0 && strictly_after { 7 } else { offset }
}

pub fn next_weekday(from: NaiveDate, target: Weekday, strictly_after: bool) -> Option<NaiveDate> {
    add_days(from, weekday_offset(from, target, strictly_after))
}

/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or a string starting with a
/// plain date (`2025-01-16T00:00:00.000Z` without a valid offset).
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(add_days(d(2024, 12, 31), 1), Some(d(2025, 1, 1)));
        assert_eq!(add_days(d(2024, 2, 28), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_days(d(2025, 3, 5), 0), Some(d(2025, 3, 5)));
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn test_weekday_offset_same_day() {
        // 2025-01-17 is a Friday
        let fri = d(2025, 1, 17);
        assert_eq!(weekday_offset(fri, Weekday::Fri, false), 0);
        assert_eq!(weekday_offset(fri, Weekday::Fri, true), 7);
        assert_eq!(weekday_offset(fri, Weekday::Sat, false), 1);
        assert_eq!(weekday_offset(fri, Weekday::Thu, false), 6);
        assert_eq!(weekday_offset(fri, Weekday::Mon, true), 3);
    }

    #[test]
    fn test_next_weekday() {
        let wed = d(2025, 1, 15);
        assert_eq!(next_weekday(wed, Weekday::Mon, false), Some(d(2025, 1, 20)));
        assert_eq!(next_weekday(wed, Weekday::Wed, true), Some(d(2025, 1, 22)));
    }

    #[test]
    fn test_parse_weekday_names() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("SUNDAY"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn test_parse_iso_date_variants() {
        assert_eq!(parse_iso_date("2025-01-16"), Some(d(2025, 1, 16)));
        assert_eq!(parse_iso_date("2025-01-16T09:30:00+00:00"), Some(d(2025, 1, 16)));
        assert_eq!(parse_iso_date("2025-01-16T00:00:00.000Z"), Some(d(2025, 1, 16)));
        assert_eq!(parse_iso_date("next tuesday"), None);
        assert_eq!(parse_iso_date("2025-13-01"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
