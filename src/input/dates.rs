//! Lenient date parsing for due-date style fields.
//!
//! Agents send whatever the user typed: RFC 3339 timestamps, plain dates,
//! "March 3, 2024", "tomorrow", "next friday", "in 2 weeks". Everything that
//! parses is reduced to the calendar date as written, at midnight UTC.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat,
    Utc, Weekday,
};
use regex::Regex;

use crate::error::DateParseError;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
];

static SHIFT_FORWARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^in (\d{1,4}) (minute|minutes|hour|hours|day|days|week|weeks)$")
        .expect("static regex")
});

static SHIFT_BACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,4}) (minute|minutes|hour|hours|day|days|week|weeks) ago$")
        .expect("static regex")
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(this|next|last) )?((?:mon|tue|wed|thu|fri|sat|sun)[a-z]*)$")
        .expect("static regex")
});

/// Parse `text` relative to the current time.
pub fn parse_datetime(text: &str) -> Result<DateTime<FixedOffset>, DateParseError> {
    parse_datetime_at(text, Utc::now())
}

/// Parse `text`, resolving relative phrases against `now`.
pub fn parse_datetime_at(
    text: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<FixedOffset>, DateParseError> {
    let invalid = || DateParseError {
        raw: text.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(at_utc(naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return midnight(date).map(at_utc).ok_or_else(invalid);
        }
    }

    let phrase = trimmed
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    relative(&phrase, now)
        .map(|dt| dt.with_timezone(&Utc.fix()))
        .ok_or_else(invalid)
}

/// The calendar date of `text` as written, at midnight UTC.
pub fn iso_date(text: &str) -> Result<DateTime<Utc>, DateParseError> {
    iso_date_at(text, Utc::now())
}

pub fn iso_date_at(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateParseError> {
    let parsed = parse_datetime_at(text, now)?;
    midnight(parsed.date_naive())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateParseError {
            raw: text.to_string(),
        })
}

/// Canonical form written back into payloads: `YYYY-MM-DDT00:00:00Z`.
pub fn iso_date_string(text: &str) -> Result<String, DateParseError> {
    iso_date_string_at(text, Utc::now())
}

pub fn iso_date_string_at(text: &str, now: DateTime<Utc>) -> Result<String, DateParseError> {
    Ok(iso_date_at(text, now)?.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn at_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    DateTime::from_naive_utc_and_offset(naive, Utc.fix())
}

fn relative(phrase: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match phrase {
        "now" | "today" | "tonight" | "this morning" | "this afternoon" | "this evening" => {
            return Some(now);
        }
        "tomorrow" => return Some(now + Duration::days(1)),
        "yesterday" => return Some(now - Duration::days(1)),
        "day after tomorrow" | "the day after tomorrow" => return Some(now + Duration::days(2)),
        "next week" => return Some(now + Duration::weeks(1)),
        "last week" => return Some(now - Duration::weeks(1)),
        _ => {}
    }

    if let Some(caps) = SHIFT_FORWARD.captures(phrase) {
        let amount = span(&caps[1], &caps[2])?;
        return now.checked_add_signed(amount);
    }
    if let Some(caps) = SHIFT_BACK.captures(phrase) {
        let amount = span(&caps[1], &caps[2])?;
        return now.checked_sub_signed(amount);
    }
    if let Some(caps) = WEEKDAY.captures(phrase) {
        let target = weekday(&caps[2])?;
        let today = now.weekday().num_days_from_monday() as i64;
        let wanted = target.num_days_from_monday() as i64;
        let ahead = (wanted - today).rem_euclid(7);
        let days = match caps.get(1).map(|m| m.as_str()) {
            Some("next") => {
                if ahead == 0 {
                    7
                } else {
                    ahead
                }
            }
            Some("last") => {
                let back = (today - wanted).rem_euclid(7);
                -(if back == 0 { 7 } else { back })
            }
            _ => ahead,
        };
        return Some(now + Duration::days(days));
    }
    None
}

fn span(count: &str, unit: &str) -> Option<Duration> {
    let count: i64 = count.parse().ok()?;
    match unit.trim_end_matches('s') {
        "minute" => Some(Duration::minutes(count)),
        "hour" => Some(Duration::hours(count)),
        "day" => Some(Duration::days(count)),
        "week" => Some(Duration::weeks(count)),
        _ => None,
    }
}

fn weekday(word: &str) -> Option<Weekday> {
    let day = match &word[..3] {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    // "monster" or "sundae" should not pass for a weekday.
    let full = match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    };
    full.starts_with(word).then_some(day)
}
