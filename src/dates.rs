//! Date parsing and display helpers shared by the validator and the CLI.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

// Naive layouts are read as UTC. The minute-precision one is what an HTML
// datetime-local input submits.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// e.g. `Sat, Oct 17, 2026, 06:30 PM`
pub fn format_display(date: &DateTime<Utc>) -> String {
    date.format("%a, %b %-d, %Y, %I:%M %p").to_string()
}

pub fn format_for_input(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M").to_string()
}

pub fn is_event_past(date: &DateTime<Utc>, now: DateTime<Utc>) -> bool {
    *date < now
}

pub fn relative_time(date: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (*date - now).num_milliseconds() as f64;
    let days = (diff_ms / MS_PER_DAY).ceil() as i64;

    match days {
        d if d < 0 => "Past event".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d if d < 7 => format!("In {} days", d),
        d if d < 30 => format!("In {} weeks", (d + 6) / 7),
        d => format!("In {} months", (d + 29) / 30),
    }
}
