//! Display helpers for dates, contact details and schedule labels.
//!
//! Every helper is total: malformed input falls back to the raw string or a
//! `-` placeholder instead of failing, so renderers can call them on any
//! value the backend sends.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::constants::{BIO_MAX_WORDS, HISTORY_PROGRESS_PERCENT};
use crate::types::{Day, HistoryEntry, ProgressItem};

/// Parse the timestamp shapes the backend emits: RFC 3339 (`...Z` or with
/// offset), naive ISO date-times, and plain `YYYY-MM-DD` dates.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `MM/DD/YYYY`; the raw input when it does not parse, `-` when empty.
pub fn format_date(value: Option<&str>) -> String {
    let raw = value.unwrap_or("");
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%m/%d/%Y").to_string(),
        None if raw.is_empty() => "-".to_string(),
        None => raw.to_string(),
    }
}

/// `MM/DD/YY`, or `-` for anything unparseable.
pub fn format_date_compact(value: Option<&str>) -> String {
    value
        .and_then(parse_timestamp)
        .map(|dt| dt.format("%m/%d/%y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `Jan 5`; the raw input when it does not parse.
pub fn format_date_short(value: Option<&str>) -> String {
    let raw = value.unwrap_or("");
    parse_timestamp(raw)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Scheduled date label shown on browse cards.
///
/// Sessions are listed as occurring in the week of January 12th (MON) to
/// 17th (SAT). During January that is the current year, afterwards the
/// next one. Unknown labels map to Monday.
pub fn schedule_label(day_of_week: &str, today: NaiveDate) -> String {
    let target = match day_of_week.parse::<Day>() {
        Ok(Day::Mon) | Err(_) => 12,
        Ok(Day::Tue) => 13,
        Ok(Day::Wed) => 14,
        Ok(Day::Thu) => 15,
        Ok(Day::Fri) => 16,
        Ok(Day::Sat) => 17,
    };
    let year = if today.month() == 1 {
        today.year()
    } else {
        today.year() + 1
    };
    NaiveDate::from_ymd_opt(year, 1, target)
        .map(|d| d.format("%m/%d/%y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `9:00 - 17:00`
pub fn hour_range_label(from: u8, to: u8) -> String {
    format!("{from}:00 - {to}:00")
}

/// Keep digits and `+`, grouping international numbers as `+84 912 345 678`.
pub fn format_phone(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !v.is_empty() => v,
        _ => return "-".to_string(),
    };
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if digits.is_empty() {
        return raw.to_string();
    }
    if digits.len() <= 4 {
        return digits;
    }
    group_international(&digits).unwrap_or(digits)
}

/// Rewrite the first `+CC` followed by nine digits as `+CC DDD DDD DDD`.
fn group_international(digits: &str) -> Option<String> {
    let bytes = digits.as_bytes();
    let start = (0..bytes.len()).find(|&i| {
        bytes[i] == b'+'
            && bytes.len() >= i + 12
            && bytes[i + 1..i + 12].iter().all(u8::is_ascii_digit)
    })?;
    let m = &digits[start..start + 12];
    let grouped = format!("{} {} {} {}", &m[..3], &m[3..6], &m[6..9], &m[9..12]);
    Some(
        format!("{}{}{}", &digits[..start], grouped, &digits[start + 12..])
            .trim()
            .to_string(),
    )
}

pub fn format_email(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.trim().to_lowercase(),
        _ => "-".to_string(),
    }
}

/// Collapse whitespace and cut the bio at [`BIO_MAX_WORDS`].
pub fn trim_bio(bio: Option<&str>) -> String {
    let words: Vec<&str> = bio.unwrap_or("").split_whitespace().collect();
    if words.is_empty() {
        return "No bio yet.".to_string();
    }
    if words.len() > BIO_MAX_WORDS {
        format!("{}…", words[..BIO_MAX_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

/// Two-letter avatar placeholder.
pub fn initials(display: &str) -> String {
    display.chars().take(2).collect::<String>().to_uppercase()
}

/// Elapsed share of the `[start, end]` window at `now`, rounded to a whole
/// percent. Invalid or empty windows report 0.
pub fn elapsed_percent(start: Option<&str>, end: Option<&str>, now: NaiveDateTime) -> u8 {
    let (Some(s), Some(e)) = (start.and_then(parse_timestamp), end.and_then(parse_timestamp))
    else {
        return 0;
    };
    if e <= s {
        return 0;
    }
    let total = (e - s).num_milliseconds() as f64;
    let elapsed = (now - s).num_milliseconds().clamp(0, (e - s).num_milliseconds()) as f64;
    ((elapsed / total) * 100.0).round() as u8
}

/// Percent shown for a progress row: the reported one, else the elapsed
/// share of its date window.
pub fn progress_percent(item: &ProgressItem, now: NaiveDateTime) -> u8 {
    match item.percent {
        Some(p) => p.clamp(0.0, 100.0).round() as u8,
        None => elapsed_percent(item.start_date.as_deref(), item.end_date.as_deref(), now),
    }
}

/// Synthesize progress rows from attendance history when the backend does
/// not report course progress.
pub fn progress_from_history(history: &[HistoryEntry]) -> Vec<ProgressItem> {
    history
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let fallback = format!("hist-{idx}");
            let id = h.id.clone().unwrap_or_else(|| fallback.clone());
            ProgressItem {
                session_id: h
                    .session_id
                    .clone()
                    .or_else(|| Some(id.as_str().into())),
                id: Some(id),
                code: h.course_code.clone(),
                title: h.course_title.clone(),
                start_date: h.date.clone(),
                end_date: h.date.clone(),
                percent: Some(HISTORY_PROGRESS_PERCENT),
            }
        })
        .collect()
}
