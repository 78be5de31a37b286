//! Value-level coercion rules.
//!
//! These are shared with the validator so that validation judges values by
//! the same rules normalization applies.

use chrono::{NaiveDate, NaiveDateTime};

/// Accepted timestamp spellings, tried in order. ISO forms first, then the
/// day-first forms the field sources use.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parses a timestamp string; date-only values get a midnight time.
/// `None` for anything unparseable, never an error.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// First code of a comma-separated equipment code list.
/// Null-ish input (empty or the literal text "nan") derives to `None`.
pub fn first_equipment_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        return None;
    }
    let first = trimmed.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Trims and collapses internal whitespace runs to single spaces.
/// Returns `None` for blank input and for the literal text "nan"
/// (case-sensitive), which stands in for a missing value in the sources.
pub fn clean_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed == "nan" {
        None
    } else {
        Some(collapsed)
    }
}
