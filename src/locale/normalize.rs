//! Date normalization and the null/ISO date predicates.
//!
//! Everything here is a pure string transform with no locale dependency:
//! given a date already in `Y-M-D` (or `Y-M-D H:I:S`) order but with possibly
//! unpadded or two-digit components, produce the canonical zero-padded,
//! four-digit-year form used for storage and comparison.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

static ISO_REGEX: OnceLock<Regex> = OnceLock::new();

/// Check whether a date value is the null sentinel.
///
/// Empty strings and anything containing the `0000-00-00` sentinel count as
/// "no date" rather than a parse error.
pub fn is_null_date(value: &str) -> bool {
    value.is_empty() || value.contains("0000-00-00")
}

/// Check whether a value is a canonical ISO date or timestamp.
///
/// Requires zero-padded fields (`1987-3-1` is not ISO) and a month in
/// `1..=12`. Day-of-month range is not checked here; that happens when the
/// value is actually parsed.
pub fn is_iso_date(value: &str) -> bool {
    let pattern = ISO_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}( \d{2}:\d{2}:\d{2})?$").expect("valid regex")
    });

    if !pattern.is_match(value) {
        return false;
    }

    match value[5..7].parse::<u32>() {
        Ok(month) => (1..=12).contains(&month),
        Err(_) => false,
    }
}

/// Normalize a `Y-M-D[ H:I:S]` string into canonical form.
///
/// - A year numerically below 100 is expanded with a fixed cutoff: above 30
///   it gets a `19` prefix, otherwise `20`. This is a tie-break policy, not a
///   sliding window from the current year.
/// - Month and day are zero-padded to width 2.
/// - A time part of exactly 6 characters (`23:59:`) is treated as missing
///   its seconds and gets `00` appended.
///
/// ```
/// use locale_bridge::normalize_date;
///
/// assert_eq!(normalize_date("1987-3-1"), "1987-03-01");
/// assert_eq!(normalize_date("87-3-1"), "1987-03-01");
/// assert_eq!(normalize_date("09-12-1"), "2009-12-01");
/// ```
///
/// A non-numeric year parses as 0 and therefore gets the `20` prefix; input
/// without three `-`-separated date components is returned unchanged.
pub fn normalize_date(value: &str) -> String {
    let (date_part, time_part) = match value.split_once(' ') {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    };

    let components: Vec<&str> = date_part.split('-').collect();
    if components.len() != 3 {
        return value.to_string();
    }

    let year_num: i64 = components[0].parse().unwrap_or(0);
    let year = if year_num < 100 {
        if year_num > 30 {
            format!("19{}", components[0])
        } else {
            format!("20{}", components[0])
        }
    } else {
        components[0].to_string()
    };

    let mut normalized = format!("{}-{:0>2}-{:0>2}", year, components[1], components[2]);

    if let Some(time) = time_part {
        let mut time = time.to_string();
        if time.len() == 6 {
            time.push_str("00");
        }

        normalized.push(' ');
        normalized.push_str(&time);
    }

    normalized
}

/// Parse a canonical-ish date or timestamp, tolerating unpadded components
/// and a missing seconds or time part.
///
/// Returns `None` when the value does not describe a real calendar moment
/// (including out-of-range months and days).
pub fn parse_iso_lenient(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight is valid"))
}
