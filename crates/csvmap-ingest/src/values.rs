//! Helpers for reading raw cell strings.
//!
//! Shared by header detection, column profiling and validation-time coercion.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Cell values read as "no value" in addition to blank strings.
pub const MISSING_SENTINELS: &[&str] = &["NA", "N/A", "NAN", "NULL", "NONE", "#N/A"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const TRUE_TOKENS: &[&str] = &["true", "yes", "y", "t", "1"];
const FALSE_TOKENS: &[&str] = &["false", "no", "n", "f", "0"];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,63}$").expect("Invalid email regex")
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?(\d[\s\-]?)?(\(?\d{2,4}\)?[\s\-]?)?[\d\s\-]{6,15}\d$")
        .expect("Invalid phone regex")
});

/// True for blank strings and the sentinels in [`MISSING_SENTINELS`].
pub fn is_missing_value(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || MISSING_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

pub fn parse_i64(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Finite decimal numbers only; `NaN` and `inf` spellings are rejected.
pub fn parse_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !trimmed.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    let lower = raw.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parses calendar dates in the accepted layouts, or the date part of a datetime.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|datetime| datetime.date_naive())
}

pub fn looks_like_email(raw: &str) -> bool {
    EMAIL_REGEX.is_match(raw.trim())
}

pub fn looks_like_phone(raw: &str) -> bool {
    PHONE_REGEX.is_match(raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sentinels_are_case_insensitive() {
        for raw in ["", "  ", "NA", "n/a", "NaN", "null", "None", "#N/A"] {
            assert!(is_missing_value(raw), "{raw:?} should be missing");
        }
        assert!(!is_missing_value("0"));
        assert!(!is_missing_value("Nancy"));
    }

    #[test]
    fn numbers_reject_non_finite_spellings() {
        assert_eq!(parse_f64(" 2.5 "), Some(2.5));
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_i64("-7"), Some(-7));
        assert_eq!(parse_i64("7.0"), None);
    }

    #[test]
    fn booleans_accept_common_tokens() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn dates_accept_listed_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for raw in [
            "2024-03-15",
            "2024/03/15",
            "15-03-2024",
            "15/03/2024",
            "03/15/2024",
            "2024-03-15 10:30:00",
            "2024-03-15T10:30:00Z",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn email_and_phone_shapes() {
        assert!(looks_like_email("john.doe@example.com"));
        assert!(!looks_like_email("email"));
        assert!(looks_like_phone("+1 555-012-3456"));
        assert!(!looks_like_phone("phone"));
    }
}
