//! Repair and parse the extracted payload
//!
//! The model is prone to a handful of literal mistakes: Python-style
//! booleans and `None`, and dates in whatever order it last saw. Known
//! mistakes are rewritten before the payload is parsed as JSON; anything
//! still unparseable after that aborts the turn with `ParseError`.

use crate::core::error::{PilotError, Result};
use crate::directive::Directive;
use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Normalize a payload and parse it into directives
pub fn normalize(payload: &str) -> Result<Vec<Directive>> {
    let repaired = repair_literal_tokens(payload);
    let repaired = canonicalize_dates(&repaired);
    serde_json::from_str(&repaired).map_err(|e| PilotError::ParseError(e.to_string()))
}

/// Rewrite Python-style literal tokens outside string values
///
/// `True` -> `true`, `False` -> `false`, `None` -> `null`. String
/// contents are left alone: a task titled "True Detective" stays intact.
fn repair_literal_tokens(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut chars = payload.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        out.push_str(match word.as_str() {
            "True" => "true",
            "False" => "false",
            "None" => "null",
            other => other,
        });
        word.clear();
    };

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c.is_ascii_alphabetic() {
            word.push(c);
            if chars.peek().map_or(true, |n| !n.is_ascii_alphabetic()) {
                flush(&mut word, &mut out);
            }
            continue;
        }
        out.push(c);
        if c == '"' {
            in_string = true;
        }
    }
    // Unterminated trailing word (malformed payload); pass it through
    flush(&mut word, &mut out);
    out
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(\d{1,4})[/-](\d{1,2})[/-](\d{1,4})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2}))?)?\b",
        )
        .expect("date pattern")
    })
}

/// Rewrite free-form date expressions to `YYYY-MM-DD[ HH:MM:SS]`
///
/// Field-order rules: a 4-digit group is always the year, wherever it
/// sits. The ambiguous `a/b/YYYY` order is read as month-day-year, except
/// that a first group above 12 can only be a day. Candidates that do not
/// form a real calendar date (or time) are left untouched.
fn canonicalize_dates(payload: &str) -> String {
    date_regex()
        .replace_all(payload, |caps: &Captures| {
            rewrite_date(caps).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn rewrite_date(caps: &Captures) -> Option<String> {
    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[2].parse().ok()?;
    let c: u32 = caps[3].parse().ok()?;

    let (year, month, day) = if caps[1].len() == 4 {
        (a, b, c)
    } else if caps[3].len() == 4 {
        if a > 12 {
            (c, b, a)
        } else {
            (c, a, b)
        }
    } else {
        // No 4-digit year; not confidently a date
        return None;
    };

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    let mut rendered = date.format("%Y-%m-%d").to_string();

    if let Some(hour) = caps.get(4) {
        let hour: u32 = hour.as_str().parse().ok()?;
        let minute: u32 = caps[5].parse().ok()?;
        let second: u32 = caps.get(6).map_or(Some(0), |s| s.as_str().parse().ok())?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        rendered.push(' ');
        rendered.push_str(&time.format("%H:%M:%S").to_string());
    }
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_repair_booleans_and_null() {
        let payload = r#"[{"operation": "add", "parameters": {"front": True, "deadline": None, "flat": False}}]"#;
        let repaired = repair_literal_tokens(payload);
        assert!(repaired.contains("\"front\": true"));
        assert!(repaired.contains("\"deadline\": null"));
        assert!(repaired.contains("\"flat\": false"));
    }

    #[test]
    fn test_repair_leaves_string_contents_alone() {
        let payload = r#"{"title": "True Detective None"}"#;
        assert_eq!(repair_literal_tokens(payload), payload);
    }

    #[test]
    fn test_repair_handles_escaped_quote() {
        let payload = r#"{"title": "say \"True\"", "front": True}"#;
        let repaired = repair_literal_tokens(payload);
        assert!(repaired.contains(r#""say \"True\"""#));
        assert!(repaired.ends_with("\"front\": true}"));
    }

    #[test]
    fn test_date_day_month_year() {
        assert_eq!(canonicalize_dates("\"15/03/2025\""), "\"2025-03-15\"");
    }

    #[test]
    fn test_date_ambiguous_prefers_month_day_year() {
        assert_eq!(canonicalize_dates("\"03/15/2025\""), "\"2025-03-15\"");
        assert_eq!(canonicalize_dates("\"03/04/2025\""), "\"2025-03-04\"");
    }

    #[test]
    fn test_date_year_first() {
        assert_eq!(canonicalize_dates("2025/03/15"), "2025-03-15");
        assert_eq!(canonicalize_dates("2025-3-5"), "2025-03-05");
    }

    #[test]
    fn test_date_with_time() {
        assert_eq!(
            canonicalize_dates("15/03/2025 9:30"),
            "2025-03-15 09:30:00"
        );
        assert_eq!(
            canonicalize_dates("2025-03-15T09:30:45"),
            "2025-03-15 09:30:45"
        );
    }

    #[test]
    fn test_invalid_date_left_untouched() {
        assert_eq!(canonicalize_dates("31/02/2025"), "31/02/2025");
        assert_eq!(canonicalize_dates("15/03/2025 25:00"), "15/03/2025 25:00");
        // No 4-digit year anywhere
        assert_eq!(canonicalize_dates("15/03/25"), "15/03/25");
    }

    #[test]
    fn test_normalize_full_payload() {
        let payload = r#"[
            {"operation": "add",
             "parameters": {"title": "pay rent", "deadline": "01/05/2025", "front": True},
             "rationale": "user asked for a reminder"}
        ]"#;
        let directives = normalize(payload).unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].operation, "add");
        assert_eq!(
            directives[0].parameters["deadline"],
            serde_json::json!("2025-01-05")
        );
        assert_eq!(directives[0].parameters["front"], serde_json::json!(true));
    }

    #[test]
    fn test_normalize_garbage_is_parse_error() {
        let err = normalize("[{bad json").unwrap_err();
        assert!(matches!(err, PilotError::ParseError(_)));
    }

    proptest! {
        /// Canonical output re-normalizes to itself.
        #[test]
        fn prop_canonicalization_idempotent(
            y in 1970u32..2100,
            m in 1u32..=12,
            d in 1u32..=28,
            h in 0u32..24,
            min in 0u32..60,
        ) {
            let input = format!("{:02}/{:02}/{} {}:{:02}", m, d, y, h, min);
            let once = canonicalize_dates(&input);
            let twice = canonicalize_dates(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.starts_with(&y.to_string()));
        }
    }
}
