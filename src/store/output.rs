//! Parse textual output from the task store
//!
//! The store styles its listings with ANSI escapes; those are stripped
//! before any parsing. Task rows follow a column-delimited grammar:
//!
//! ```text
//! ID | [done-marker] title [★priority] [#context]
//! ```
//!
//! Lines that do not match (headers, separators, context footers) are
//! skipped.

use regex::Regex;
use std::sync::OnceLock;

/// One task row parsed from a listing
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    /// The store's stable hex task ID
    pub id: String,
    pub title: String,
    pub done: bool,
    pub priority: Option<u32>,
    pub context: Option<String>,
}

fn ansi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ansi pattern"))
}

fn row_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([0-9a-f]+)\s*\|\s*(?:(✓|\[DONE\])\s+)?(.*?)(?:\s+★(\d+))?(?:\s+#(\S+))?\s*$")
            .expect("row pattern")
    })
}

/// Remove ANSI styling sequences
pub fn strip_ansi(text: &str) -> String {
    ansi_regex().replace_all(text, "").into_owned()
}

/// Parse every task row out of a (possibly styled) listing
pub fn parse_rows(listing: &str) -> Vec<TaskRow> {
    strip_ansi(listing)
        .lines()
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<TaskRow> {
    let caps = row_regex().captures(line)?;
    let title = caps[3].trim().to_string();
    if title.is_empty() {
        return None;
    }
    Some(TaskRow {
        id: caps[1].to_string(),
        done: caps.get(2).is_some(),
        title,
        priority: caps.get(4).and_then(|p| p.as_str().parse().ok()),
        context: caps.get(5).map(|c| c.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        let styled = "\x1b[1m 1\x1b[0m | \x1b[32mElden Ring\x1b[0m";
        assert_eq!(strip_ansi(styled), " 1 | Elden Ring");
    }

    #[test]
    fn test_parse_plain_row() {
        let rows = parse_rows(" 1 | Elden Ring ★5 #games");
        assert_eq!(
            rows,
            vec![TaskRow {
                id: "1".into(),
                title: "Elden Ring".into(),
                done: false,
                priority: Some(5),
                context: Some("games".into()),
            }]
        );
    }

    #[test]
    fn test_parse_done_marker_and_hex_id() {
        let rows = parse_rows(" b | ✓ bananas #shoppinglist");
        assert_eq!(rows[0].id, "b");
        assert!(rows[0].done);
        assert_eq!(rows[0].title, "bananas");
        assert_eq!(rows[0].priority, None);
    }

    #[test]
    fn test_parse_minimal_row() {
        let rows = parse_rows(" 2 | water the pots");
        assert_eq!(rows[0].title, "water the pots");
        assert_eq!(rows[0].context, None);
    }

    #[test]
    fn test_skips_non_task_lines() {
        let listing = "\
# games
 1 | Elden Ring ★5 #games
---
Subcontexts: study, work
";
        let rows = parse_rows(listing);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
    }

    #[test]
    fn test_styled_listing_roundtrip() {
        let listing = "\x1b[2m 1\x1b[0m | \x1b[1mElden Ring\x1b[0m ★5 #games\n\x1b[2m 2\x1b[0m | Rust #games_wishlist";
        let rows = parse_rows(listing);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title, "Rust");
        assert_eq!(rows[1].context.as_deref(), Some("games_wishlist"));
    }
}
