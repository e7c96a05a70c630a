//! Whitespace canonicalization for extracted page text.
//!
//! Every engine runs its per-page output through [`normalize_block`] and then
//! joins hyphen-split words across the whole document with [`dehyphenate`].

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r]+\n").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static PAGE_FOOTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*Page\s+\d+\s+(of|/)\s*\d+\s*$").unwrap());

/// Canonicalize one page's worth of extracted text.
///
/// Rules, in order: non-breaking spaces become spaces; trailing whitespace
/// before a newline is dropped; runs of three or more newlines collapse to a
/// single blank line; tabs and carriage returns become spaces; runs of two or
/// more spaces collapse to one; standalone "Page N of M" footer lines are
/// removed; the result is trimmed. Idempotent.
pub fn normalize_block(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace('\u{00A0}', " ");
    let text = TRAILING_WS_RE.replace_all(&text, "\n");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    let text = text.replace(['\t', '\r'], " ");
    let text = MULTI_SPACE_RE.replace_all(&text, " ");
    let text = PAGE_FOOTER_RE.replace_all(&text, "");
    text.trim().to_string()
}

/// Rejoin words split across a line wrap.
///
/// A line ending with a hyphen followed by a line whose first character is
/// lowercase is treated as a hyphenated wrap: the hyphen is dropped and the
/// next line appended to the previous one.
pub fn dehyphenate(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let joins = out.last().is_some_and(|prev| {
            prev.trim_end().ends_with('-') && line.chars().next().is_some_and(|c| c.is_lowercase())
        });
        if joins {
            let prev = out.last_mut().unwrap();
            let trimmed = prev.trim_end();
            let mut merged = trimmed[..trimmed.len() - 1].to_string();
            merged.push_str(line.trim_start());
            *prev = merged;
        } else {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nbsp_and_tabs_become_spaces() {
        assert_eq!(normalize_block("a\u{00A0}b\tc"), "a b c");
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(normalize_block("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn multi_spaces_collapse() {
        assert_eq!(normalize_block("a    b  c"), "a b c");
    }

    #[test]
    fn page_footer_removed() {
        let text = "Experience\npage 2 of 3\nmore text";
        let out = normalize_block(text);
        assert!(!out.to_lowercase().contains("page 2"));
        assert!(out.contains("Experience"));
        assert!(out.contains("more text"));
    }

    #[test]
    fn page_footer_slash_form_removed() {
        let out = normalize_block("Page 1 / 4");
        assert_eq!(out, "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = "  Name\u{00A0} Surname \n\n\n\nPage 1 of 2\n  skills:   a,  b\t c \n";
        let once = normalize_block(raw);
        let twice = normalize_block(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn dehyphenation_joins_wrapped_word() {
        let lines = vec!["collabo-".to_string(), "ration".to_string()];
        assert_eq!(dehyphenate(lines), vec!["collaboration".to_string()]);
    }

    #[test]
    fn dehyphenation_keeps_capitalized_continuation() {
        let lines = vec!["end-".to_string(), "To-End".to_string()];
        assert_eq!(
            dehyphenate(lines),
            vec!["end-".to_string(), "To-End".to_string()]
        );
    }

    #[test]
    fn dehyphenation_spans_page_joins() {
        let lines = vec![
            "worked on micro-".to_string(),
            "services and infra".to_string(),
            "plain line".to_string(),
        ];
        assert_eq!(
            dehyphenate(lines),
            vec![
                "worked on microservices and infra".to_string(),
                "plain line".to_string(),
            ]
        );
    }
}
