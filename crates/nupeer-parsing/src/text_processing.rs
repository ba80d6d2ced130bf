use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// Expand common typographic ligatures found in PDF text layers.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Prepare extracted text for the line scan: unify line endings, turn
/// non-breaking spaces into plain spaces and expand ligatures.
pub fn normalize_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace(['\u{00A0}', '\u{2007}', '\u{202F}'], " ");
    expand_ligatures(&text)
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a captured course title.
///
/// Strips decimal fragments (credit/points columns) that a loose pattern let
/// into the tail of the title, collapses whitespace and caps the length.
/// Returns `None` if nothing is left.
pub fn clean_title(raw: &str) -> Option<String> {
    clean_title_with_config(raw, &ParsingConfig::default())
}

pub(crate) fn clean_title_with_config(raw: &str, config: &ParsingConfig) -> Option<String> {
    static TRAILING_NUMBERS_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?:\s+\d+\.\d+)+\s*$").unwrap());

    let title = collapse_whitespace(raw);
    let title = TRAILING_NUMBERS_RE.replace(&title, "");
    let title = title.trim();
    if title.is_empty() || title.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let title = truncate_title(title, config.max_title_length);
    let title = title.trim_end();
    (!title.is_empty()).then(|| title.to_string())
}

/// Cap a title at `max_chars`.
///
/// A leading segment before ` - ` or ` | ` is preferred; otherwise the cut
/// falls on the last space in the final fifth of the allowance, or hard at
/// `max_chars` when there is none.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }

    for delimiter in [" - ", " | "] {
        if let Some((head, _)) = title.split_once(delimiter) {
            let head = head.trim();
            if !head.is_empty() && head.chars().count() <= max_chars {
                return head.to_string();
            }
        }
    }

    let byte_cut = title
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(title.len());
    let truncated = &title[..byte_cut];
    let min_break = max_chars * 4 / 5;
    match truncated.rfind(' ') {
        Some(space) if truncated[..space].chars().count() > min_break => {
            truncated[..space].trim_end().to_string()
        }
        _ => truncated.to_string(),
    }
}
