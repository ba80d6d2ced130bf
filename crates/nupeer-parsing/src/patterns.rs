//! Compiled line patterns, built once per process.
//!
//! Course-shaped lines are tried against [`COURSE_PATTERNS`] in order, from the
//! strict three-decimal layout down to the short form without a points column.

use once_cell::sync::Lazy;
use regex::Regex;

/// "Test Credits" / "Transfer Credits" block heading.
pub(crate) static TRANSFER_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:test|transfer)\s+credits?\b").unwrap());

/// "Transferred to Term FA 2023".
pub(crate) static TRANSFERRED_TO_TERM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btransferred\s+to\s+term\s+(?P<term>[A-Za-z]{2,10})\s*(?P<year>\d{4})\b")
        .unwrap()
});

pub(crate) static UNDERGRADUATE_RECORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbeginning\s+of\s+undergraduate\s+record\b").unwrap());

/// A line holding only a term token and a year: "FA 2024", "Spring2025".
pub(crate) static SEMESTER_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<term>[A-Za-z]{2,10})\s*(?P<year>\d{4})\s*$").unwrap());

/// Transfer row: `SUBJECT CATALOG# TITLE CREDITS S|W`.
pub(crate) static TRANSFER_COURSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<subject>[A-Za-z]{2,4})\s+(?P<number>\d{3,4})\s+(?P<title>.+?)\s+(?P<credits>\d+(?:\.\d+)?)\s+(?P<grade>(?i:[SW]))$",
    )
    .unwrap()
});

pub(crate) static DEFAULT_NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bcourse\s+description\b",
        r"(?i)\battempted\b.*\bearned\b",
        r"(?i)\bterm\s+gpa\b",
        r"(?i)\bterm\s+totals?\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Which course layout produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseLayout {
    /// `ATTEMPTED EARNED GRADE POINTS`, all numbers with exactly three decimals.
    Full,
    /// Same columns with any number of decimals.
    Loose,
    /// `ATTEMPTED EARNED GRADE`, no points column.
    Short,
}

pub(crate) static COURSE_PATTERNS: Lazy<Vec<(CourseLayout, Regex)>> = Lazy::new(|| {
    vec![
        (
            CourseLayout::Full,
            Regex::new(
                r"\b(?P<subject>[A-Za-z]{2,4})\s+(?P<number>\d{3,4})\s+(?P<title>.+?)\s+(?P<attempted>\d+\.\d{3})\s+(?P<earned>\d+\.\d{3})\s+(?P<grade>(?i:[A-F][+-]?|S|W|in\s+progress))\s+(?P<points>\d+\.\d{3})\b",
            )
            .unwrap(),
        ),
        (
            CourseLayout::Loose,
            Regex::new(
                r"\b(?P<subject>[A-Za-z]{2,4})\s+(?P<number>\d{3,4})\s+(?P<title>.+?)\s+(?P<attempted>\d+\.\d+)\s+(?P<earned>\d+\.\d+)\s+(?P<grade>(?i:[A-F][+-]?|S|W|in\s+progress))\s+(?P<points>\d+\.\d+)\b",
            )
            .unwrap(),
        ),
        // No lookahead in `regex`: the grade is closed by one whitespace char or end of line
        (
            CourseLayout::Short,
            Regex::new(
                r"\b(?P<subject>[A-Za-z]{2,4})\s+(?P<number>\d{3,4})\s+(?P<title>.+?)\s+(?P<attempted>\d+\.\d+)\s+(?P<earned>\d+\.\d+)\s+(?P<grade>(?i:[A-F][+-]?|S|W|in\s+progress))(?:\s|$)",
            )
            .unwrap(),
        ),
    ]
});
