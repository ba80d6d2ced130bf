use crate::Semester;
use crate::config::ParsingConfig;
use crate::patterns::SEMESTER_HEADER_RE;

/// Longest token accepted by the capitalize-first-letter fallback.
const MAX_FALLBACK_TOKEN_LEN: usize = 10;

/// Built-in term codes (uppercase) and the term they stand for.
const SEMESTER_CODES: &[(&str, Semester)] = &[
    ("FA", Semester::Fall),
    ("FALL", Semester::Fall),
    ("F", Semester::Fall),
    ("AU", Semester::Fall),
    ("AUTUMN", Semester::Fall),
    ("SP", Semester::Spring),
    ("SPRING", Semester::Spring),
    ("SPR", Semester::Spring),
    ("SU", Semester::Summer),
    ("SUM", Semester::Summer),
    ("SUMMER", Semester::Summer),
    ("SM", Semester::Summer),
    ("WI", Semester::Winter),
    ("WINTER", Semester::Winter),
    ("WIN", Semester::Winter),
    ("W", Semester::Winter),
];

/// Normalize a semester code or name (`"FA"`, `"spring"`, `"SUM"`) to a term.
///
/// Unknown tokens of up to 10 characters fall back to their capitalized form
/// (`"qtr"` → `Other("Qtr")`); this can mislabel exotic term systems, which
/// is why callers may register aliases through [`ParsingConfig`].
pub fn normalize_semester(code: &str) -> Option<Semester> {
    normalize_semester_with_config(code, &ParsingConfig::default())
}

/// Config-aware version of [`normalize_semester`]. Configured aliases are
/// consulted before the built-in table.
pub(crate) fn normalize_semester_with_config(
    code: &str,
    config: &ParsingConfig,
) -> Option<Semester> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_uppercase();

    let (aliases, use_defaults) = config.semester_aliases.split();
    if let Some((_, term)) = aliases.iter().find(|(alias, _)| *alias == upper) {
        return Some(term.clone());
    }
    if use_defaults
        && let Some((_, term)) = SEMESTER_CODES.iter().find(|(c, _)| *c == upper)
    {
        return Some(term.clone());
    }

    if trimmed.chars().count() <= MAX_FALLBACK_TOKEN_LEN {
        Some(Semester::Other(capitalize(trimmed)))
    } else {
        None
    }
}

/// Recognize a semester header line ("FA 2024", "Spring 2025").
///
/// The line must hold nothing but the term token and a plausible year.
pub fn parse_semester_header(line: &str) -> Option<(Semester, i32)> {
    parse_semester_header_with_config(line, &ParsingConfig::default())
}

pub(crate) fn parse_semester_header_with_config(
    line: &str,
    config: &ParsingConfig,
) -> Option<(Semester, i32)> {
    let header_re = config
        .semester_header_re
        .as_ref()
        .unwrap_or(&SEMESTER_HEADER_RE);
    let caps = header_re.captures(line)?;
    parse_term_and_year(caps.name("term")?.as_str(), caps.name("year")?.as_str(), config)
}

/// Parse a `(term token, year)` pair, validating the year range.
pub(crate) fn parse_term_and_year(
    term: &str,
    year: &str,
    config: &ParsingConfig,
) -> Option<(Semester, i32)> {
    let year: i32 = year.trim().parse().ok()?;
    if !config.year_in_range(year) {
        return None;
    }
    Some((normalize_semester_with_config(term, config)?, year))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
