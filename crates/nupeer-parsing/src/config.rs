use regex::Regex;

use crate::Semester;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Add these values to the defaults.
    Extend(Vec<T>),
}

impl<T> ListOverride<T> {
    /// The custom values, and whether the built-in defaults still apply.
    pub fn split(&self) -> (&[T], bool) {
        match self {
            ListOverride::Default => (&[], true),
            ListOverride::Replace(v) => (v.as_slice(), false),
            ListOverride::Extend(v) => (v.as_slice(), true),
        }
    }

    /// Iterate the effective list: defaults (unless replaced) followed by custom values.
    pub fn iter_with<'a>(&'a self, defaults: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        let (custom, use_defaults) = self.split();
        let defaults: &[T] = if use_defaults { defaults } else { &[] };
        defaults.iter().chain(custom.iter())
    }
}

/// Configuration for the course line parser.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── text_processing.rs ──
    /// Course titles longer than this are truncated at a word boundary (default: 250).
    pub(crate) max_title_length: usize,

    // ── semester.rs ──
    /// Inclusive range of plausible years for headers and transfer markers.
    pub(crate) min_year: i32,
    pub(crate) max_year: i32,
    /// Regex recognizing a semester header line; needs `term` and `year` groups.
    pub(crate) semester_header_re: Option<Regex>,
    /// Extra semester codes (uppercase) mapped to a term.
    pub(crate) semester_aliases: ListOverride<(String, Semester)>,

    // ── line.rs ──
    /// Header/summary lines to discard.
    pub(crate) noise_patterns: ListOverride<Regex>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_title_length: 250,
            min_year: 1900,
            max_year: 2100,
            semester_header_re: None,
            semester_aliases: ListOverride::Default,
            noise_patterns: ListOverride::Default,
        }
    }
}

impl ParsingConfig {
    pub fn max_title_length(&self) -> usize {
        self.max_title_length
    }

    /// Whether `year` falls inside the configured plausible range.
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    max_title_length: Option<usize>,
    min_year: Option<i32>,
    max_year: Option<i32>,
    semester_header_re: Option<String>,
    semester_aliases: ListOverride<(String, String)>,
    noise_patterns: ListOverride<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Scalars ──

    pub fn max_title_length(mut self, n: usize) -> Self {
        self.max_title_length = Some(n);
        self
    }

    pub fn year_range(mut self, min: i32, max: i32) -> Self {
        self.min_year = Some(min);
        self.max_year = Some(max);
        self
    }

    pub fn min_year(mut self, year: i32) -> Self {
        self.min_year = Some(year);
        self
    }

    pub fn max_year(mut self, year: i32) -> Self {
        self.max_year = Some(year);
        self
    }

    // ── Semester header ──

    /// Override the header regex. It must define `term` and `year` capture groups.
    pub fn semester_header_regex(mut self, pattern: &str) -> Self {
        self.semester_header_re = Some(pattern.to_string());
        self
    }

    // ── Semester aliases ──

    pub fn set_semester_aliases(mut self, aliases: Vec<(String, String)>) -> Self {
        self.semester_aliases = ListOverride::Replace(aliases);
        self
    }

    /// Map an extra term code (e.g. `"QTR"`) to a term name (e.g. `"Fall"`).
    pub fn add_semester_alias(mut self, code: &str, term: &str) -> Self {
        let entry = (code.to_string(), term.to_string());
        match &mut self.semester_aliases {
            ListOverride::Default => self.semester_aliases = ListOverride::Extend(vec![entry]),
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(entry),
        }
        self
    }

    // ── Noise patterns ──

    pub fn set_noise_patterns(mut self, patterns: Vec<String>) -> Self {
        self.noise_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_noise_pattern(mut self, pattern: String) -> Self {
        match &mut self.noise_patterns {
            ListOverride::Default => self.noise_patterns = ListOverride::Extend(vec![pattern]),
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(pattern),
        }
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile_list = |list: ListOverride<String>| -> Result<ListOverride<Regex>, regex::Error> {
            Ok(match list {
                ListOverride::Default => ListOverride::Default,
                ListOverride::Replace(p) => ListOverride::Replace(
                    p.iter().map(|s| Regex::new(s)).collect::<Result<_, _>>()?,
                ),
                ListOverride::Extend(p) => ListOverride::Extend(
                    p.iter().map(|s| Regex::new(s)).collect::<Result<_, _>>()?,
                ),
            })
        };

        let normalize_aliases =
            |v: Vec<(String, String)>| -> Vec<(String, Semester)> {
                v.into_iter()
                    .map(|(code, term)| (code.trim().to_uppercase(), Semester::from_name(&term)))
                    .collect()
            };
        let semester_aliases = match self.semester_aliases {
            ListOverride::Default => ListOverride::Default,
            ListOverride::Replace(v) => ListOverride::Replace(normalize_aliases(v)),
            ListOverride::Extend(v) => ListOverride::Extend(normalize_aliases(v)),
        };

        let defaults = ParsingConfig::default();
        Ok(ParsingConfig {
            max_title_length: self.max_title_length.unwrap_or(defaults.max_title_length),
            min_year: self.min_year.unwrap_or(defaults.min_year),
            max_year: self.max_year.unwrap_or(defaults.max_year),
            semester_header_re: self
                .semester_header_re
                .map(|p| Regex::new(&p))
                .transpose()?,
            semester_aliases,
            noise_patterns: compile_list(self.noise_patterns)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.max_title_length, 250);
        assert!(config.year_in_range(1900));
        assert!(config.year_in_range(2100));
        assert!(!config.year_in_range(2101));
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .max_title_length(80)
            .year_range(1990, 2030)
            .build()
            .unwrap();
        assert_eq!(config.max_title_length, 80);
        assert!(!config.year_in_range(1989));
        assert!(config.year_in_range(2030));
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new()
            .add_noise_pattern(r"[invalid".to_string())
            .build();
        assert!(result.is_err());

        let result = ParsingConfigBuilder::new()
            .semester_header_regex(r"(?P<term>")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_aliases_are_uppercased() {
        let config = ParsingConfigBuilder::new()
            .add_semester_alias("qtr", "fall")
            .build()
            .unwrap();
        let (custom, use_defaults) = config.semester_aliases.split();
        assert!(use_defaults);
        assert_eq!(custom, &[("QTR".to_string(), Semester::Fall)]);
    }

    #[test]
    fn test_list_override_iter_with() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.iter_with(&defaults).count(), 2);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.iter_with(&defaults).collect::<Vec<_>>(), vec!["x"]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.iter_with(&defaults).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }
}
