use std::collections::HashSet;

use crate::config::ParsingConfig;
use crate::line::{LineKind, classify_line};
use crate::reconcile::reconcile;
use crate::state::ParserState;
use crate::text_processing::normalize_text;
use crate::{CourseRecord, ExtractionResult, ParsingError, PdfBackend, ScanStats, Semester};

/// Tag distinguishing the transfer-row dedup set from the main reconciliation key.
const TRANSFER_TAG: &str = "transfer";

type TransferKey = (String, Semester, i32, &'static str);

/// A configurable transcript parsing pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`TranscriptParser::with_config`] to supply custom patterns and limits.
pub struct TranscriptParser {
    config: ParsingConfig,
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser {
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Extract raw text from PDF bytes (step 1).
    pub fn extract_text(&self, pdf: &[u8], backend: &dyn PdfBackend) -> Result<String, ParsingError> {
        Ok(backend.extract_text(pdf)?)
    }

    /// Classify one line against the given scan state (step 2).
    pub fn classify_line(&self, line: &str, state: &ParserState) -> LineKind {
        classify_line(line, state, &self.config)
    }

    /// Parse already-extracted text into reconciled course records.
    pub fn parse_courses(&self, text: &str) -> Vec<CourseRecord> {
        self.parse_text(text).courses
    }

    /// Run the line scan and reconciliation, keeping scan diagnostics.
    pub fn parse_text(&self, text: &str) -> ExtractionResult {
        let text = normalize_text(text);

        let mut state = ParserState::new();
        let mut stats = ScanStats::default();
        let mut raw: Vec<CourseRecord> = Vec::new();
        let mut seen_transfers: HashSet<TransferKey> = HashSet::new();

        for line in text.lines() {
            stats.total_lines += 1;
            if line.trim().is_empty() {
                continue;
            }

            let kind = classify_line(line, &state, &self.config);
            state.apply(&kind);

            match kind {
                LineKind::TransferSection
                | LineKind::TransferredToTerm(_)
                | LineKind::TransferExit => {
                    stats.transfer_markers += 1;
                }
                LineKind::TransferCourse(course) => {
                    stats.candidates += 1;
                    let Some((term, year)) = state.transfer_target() else {
                        continue;
                    };
                    let key = (course.course_code.clone(), term.clone(), year, TRANSFER_TAG);
                    if seen_transfers.insert(key) {
                        raw.push(course.into_record(Some(term.clone()), Some(year)));
                    } else {
                        tracing::debug!(code = %course.course_code, "duplicate transfer row");
                        stats.duplicate_transfer += 1;
                    }
                }
                LineKind::Header { semester, year } => {
                    tracing::debug!(%semester, year, "semester header");
                    stats.semester_headers += 1;
                }
                LineKind::Noise => {
                    stats.noise_lines += 1;
                }
                LineKind::Courses { courses, rejected } => {
                    stats.candidates += courses.len() + rejected;
                    stats.rejected += rejected;
                    raw.extend(courses.into_iter().map(|c| {
                        c.into_record(state.current_semester.clone(), state.current_year)
                    }));
                }
                LineKind::Unrecognized => {
                    stats.unrecognized_lines += 1;
                }
            }
        }

        let (courses, dropped) = reconcile(raw);
        stats.duplicates_dropped = dropped;

        tracing::info!(
            candidates = stats.candidates,
            emitted = courses.len(),
            rejected = stats.rejected,
            duplicates = stats.duplicates_dropped + stats.duplicate_transfer,
            "transcript parsed"
        );
        if courses.is_empty() {
            tracing::warn!(
                lines = stats.total_lines,
                unrecognized = stats.unrecognized_lines,
                "no courses found in transcript"
            );
        }

        ExtractionResult { courses, stats }
    }

    /// Extract text with `backend`, then parse it.
    ///
    /// Only extraction failures are errors; unparseable lines just yield
    /// fewer records.
    pub fn process_transcript(
        &self,
        pdf: &[u8],
        backend: &dyn PdfBackend,
    ) -> Result<ExtractionResult, ParsingError> {
        let text = self.extract_text(pdf, backend)?;
        Ok(self.parse_text(&text))
    }
}
