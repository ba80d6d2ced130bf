use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod grade;
pub mod line;
pub mod patterns;
pub mod reconcile;
pub mod semester;
pub mod state;
pub mod text_processing;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use extractor::TranscriptParser;
pub use line::{CourseLine, LineKind, classify_line};
pub use patterns::CourseLayout;
pub use reconcile::{dedup_courses, reconcile, sort_courses};
pub use semester::{normalize_semester, parse_semester_header};
pub use state::ParserState;
// Re-export domain types from core (canonical definitions live there)
pub use nupeer_core::{
    BackendError, CourseRecord, ExtractionResult, Grade, PdfBackend, ScanStats, Semester,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("backend error: {0}")]
    Backend(#[from] nupeer_core::BackendError),
}

/// Parse already-extracted transcript text into course records.
///
/// Pipeline:
/// 1. Normalize line endings, non-breaking spaces and ligatures
/// 2. Classify each line, carrying semester and transfer state forward
/// 3. Validate course candidates and reconcile grade points
/// 4. Deduplicate by (course code, semester, year) and sort newest first
pub fn parse_courses(text: &str) -> Vec<CourseRecord> {
    TranscriptParser::new().parse_courses(text)
}

/// Extract text from a PDF with `backend` and parse it into course records.
///
/// Fails only when text extraction fails.
pub fn process_transcript(
    pdf: &[u8],
    backend: &dyn PdfBackend,
) -> Result<Vec<CourseRecord>, ParsingError> {
    Ok(TranscriptParser::new().process_transcript(pdf, backend)?.courses)
}
