use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;
pub mod grade;
pub mod semester;

pub use backend::{BackendError, PdfBackend};
pub use grade::{Grade, IN_PROGRESS};
pub use semester::Semester;

/// A single course extracted from a transcript.
///
/// Serializes to the flat dictionary shape the persistence layer writes,
/// one row per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// `"{SUBJECT} {NUMBER}"`, subject uppercase (e.g. `"COSC 1336"`).
    pub course_code: String,
    pub course_name: Option<String>,
    pub grade: Grade,
    /// 0.0–4.0, `None` for `S`, `W` and in-progress courses.
    pub grade_score: Option<f64>,
    /// Earned credits; 0.0 while in progress.
    pub credit_hours: f64,
    pub attempted_credits: f64,
    /// Quality points (`grade_score × attempted_credits`), 0.0 when not applicable.
    pub points: f64,
    pub semester: Option<Semester>,
    pub year: Option<i32>,
}

impl CourseRecord {
    /// Whether this record contributes to a GPA calculation.
    pub fn is_graded(&self) -> bool {
        self.grade_score.is_some()
    }
}

/// Diagnostics gathered during one transcript scan.
///
/// None of these counts are errors; they describe how much of the input was
/// recognized. `candidates - rejected - duplicate_transfer - duplicates_dropped`
/// equals the number of emitted courses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub total_lines: usize,
    pub semester_headers: usize,
    pub transfer_markers: usize,
    pub noise_lines: usize,
    pub unrecognized_lines: usize,
    /// Course-shaped matches (regular and transfer) before validation.
    pub candidates: usize,
    /// Matches dropped for missing fields or an undeterminable grade score.
    pub rejected: usize,
    /// Transfer rows seen more than once for the same course and term.
    pub duplicate_transfer: usize,
    /// Records collapsed by `(course_code, semester, year)` reconciliation.
    pub duplicates_dropped: usize,
}

/// Result of parsing one transcript.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub courses: Vec<CourseRecord>,
    pub stats: ScanStats,
}

impl ExtractionResult {
    /// `true` when the transcript was readable but no course was recognized.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
