use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel grade string for courses that are still in progress.
pub const IN_PROGRESS: &str = "IN PROGRESS";

/// A transcript grade.
///
/// Serializes as the plain grade string (`"A-"`, `"S"`, `"W"`, `"IN PROGRESS"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    /// Letter grade, uppercase, with optional `+`/`-` (e.g. `"B+"`).
    Letter(String),
    /// `S`: satisfactory / transfer credit, no grade points.
    Satisfactory,
    /// `W`: withdrawn.
    Withdrawn,
    InProgress,
}

impl Grade {
    /// Normalize a raw grade token.
    ///
    /// Internal whitespace is collapsed and case is folded before comparison,
    /// so `"in  progress"` and `"In Progress"` both become [`Grade::InProgress`].
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        match normalized.as_str() {
            IN_PROGRESS => Grade::InProgress,
            "S" => Grade::Satisfactory,
            "W" => Grade::Withdrawn,
            _ => Grade::Letter(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Grade::Letter(g) => g,
            Grade::Satisfactory => "S",
            Grade::Withdrawn => "W",
            Grade::InProgress => IN_PROGRESS,
        }
    }

    /// `S` and `W` never carry grade points.
    pub fn is_pass_or_withdraw(&self) -> bool {
        matches!(self, Grade::Satisfactory | Grade::Withdrawn)
    }

    /// Static letter-grade to 4.0-scale lookup.
    ///
    /// Returns `None` for non-letter grades and unknown letters (e.g. `"E"`).
    pub fn table_score(&self) -> Option<f64> {
        let Grade::Letter(letter) = self else {
            return None;
        };
        let score = match letter.as_str() {
            "A+" | "A" => 4.0,
            "A-" => 3.7,
            "B+" => 3.3,
            "B" => 3.0,
            "B-" => 2.7,
            "C+" => 2.3,
            "C" => 2.0,
            "C-" => 1.7,
            "D+" => 1.3,
            "D" => 1.0,
            "D-" => 0.7,
            "F" => 0.0,
            _ => return None,
        };
        Some(score)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Grade {
    fn from(s: String) -> Self {
        Grade::parse(&s)
    }
}

impl From<Grade> for String {
    fn from(g: Grade) -> Self {
        g.as_str().to_string()
    }
}
