use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized academic term name.
///
/// Codes outside the built-in table survive as [`Semester::Other`], holding the
/// capitalized token (e.g. a quarter-system `"Qtr"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Semester {
    Fall,
    Spring,
    Summer,
    Winter,
    Other(String),
}

impl Semester {
    /// Sort priority within a year: Fall < Spring < Summer < Winter, unknown last.
    pub fn sort_priority(&self) -> u8 {
        match self {
            Semester::Fall => 0,
            Semester::Spring => 1,
            Semester::Summer => 2,
            Semester::Winter => 3,
            Semester::Other(_) => 99,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Semester::Fall => "Fall",
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
            Semester::Winter => "Winter",
            Semester::Other(s) => s,
        }
    }

    /// Map a canonical term name (`"Fall"`, `"spring"`, ...) to its variant.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fall" => Semester::Fall,
            "spring" => Semester::Spring,
            "summer" => Semester::Summer,
            "winter" => Semester::Winter,
            _ => Semester::Other(name.trim().to_string()),
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Semester {
    fn from(s: String) -> Self {
        Semester::from_name(&s)
    }
}

impl From<Semester> for String {
    fn from(s: Semester) -> Self {
        s.as_str().to_string()
    }
}
