use crate::Grade;

/// Numeric columns of a course after grade reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub grade_score: Option<f64>,
    pub credit_hours: f64,
    pub points: f64,
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Reconcile grade, credits and quality points for one course row.
///
/// - In progress: no score, zero earned credits and points.
/// - `S`/`W`: no score, zero points.
/// - Letter grade with points and attempted credits: score is
///   `points / attempted`, rounded to 2 decimals. A ratio outside 0.0–4.0
///   means the columns were misread, so the table score is used instead.
/// - Letter grade otherwise: table score, points derived from it.
///
/// Returns `None` when a completed letter-graded course has no determinable
/// score, which rejects the row.
pub fn score_course(grade: &Grade, attempted: f64, earned: f64, points: Option<f64>) -> Option<Scored> {
    if *grade == Grade::InProgress {
        return Some(Scored {
            grade_score: None,
            credit_hours: 0.0,
            points: 0.0,
        });
    }
    if grade.is_pass_or_withdraw() {
        return Some(Scored {
            grade_score: None,
            credit_hours: earned,
            points: 0.0,
        });
    }

    if let Some(p) = points
        && attempted > 0.0
    {
        let ratio = round2(p / attempted);
        if (0.0..=4.0).contains(&ratio) {
            return Some(Scored {
                grade_score: Some(ratio),
                credit_hours: earned,
                points: p,
            });
        }
        tracing::debug!(points = p, attempted, "grade ratio out of range, using grade table");
        let score = grade.table_score()?;
        return Some(Scored {
            grade_score: Some(score),
            credit_hours: earned,
            points: round3(score * attempted),
        });
    }

    let score = grade.table_score()?;
    Some(Scored {
        grade_score: Some(score),
        credit_hours: earned,
        points: points.unwrap_or_else(|| round3(score * attempted)),
    })
}
