use std::io::Write;

use nupeer_core::{CourseRecord, Grade, ScanStats};
use nupeer_parsing::LineKind;
use owo_colors::OwoColorize;

/// Widest course name shown in the table.
const MAX_NAME_WIDTH: usize = 50;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the "found N courses" line and any scan diagnostics worth noting.
pub fn print_parse_summary(
    w: &mut dyn Write,
    file_name: &str,
    found: usize,
    stats: &ScanStats,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Parsing courses from {}...", file_name)?;
    if color.enabled() {
        writeln!(w, "{}", format!("Found {} courses", found).green())?;
    } else {
        writeln!(w, "Found {} courses", found)?;
    }

    if stats.rejected > 0 || stats.duplicates_dropped > 0 {
        let msg = format!(
            "(Rejected {} candidates, merged {} duplicates)",
            stats.rejected, stats.duplicates_dropped
        );
        if color.enabled() {
            writeln!(w, "{}", msg.dimmed())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

pub fn print_no_courses(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "No courses found in transcript".red())
    } else {
        writeln!(w, "No courses found in transcript")
    }
}

/// Print courses as a fixed-width table.
pub fn print_table(
    w: &mut dyn Write,
    courses: &[CourseRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    let code_width = courses
        .iter()
        .map(|c| c.course_code.chars().count())
        .max()
        .unwrap_or(0)
        .max(12);
    let name_width = courses
        .iter()
        .map(|c| c.course_name.as_deref().map_or(3, |n| n.chars().count()))
        .max()
        .unwrap_or(0)
        .clamp(11, MAX_NAME_WIDTH);
    let grade_width = courses
        .iter()
        .map(|c| c.grade.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    let header = format!(
        "{:<code_width$}  {:<name_width$}  {:<grade_width$}  {:<8}  {:<12}  {:<6}",
        "Course Code", "Course Name", "Grade", "Credits", "Semester", "Year"
    );
    let rule = "=".repeat(header.chars().count());

    writeln!(w, "{}", rule)?;
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    writeln!(w, "{}", rule)?;

    for course in courses {
        let name: String = course
            .course_name
            .as_deref()
            .unwrap_or("N/A")
            .chars()
            .take(MAX_NAME_WIDTH)
            .collect();
        let credits = if course.credit_hours > 0.0 {
            format!("{:.1}", course.credit_hours)
        } else {
            "N/A".to_string()
        };
        let semester = course
            .semester
            .as_ref()
            .map_or_else(|| "N/A".to_string(), |s| s.to_string());
        let year = course
            .year
            .map_or_else(|| "N/A".to_string(), |y| y.to_string());

        let mut row = format!(
            "{:<code_width$}  {:<name_width$}  {:<grade_width$}  {:<8}  {:<12}  {:<6}",
            course.course_code,
            name,
            course.grade.as_str(),
            credits,
            semester,
            year
        );
        if let Some(score) = course.grade_score {
            row.push_str(&format!("  (GPA: {:.2})", score));
        }
        writeln!(w, "{}", row.trim_end())?;
    }

    writeln!(w, "{}", rule)?;
    Ok(())
}

pub fn print_json(w: &mut dyn Write, courses: &[CourseRecord]) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, courses)?;
    writeln!(w)
}

/// Aggregate figures for the summary view.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_courses: usize,
    pub total_credits: f64,
    /// Credit-weighted over graded courses; `None` if nothing is graded.
    pub gpa: Option<f64>,
    pub graded_courses: usize,
    /// `(letter, count, percent of all courses)` for A-F, omitting zero counts.
    pub distribution: Vec<(char, usize, f64)>,
}

pub fn summarize(courses: &[CourseRecord]) -> Summary {
    let total_credits: f64 = courses.iter().map(|c| c.credit_hours).sum();

    let graded: Vec<&CourseRecord> = courses.iter().filter(|c| c.is_graded()).collect();
    let graded_credits: f64 = graded.iter().map(|c| c.credit_hours).sum();
    let weighted: f64 = graded
        .iter()
        .map(|c| c.grade_score.unwrap_or(0.0) * c.credit_hours)
        .sum();
    let gpa = if graded.is_empty() {
        None
    } else if graded_credits > 0.0 {
        Some(weighted / graded_credits)
    } else {
        Some(0.0)
    };

    let distribution = ['A', 'B', 'C', 'D', 'F']
        .into_iter()
        .filter_map(|letter| {
            let count = courses
                .iter()
                .filter(|c| {
                    matches!(c.grade, Grade::Letter(_)) && c.grade.as_str().starts_with(letter)
                })
                .count();
            (count > 0).then(|| (letter, count, count as f64 * 100.0 / courses.len() as f64))
        })
        .collect();

    Summary {
        total_courses: courses.len(),
        total_credits,
        gpa,
        graded_courses: graded.len(),
        distribution,
    }
}

pub fn print_summary(
    w: &mut dyn Write,
    courses: &[CourseRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    let summary = summarize(courses);

    if color.enabled() {
        writeln!(w, "{}", "Summary:".bold())?;
    } else {
        writeln!(w, "Summary:")?;
    }
    writeln!(w, "   Total Courses: {}", summary.total_courses)?;
    writeln!(w, "   Total Credits: {:.1}", summary.total_credits)?;
    if let Some(gpa) = summary.gpa {
        writeln!(
            w,
            "   GPA: {:.2} (based on {} graded courses)",
            gpa, summary.graded_courses
        )?;
    }

    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Grade Distribution:".bold())?;
    } else {
        writeln!(w, "Grade Distribution:")?;
    }
    for (letter, count, percent) in &summary.distribution {
        writeln!(w, "   {}: {} courses ({:.1}%)", letter, count, percent)?;
    }
    Ok(())
}

/// Short label for a line classification, used by the `classify` view.
pub fn kind_label(kind: &LineKind) -> &'static str {
    match kind {
        LineKind::TransferSection => "TRANSFER",
        LineKind::TransferredToTerm(Some(_)) => "TRANSFER-TERM",
        LineKind::TransferredToTerm(None) => "TRANSFER-TERM?",
        LineKind::TransferExit => "TRANSFER-END",
        LineKind::TransferCourse(_) => "TRANSFER-ROW",
        LineKind::Header { .. } => "HEADER",
        LineKind::Noise => "NOISE",
        LineKind::Courses { courses, .. } if courses.is_empty() => "REJECTED",
        LineKind::Courses { .. } => "COURSE",
        LineKind::Unrecognized => "-",
    }
}

pub fn print_classified_line(
    w: &mut dyn Write,
    line_no: usize,
    line: &str,
    kind: &LineKind,
    color: ColorMode,
) -> std::io::Result<()> {
    let label = format!("{:<14}", kind_label(kind));
    if !color.enabled() {
        return writeln!(w, "{:>5}  {}  {}", line_no, label, line);
    }
    let label = match kind {
        LineKind::Header { .. } => label.cyan().bold().to_string(),
        LineKind::Courses { courses, .. } if courses.is_empty() => label.red().to_string(),
        LineKind::Courses { .. } | LineKind::TransferCourse(_) => label.green().to_string(),
        LineKind::TransferSection | LineKind::TransferredToTerm(_) | LineKind::TransferExit => {
            label.yellow().to_string()
        }
        LineKind::Noise | LineKind::Unrecognized => label.dimmed().to_string(),
    };
    writeln!(w, "{:>5}  {}  {}", line_no.dimmed(), label, line)
}
