use std::ops::Range;

use regex::Captures;

use crate::config::ParsingConfig;
use crate::grade::score_course;
use crate::patterns::{
    COURSE_PATTERNS, CourseLayout, DEFAULT_NOISE_PATTERNS, TRANSFER_COURSE_RE,
    TRANSFER_HEADING_RE, TRANSFERRED_TO_TERM_RE, UNDERGRADUATE_RECORD_RE,
};
use crate::semester::{parse_semester_header_with_config, parse_term_and_year};
use crate::state::ParserState;
use crate::text_processing::clean_title_with_config;
use crate::{CourseRecord, Grade, Semester};

/// A validated course row, before a term is attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLine {
    pub course_code: String,
    pub course_name: String,
    pub grade: Grade,
    pub grade_score: Option<f64>,
    pub credit_hours: f64,
    pub attempted_credits: f64,
    pub points: f64,
    /// `None` for transfer rows.
    pub layout: Option<CourseLayout>,
}

impl CourseLine {
    pub fn into_record(self, semester: Option<Semester>, year: Option<i32>) -> CourseRecord {
        CourseRecord {
            course_code: self.course_code,
            course_name: Some(self.course_name),
            grade: self.grade,
            grade_score: self.grade_score,
            credit_hours: self.credit_hours,
            attempted_credits: self.attempted_credits,
            points: self.points,
            semester,
            year,
        }
    }
}

/// Classification of one transcript line. Exactly one kind applies per line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// "Test Credits" / "Transfer Credits" heading.
    TransferSection,
    /// "Transferred to Term X YYYY"; `None` when the term or year didn't parse.
    TransferredToTerm(Option<(Semester, i32)>),
    /// "Beginning of Undergraduate Record" inside a transfer block.
    TransferExit,
    TransferCourse(CourseLine),
    Header { semester: Semester, year: i32 },
    Noise,
    /// One or more course-shaped matches. `rejected` counts matches that
    /// were missing a field or had no determinable grade score.
    Courses { courses: Vec<CourseLine>, rejected: usize },
    Unrecognized,
}

/// Classify a single line given the current scan state.
///
/// Rules are tried in priority order and the first match wins:
/// transfer heading, "Transferred to Term", transfer exit, transfer row,
/// semester header, noise, course rows.
pub fn classify_line(line: &str, state: &ParserState, config: &ParsingConfig) -> LineKind {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Unrecognized;
    }

    if TRANSFER_HEADING_RE.is_match(line) {
        return LineKind::TransferSection;
    }

    if let Some(caps) = TRANSFERRED_TO_TERM_RE.captures(line) {
        return LineKind::TransferredToTerm(parse_term_and_year(&caps["term"], &caps["year"], config));
    }

    if state.in_transfer_section && UNDERGRADUATE_RECORD_RE.is_match(line) {
        return LineKind::TransferExit;
    }

    if state.transfer_target().is_some()
        && let Some(course) = parse_transfer_course(line, config)
    {
        return LineKind::TransferCourse(course);
    }

    if let Some((semester, year)) = parse_semester_header_with_config(line, config) {
        return LineKind::Header { semester, year };
    }

    if config
        .noise_patterns
        .iter_with(&DEFAULT_NOISE_PATTERNS)
        .any(|re| re.is_match(line))
    {
        return LineKind::Noise;
    }

    let (courses, rejected) = match_course_lines(line, config);
    if courses.is_empty() && rejected == 0 {
        LineKind::Unrecognized
    } else {
        LineKind::Courses { courses, rejected }
    }
}

fn parse_transfer_course(line: &str, config: &ParsingConfig) -> Option<CourseLine> {
    let caps = TRANSFER_COURSE_RE.captures(line)?;
    let course_name = clean_title_with_config(&caps["title"], config)?;
    let credits: f64 = caps["credits"].parse().ok()?;
    let grade = Grade::parse(&caps["grade"]);
    if !grade.is_pass_or_withdraw() {
        return None;
    }
    let earned = if grade == Grade::Withdrawn { 0.0 } else { credits };

    Some(CourseLine {
        course_code: course_code(&caps["subject"], &caps["number"]),
        course_name,
        grade,
        grade_score: None,
        credit_hours: earned,
        attempted_credits: credits,
        points: 0.0,
        layout: None,
    })
}

/// Run the course layouts over `line` from strictest to loosest.
///
/// A looser layout never re-reads text an earlier match already consumed,
/// whether or not that earlier match produced a course.
fn match_course_lines(line: &str, config: &ParsingConfig) -> (Vec<CourseLine>, usize) {
    let mut consumed: Vec<Range<usize>> = Vec::new();
    let mut courses: Vec<(usize, CourseLine)> = Vec::new();
    let mut rejected = 0;

    for (layout, re) in COURSE_PATTERNS.iter() {
        for caps in re.captures_iter(line) {
            let Some(m) = caps.get(0) else { continue };
            let span = m.range();
            if consumed
                .iter()
                .any(|c| c.start < span.end && span.start < c.end)
            {
                continue;
            }
            consumed.push(span.clone());

            match build_course_line(&caps, *layout, config) {
                Some(course) => courses.push((span.start, course)),
                None => {
                    tracing::debug!(text = m.as_str(), ?layout, "rejected course candidate");
                    rejected += 1;
                }
            }
        }
    }

    // Matches from different layouts were appended layout by layout
    courses.sort_by_key(|(start, _)| *start);
    (courses.into_iter().map(|(_, c)| c).collect(), rejected)
}

fn build_course_line(
    caps: &Captures<'_>,
    layout: CourseLayout,
    config: &ParsingConfig,
) -> Option<CourseLine> {
    let subject = caps.name("subject")?.as_str();
    let number = caps.name("number")?.as_str();
    let course_name = clean_title_with_config(caps.name("title")?.as_str(), config)?;
    let attempted: f64 = caps.name("attempted")?.as_str().parse().ok()?;
    let earned: f64 = caps.name("earned")?.as_str().parse().ok()?;
    let grade = Grade::parse(caps.name("grade")?.as_str());
    let points = match caps.name("points") {
        Some(p) => Some(p.as_str().parse::<f64>().ok()?),
        None => None,
    };

    let scored = score_course(&grade, attempted, earned, points)?;

    Some(CourseLine {
        course_code: course_code(subject, number),
        course_name,
        grade,
        grade_score: scored.grade_score,
        credit_hours: scored.credit_hours,
        attempted_credits: attempted,
        points: scored.points,
        layout: Some(layout),
    })
}

fn course_code(subject: &str, number: &str) -> String {
    format!("{} {}", subject.to_uppercase(), number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineKind {
        classify_line(line, &ParserState::default(), &ParsingConfig::default())
    }

    fn in_transfer() -> ParserState {
        ParserState {
            in_transfer_section: true,
            transfer_term: Some(Semester::Fall),
            transfer_year: Some(2023),
            ..Default::default()
        }
    }

    #[test]
    fn header_line() {
        assert_eq!(
            classify("FA 2024"),
            LineKind::Header {
                semester: Semester::Fall,
                year: 2024
            }
        );
    }

    #[test]
    fn transfer_markers() {
        assert_eq!(classify("Test Credits Applied Toward Undergraduate"), LineKind::TransferSection);
        assert_eq!(
            classify("Transferred to Term FA 2023"),
            LineKind::TransferredToTerm(Some((Semester::Fall, 2023)))
        );
        assert_eq!(
            classify("Transferred to Term FA 1850"),
            LineKind::TransferredToTerm(None)
        );
    }

    #[test]
    fn undergraduate_record_only_exits_inside_transfer_block() {
        let line = "Beginning of Undergraduate Record";
        assert_eq!(classify(line), LineKind::Unrecognized);
        assert_eq!(
            classify_line(line, &in_transfer(), &ParsingConfig::default()),
            LineKind::TransferExit
        );
    }

    #[test]
    fn transfer_course_requires_transfer_term() {
        let line = "ENGL 1301 First Year Writing I 3.000 S";
        assert_eq!(classify(line), LineKind::Unrecognized);

        let state = ParserState {
            in_transfer_section: true,
            ..Default::default()
        };
        assert_eq!(
            classify_line(line, &state, &ParsingConfig::default()),
            LineKind::Unrecognized
        );

        match classify_line(line, &in_transfer(), &ParsingConfig::default()) {
            LineKind::TransferCourse(c) => {
                assert_eq!(c.course_code, "ENGL 1301");
                assert_eq!(c.course_name, "First Year Writing I");
                assert_eq!(c.grade, Grade::Satisfactory);
                assert_eq!(c.grade_score, None);
                assert_eq!(c.points, 0.0);
                assert_eq!(c.credit_hours, 3.0);
            }
            other => panic!("expected transfer course, got {:?}", other),
        }
    }

    #[test]
    fn withdrawn_transfer_earns_nothing() {
        match classify_line("HIST 1301 US History I 3.000 W", &in_transfer(), &ParsingConfig::default()) {
            LineKind::TransferCourse(c) => {
                assert_eq!(c.grade, Grade::Withdrawn);
                assert_eq!(c.credit_hours, 0.0);
                assert_eq!(c.attempted_credits, 3.0);
            }
            other => panic!("expected transfer course, got {:?}", other),
        }
    }

    #[test]
    fn noise_lines() {
        assert_eq!(classify("Course Description Attempted Earned Grade Points"), LineKind::Noise);
        assert_eq!(classify("Term GPA 3.500 Term Totals 12.000 12.000 42.000"), LineKind::Noise);
        assert_eq!(classify("TERM TOTALS 15.000 15.000 52.500"), LineKind::Noise);
    }

    #[test]
    fn custom_noise_pattern() {
        let config = crate::ParsingConfigBuilder::new()
            .add_noise_pattern(r"(?i)^cum\s+gpa".to_string())
            .build()
            .unwrap();
        let state = ParserState::default();
        assert_eq!(classify_line("Cum GPA 3.41", &state, &config), LineKind::Noise);
        // defaults still apply
        assert_eq!(classify_line("Term GPA 3.41", &state, &config), LineKind::Noise);
    }

    #[test]
    fn full_course_line() {
        match classify("COSC 1336 Computer Science I 3.000 3.000 A- 11.010") {
            LineKind::Courses { courses, rejected } => {
                assert_eq!(rejected, 0);
                assert_eq!(courses.len(), 1);
                let c = &courses[0];
                assert_eq!(c.course_code, "COSC 1336");
                assert_eq!(c.course_name, "Computer Science I");
                assert_eq!(c.grade_score, Some(3.67));
                assert_eq!(c.points, 11.01);
                assert_eq!(c.layout, Some(CourseLayout::Full));
            }
            other => panic!("expected courses, got {:?}", other),
        }
    }

    #[test]
    fn looser_layouts_do_not_duplicate_a_strict_match() {
        match classify("COSC 1336 Computer Science I 3.000 3.000 A- 11.010") {
            LineKind::Courses { courses, .. } => assert_eq!(courses.len(), 1),
            other => panic!("expected courses, got {:?}", other),
        }
    }

    #[test]
    fn two_courses_on_one_line_keep_reading_order() {
        let line = "MATH 2413 Calculus I 4.000 4.000 B 12.000   hist 1301 US History 3.00 3.00 A 12.00";
        match classify(line) {
            LineKind::Courses { courses, .. } => {
                let codes: Vec<_> = courses.iter().map(|c| c.course_code.as_str()).collect();
                assert_eq!(codes, vec!["MATH 2413", "HIST 1301"]);
            }
            other => panic!("expected courses, got {:?}", other),
        }
    }

    #[test]
    fn lowercase_letter_grade() {
        match classify("COSC 1336 Computer Science I 3.000 3.000 b+ 9.900") {
            LineKind::Courses { courses, rejected } => {
                assert_eq!(rejected, 0);
                assert_eq!(courses[0].grade, Grade::Letter("B+".into()));
                assert_eq!(courses[0].grade_score, Some(3.3));
            }
            other => panic!("expected courses, got {:?}", other),
        }
    }

    #[test]
    fn lowercase_transfer_grades() {
        let config = ParsingConfig::default();
        match classify_line("ENGL 1301 First Year Writing I 3.000 s", &in_transfer(), &config) {
            LineKind::TransferCourse(c) => assert_eq!(c.grade, Grade::Satisfactory),
            other => panic!("expected transfer course, got {:?}", other),
        }
        match classify_line("HIST 1301 US History I 3.000 w", &in_transfer(), &config) {
            LineKind::TransferCourse(c) => {
                assert_eq!(c.grade, Grade::Withdrawn);
                assert_eq!(c.credit_hours, 0.0);
            }
            other => panic!("expected transfer course, got {:?}", other),
        }
    }

    #[test]
    fn in_progress_course() {
        match classify("MATH 1301 Calculus I 3.000 0.000 in   PROGRESS") {
            LineKind::Courses { courses, .. } => {
                let c = &courses[0];
                assert_eq!(c.grade, Grade::InProgress);
                assert_eq!(c.grade.as_str(), "IN PROGRESS");
                assert_eq!(c.credit_hours, 0.0);
                assert_eq!(c.points, 0.0);
                assert_eq!(c.grade_score, None);
                assert_eq!(c.layout, Some(CourseLayout::Short));
            }
            other => panic!("expected courses, got {:?}", other),
        }
    }

    #[test]
    fn short_layout_uses_grade_table() {
        match classify("BIOL 1406 General Biology I 4.000 4.000 B+") {
            LineKind::Courses { courses, .. } => {
                assert_eq!(courses[0].grade_score, Some(3.3));
                assert_eq!(courses[0].points, 13.2);
            }
            other => panic!("expected courses, got {:?}", other),
        }
    }

    #[test]
    fn undeterminable_score_is_rejected() {
        match classify("ARTS 1301 Art Appreciation 3.000 3.000 E") {
            LineKind::Courses { courses, rejected } => {
                assert!(courses.is_empty());
                assert_eq!(rejected, 1);
            }
            other => panic!("expected rejected candidate, got {:?}", other),
        }
    }

    #[test]
    fn garbage_is_unrecognized() {
        assert_eq!(
            classify("The quick brown fox jumps over the lazy dog."),
            LineKind::Unrecognized
        );
        assert_eq!(classify("   "), LineKind::Unrecognized);
    }
}
