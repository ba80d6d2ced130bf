use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{CourseRecord, Semester};

type DedupKey = (String, Option<Semester>, Option<i32>);

/// Deduplicate and order parsed courses.
///
/// Returns the final list and the number of records dropped as duplicates.
pub fn reconcile(courses: Vec<CourseRecord>) -> (Vec<CourseRecord>, usize) {
    let before = courses.len();
    let mut out = dedup_courses(courses);
    let dropped = before - out.len();
    sort_courses(&mut out);
    (out, dropped)
}

/// Keep one record per (course code, semester, year).
///
/// The first record wins unless it has no title and a later one does.
/// First-seen order is preserved.
pub fn dedup_courses(courses: Vec<CourseRecord>) -> Vec<CourseRecord> {
    let mut index: HashMap<DedupKey, usize> = HashMap::new();
    let mut out: Vec<CourseRecord> = Vec::with_capacity(courses.len());

    for course in courses {
        let key = (
            course.course_code.clone(),
            course.semester.clone(),
            course.year,
        );
        match index.get(&key) {
            Some(&i) => {
                if out[i].course_name.is_none() && course.course_name.is_some() {
                    out[i] = course;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(course);
            }
        }
    }
    out
}

/// Most recent year first, then Fall, Spring, Summer, Winter, other terms,
/// then course code. Records without a year or term sort last in their group.
pub fn sort_courses(courses: &mut [CourseRecord]) {
    courses.sort_by(compare_courses);
}

fn compare_courses(a: &CourseRecord, b: &CourseRecord) -> Ordering {
    let year = |c: &CourseRecord| c.year.unwrap_or(0);
    let term = |c: &CourseRecord| c.semester.as_ref().map_or(99, Semester::sort_priority);

    year(b)
        .cmp(&year(a))
        .then_with(|| term(a).cmp(&term(b)))
        .then_with(|| a.course_code.cmp(&b.course_code))
}
