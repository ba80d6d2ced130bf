//! Text-layer extraction against small PDFs generated in-test.
//!
//! Each page is a single Helvetica content stream with one `Tj` per line,
//! spaced far enough apart that MuPDF reports them as separate lines.

use nupeer_core::{BackendError, Grade, PdfBackend, Semester};
use nupeer_pdf_mupdf::MupdfBackend;

fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Build a PDF with one page per entry of `pages`, each page holding the given lines.
fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let placed: Vec<Vec<(i32, &str)>> = pages
        .iter()
        .map(|lines| {
            lines
                .iter()
                .enumerate()
                .map(|(n, line)| (700 - (n as i32) * 24, *line))
                .collect()
        })
        .collect();
    let refs: Vec<&[(i32, &str)]> = placed.iter().map(Vec::as_slice).collect();
    build_pdf_at(&refs)
}

/// Like [`build_pdf`], with an explicit baseline (PDF user space, from the bottom) per line.
fn build_pdf_at(pages: &[&[(i32, &str)]]) -> Vec<u8> {
    let page_count = pages.len();
    // Object layout: 1 catalog, 2 pages, 3 font, then (page, contents) pairs.
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + i * 2))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (i, lines) in pages.iter().enumerate() {
        let contents_id = 5 + i * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            contents_id
        ));
        let mut stream = String::new();
        for (y, line) in lines.iter() {
            stream.push_str(&format!(
                "BT /F1 11 Tf 72 {} Td ({}) Tj ET\n",
                y,
                escape_pdf_string(line)
            ));
        }
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }
    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out.into_bytes()
}

#[test]
fn empty_bytes_are_rejected() {
    let err = MupdfBackend::new().extract_text(&[]).unwrap_err();
    assert!(matches!(err, BackendError::Empty));
}

#[test]
fn garbage_bytes_are_an_open_or_extraction_error() {
    let result = MupdfBackend::new().extract_text(b"this is a plain text upload, not a pdf");
    match result {
        Err(BackendError::OpenError(_)) | Err(BackendError::ExtractionError(_)) => {}
        other => panic!("expected extraction failure, got {:?}", other),
    }
}

#[test]
fn lines_are_preserved_in_order() {
    let pdf = build_pdf(&[&[
        "FA 2024",
        "COSC 1336 Computer Science I 3.000 3.000 A- 11.010",
    ]]);
    let text = MupdfBackend::new().extract_text(&pdf).unwrap();
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 2, "unexpected text: {:?}", text);
    assert_eq!(lines[0], "FA 2024");
    assert!(lines[1].starts_with("COSC 1336"));
    assert!(text.ends_with('\n'));
}

#[test]
fn pages_concatenate_in_order_and_blank_pages_contribute_nothing() {
    let pdf = build_pdf(&[&["FA 2023"], &[], &["SP 2024"]]);
    let text = MupdfBackend::new().extract_text(&pdf).unwrap();
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    assert_eq!(lines, vec!["FA 2023", "SP 2024"]);
}

#[test]
fn extracted_text_feeds_the_parser() {
    let pdf = build_pdf(&[
        &[
            "SP 2025",
            "MATH 1301 Calculus I 3.000 0.000 In Progress",
        ],
        &[
            "FA 2024",
            "COSC 1336 Computer Science I 3.000 3.000 A- 11.010",
        ],
    ]);
    let courses = nupeer_parsing::process_transcript(&pdf, &MupdfBackend::new()).unwrap();
    assert_eq!(courses.len(), 2);

    assert_eq!(courses[0].course_code, "MATH 1301");
    assert_eq!(courses[0].grade, Grade::InProgress);
    assert_eq!(courses[0].semester, Some(Semester::Spring));
    assert_eq!(courses[0].year, Some(2025));

    assert_eq!(courses[1].course_code, "COSC 1336");
    assert_eq!(courses[1].grade_score, Some(3.67));
    assert_eq!(courses[1].semester, Some(Semester::Fall));
}

#[test]
fn header_and_footer_bands_can_be_excluded() {
    let pdf = build_pdf_at(&[&[
        (770, "State University Official Transcript"),
        (400, "FA 2024"),
        (20, "Page 1 of 1"),
    ]]);

    let all = MupdfBackend::new().extract_text(&pdf).unwrap();
    assert!(all.contains("Official Transcript"));
    assert!(all.contains("Page 1 of 1"));

    let body_only = MupdfBackend::new()
        .skip_header_band(0.1)
        .skip_footer_band(0.1)
        .extract_text(&pdf)
        .unwrap();
    let lines: Vec<&str> = body_only
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    assert_eq!(lines, vec!["FA 2024"]);
}
