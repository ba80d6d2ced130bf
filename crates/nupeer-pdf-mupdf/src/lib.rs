use mupdf::{Document, Page, Rect, TextPageFlags};

use nupeer_core::{BackendError, PdfBackend};

const PDF_MIME: &str = "application/pdf";

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that the parser and callers working on pre-extracted text never link it.
///
/// Only the document's text layer is read; scanned transcripts without one
/// come back as empty text. Running headers and footers can be dropped by
/// skipping a band at the top or bottom of each page.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    bands: PageBands,
}

/// Horizontal bands, as fractions of page height, whose text is ignored.
#[derive(Debug, Clone, Copy, Default)]
struct PageBands {
    top: Option<f32>,
    bottom: Option<f32>,
}

impl PageBands {
    /// Whether a text block lies outside both skipped bands.
    fn admits(&self, page: &Rect, block: &Rect) -> bool {
        let height = page.y1 - page.y0;
        let above_top = self
            .top
            .is_some_and(|f| block.y1 <= page.y0 + height * f);
        let below_bottom = self
            .bottom
            .is_some_and(|f| block.y0 >= page.y1 - height * f);
        !(above_top || below_bottom)
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore text blocks entirely inside the top `fraction` of each page.
    /// `0.0` turns this off.
    pub fn skip_header_band(mut self, fraction: f32) -> Self {
        self.bands.top = (fraction > 0.0).then_some(fraction);
        self
    }

    /// Ignore text blocks entirely inside the bottom `fraction` of each page.
    pub fn skip_footer_band(mut self, fraction: f32) -> Self {
        self.bands.bottom = (fraction > 0.0).then_some(fraction);
        self
    }

    /// Text of one page, one output line per MuPDF text line.
    fn page_text(&self, page: &Page) -> Result<String, BackendError> {
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(extraction_error)?;
        let page_rect = page.bounds().map_err(extraction_error)?;

        let mut out = String::new();
        for block in text_page.blocks() {
            if !self.bands.admits(&page_rect, &block.bounds()) {
                continue;
            }
            for line in block.lines() {
                out.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                out.push('\n');
            }
        }
        Ok(out)
    }
}

fn extraction_error(e: impl std::fmt::Display) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, pdf: &[u8]) -> Result<String, BackendError> {
        if pdf.is_empty() {
            return Err(BackendError::Empty);
        }

        let document = Document::from_bytes(pdf, PDF_MIME)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        if document
            .needs_password()
            .map_err(|e| BackendError::OpenError(e.to_string()))?
        {
            return Err(BackendError::Encrypted);
        }

        let mut text = String::new();
        let mut pages = 0usize;
        for page in document.pages().map_err(extraction_error)? {
            // A page with no text layer contributes an empty string
            text.push_str(&self.page_text(&page.map_err(extraction_error)?)?);
            pages += 1;
        }

        tracing::debug!(pages, chars = text.len(), "extracted PDF text layer");
        Ok(text)
    }
}
