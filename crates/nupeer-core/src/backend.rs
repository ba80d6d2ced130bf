use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("empty input: no PDF bytes supplied")]
    Empty,
    #[error("PDF is encrypted or password protected")]
    Encrypted,
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text extraction step; the course line
/// parser (semester tracking, course matching, reconciliation) lives in
/// `nupeer_parsing::TranscriptParser`.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text layer of an in-memory PDF, page by page,
    /// preserving line breaks.
    fn extract_text(&self, pdf: &[u8]) -> Result<String, BackendError>;

    /// Read a PDF from disk and extract its text.
    fn extract_text_from_path(&self, path: &Path) -> Result<String, BackendError> {
        let bytes = std::fs::read(path)?;
        self.extract_text(&bytes)
    }
}
