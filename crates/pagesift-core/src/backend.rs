use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text from page {page}: {message}")]
    ExtractionError { page: usize, message: String },
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text extraction step; matching,
/// ordering and page assembly live in [`crate::filter`].
pub trait PdfBackend: Send + Sync {
    /// Extract the raw text of every page, in page order (1..N).
    ///
    /// Each entry is the page's text runs joined with a single space. The
    /// text is returned as extracted; callers normalize it themselves.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}
