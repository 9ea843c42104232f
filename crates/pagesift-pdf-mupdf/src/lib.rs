use std::path::Path;

use mupdf::{Document, TextPageFlags};

use pagesift_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that matching and page assembly do not
/// transitively depend on it.
///
/// Each page's text lines are joined with a single space, so a term split
/// across a line break still matches when it is separated by whitespace.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        let pages = document.pages().map_err(|e| BackendError::ExtractionError {
            page: 0,
            message: e.to_string(),
        })?;
        for (index, page_result) in pages.enumerate() {
            let page_number = index + 1;
            let extraction_error = |e: mupdf::Error| BackendError::ExtractionError {
                page: page_number,
                message: e.to_string(),
            };

            let page = page_result.map_err(extraction_error)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(extraction_error)?;

            let mut runs = Vec::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    runs.push(line_text);
                }
            }
            pages_text.push(runs.join(" "));
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "extracted page text");
        Ok(pages_text)
    }
}
