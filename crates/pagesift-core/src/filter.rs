//! The filtering pipeline: extract page text, match, order, assemble.

use std::path::Path;

use thiserror::Error;

use crate::assemble::{AssembleError, assemble_pages};
use crate::backend::{BackendError, PdfBackend};
use crate::matching::matching_pages;
use crate::ordering::{RankedPage, order_by_offset, rank_pages};
use crate::terms::{TermError, TermSpec};
use crate::text::{CaseLocale, normalize_with};

/// Characters of page text shown per page in a preview.
pub const DEFAULT_SNIPPET_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("text extraction failed: {0}")]
    Backend(#[from] BackendError),
    #[error("page assembly failed: {0}")]
    Assemble(#[from] AssembleError),
    #[error("failed to read source PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated filter request.
#[derive(Debug, Clone)]
pub struct FilterRequest {
    spec: TermSpec,
    preview: bool,
}

impl FilterRequest {
    /// Rejects specs without any terms, which would otherwise match every page.
    pub fn new(spec: TermSpec, preview: bool) -> Result<Self, TermError> {
        if spec.is_empty() {
            return Err(TermError::NoTerms);
        }
        Ok(Self { spec, preview })
    }

    pub fn spec(&self) -> &TermSpec {
        &self.spec
    }

    pub fn preview(&self) -> bool {
        self.preview
    }
}

/// Tunables for a filter run.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Casing rules applied to page text before matching. Terms must have
    /// been parsed with the same locale.
    pub locale: CaseLocale,
    pub snippet_chars: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            locale: CaseLocale::default(),
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

/// Matched pages of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub total_pages: usize,
    /// 0-based indices of matching pages, in document order.
    pub matched: Vec<usize>,
    /// Matched pages sorted by earliest term offset.
    pub ranked: Vec<RankedPage>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Page order for a downloaded document: ranked for required/optional
    /// specs, document order otherwise.
    pub fn download_order(&self, spec: &TermSpec) -> Vec<usize> {
        if spec.reorders_download() {
            self.ranked_order()
        } else {
            self.matched.clone()
        }
    }

    pub fn ranked_order(&self) -> Vec<usize> {
        self.ranked.iter().map(|page| page.index).collect()
    }
}

/// Match and rank pages given their raw extracted text.
pub fn select_pages<S: AsRef<str>>(
    raw_pages: &[S],
    spec: &TermSpec,
    locale: CaseLocale,
) -> Selection {
    let normalized: Vec<String> = raw_pages
        .iter()
        .map(|text| normalize_with(text.as_ref(), locale))
        .collect();
    let matched = matching_pages(normalized.as_slice(), spec);
    let mut ranked = rank_pages(&matched, raw_pages, spec);
    order_by_offset(&mut ranked);

    Selection {
        total_pages: raw_pages.len(),
        matched,
        ranked,
    }
}

/// One page of a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnippet {
    /// 1-based page number in the source document.
    pub page_number: usize,
    pub text_snippet: String,
}

/// Preview of a filter run: ranked snippets plus the ranked document.
#[derive(Debug, Clone)]
pub struct PreviewReport {
    pub count: usize,
    pub total_pages: usize,
    pub pages: Vec<PageSnippet>,
    pub preview_pdf: Vec<u8>,
}

/// The assembled output document.
#[derive(Debug, Clone)]
pub struct FilteredDocument {
    pub bytes: Vec<u8>,
    /// 0-based source indices, in output order.
    pub page_order: Vec<usize>,
    pub total_pages: usize,
}

#[derive(Debug, Clone)]
pub enum FilterOutcome {
    /// No page matched. Not an error; the caller decides how to report it.
    NoMatch { total_pages: usize },
    Preview(PreviewReport),
    Document(FilteredDocument),
}

/// Run the whole pipeline on the PDF at `path`.
///
/// Page text is extracted through `backend`. The source bytes are only read
/// once at least one page matched.
pub fn run_filter(
    path: &Path,
    backend: &dyn PdfBackend,
    request: &FilterRequest,
    options: &FilterOptions,
) -> Result<FilterOutcome, FilterError> {
    let raw_pages = backend.extract_pages(path)?;
    let selection = select_pages(raw_pages.as_slice(), &request.spec, options.locale);

    tracing::info!(
        total_pages = selection.total_pages,
        matched = selection.matched.len(),
        preview = request.preview,
        "matched pages"
    );

    if selection.is_empty() {
        return Ok(FilterOutcome::NoMatch {
            total_pages: selection.total_pages,
        });
    }

    let source = std::fs::read(path)?;

    if request.preview {
        let pages = selection
            .ranked
            .iter()
            .map(|page| PageSnippet {
                page_number: page.page_number(),
                text_snippet: snippet(&raw_pages[page.index], options.snippet_chars),
            })
            .collect();
        let preview_pdf = assemble_pages(&source, &selection.ranked_order())?;

        return Ok(FilterOutcome::Preview(PreviewReport {
            count: selection.matched.len(),
            total_pages: selection.total_pages,
            pages,
            preview_pdf,
        }));
    }

    let page_order = selection.download_order(&request.spec);
    let bytes = assemble_pages(&source, &page_order)?;

    Ok(FilterOutcome::Document(FilteredDocument {
        bytes,
        page_order,
        total_pages: selection.total_pages,
    }))
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
