//! Mock extraction backend and in-memory PDF fixtures for testing.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::backend::{BackendError, PdfBackend};

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return these page texts, in order.
    Pages(Vec<String>),
    /// Fail with an extraction error on the given 1-based page.
    Error { page: usize, message: String },
}

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Returns a fixed response regardless of the file it is pointed at and
/// counts calls via [`call_count()`](MockBackend::call_count).
pub struct MockBackend {
    response: MockResponse,
    call_count: AtomicUsize,
}

impl MockBackend {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Mock that returns `pages` as the extracted text.
    pub fn with_pages<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
        Self::new(MockResponse::Pages(
            pages.into_iter().map(Into::into).collect(),
        ))
    }

    /// Mock that always fails on `page`.
    pub fn failing(page: usize, message: &str) -> Self {
        Self::new(MockResponse::Error {
            page,
            message: message.to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            MockResponse::Pages(pages) => Ok(pages.clone()),
            MockResponse::Error { page, message } => Err(BackendError::ExtractionError {
                page: *page,
                message: message.clone(),
            }),
        }
    }
}

/// Build a minimal PDF with one page per label; each page draws its label
/// in Helvetica.
///
/// The font resources and media box live on the page-tree root, so pages
/// rely on inherited attributes the way many real-world files do.
pub fn build_pdf(labels: &[&str]) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(labels.len());
    for label in labels {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*label)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
