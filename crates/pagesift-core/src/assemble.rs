//! Build a new PDF from an ordered selection of source pages.
//!
//! The source document is loaded, its page tree is replaced by a flat list
//! holding only the selected pages in the requested order, and every object
//! no longer reachable from the trailer is pruned before saving.

use std::collections::HashSet;

use lopdf::{Document, Object, ObjectId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("failed to load PDF: {0}")]
    Load(String),
    #[error("malformed page tree: {0}")]
    PageTree(String),
    #[error("page index {index} out of range (document has {page_count} pages)")]
    PageOutOfRange { index: usize, page_count: usize },
    #[error("page index {0} selected more than once")]
    DuplicatePage(usize),
    #[error("no pages selected")]
    EmptySelection,
    #[error("failed to save PDF: {0}")]
    Save(String),
}

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Catalog entries that point into the source's page tree or document-wide
/// structures that no longer hold once pages are dropped.
const STALE_CATALOG_KEYS: [&[u8]; 7] = [
    b"Outlines",
    b"Dests",
    b"OpenAction",
    b"PageLabels",
    b"StructTreeRoot",
    b"AcroForm",
    b"Names",
];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Create a PDF whose pages are copies of the source pages at the given
/// 0-based indices, in that order.
///
/// Fails without producing output if the source cannot be parsed, the
/// selection is empty, or an index is out of range or repeated.
pub fn assemble_pages(source: &[u8], order: &[usize]) -> Result<Vec<u8>, AssembleError> {
    if order.is_empty() {
        return Err(AssembleError::EmptySelection);
    }

    let mut doc = Document::load_mem(source).map_err(|e| AssembleError::Load(e.to_string()))?;
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let selected = select_page_ids(&page_ids, order)?;

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| AssembleError::PageTree(e.to_string()))?;
    let pages_root = doc
        .get_dictionary(catalog_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| AssembleError::PageTree(e.to_string()))?;

    for &page_id in &selected {
        let inherited = inherited_attributes(&doc, page_id)
            .map_err(|e| AssembleError::PageTree(e.to_string()))?;
        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| AssembleError::PageTree(e.to_string()))?;
        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", Object::Reference(pages_root));
    }

    let root = doc
        .get_dictionary_mut(pages_root)
        .map_err(|e| AssembleError::PageTree(e.to_string()))?;
    root.set(
        "Kids",
        Object::Array(selected.iter().map(|&id| Object::Reference(id)).collect()),
    );
    root.set("Count", Object::Integer(selected.len() as i64));
    root.remove(b"Parent");

    if let Ok(catalog) = doc.get_dictionary_mut(catalog_id) {
        for key in STALE_CATALOG_KEYS {
            catalog.remove(key);
        }
    }

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AssembleError::Save(e.to_string()))?;

    tracing::debug!(
        source_pages = page_ids.len(),
        output_pages = selected.len(),
        bytes = buffer.len(),
        "assembled PDF"
    );
    Ok(buffer)
}

/// Map 0-based indices to page object ids, rejecting out-of-range and
/// repeated indices.
fn select_page_ids(page_ids: &[ObjectId], order: &[usize]) -> Result<Vec<ObjectId>, AssembleError> {
    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .map(|&index| {
            let id = page_ids
                .get(index)
                .copied()
                .ok_or(AssembleError::PageOutOfRange {
                    index,
                    page_count: page_ids.len(),
                })?;
            if !seen.insert(index) {
                return Err(AssembleError::DuplicatePage(index));
            }
            Ok(id)
        })
        .collect()
}

/// Collect inheritable attributes the page lacks, taking each from its
/// nearest ancestor that defines it.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<(&'static [u8], Object)>, lopdf::Error> {
    let page = doc.get_dictionary(page_id)?;
    let mut missing: Vec<&'static [u8]> = INHERITABLE_KEYS
        .into_iter()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let node = doc.get_dictionary(node_id)?;
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::build_pdf;

    fn page_contents(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
            .collect()
    }

    #[test]
    fn test_reorders_pages() {
        let pdf = build_pdf(&["first", "second", "third"]).unwrap();
        let out = assemble_pages(&pdf, &[2, 0, 1]).unwrap();

        let contents = page_contents(&out);
        assert_eq!(contents.len(), 3);
        assert!(contents[0].contains("third"));
        assert!(contents[1].contains("first"));
        assert!(contents[2].contains("second"));
    }

    #[test]
    fn test_selects_subset() {
        let pdf = build_pdf(&["a-page", "b-page", "c-page", "d-page", "e-page"]).unwrap();
        let out = assemble_pages(&pdf, &[3, 1]).unwrap();

        let contents = page_contents(&out);
        assert_eq!(contents.len(), 2);
        assert!(contents[0].contains("d-page"));
        assert!(contents[1].contains("b-page"));
    }

    #[test]
    fn test_pages_keep_inherited_resources() {
        let pdf = build_pdf(&["only"]).unwrap();
        let out = assemble_pages(&pdf, &[0]).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"Resources"));
        assert!(page.has(b"MediaBox"));
    }

    #[test]
    fn test_out_of_range() {
        let pdf = build_pdf(&["one", "two"]).unwrap();
        let err = assemble_pages(&pdf, &[0, 2]).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::PageOutOfRange {
                index: 2,
                page_count: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_index() {
        let pdf = build_pdf(&["one", "two"]).unwrap();
        let err = assemble_pages(&pdf, &[1, 1]).unwrap_err();
        assert!(matches!(err, AssembleError::DuplicatePage(1)));
    }

    #[test]
    fn test_empty_selection() {
        let pdf = build_pdf(&["one"]).unwrap();
        assert!(matches!(
            assemble_pages(&pdf, &[]),
            Err(AssembleError::EmptySelection)
        ));
    }

    #[test]
    fn test_invalid_source() {
        let err = assemble_pages(b"definitely not a pdf", &[0]).unwrap_err();
        assert!(matches!(err, AssembleError::Load(_)));
        assert!(matches!(
            assemble_pages(b"", &[0]),
            Err(AssembleError::Load(_))
        ));
    }
}
