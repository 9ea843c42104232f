//! Ordering of matched pages by where their terms first appear.
//!
//! The offset scan lowercases the raw page text with plain
//! [`str::to_lowercase`] and does not apply the composition or locale rules
//! of [`crate::text::normalize_with`]. A page can therefore match while no
//! term is found by this scan; such pages get no offset and sort last.
//!
//! Offsets count Unicode scalar values (`char`s), not UTF-16 code units.
//! A character outside the Basic Multilingual Plane (most emoji, rare CJK
//! ideographs) before a term counts once here where a UTF-16 index would
//! count it twice, so pages with such text can rank differently than an
//! ordering based on UTF-16 positions.

use crate::terms::TermSpec;

/// A matched page together with the position of its earliest term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPage {
    /// 0-based page index in the source document.
    pub index: usize,
    /// Character offset of the earliest first occurrence of any term, or
    /// `None` when no term was found by the offset scan.
    pub offset: Option<usize>,
}

impl RankedPage {
    /// 1-based page number as shown to users.
    pub fn page_number(&self) -> usize {
        self.index + 1
    }
}

/// Minimum character offset, across `terms`, of each term's first
/// occurrence in the lowercased `raw_text`.
pub fn earliest_offset<'a>(
    raw_text: &str,
    terms: impl IntoIterator<Item = &'a str>,
) -> Option<usize> {
    let lowered = raw_text.to_lowercase();
    terms
        .into_iter()
        .filter(|term| !term.is_empty())
        .filter_map(|term| lowered.find(term))
        .min()
        .map(|byte_offset| lowered[..byte_offset].chars().count())
}

/// Compute the earliest offset for each matched page.
///
/// `matched` holds 0-based indices into `raw_pages`; indices that fall
/// outside `raw_pages` get no offset.
pub fn rank_pages<S: AsRef<str>>(
    matched: &[usize],
    raw_pages: &[S],
    spec: &TermSpec,
) -> Vec<RankedPage> {
    matched
        .iter()
        .map(|&index| RankedPage {
            index,
            offset: raw_pages
                .get(index)
                .and_then(|text| earliest_offset(text.as_ref(), spec.ordering_terms())),
        })
        .collect()
}

/// Stable sort by ascending offset; pages without an offset go last.
/// Ties keep their input order.
pub fn order_by_offset(pages: &mut [RankedPage]) {
    pages.sort_by_key(|page| (page.offset.is_none(), page.offset));
}
