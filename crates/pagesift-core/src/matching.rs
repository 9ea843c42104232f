//! Page match decisions over normalized page text.

use crate::terms::{MatchMode, TermSpec};

impl TermSpec {
    /// Decide whether a page matches. `text` must already be normalized
    /// with the same rules as the terms; containment is plain substring
    /// search, so "cat" matches inside "category".
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TermSpec::RequiredOptional { required, optional } => {
                let has_all_required = required.iter().all(|t| text.contains(t.as_str()));
                let has_any_optional =
                    optional.is_empty() || optional.iter().any(|t| text.contains(t.as_str()));
                has_all_required && has_any_optional
            }
            TermSpec::Mode { terms, mode } => match mode {
                MatchMode::All => terms.iter().all(|t| text.contains(t.as_str())),
                MatchMode::Any => terms.iter().any(|t| text.contains(t.as_str())),
            },
        }
    }
}

/// Return the 0-based indices of matching pages, in document order.
pub fn matching_pages<S: AsRef<str>>(normalized_pages: &[S], spec: &TermSpec) -> Vec<usize> {
    normalized_pages
        .iter()
        .enumerate()
        .filter(|(_, text)| spec.matches(text.as_ref()))
        .map(|(index, _)| index)
        .collect()
}
