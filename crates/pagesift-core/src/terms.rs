//! Term parsing and the two term-specification shapes.

use std::str::FromStr;

use thiserror::Error;

use crate::text::{CaseLocale, normalize_with};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    #[error("malformed term list: {0}")]
    Malformed(String),
    #[error("unknown match mode: {0:?}")]
    UnknownMode(String),
    #[error("no search terms given")]
    NoTerms,
}

/// Separators accepted between terms in a pasted list.
const TERM_SEPARATORS: [char; 5] = ['\n', '\r', ',', ';', '|'];

/// Split a raw delimited string into normalized terms.
///
/// Splits on newlines (LF or CRLF), commas, semicolons and vertical bars.
/// Blank fragments are dropped; duplicates are kept in input order.
pub fn parse_terms(raw: &str) -> Vec<String> {
    parse_terms_with(raw, CaseLocale::default())
}

pub fn parse_terms_with(raw: &str, locale: CaseLocale) -> Vec<String> {
    raw.split(TERM_SEPARATORS)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| normalize_with(fragment, locale))
        .filter(|term| !term.is_empty())
        .collect()
}

/// Parse a JSON array of strings (the `requiredTerms` / `optionalTerms`
/// form fields) into normalized terms.
pub fn parse_term_array(json: &str) -> Result<Vec<String>, TermError> {
    parse_term_array_with(json, CaseLocale::default())
}

pub fn parse_term_array_with(json: &str, locale: CaseLocale) -> Result<Vec<String>, TermError> {
    let raw: Vec<String> =
        serde_json::from_str(json).map_err(|e| TermError::Malformed(e.to_string()))?;
    Ok(raw
        .iter()
        .map(|term| normalize_with(term, locale))
        .filter(|term| !term.is_empty())
        .collect())
}

/// How a flat term list is combined when deciding whether a page matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Any,
    All,
}

impl FromStr for MatchMode {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(MatchMode::Any),
            "all" => Ok(MatchMode::All),
            _ => Err(TermError::UnknownMode(s.to_string())),
        }
    }
}

/// The terms a request searches for, in one of two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSpec {
    /// Every required term must appear, plus at least one optional term
    /// when any optional terms are given.
    RequiredOptional {
        required: Vec<String>,
        optional: Vec<String>,
    },
    /// A flat term list combined with [`MatchMode`].
    Mode { terms: Vec<String>, mode: MatchMode },
}

impl TermSpec {
    pub fn required_optional(required: Vec<String>, optional: Vec<String>) -> Self {
        TermSpec::RequiredOptional { required, optional }
    }

    pub fn with_mode(terms: Vec<String>, mode: MatchMode) -> Self {
        TermSpec::Mode { terms, mode }
    }

    /// True when the spec holds no terms at all. Such a spec matches every
    /// page and must be rejected before matching.
    pub fn is_empty(&self) -> bool {
        match self {
            TermSpec::RequiredOptional { required, optional } => {
                required.is_empty() && optional.is_empty()
            }
            TermSpec::Mode { terms, .. } => terms.is_empty(),
        }
    }

    /// All configured terms in checking order: required before optional.
    pub fn ordering_terms(&self) -> impl Iterator<Item = &str> {
        let (first, second): (&[String], &[String]) = match self {
            TermSpec::RequiredOptional { required, optional } => {
                (required.as_slice(), optional.as_slice())
            }
            TermSpec::Mode { terms, .. } => (terms.as_slice(), &[]),
        };
        first.iter().chain(second).map(String::as_str)
    }

    /// Whether downloads are reordered by earliest term offset. The flat
    /// any/all shape keeps document order for downloads.
    pub fn reorders_download(&self) -> bool {
        matches!(self, TermSpec::RequiredOptional { .. })
    }
}
