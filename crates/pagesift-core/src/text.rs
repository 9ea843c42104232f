//! Text normalization shared by term parsing and page matching.

use unicode_normalization::UnicodeNormalization;

/// Case-mapping rules used when lowercasing terms and page text.
///
/// Serbian (the default) has no tailored case mappings, so it uses the full
/// Unicode lowercase mapping. Turkish and Azerbaijani map the dotted and
/// dotless capital I differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseLocale {
    #[default]
    Standard,
    Turkic,
}

impl CaseLocale {
    /// Resolve a BCP 47 language tag (`"sr"`, `"sr-Latn"`, `"tr"`, ...).
    /// Unknown tags fall back to [`CaseLocale::Standard`].
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match language.as_str() {
            "tr" | "az" => CaseLocale::Turkic,
            _ => CaseLocale::Standard,
        }
    }

    fn lowercase(self, text: &str) -> String {
        match self {
            CaseLocale::Standard => text.to_lowercase(),
            CaseLocale::Turkic => text.replace('İ', "i").replace('I', "ı").to_lowercase(),
        }
    }
}

/// Normalize text for comparison using the default (Serbian) casing rules.
pub fn normalize(text: &str) -> String {
    normalize_with(text, CaseLocale::default())
}

/// Compose decomposed diacritics (NFC), lowercase with `locale`, and trim.
pub fn normalize_with(text: &str, locale: CaseLocale) -> String {
    let composed: String = text.nfc().collect();
    locale.lowercase(&composed).trim().to_string()
}
