//! Unicode normalization for extracted text.
//!
//! ToUnicode maps from different producers disagree on composed versus
//! decomposed forms and on ligature code points. [`UnicodeNorm`] selects a
//! normalization form that is applied once to the final extracted text.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

/// Unicode normalization form to apply to extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// No normalization (default).
    #[default]
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Canonical Decomposition (NFD).
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    Nfkc,
    /// Compatibility Decomposition (NFKD).
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form to the given string.
    ///
    /// Borrows the input unchanged if normalization is `None`.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            UnicodeNorm::None => Cow::Borrowed(text),
            UnicodeNorm::Nfc => Cow::Owned(text.nfc().collect()),
            UnicodeNorm::Nfd => Cow::Owned(text.nfd().collect()),
            UnicodeNorm::Nfkc => Cow::Owned(text.nfkc().collect()),
            UnicodeNorm::Nfkd => Cow::Owned(text.nfkd().collect()),
        }
    }
}
