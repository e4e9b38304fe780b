//! Backend error type.
//!
//! [`BackendError`] covers what can go wrong while reading the document
//! through lopdf. Inside an extraction most of these become warnings; the
//! ones that escape are converted into [`PdfError`] at the API edge.

use pdfscribe_core::PdfError;
use thiserror::Error;

/// Failure while reading a PDF through the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The container could not be loaded.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// A stream declares a filter that cannot be applied to its body.
    #[error("cannot decode stream: {0}")]
    Decode(String),

    /// A font's `/ToUnicode` program could not be read.
    #[error("font '{font}': {reason}")]
    Font {
        /// Font resource name, without the leading `/`.
        font: String,
        /// What went wrong.
        reason: String,
    },

    /// A core library error (resource limits, encryption).
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Core(e) => e,
            other @ BackendError::Decode(_) => PdfError::ParseError(other.to_string()),
            other @ BackendError::Font { .. } => PdfError::FontError(other.to_string()),
        }
    }
}
