//! pdfscribe: Extract text from PDF documents through their ToUnicode CMaps.
//!
//! This is the public API facade crate for pdfscribe. It re-exports types from
//! pdfscribe-core and uses pdfscribe-parse for PDF reading and interpretation.
//!
//! # Architecture
//!
//! - **pdfscribe-core**: Errors, warnings, options and the `BT`/`ET` region scanner
//! - **pdfscribe-parse**: lopdf access, CMap decoding and the text operator interpreter
//! - **pdfscribe** (this crate): Public API that ties everything together
//!
//! # Example
//!
//! ```ignore
//! use pdfscribe::Pdf;
//!
//! let pdf = Pdf::open_file("report.pdf", None)?;
//! println!("{}", pdf.extract_text());
//! ```

mod pdf;

#[cfg(feature = "std")]
pub use pdf::extract_text_from_file;
pub use pdf::{Pdf, extract_text};

pub use pdfscribe_core::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, FontPath, KeyPattern,
    PdfError, UnicodeNorm,
};
pub use pdfscribe_core;
pub use pdfscribe_parse;
