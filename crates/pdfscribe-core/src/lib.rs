//! pdfscribe-core: Backend-independent types for pdfscribe.
//!
//! Holds the error and warning model, extraction options, the font resource
//! key path and the `BT`/`ET` text region scanner. Nothing in this crate
//! knows about a concrete PDF object model.

pub mod error;
pub mod font_path;
pub mod regions;
pub mod unicode_norm;

pub use error::{ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, PdfError};
pub use font_path::{FontPath, KeyPattern};
pub use regions::{TextRegion, TextRegions, text_regions};
pub use unicode_norm::UnicodeNorm;
