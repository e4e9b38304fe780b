//! PDF parsing backend trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts the two document-level
//! passes text extraction needs: rendering the object graph into a content
//! buffer, and locating font resources.

use pdfscribe_core::{ExtractOptions, PdfError};

use crate::fonts::FontMaps;
use crate::handler::TextHandler;

/// Trait abstracting PDF parsing operations.
///
/// # Associated Types
///
/// - `Document`: The parsed PDF document representation.
/// - `Error`: Backend-specific error type, convertible to [`PdfError`].
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes, &options)?;
/// let buffer = MyBackend::collect_content(&doc, &options, &mut handler);
/// let fonts = MyBackend::locate_fonts(&doc, &options, &mut handler);
/// TextInterpreter::new(&fonts).interpret_buffer(&buffer, &mut handler);
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not represent a valid PDF document,
    /// if the document is encrypted, or if the input is larger than
    /// `options.max_input_bytes`.
    fn open(bytes: &[u8], options: &ExtractOptions) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Render the whole object graph into one content buffer.
    ///
    /// Never fails; unreadable objects are reported through
    /// [`TextHandler::on_warning`].
    fn collect_content(
        doc: &Self::Document,
        options: &ExtractOptions,
        handler: &mut dyn TextHandler,
    ) -> String;

    /// Build the character map table from the pages' font resources.
    fn locate_fonts(
        doc: &Self::Document,
        options: &ExtractOptions,
        handler: &mut dyn TextHandler,
    ) -> FontMaps;
}
