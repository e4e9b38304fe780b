//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate for PDF document parsing. This is the only backend shipped with
//! pdfscribe.

use pdfscribe_core::{ExtractOptions, PdfError};

use crate::backend::PdfBackend;
use crate::collector::collect_content;
use crate::error::BackendError;
use crate::fonts::{FontMaps, locate_fonts};
use crate::handler::TextHandler;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[lopdf::ObjectId] {
        &self.page_ids
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .field("object_count", &self.inner.objects.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based PDF backend.
///
/// # Example
///
/// ```ignore
/// use pdfscribe_parse::{LopdfBackend, PdfBackend, CollectingHandler};
///
/// let options = ExtractOptions::default();
/// let doc = LopdfBackend::open(pdf_bytes, &options)?;
/// let mut handler = CollectingHandler::default();
/// let buffer = LopdfBackend::collect_content(&doc, &options, &mut handler);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8], options: &ExtractOptions) -> Result<Self::Document, Self::Error> {
        if let Some(limit) = options.max_input_bytes.filter(|&limit| bytes.len() > limit) {
            return Err(BackendError::Core(PdfError::ResourceLimitExceeded {
                limit_name: "max_input_bytes".to_string(),
                limit_value: limit,
                actual_value: bytes.len(),
            }));
        }

        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }

        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();
        tracing::debug!(
            pages = page_ids.len(),
            objects = inner.objects.len(),
            "opened PDF document"
        );

        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn collect_content(
        doc: &Self::Document,
        options: &ExtractOptions,
        handler: &mut dyn TextHandler,
    ) -> String {
        collect_content(&doc.inner, options, handler)
    }

    fn locate_fonts(
        doc: &Self::Document,
        options: &ExtractOptions,
        handler: &mut dyn TextHandler,
    ) -> FontMaps {
        locate_fonts(&doc.inner, options, handler)
    }
}

/// Resolve an indirect reference, returning the referenced object.
/// If the object is not a reference, or the reference dangles, returns it
/// as-is.
pub(crate) fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// The dictionary of a dictionary or stream object.
pub(crate) fn as_dictionary(obj: &lopdf::Object) -> Option<&lopdf::Dictionary> {
    match obj {
        lopdf::Object::Dictionary(dict) => Some(dict),
        lopdf::Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Decode a PDF stream, decompressing only if it declares a `/Filter`.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Decode(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}
