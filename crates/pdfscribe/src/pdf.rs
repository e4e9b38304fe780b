//! Top-level PDF document type for opening and extracting text.

use pdfscribe_core::{ExtractOptions, ExtractResult, ExtractWarning, PdfError};
use pdfscribe_parse::{
    LopdfBackend, LopdfDocument, PdfBackend, TextEvent, TextHandler, TextInterpreter,
};

/// A PDF document opened for extraction.
///
/// Wraps a parsed PDF and the options it was opened with. Extraction reads
/// the document without mutating it, so the same `Pdf` can be extracted any
/// number of times (and from several threads) with identical results.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open(bytes, None)?;
/// let text = pdf.extract_text();
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("doc", &self.doc)
            .field("options", &self.options)
            .finish()
    }
}

/// Internal handler that accumulates decoded text and warnings.
struct ExtractionHandler {
    text: String,
    warnings: Vec<ExtractWarning>,
    collect_warnings: bool,
}

impl ExtractionHandler {
    fn new(collect_warnings: bool) -> Self {
        Self {
            text: String::new(),
            warnings: Vec::new(),
            collect_warnings,
        }
    }
}

impl TextHandler for ExtractionHandler {
    fn on_text(&mut self, event: TextEvent) {
        self.text.push_str(&event.text);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        tracing::debug!(%warning, "extraction warning");
        if self.collect_warnings {
            self.warnings.push(warning);
        }
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// This is a convenience wrapper around [`Pdf::open`] that reads the file
    /// into memory first.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the PDF file.
    /// * `options` - Extraction options (resource limits, etc.). Uses defaults if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or is not a valid PDF.
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw PDF file bytes.
    /// * `options` - Extraction options (resource limits, etc.). Uses defaults if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] if the PDF is encrypted.
    /// Returns [`PdfError::ResourceLimitExceeded`] if `bytes` is larger than
    /// `max_input_bytes`.
    /// Returns [`PdfError`] if the bytes are not a valid PDF document.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        let doc = LopdfBackend::open(bytes, &options).map_err(PdfError::from)?;
        Ok(Self { doc, options })
    }

    /// Return the number of pages in the document.
    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// The options this document was opened with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract all decodable text from the document.
    ///
    /// Best effort: problems inside the document are skipped, never
    /// reported. Use [`Pdf::extract_text_with_warnings`] to see them.
    pub fn extract_text(&self) -> String {
        self.run(false).text
    }

    /// Extract text and collect the warnings raised along the way.
    ///
    /// # Errors
    ///
    /// In [`strict_mode`](ExtractOptions::strict_mode) the first warning is
    /// returned as an error instead.
    pub fn extract_text_with_warnings(&self) -> Result<ExtractResult<String>, PdfError> {
        let strict = self.options.strict_mode;
        let handler = self.run(self.options.collect_warnings || strict);
        if strict {
            if let Some(warning) = handler.warnings.first() {
                return Err(warning.to_error());
            }
        }
        Ok(ExtractResult::with_warnings(handler.text, handler.warnings))
    }

    fn run(&self, collect_warnings: bool) -> ExtractionHandler {
        let mut handler = ExtractionHandler::new(collect_warnings);
        let buffer = LopdfBackend::collect_content(&self.doc, &self.options, &mut handler);
        let fonts = LopdfBackend::locate_fonts(&self.doc, &self.options, &mut handler);
        TextInterpreter::new(&fonts).interpret_buffer(&buffer, &mut handler);

        handler.text = self.options.unicode_norm.normalize(&handler.text).into_owned();
        tracing::debug!(
            chars = handler.text.chars().count(),
            fonts = fonts.len(),
            warnings = handler.warnings.len(),
            "extracted text"
        );
        handler
    }
}

/// Extract all decodable text from `pdf`.
///
/// Same as [`Pdf::extract_text`].
pub fn extract_text(pdf: &Pdf) -> String {
    pdf.extract_text()
}

/// Open the PDF at `path` with default options and extract its text.
///
/// # Errors
///
/// Returns [`PdfError`] if the file cannot be read or opened.
#[cfg(feature = "std")]
pub fn extract_text_from_file(path: impl AsRef<std::path::Path>) -> Result<String, PdfError> {
    Pdf::open_file(path, None).map(|pdf| pdf.extract_text())
}
