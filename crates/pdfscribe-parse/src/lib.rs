//! pdfscribe-parse: PDF object model access, ToUnicode decoding and the text
//! operator interpreter.
//!
//! The pipeline is split into small passes that can be driven one at a time:
//!
//! 1. [`collect_content`] renders the object graph into one text buffer.
//! 2. [`locate_fonts`] builds a [`CharacterMap`] per font resource.
//! 3. [`TextInterpreter`] scans the buffer for `BT`/`ET` regions and decodes
//!    the text-showing operators inside them.
//!
//! It depends on pdfscribe-core for shared data types.

pub mod backend;
pub mod cmap;
pub mod collector;
pub mod error;
pub mod fonts;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use cmap::{BfRange, BfTarget, CharacterMap};
pub use collector::collect_content;
pub use error::BackendError;
pub use fonts::{FontMaps, character_map_for_font, locate_fonts, page_fonts};
pub use handler::{CollectingHandler, ShowOp, TextEvent, TextHandler};
pub use interpreter::TextInterpreter;
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use pdfscribe_core;
