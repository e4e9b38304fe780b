//! Content collection over the document object graph.
//!
//! [`collect_content`] walks every object of the document once and renders
//! it into a single text buffer: stream bodies are decoded and appended,
//! scalar values are written as literal text, and containers and references
//! are traversed. The resulting buffer is what the `BT`/`ET` region scanner
//! runs over. Traversal order follows object ids, not reading order.

use std::collections::HashSet;

use encoding_rs::mem::decode_latin1;
use lopdf::{Document, Object, ObjectId, Stream};
use pdfscribe_core::{ExtractOptions, ExtractWarning, ExtractWarningCode};

use crate::handler::TextHandler;
use crate::lopdf_backend::decode_stream;

/// Render every object of `doc` into one Latin-1 decoded buffer.
///
/// Each appended fragment is followed by a single space. Every object is
/// visited at most once, whether reached as a top-level object or through a
/// reference, so reference cycles terminate.
pub fn collect_content(
    doc: &Document,
    options: &ExtractOptions,
    handler: &mut dyn TextHandler,
) -> String {
    let mut collector = Collector {
        doc,
        options,
        handler,
        seen: HashSet::new(),
        buffer: String::new(),
    };
    for (&id, object) in &doc.objects {
        if collector.seen.insert(id) {
            collector.visit(object, id);
        }
    }
    tracing::debug!(
        objects = collector.seen.len(),
        bytes = collector.buffer.len(),
        "collected document content"
    );
    collector.buffer
}

struct Collector<'a, 'h> {
    doc: &'a Document,
    options: &'a ExtractOptions,
    handler: &'h mut dyn TextHandler,
    seen: HashSet<ObjectId>,
    buffer: String,
}

impl<'a> Collector<'a, '_> {
    /// Depth-first traversal from `root`, with an explicit stack so long
    /// `/Next` or `/Kids` chains cannot exhaust the call stack.
    fn visit(&mut self, root: &'a Object, root_id: ObjectId) {
        // Each entry carries the id of the indirect object it belongs to.
        let mut stack: Vec<(&'a Object, ObjectId)> = vec![(root, root_id)];
        while let Some((object, owner)) = stack.pop() {
            match object {
                Object::Dictionary(dict) => {
                    stack.extend(dict.iter().rev().map(|(_, value)| (value, owner)));
                }
                Object::Array(items) => {
                    stack.extend(items.iter().rev().map(|item| (item, owner)));
                }
                Object::Stream(stream) => self.append_stream(stream, owner),
                Object::Reference(id) => {
                    if !self.seen.insert(*id) {
                        continue;
                    }
                    match self.doc.get_object(*id) {
                        Ok(target) => stack.push((target, *id)),
                        Err(_) => {
                            tracing::debug!(?id, ?owner, "dangling reference");
                            self.warn(
                                ExtractWarningCode::MalformedObject,
                                format!(
                                    "object {} {} references missing object {} {}",
                                    owner.0, owner.1, id.0, id.1
                                ),
                            );
                        }
                    }
                }
                Object::String(bytes, _) => self.append_bytes(bytes),
                Object::Name(name) => {
                    self.buffer.push('/');
                    self.append_bytes(name);
                }
                Object::Integer(value) => self.append(&value.to_string()),
                Object::Real(value) => self.append(&value.to_string()),
                Object::Boolean(_) | Object::Null => {}
            }
        }
    }

    fn append_stream(&mut self, stream: &Stream, owner: ObjectId) {
        let bytes = match decode_stream(stream) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.warn(
                    ExtractWarningCode::MalformedObject,
                    format!(
                        "object {} {}: {err}; using raw stream bytes",
                        owner.0, owner.1
                    ),
                );
                stream.content.clone()
            }
        };
        if bytes.len() > self.options.max_stream_bytes {
            self.warn(
                ExtractWarningCode::ResourceLimitReached,
                format!(
                    "object {} {}: stream of {} bytes exceeds max_stream_bytes ({}), skipped",
                    owner.0,
                    owner.1,
                    bytes.len(),
                    self.options.max_stream_bytes
                ),
            );
            return;
        }
        self.append_bytes(&bytes);
    }

    fn append_bytes(&mut self, bytes: &[u8]) {
        self.append(&decode_latin1(bytes));
    }

    fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push(' ');
    }

    fn warn(&mut self, code: ExtractWarningCode, description: String) {
        self.handler
            .on_warning(ExtractWarning::with_code(code, description));
    }
}
