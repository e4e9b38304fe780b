//! Callback trait connecting the interpreter to its consumer.
//!
//! The interpreter reports every decoded show-text result and every non-fatal
//! problem through a [`TextHandler`]. The facade collects them into a string
//! and a warning list; tests collect them into vectors.

use pdfscribe_core::ExtractWarning;

/// Which text-showing operator produced a [`TextEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOp {
    /// `Tj`, `'` or `"`.
    ShowString,
    /// `TJ`.
    ShowArray,
}

/// Decoded output of one text-showing operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    /// Decoded text. May be empty when every code failed to resolve.
    pub text: String,
    /// The operator that painted it.
    pub op: ShowOp,
    /// Font resource selected by the last `Tf`, if any.
    pub font_name: Option<String>,
    /// Index of the text region the operator appeared in.
    pub region: usize,
}

/// Receives interpreter output.
pub trait TextHandler {
    /// Called once per text-showing operator, in encounter order.
    fn on_text(&mut self, event: TextEvent);

    /// Called for non-fatal issues. Ignored by default.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}

/// A handler that appends every event's text to a string and keeps warnings.
#[derive(Debug, Default, Clone)]
pub struct CollectingHandler {
    /// Concatenated text of every event.
    pub text: String,
    /// Warnings in the order they were raised.
    pub warnings: Vec<ExtractWarning>,
}

impl TextHandler for CollectingHandler {
    fn on_text(&mut self, event: TextEvent) {
        self.text.push_str(&event.text);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning);
    }
}
