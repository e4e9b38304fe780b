//! Text operator interpreter.
//!
//! Runs a small operand-stack machine over the tokens of each `BT`/`ET`
//! region. Operands are pushed until an operator arrives; text-showing
//! operators decode their operands through the font selected by the last
//! `Tf`, and every other known operator simply discards them. Decoded text
//! and warnings are delivered to a [`TextHandler`].

use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;

use encoding_rs::mem::encode_latin1_lossy;
use pdfscribe_core::{ExtractWarning, ExtractWarningCode, TextRegion, text_regions};

use crate::cmap::CharacterMap;
use crate::fonts::FontMaps;
use crate::handler::{ShowOp, TextEvent, TextHandler};
use crate::tokenizer::{OPERATORS, is_pdf_whitespace, normalize_operators, tokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Show(ShowOp),
    SelectFont,
    StateOnly,
}

fn classify(token: &str) -> Option<Operator> {
    match token {
        "Tj" | "'" | "\"" => Some(Operator::Show(ShowOp::ShowString)),
        "TJ" => Some(Operator::Show(ShowOp::ShowArray)),
        "Tf" => Some(Operator::SelectFont),
        _ if OPERATORS.contains(&token) => Some(Operator::StateOnly),
        _ => None,
    }
}

/// Interprets text regions against a fixed set of font maps.
///
/// Operand stack and font selection are scoped to one region: neither
/// carries over into the next `BT`.
#[derive(Debug, Clone, Copy)]
pub struct TextInterpreter<'f> {
    fonts: &'f FontMaps,
}

impl<'f> TextInterpreter<'f> {
    /// Create an interpreter that decodes through `fonts`.
    pub fn new(fonts: &'f FontMaps) -> Self {
        Self { fonts }
    }

    /// Interpret every region of `buffer` in order.
    pub fn interpret_buffer(&self, buffer: &str, handler: &mut dyn TextHandler) {
        for region in text_regions(buffer) {
            self.interpret_region(&region, handler);
        }
    }

    /// Interpret one region.
    pub fn interpret_region(&self, region: &TextRegion<'_>, handler: &mut dyn TextHandler) {
        let normalized = normalize_operators(region.text);
        tracing::trace!(
            region = region.index,
            offset = region.offset,
            len = region.text.len(),
            "interpreting text region"
        );

        let mut stack: Vec<&str> = Vec::new();
        let mut font: Option<&str> = None;

        for token in tokens(&normalized) {
            match classify(token) {
                Some(Operator::Show(op)) => {
                    let operands = stack.join(" ");
                    stack.clear();
                    let map = font
                        .and_then(|name| self.fonts.get(name))
                        .filter(|map| !map.is_empty());
                    let shown = decode_operands(&operands, op, map);
                    for segment in shown.dropped {
                        tracing::debug!(
                            region = region.index,
                            segment = %segment,
                            "dropping malformed hex string"
                        );
                        let mut warning = ExtractWarning::with_code(
                            ExtractWarningCode::EncodingFallback,
                            format!("dropped malformed hex string <{segment}>"),
                        )
                        .in_region(region.index);
                        if let Some(name) = font {
                            warning = warning.with_font(name);
                        }
                        handler.on_warning(warning);
                    }
                    handler.on_text(TextEvent {
                        text: shown.text,
                        op,
                        font_name: font.map(str::to_string),
                        region: region.index,
                    });
                }
                Some(Operator::SelectFont) => {
                    font = select_font(&stack);
                    stack.clear();
                    if let Some(name) = font.filter(|name| !self.fonts.contains(name)) {
                        handler.on_warning(
                            ExtractWarning::with_code(
                                ExtractWarningCode::MissingFont,
                                format!("font '{name}' not found in page resources"),
                            )
                            .in_region(region.index)
                            .with_font(name),
                        );
                    }
                }
                Some(Operator::StateOnly) => stack.clear(),
                None => stack.push(token),
            }
        }
    }
}

/// The earliest-pushed non-empty operand, without its leading `/`.
fn select_font<'a>(operands: &[&'a str]) -> Option<&'a str> {
    operands
        .iter()
        .copied()
        .find(|operand| !operand.is_empty())
        .map(|operand| operand.strip_prefix('/').unwrap_or(operand))
}

/// Result of decoding the operands of one show operator.
#[derive(Debug, Default, PartialEq, Eq)]
struct Shown {
    text: String,
    /// Hex segments discarded because they were not whole 2-byte codes.
    dropped: Vec<String>,
}

/// Decode the string operands of a text-showing operator.
///
/// Literal strings are emitted verbatim for `Tj`; for `TJ` they are
/// re-encoded to hex and run through `map`. Hex strings go through `map`
/// when one is active and are emitted as raw digits otherwise. Everything
/// outside a string (numbers, array brackets) contributes nothing.
fn decode_operands(operands: &str, op: ShowOp, map: Option<&CharacterMap>) -> Shown {
    let mut shown = Shown::default();
    let mut chars = operands.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' => {
                let Some(literal) = read_literal(&mut chars) else {
                    break;
                };
                match (op, map) {
                    (ShowOp::ShowArray, Some(map)) => {
                        shown.text.push_str(&map.convert(&latin1_hex(&literal)));
                    }
                    _ => shown.text.push_str(&literal),
                }
            }
            '<' if chars.peek() == Some(&'<') => {
                chars.next();
            }
            '<' => {
                let Some(digits) = read_hex(&mut chars) else {
                    break;
                };
                if digits.len() % 4 != 0 || !digits.chars().all(|d| d.is_ascii_hexdigit()) {
                    shown.dropped.push(digits);
                    continue;
                }
                match map {
                    Some(map) => shown.text.push_str(&map.convert(&digits)),
                    None => shown.text.push_str(&digits),
                }
            }
            _ => {}
        }
    }
    shown
}

/// Read a literal string body up to its balancing `)`, decoding escapes.
///
/// Returns `None` if the input ends first.
fn read_literal(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut out = String::new();
    let mut depth = 1u32;
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'b' => out.push('\x08'),
                'f' => out.push('\x0C'),
                // Line continuation
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                }
                '\n' => {}
                first @ '0'..='7' => {
                    let mut value = octal_digit(first);
                    for _ in 0..2 {
                        match chars.peek() {
                            Some(&next @ '0'..='7') => {
                                value = value * 8 + octal_digit(next);
                                chars.next();
                            }
                            _ => break,
                        }
                    }
                    out.push(char::from((value & 0xFF) as u8));
                }
                // `\(`, `\)`, `\\` and unknown escapes keep the character.
                other => out.push(other),
            },
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(out);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    None
}

fn octal_digit(c: char) -> u32 {
    u32::from(c) - u32::from('0')
}

/// Read hex digits up to `>`, skipping whitespace.
///
/// Returns `None` if the input ends first.
fn read_hex(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut digits = String::new();
    for c in chars.by_ref() {
        match c {
            '>' => return Some(digits),
            c if is_pdf_whitespace(c) => {}
            c => digits.push(c),
        }
    }
    None
}

/// Re-encode a literal as Latin-1 bytes and format each as two uppercase
/// hex digits.
fn latin1_hex(literal: &str) -> String {
    encode_latin1_lossy(literal)
        .iter()
        .fold(String::with_capacity(literal.len() * 2), |mut hex, byte| {
            let _ = write!(hex, "{byte:02X}");
            hex
        })
}
