//! Operator separation and tokenization for text regions.
//!
//! Content streams do not need whitespace between an operand and the operator
//! that follows it: `(Hello)Tj`, `[(A)-20(B)]TJ` and `<</MCID 0>>BDC` are all
//! valid. Before a region is split into tokens, [`normalize_operators`]
//! inserts a space on each side of every [`OPERATORS`] keyword that appears
//! outside a string.
//! [`tokens`] then splits on whitespace outside string delimiters, so a
//! literal such as `(Hello World)` stays one token.

use std::borrow::Cow;

/// Every operator keyword the interpreter acts on: text showing, font
/// selection, and the positioning, color, graphics state and marked content
/// operators whose operands are discarded.
pub const OPERATORS: &[&str] = &[
    "Tj", "TJ", "'", "\"", "Tf", "Td", "TD", "Tm", "T*", "Tc", "Tw", "Tz", "TL", "Ts", "Tr", "G",
    "g", "gs", "RG", "rg", "K", "k", "CS", "cs", "SC", "SCN", "sc", "scn", "w", "J", "j", "M", "d",
    "ri", "i", "q", "Q", "cm", "BDC", "BMC", "EMC", "MP", "DP",
];

/// Length of the longest operator keyword starting at `at`, or 0.
///
/// A keyword only counts when the byte after it is not a letter or digit, so
/// `Tjx` and `gsave` are left whole.
fn operator_len(bytes: &[u8], at: usize) -> usize {
    OPERATORS
        .iter()
        .filter(|kw| {
            bytes[at..].starts_with(kw.as_bytes())
                && !bytes
                    .get(at + kw.len())
                    .is_some_and(|next| next.is_ascii_alphanumeric())
        })
        .map(|kw| kw.len())
        .max()
        .unwrap_or(0)
}

/// Returns `true` for PDF whitespace characters.
pub fn is_pdf_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C' | '\0')
}

fn is_whitespace_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace_byte(b) && !is_delimiter(b)
}

#[derive(Debug, Clone, Copy)]
enum Scan {
    Outside,
    Literal { depth: u32, escaped: bool },
    Hex,
}

impl Scan {
    /// Advance through one byte while inside a string.
    fn step_string(self, b: u8) -> Scan {
        match self {
            Scan::Outside => Scan::Outside,
            Scan::Hex if b == b'>' => Scan::Outside,
            Scan::Hex => Scan::Hex,
            Scan::Literal { depth, escaped: true } => Scan::Literal {
                depth,
                escaped: false,
            },
            Scan::Literal { depth, .. } => match b {
                b'\\' => Scan::Literal {
                    depth,
                    escaped: true,
                },
                b'(' => Scan::Literal {
                    depth: depth + 1,
                    escaped: false,
                },
                b')' if depth <= 1 => Scan::Outside,
                b')' => Scan::Literal {
                    depth: depth - 1,
                    escaped: false,
                },
                _ => self,
            },
        }
    }
}

/// Separate operator keywords from adjacent operands.
///
/// Keywords inside literal strings, hex strings and names are left alone,
/// as is a keyword directly followed by a letter or digit. Returns the input
/// unchanged when nothing needed separating.
pub fn normalize_operators(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut state = Scan::Outside;
    let mut i = 0;

    // Split points are always ASCII positions, so slicing stays on char
    // boundaries.
    let split_at = |out: &mut String, copied: &mut usize, at: usize| {
        out.push_str(&text[*copied..at]);
        out.push(' ');
        *copied = at;
    };

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            Scan::Literal { .. } | Scan::Hex => {
                state = state.step_string(b);
                i += 1;
            }
            Scan::Outside => match b {
                b'(' => {
                    state = Scan::Literal {
                        depth: 1,
                        escaped: false,
                    };
                    i += 1;
                }
                b'<' if bytes.get(i + 1) == Some(&b'<') => i += 2,
                b'<' => {
                    state = Scan::Hex;
                    i += 1;
                }
                b'/' => {
                    i += 1;
                    while i < bytes.len() && is_regular(bytes[i]) {
                        i += 1;
                    }
                }
                _ => {
                    let len = operator_len(bytes, i);
                    if len == 0 {
                        i += 1;
                        continue;
                    }
                    if i > 0 && !is_whitespace_byte(bytes[i - 1]) {
                        split_at(&mut out, &mut copied, i);
                    }
                    let end = i + len;
                    if end < bytes.len() && !is_whitespace_byte(bytes[end]) {
                        split_at(&mut out, &mut copied, end);
                    }
                    i = end;
                }
            },
        }
    }

    if copied == 0 {
        Cow::Borrowed(text)
    } else {
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}

/// Iterator over the whitespace-separated tokens of a region.
///
/// Whitespace inside literal and hex strings does not split a token.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

/// Split normalized region text into tokens.
pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && is_whitespace_byte(bytes[self.pos]) {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        let mut state = Scan::Outside;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            match state {
                Scan::Outside => {
                    if is_whitespace_byte(b) {
                        break;
                    }
                    match b {
                        b'(' => {
                            state = Scan::Literal {
                                depth: 1,
                                escaped: false,
                            }
                        }
                        b'<' if bytes.get(self.pos + 1) == Some(&b'<') => self.pos += 1,
                        b'<' => state = Scan::Hex,
                        _ => {}
                    }
                }
                _ => state = state.step_string(b),
            }
            self.pos += 1;
        }
        Some(&self.text[start..self.pos])
    }
}
