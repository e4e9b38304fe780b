//! ToUnicode CMap parser and resolver.
//!
//! A [`CharacterMap`] is built from the embedded `/ToUnicode` program of one
//! font resource. It keeps the codespace declaration, the `bfrange` rows in
//! declaration order and the `bfchar` singletons, and resolves 2-byte
//! character codes to Unicode text.
//!
//! Parsing is best effort: a malformed row is skipped and counted, never
//! fatal. Every hex value is normalized to 16-bit units before it is stored,
//! so `<41>` and `<0041>` denote the same code.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Codespace used when the program declares none.
pub const FULL_CODESPACE: (u16, u16) = (0x0000, 0xFFFF);

/// Destination of a `bfrange` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BfTarget {
    /// `<lo> <hi> <dst>`: code `lo + n` maps to `dst` with `n` added to its
    /// last unit.
    Offset(Vec<u16>),
    /// `<lo> <hi> [<d0> <d1> ...]`: code `lo + n` maps to `dn`.
    Array(Vec<Vec<u16>>),
}

/// One `bfrange` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfRange {
    /// First source code of the range.
    pub low: u16,
    /// Last source code of the range (inclusive).
    pub high: u16,
    /// Where the codes map to.
    pub target: BfTarget,
}

impl BfRange {
    /// Returns true if `code` lies within `low..=high`.
    pub fn contains(&self, code: u16) -> bool {
        (self.low..=self.high).contains(&code)
    }

    /// Map `code` through this row.
    ///
    /// Returns `None` when the code is outside the row, when an array row has
    /// no element for it, or when the arithmetic result leaves 16 bits.
    fn map(&self, code: u16) -> Option<Vec<u16>> {
        if !self.contains(code) {
            return None;
        }
        let offset = code - self.low;
        match &self.target {
            BfTarget::Offset(start) => {
                let (last, head) = start.split_last()?;
                let mapped = last.checked_add(offset)?;
                let mut units = head.to_vec();
                units.push(mapped);
                Some(units)
            }
            BfTarget::Array(targets) => targets.get(usize::from(offset)).cloned(),
        }
    }
}

/// A parsed ToUnicode CMap for one font resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMap {
    name: String,
    codespace_range: (u16, u16),
    bf_ranges: Vec<BfRange>,
    bf_chars: HashMap<u16, Vec<u16>>,
    skipped_rows: usize,
}

impl CharacterMap {
    /// A map for a font without a `/ToUnicode` program. Resolves nothing.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codespace_range: FULL_CODESPACE,
            bf_ranges: Vec::new(),
            bf_chars: HashMap::new(),
            skipped_rows: 0,
        }
    }

    /// Parse the decoded bytes of a `/ToUnicode` stream.
    ///
    /// Scans for `begincodespacerange`, `beginbfrange` and `beginbfchar`
    /// sections and reads each one as a sequence of operands, so rows may
    /// share a line and an array target may span several lines.
    pub fn parse(name: impl Into<String>, data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);
        let mut cmap = Self::empty(name);

        if let Some(range) = sections(&text, "begincodespacerange", "endcodespacerange")
            .into_iter()
            .find_map(|section| {
                rows(&section_operands(section), 2, parse_code_pair)
                    .into_iter()
                    .find_map(Result::ok)
            })
        {
            cmap.codespace_range = range;
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            for row in rows(&section_operands(section), 3, parse_bfrange_row) {
                match row {
                    Ok(range) => cmap.bf_ranges.push(range),
                    Err(line) => cmap.skip_row("bfrange", line),
                }
            }
        }

        for section in sections(&text, "beginbfchar", "endbfchar") {
            for row in rows(&section_operands(section), 2, parse_bfchar_row) {
                match row {
                    Ok((src, dst)) => {
                        if let Entry::Vacant(slot) = cmap.bf_chars.entry(src) {
                            slot.insert(dst);
                        }
                    }
                    Err(line) => cmap.skip_row("bfchar", line),
                }
            }
        }

        cmap
    }

    fn skip_row(&mut self, kind: &str, line: usize) {
        tracing::debug!(font = %self.name, kind, line, "skipping malformed CMap row");
        self.skipped_rows += 1;
    }

    /// Font resource name this map was built for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inclusive `(low, high)` bounds of valid codes.
    pub fn codespace_range(&self) -> (u16, u16) {
        self.codespace_range
    }

    /// `bfrange` rows in declaration order.
    pub fn bf_ranges(&self) -> &[BfRange] {
        &self.bf_ranges
    }

    /// Number of `bfchar` singletons.
    pub fn bf_char_count(&self) -> usize {
        self.bf_chars.len()
    }

    /// Number of rows dropped as malformed while parsing.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Returns true if the map has neither ranges nor singletons.
    pub fn is_empty(&self) -> bool {
        self.bf_ranges.is_empty() && self.bf_chars.is_empty()
    }

    /// Resolve one character code to Unicode text.
    ///
    /// Codes outside the codespace never resolve. Ranges are tried first in
    /// declaration order; singletons are the fallback.
    pub fn resolve(&self, code: u16) -> Option<String> {
        let (low, high) = self.codespace_range;
        if code < low || code > high {
            return None;
        }
        if let Some(units) = self.bf_ranges.iter().find_map(|range| range.map(code)) {
            return decode_units(&units);
        }
        self.bf_chars.get(&code).and_then(|units| decode_units(units))
    }

    /// Decode a hex string as a sequence of 2-byte codes (Identity-H).
    ///
    /// Whitespace is ignored. Chunks that are not four hex digits, and codes
    /// that do not resolve, contribute nothing. A trailing partial chunk is
    /// ignored.
    pub fn convert(&self, hex: &str) -> String {
        let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        digits
            .chunks_exact(4)
            .filter_map(parse_code_chunk)
            .filter_map(|code| self.resolve(code))
            .collect()
    }
}

/// Collect the bodies of every `begin`…`end` section in order.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut search_from = 0;
    while let Some(start) = text[search_from..].find(begin) {
        let section_start = search_from + start + begin.len();
        let Some(len) = text[section_start..].find(end) else {
            break;
        };
        found.push(&text[section_start..section_start + len]);
        search_from = section_start + len + end.len();
    }
    found
}

/// One operand of a CMap section row.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand<'a> {
    /// Body of a `<hex>` string.
    Hex(&'a str),
    /// Bodies of the `<hex>` strings inside `[` … `]`.
    Array(Vec<&'a str>),
}

/// An operand and the section line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Located<'a> {
    line: usize,
    operand: Operand<'a>,
}

/// Split a section body into operands. `\r`, `\n` and `\r\n` each end a
/// line. Anything that is neither a hex string nor an array is ignored; an
/// unterminated string or array ends the section.
fn section_operands(section: &str) -> Vec<Located<'_>> {
    let mut operands = Vec::new();
    let mut line = 0;
    let mut rest = section;
    while let Some(pos) = rest.find(&['<', '[', '\r', '\n'][..]) {
        let tail = &rest[pos..];
        let (close, operand) = match tail.as_bytes()[0] {
            b'\r' | b'\n' => {
                line += 1;
                rest = tail.strip_prefix("\r\n").unwrap_or(&tail[1..]);
                continue;
            }
            b'<' => {
                let Some(close) = tail.find('>') else {
                    break;
                };
                (close, Operand::Hex(&tail[1..close]))
            }
            _ => {
                let Some(close) = tail.find(']') else {
                    break;
                };
                (close, Operand::Array(hex_strings(&tail[1..close])))
            }
        };
        operands.push(Located { line, operand });
        line += line_breaks(&tail[..close]);
        rest = &tail[close + 1..];
    }
    operands
}

fn line_breaks(text: &str) -> usize {
    let breaks = text.bytes().filter(|b| matches!(b, b'\r' | b'\n')).count();
    breaks - text.matches("\r\n").count()
}

/// Group operands into rows of `width` and parse each with `parse`.
///
/// A row must start all of its operands on the line of its first one (an
/// array may continue past it). A short or unparsable row yields
/// `Err(line)` and parsing resumes at the first operand of a later line.
fn rows<'a, T>(
    operands: &[Located<'a>],
    width: usize,
    parse: impl Fn(&[Located<'a>]) -> Option<T>,
) -> Vec<Result<T, usize>> {
    let mut parsed = Vec::new();
    let mut i = 0;
    while i < operands.len() {
        let line = operands[i].line;
        let row = operands
            .get(i..i + width)
            .filter(|row| row.iter().all(|op| op.line == line))
            .and_then(&parse);
        match row {
            Some(value) => {
                parsed.push(Ok(value));
                i += width;
            }
            None => {
                parsed.push(Err(line));
                i += operands[i..]
                    .iter()
                    .position(|op| op.line > line)
                    .unwrap_or(operands.len() - i);
            }
        }
    }
    parsed
}

/// `<lo> <hi>`.
fn parse_code_pair(row: &[Located<'_>]) -> Option<(u16, u16)> {
    match row {
        [
            Located { operand: Operand::Hex(lo), .. },
            Located { operand: Operand::Hex(hi), .. },
        ] => Some((parse_code(lo)?, parse_code(hi)?)),
        _ => None,
    }
}

/// `<src> <dst>`.
fn parse_bfchar_row(row: &[Located<'_>]) -> Option<(u16, Vec<u16>)> {
    match row {
        [
            Located { operand: Operand::Hex(src), .. },
            Located { operand: Operand::Hex(dst), .. },
        ] => Some((parse_code(src)?, parse_hex_units(dst)?)),
        _ => None,
    }
}

/// `<lo> <hi> <dst>` or `<lo> <hi> [<d0> ...]`.
fn parse_bfrange_row(row: &[Located<'_>]) -> Option<BfRange> {
    let [
        Located { operand: Operand::Hex(lo), .. },
        Located { operand: Operand::Hex(hi), .. },
        Located { operand: target, .. },
    ] = row
    else {
        return None;
    };
    let (low, high) = (parse_code(lo)?, parse_code(hi)?);
    if low > high {
        return None;
    }
    let target = match target {
        Operand::Hex(dst) => BfTarget::Offset(parse_hex_units(dst)?),
        Operand::Array(items) if !items.is_empty() => BfTarget::Array(
            items
                .iter()
                .map(|item| parse_hex_units(item))
                .collect::<Option<Vec<_>>>()?,
        ),
        Operand::Array(_) => return None,
    };
    Some(BfRange { low, high, target })
}

/// Bodies of all `<hex>` strings in `text`.
fn hex_strings(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start + 1..].find('>') else {
            break;
        };
        found.push(&rest[start + 1..start + 1 + end]);
        rest = &rest[start + 1 + end + 1..];
    }
    found
}

/// Normalize a hex token to 16-bit units, left-padding to a multiple of
/// four digits.
fn parse_hex_units(token: &str) -> Option<Vec<u16>> {
    let digits: Vec<u8> = token.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let pad = (4 - digits.len() % 4) % 4;
    let mut padded = vec![b'0'; pad];
    padded.extend_from_slice(&digits);
    padded.chunks_exact(4).map(parse_code_chunk).collect()
}

/// Parse a token that must fit in a single 16-bit code.
fn parse_code(token: &str) -> Option<u16> {
    match parse_hex_units(token)?.as_slice() {
        [code] => Some(*code),
        _ => None,
    }
}

fn parse_code_chunk(chunk: &[u8]) -> Option<u16> {
    if !chunk.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let s = std::str::from_utf8(chunk).ok()?;
    u16::from_str_radix(s, 16).ok()
}

/// Decode UTF-16 units, dropping unpaired surrogates.
fn decode_units(units: &[u16]) -> Option<String> {
    let text: String = char::decode_utf16(units.iter().copied())
        .filter_map(Result::ok)
        .collect();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> CharacterMap {
        CharacterMap::parse(
            "F1",
            b"1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
              1 beginbfrange\n<0000> <FFFF> <0000>\nendbfrange\n",
        )
    }

    // --- construction ---

    #[test]
    fn empty_map_resolves_nothing() {
        let cmap = CharacterMap::empty("F1");
        assert!(cmap.is_empty());
        assert_eq!(cmap.name(), "F1");
        assert_eq!(cmap.codespace_range(), FULL_CODESPACE);
        assert_eq!(cmap.resolve(0x0041), None);
        assert_eq!(cmap.convert("00410042"), "");
    }

    #[test]
    fn parse_of_empty_program_is_empty() {
        let cmap = CharacterMap::parse("F1", b"");
        assert!(cmap.is_empty());
        assert_eq!(cmap.skipped_rows(), 0);
    }

    #[test]
    fn missing_codespace_defaults_to_full_range() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<FFFE> <0041>\nendbfchar\n");
        assert_eq!(cmap.codespace_range(), (0x0000, 0xFFFF));
        assert_eq!(cmap.resolve(0xFFFE).as_deref(), Some("A"));
    }

    #[test]
    fn first_codespace_pair_wins() {
        let cmap = CharacterMap::parse(
            "F1",
            b"2 begincodespacerange\n<0010> <00FF>\n<0000> <FFFF>\nendcodespacerange\n",
        );
        assert_eq!(cmap.codespace_range(), (0x0010, 0x00FF));
    }

    #[test]
    fn full_boilerplate_program() {
        let data = b"\
            /CIDInit /ProcSet findresource begin\n\
            12 dict begin\n\
            begincmap\n\
            /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
            /CMapName /Adobe-Identity-UCS def\n\
            /CMapType 2 def\n\
            1 begincodespacerange\n\
            <0000> <FFFF>\n\
            endcodespacerange\n\
            2 beginbfchar\n\
            <0003> <0020>\n\
            <0011> <0041>\n\
            endbfchar\n\
            1 beginbfrange\n\
            <0044> <0046> <0061>\n\
            endbfrange\n\
            endcmap\n\
            CMapName currentdict /CMap defineresource pop\n\
            end\n\
            end\n";
        let cmap = CharacterMap::parse("F1", data);
        assert_eq!(cmap.resolve(0x0003).as_deref(), Some(" "));
        assert_eq!(cmap.resolve(0x0011).as_deref(), Some("A"));
        assert_eq!(cmap.resolve(0x0045).as_deref(), Some("b"));
        assert_eq!(cmap.bf_char_count(), 2);
        assert_eq!(cmap.bf_ranges().len(), 1);
    }

    // --- bfchar ---

    #[test]
    fn bfchar_identity_letter() {
        let cmap = CharacterMap::parse(
            "F1",
            b"begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
              beginbfchar\n<0041> <0041>\nendbfchar\n",
        );
        assert_eq!(cmap.resolve(0x0041).as_deref(), Some("A"));
    }

    #[test]
    fn bfchar_short_hex_is_normalized() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<41> <42>\nendbfchar\n");
        assert_eq!(cmap.resolve(0x0041).as_deref(), Some("B"));
    }

    #[test]
    fn bfchar_lowercase_hex() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<00ff> <00e9>\nendbfchar\n");
        assert_eq!(cmap.resolve(0x00FF).as_deref(), Some("\u{e9}"));
        assert_eq!(cmap.convert("00fF"), "\u{e9}");
    }

    #[test]
    fn bfchar_multi_unit_target() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<0001> <00660069>\nendbfchar\n");
        assert_eq!(cmap.resolve(0x0001).as_deref(), Some("fi"));
    }

    #[test]
    fn bfchar_surrogate_pair_target() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<0001> <D83DDE00>\nendbfchar\n");
        assert_eq!(cmap.resolve(0x0001).as_deref(), Some("\u{1F600}"));
    }

    #[test]
    fn bfchar_lone_surrogate_does_not_resolve() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<0001> <D800>\nendbfchar\n");
        assert_eq!(cmap.resolve(0x0001), None);
    }

    #[test]
    fn bfchar_duplicate_keeps_first() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfchar\n<0001> <0041>\n<0001> <0042>\nendbfchar\n",
        );
        assert_eq!(cmap.resolve(0x0001).as_deref(), Some("A"));
        assert_eq!(cmap.bf_char_count(), 1);
    }

    #[test]
    fn bfchar_several_pairs_on_one_line() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfchar\n<0001> <0041> <0002> <0042>\nendbfchar\n",
        );
        assert_eq!(cmap.convert("00010002"), "AB");
    }

    #[test]
    fn bfchar_multiple_sections() {
        let cmap = CharacterMap::parse(
            "F1",
            b"1 beginbfchar\n<0001> <0041>\nendbfchar\n1 beginbfchar\n<0002> <0042>\nendbfchar\n",
        );
        assert_eq!(cmap.bf_char_count(), 2);
    }

    // --- bfrange ---

    #[test]
    fn bfrange_arithmetic_mode() {
        let cmap = CharacterMap::parse("F1", b"beginbfrange\n<0010> <0019> <0030>\nendbfrange\n");
        for code in 0x0010u16..=0x0019 {
            let expected = char::from_u32(0x30 + u32::from(code - 0x10)).unwrap();
            assert_eq!(cmap.resolve(code), Some(expected.to_string()));
        }
        assert_eq!(cmap.resolve(0x001A), None);
    }

    #[test]
    fn bfrange_array_mode() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0041> <0043> [<0058> <0059> <005A>]\nendbfrange\n",
        );
        assert_eq!(cmap.resolve(0x0041).as_deref(), Some("X"));
        assert_eq!(cmap.resolve(0x0042).as_deref(), Some("Y"));
        assert_eq!(cmap.resolve(0x0043).as_deref(), Some("Z"));
    }

    #[test]
    fn bfrange_short_array_falls_through() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0041> <0043> [<0058>]\nendbfrange\nbeginbfchar\n<0042> <0062>\nendbfchar\n",
        );
        assert_eq!(cmap.resolve(0x0041).as_deref(), Some("X"));
        assert_eq!(cmap.resolve(0x0042).as_deref(), Some("b"));
        assert_eq!(cmap.resolve(0x0043), None);
    }

    #[test]
    fn bfrange_first_declared_wins() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0000> <00FF> <0041>\n<0000> <0000> <005A>\nendbfrange\n",
        );
        assert_eq!(cmap.resolve(0x0000).as_deref(), Some("A"));
    }

    #[test]
    fn bfrange_takes_precedence_over_bfchar() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfchar\n<0005> <005A>\nendbfchar\nbeginbfrange\n<0000> <0009> <0030>\nendbfrange\n",
        );
        assert_eq!(cmap.resolve(0x0005).as_deref(), Some("5"));
    }

    #[test]
    fn bfrange_multi_unit_start_increments_last_unit() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0001> <0002> <00660069>\nendbfrange\n",
        );
        assert_eq!(cmap.resolve(0x0001).as_deref(), Some("fi"));
        assert_eq!(cmap.resolve(0x0002).as_deref(), Some("fj"));
    }

    // --- malformed rows ---

    #[test]
    fn malformed_rows_are_skipped() {
        let data = b"\
            beginbfrange\n\
            <0001> <0002>\n\
            <00G1> <0002> <0041>\n\
            <0009> <0001> <0041>\n\
            <0010> <0011> <0061>\n\
            endbfrange\n\
            beginbfchar\n\
            <0020>\n\
            <00000001> <0041>\n\
            <0021> <0021>\n\
            endbfchar\n";
        let cmap = CharacterMap::parse("F1", data);
        assert_eq!(cmap.skipped_rows(), 5);
        assert_eq!(cmap.resolve(0x0010).as_deref(), Some("a"));
        assert_eq!(cmap.resolve(0x0021).as_deref(), Some("!"));
        assert_eq!(cmap.bf_ranges().len(), 1);
        assert_eq!(cmap.bf_char_count(), 1);
    }

    #[test]
    fn carriage_return_line_endings() {
        let cmap = CharacterMap::parse(
            "F1",
            b"1 begincodespacerange\r<0000> <FFFF>\rendcodespacerange\r\
              2 beginbfrange\r<0001> <0002> <0041>\r<0010> <0011> <0061>\rendbfrange\r\
              1 beginbfchar\r<0020> <0020>\rendbfchar\r",
        );
        assert_eq!(cmap.bf_ranges().len(), 2);
        assert_eq!(cmap.skipped_rows(), 0);
        assert_eq!(cmap.convert("00020011"), "Bb");
        assert_eq!(cmap.resolve(0x0020).as_deref(), Some(" "));
    }

    #[test]
    fn several_bfrange_rows_on_one_line() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0001> <0002> <0041> <0010> <0011> <0061>\nendbfrange\n",
        );
        assert_eq!(cmap.bf_ranges().len(), 2);
        assert_eq!(cmap.convert("00010010"), "Aa");
    }

    #[test]
    fn bfrange_array_spanning_lines() {
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0001> <0003> [<0041>\n<0042>\r\n<0043>]\n<0010> <0010> <0061>\nendbfrange\n",
        );
        assert_eq!(cmap.skipped_rows(), 0);
        assert_eq!(cmap.convert("0001000200030010"), "ABCa");
    }

    #[test]
    fn bad_row_skips_to_next_line() {
        // The second row on the first line is lost with the first.
        let cmap = CharacterMap::parse(
            "F1",
            b"beginbfrange\n<0009> <0001> <0041> <0020> <0020> <0042>\n<0030> <0030> <0043>\nendbfrange\n",
        );
        assert_eq!(cmap.skipped_rows(), 1);
        assert_eq!(cmap.resolve(0x0020), None);
        assert_eq!(cmap.resolve(0x0030).as_deref(), Some("C"));
    }

    #[test]
    fn unterminated_section_is_ignored() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<0001> <0041>\n");
        assert!(cmap.is_empty());
    }

    // --- codespace ---

    #[test]
    fn codes_outside_codespace_never_resolve() {
        let cmap = CharacterMap::parse(
            "F1",
            b"begincodespacerange\n<0020> <007E>\nendcodespacerange\n\
              beginbfrange\n<0000> <FFFF> <0000>\nendbfrange\n\
              beginbfchar\n<0010> <0041>\nendbfchar\n",
        );
        assert_eq!(cmap.resolve(0x0010), None);
        assert_eq!(cmap.resolve(0x007F), None);
        assert_eq!(cmap.resolve(0x0041).as_deref(), Some("A"));
    }

    // --- convert ---

    #[test]
    fn convert_identity_hello() {
        assert_eq!(identity().convert("00480065006C006C006F"), "Hello");
    }

    #[test]
    fn convert_is_chunkwise_composition() {
        let cmap = identity();
        let a = "0048";
        let b = "0069";
        let joined = cmap.convert(&format!("{a}{b}"));
        assert_eq!(joined, format!("{}{}", cmap.convert(a), cmap.convert(b)));
        assert_eq!(joined, "Hi");
    }

    #[test]
    fn convert_skips_unresolved_codes() {
        let cmap = CharacterMap::parse("F1", b"beginbfchar\n<0001> <0041>\nendbfchar\n");
        assert_eq!(cmap.convert("000100020001"), "AA");
    }

    #[test]
    fn convert_ignores_whitespace_and_trailing_partial_chunk() {
        assert_eq!(identity().convert("0048 0069\n00"), "Hi");
    }

    #[test]
    fn convert_skips_non_hex_chunks() {
        assert_eq!(identity().convert("00480Z690069"), "Hi");
    }
}
