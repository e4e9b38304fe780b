//! Text object (`BT` … `ET`) region scanning.
//!
//! [`text_regions`] walks a combined content buffer and yields the text
//! between every begin/end text object pair. Regions never overlap and never
//! nest: each match ends at the first `ET` that follows its `BT`.

use std::sync::LazyLock;

use regex::Regex;

static TEXT_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII word boundaries: the buffer is Latin-1, so bytes >= 0x80 are delimiters.
    Regex::new(r"(?s)(?-u:\b)BT\s(.*?)\sET(?-u:\b)").expect("text object pattern is valid")
});

/// The body of one text object: everything strictly between `BT` and `ET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRegion<'a> {
    /// 0-based position of this region in scan order.
    pub index: usize,
    /// Byte offset of the body within the scanned buffer.
    pub offset: usize,
    /// The body text.
    pub text: &'a str,
}

/// Lazy iterator over the text regions of a buffer.
///
/// Cloning the iterator, or calling [`text_regions`] again on the same
/// buffer, restarts the scan and yields the same regions.
#[derive(Debug, Clone)]
pub struct TextRegions<'a> {
    buffer: &'a str,
    pos: usize,
    index: usize,
}

/// Scan `buffer` for `BT` … `ET` pairs.
pub fn text_regions(buffer: &str) -> TextRegions<'_> {
    TextRegions {
        buffer,
        pos: 0,
        index: 0,
    }
}

impl<'a> Iterator for TextRegions<'a> {
    type Item = TextRegion<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buffer.len() {
            return None;
        }
        let caps = TEXT_OBJECT.captures_at(self.buffer, self.pos)?;
        let whole = caps.get(0)?;
        let body = caps.get(1)?;
        self.pos = whole.end();
        let region = TextRegion {
            index: self.index,
            offset: body.start(),
            text: body.as_str(),
        };
        self.index += 1;
        Some(region)
    }
}
