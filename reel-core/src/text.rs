//! Character-indexed span helpers.
//!
//! Scripts are mostly CJK, so every length, offset, and span boundary in the
//! engine is counted in `char`s. These helpers translate between character
//! positions and the byte slices Rust strings are indexed by.

use crate::model::Section;

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_idx`, clamped to the end of `text`.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Characters `[start, end)` of `text`. Out-of-range bounds are clamped;
/// an inverted range yields an empty span.
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let from = byte_offset(text, start);
    let to = byte_offset(text, end);
    &text[from..to]
}

/// The first `n` characters of `text`.
pub fn head(text: &str, n: usize) -> &str {
    &text[..byte_offset(text, n)]
}

/// The last `n` characters of `text`.
pub fn tail(text: &str, n: usize) -> &str {
    let len = char_len(text);
    if n >= len {
        return text;
    }
    &text[byte_offset(text, len - n)..]
}

/// Span between two fractional positions of the text, e.g. `(0.2, 0.7)`.
///
/// Bounds are floored the same way for every analyzer so spans line up.
pub fn fraction_span(text: &str, from: f64, to: f64) -> &str {
    let len = char_len(text) as f64;
    slice(text, (len * from) as usize, (len * to) as usize)
}

/// Character offset of the first occurrence of `needle` in `text`.
pub fn char_offset_of(text: &str, needle: &str) -> Option<usize> {
    text.find(needle).map(|byte| text[..byte].chars().count())
}

/// Coarse position bucket of a character offset within a text of `total`
/// characters: the first 30% is the opening, anything past 70% the ending.
pub fn section_at(offset: usize, total: usize) -> Section {
    let offset = offset as f64;
    let total = total as f64;
    if offset < total * 0.3 {
        Section::Opening
    } else if offset > total * 0.7 {
        Section::Ending
    } else {
        Section::Middle
    }
}

/// Split on sentence-final punctuation. Empty pieces are kept.
pub fn split_sentences<'a>(text: &'a str, terminators: &'a [char]) -> impl Iterator<Item = &'a str> {
    text.split(move |c: char| terminators.contains(&c))
}
