use xi_rope::Rope;

use super::span::Span;

/// A single full line of the buffer with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line, including its terminator when present.
    pub span: Span,
    /// The line text, terminator included.
    pub text: String,
}

/// Returns the full lines covering `region`, in order.
///
/// The region is widened to line boundaries first, so the first line may
/// begin before `region.start`. Consecutive line spans are contiguous: each
/// line ends where the next one starts, and the last line ends at the buffer
/// end when the buffer lacks a trailing terminator. This makes `\n` and
/// `\r\n` input look the same to the parser, which strips terminators before
/// matching.
pub fn full_lines_in_span(rope: &Rope, region: Span) -> Vec<LineRef> {
    let len = rope.len();
    let start = region.start.min(len);
    let end = region.end.min(len);
    if start >= end {
        return vec![];
    }

    let mut offset = rope.offset_of_line(rope.line_of_offset(start));
    let mut out = Vec::new();
    for line in rope.lines_raw(offset..end) {
        let line_start = offset;
        offset += line.len();
        out.push(LineRef {
            span: Span::new(line_start, offset),
            text: line.into_owned(),
        });
    }
    out
}
