use std::borrow::Cow;
use std::ops::Range;

use xi_rope::Rope;

use crate::editing::commands::Cmd;
use crate::editing::{EditError, Patch};
use crate::parsing::rope::span::Span;
use crate::parsing::{OutlineTree, parse_document};

/// The text buffer plus the editor state the engine needs: a single
/// selection, the set of folded spans, and an edit version counter.
///
/// The buffer is an `xi_rope::Rope`; every span in the crate is a byte range
/// into it. Structure queries parse fresh from the buffer (`outline`), so
/// there is no parse state to invalidate when the text changes.
pub struct Document {
    buffer: Rope,
    /// Current selection as byte offsets; empty range = cursor.
    selection: Range<usize>,
    /// Currently collapsed spans, tracked so a region swap can reproject them.
    folds: Vec<Span>,
    /// Incremented on each edit (enables change detection).
    version: u64,
}

impl Document {
    /// Creates a document from raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            selection: 0..0,
            folds: Vec::new(),
            version: 0,
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// The whole buffer as a span.
    pub fn full_span(&self) -> Span {
        Span::new(0, self.buffer.len())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Parses the document structure afresh.
    pub fn outline(&self) -> OutlineTree {
        parse_document(&self.buffer, self.full_span())
    }

    /// Applies an editing command. See [`Cmd`].
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        crate::editing::commands::apply(self, cmd)
    }

    // ---- text access ----

    /// Slices the buffer, clamping the range to the buffer bounds.
    pub fn slice_to_cow(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    pub fn substr(&self, span: Span) -> String {
        self.slice_to_cow(span.start..span.end).into_owned()
    }

    // ---- selection ----

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.selection = offset..offset;
    }

    /// The single empty cursor, required by every structural command.
    pub fn cursor(&self) -> Result<usize, EditError> {
        if self.selection.start != self.selection.end {
            return Err(EditError::SelectionNotEmpty);
        }
        Ok(self.selection.start)
    }

    // ---- folds ----

    pub fn folds(&self) -> &[Span] {
        &self.folds
    }

    pub fn set_folds(&mut self, folds: Vec<Span>) {
        self.folds = folds;
    }

    /// Folds a span. Returns false if it was already folded.
    pub fn fold(&mut self, span: Span) -> bool {
        if self.folds.contains(&span) {
            return false;
        }
        self.folds.push(span);
        true
    }

    pub fn unfold(&mut self, span: Span) {
        self.folds.retain(|&f| f != span);
    }

    // ---- line and point mapping ----

    /// True when `offset` sits at the start of a line (or the buffer start).
    pub fn is_line_start(&self, offset: usize) -> bool {
        if offset == 0 {
            return true;
        }
        if offset > self.buffer.len() {
            return false;
        }
        self.buffer.slice_to_cow(offset - 1..offset) == "\n"
    }

    /// The full line containing `offset`, terminator included; the last line
    /// ends at the buffer end.
    pub fn line_span_at(&self, offset: usize) -> Span {
        let len = self.buffer.len();
        let offset = offset.min(len);
        let row = self.buffer.line_of_offset(offset);
        let start = self.buffer.offset_of_line(row);
        let last_row = self.buffer.line_of_offset(len);
        let end = if row + 1 > last_row {
            len
        } else {
            self.buffer.offset_of_line(row + 1)
        };
        Span::new(start, end)
    }

    /// Maps an absolute offset to zero-based (row, column).
    pub fn offset_to_point(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.buffer.len());
        let row = self.buffer.line_of_offset(offset);
        (row, offset - self.buffer.offset_of_line(row))
    }

    /// Maps zero-based (row, column) back to an absolute offset, clamped to
    /// the buffer end.
    pub fn point_to_offset(&self, row: usize, column: usize) -> usize {
        let len = self.buffer.len();
        let last_row = self.buffer.line_of_offset(len);
        if row > last_row {
            return len;
        }
        (self.buffer.offset_of_line(row) + column).min(len)
    }

    // ---- mutation ----

    pub fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.buffer.len());
        self.buffer.edit(at..at, text);
        self.version += 1;
    }

    pub fn erase(&mut self, span: Span) {
        let len = self.buffer.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        self.buffer.edit(start..end, "");
        self.version += 1;
    }

    pub fn replace(&mut self, span: Span, text: &str) {
        let len = self.buffer.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        self.buffer.edit(start..end, text);
        self.version += 1;
    }
}
