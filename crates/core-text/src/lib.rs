//! Line store with per-line copy-on-write storage.
//!
//! The file content read at startup stays in a single allocation owned by the
//! caller. Every line initially borrows its slice of that allocation; only a
//! line that receives an insertion is copied into its own `Vec<u8>`. Unedited
//! lines therefore never allocate, and the backing bytes are never written.
//!
//! Invariants:
//! * A line is `Owned` iff it has received at least one insertion since load.
//! * Conversion is one-directional (`Borrowed` -> `Owned`).
//! * Line indices are stable: lines are only ever appended (at most once per
//!   edit past end-of-buffer), never removed or merged.
//!
//! Splitting counts `\n` bytes. Bytes after the final newline do not form a
//! line; `LineStore::dropped_tail` reports how many were discarded so callers
//! can surface the loss.

use std::fmt;

/// A single logical row of text.
#[derive(Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Aliases a region of the loaded file content.
    Borrowed(&'a [u8]),
    /// Independently allocated; mutated in place.
    Owned(Vec<u8>),
}

impl<'a> Line<'a> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Line::Borrowed(b) => b,
            Line::Owned(v) => v.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Line::Owned(_))
    }

    /// Replace a borrowed variant with an owned copy and return the mutable bytes.
    fn make_owned(&mut self) -> &mut Vec<u8> {
        if let Line::Borrowed(b) = *self {
            *self = Line::Owned(b.to_vec());
        }
        match self {
            Line::Owned(v) => v,
            Line::Borrowed(_) => unreachable!("borrowed line replaced above"),
        }
    }
}

impl fmt::Debug for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.is_owned() { "Owned" } else { "Borrowed" };
        f.debug_tuple(tag)
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

/// Read-only view returned by [`LineStore::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSlot<'s> {
    Line(&'s [u8]),
    /// Index at or past `line_count`.
    EndOfBuffer,
}

impl<'s> LineSlot<'s> {
    /// Bytes of the line; the end-of-buffer sentinel reads as empty.
    pub fn bytes(self) -> &'s [u8] {
        match self {
            LineSlot::Line(b) => b,
            LineSlot::EndOfBuffer => &[],
        }
    }

    pub fn is_end(self) -> bool {
        matches!(self, LineSlot::EndOfBuffer)
    }
}

/// Ordered sequence of lines in document order.
#[derive(Debug, Clone, Default)]
pub struct LineStore<'a> {
    lines: Vec<Line<'a>>,
    dropped_tail: usize,
}

impl<'a> LineStore<'a> {
    /// Split `content` into one borrowed line per `\n`.
    pub fn load(content: &'a [u8]) -> Self {
        let mut lines = Vec::with_capacity(content.iter().filter(|b| **b == b'\n').count());
        let mut start = 0;
        for (i, b) in content.iter().enumerate() {
            if *b == b'\n' {
                lines.push(Line::Borrowed(&content[start..i]));
                start = i + 1;
            }
        }
        Self {
            lines,
            dropped_tail: content.len() - start,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of bytes after the last newline that were not loaded as a line.
    pub fn dropped_tail(&self) -> usize {
        self.dropped_tail
    }

    pub fn get(&self, index: usize) -> LineSlot<'_> {
        match self.lines.get(index) {
            Some(line) => LineSlot::Line(line.as_bytes()),
            None => LineSlot::EndOfBuffer,
        }
    }

    /// Byte length of a line; zero past the end.
    pub fn line_len(&self, index: usize) -> usize {
        self.get(index).bytes().len()
    }

    pub fn is_owned(&self, index: usize) -> bool {
        self.lines.get(index).is_some_and(Line::is_owned)
    }

    /// Count of lines materialized by edits.
    pub fn owned_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_owned()).count()
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Insert `ch` at byte `column` of line `index`.
    ///
    /// `index == line_count` appends a fresh owned line first. Callers clamp
    /// `index` to `line_count`; `column` is clamped to the line length here.
    pub fn insert_char(&mut self, index: usize, column: usize, ch: u8) {
        debug_assert!(index <= self.lines.len(), "line index past virtual line");
        if index >= self.lines.len() {
            self.lines.push(Line::Owned(Vec::new()));
        }
        let idx = index.min(self.lines.len() - 1);
        let bytes = self.lines[idx].make_owned();
        let at = column.min(bytes.len());
        bytes.insert(at, ch);
    }

    /// Every line followed by `\n`, in order.
    pub fn serialize(&self) -> Vec<u8> {
        let total = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for line in &self.lines {
            out.extend_from_slice(line.as_bytes());
            out.push(b'\n');
        }
        out
    }
}
