//! Source positions and spans.
//!
//! Lines and columns are 1-based and count characters; offsets are 0-based
//! byte offsets into the source. The source name is not repeated in every
//! span: it is held once by the owning [`ParseTree`](crate::ParseTree).

use std::fmt;

/// A point in the source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    /// 0-based byte offset.
    pub offset: u32,
}

impl Position {
    /// Start of a source: line 1, column 1, offset 0.
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Create a position.
    #[inline]
    pub const fn new(line: u32, column: u32, offset: u32) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }

    /// Step over `c`.
    ///
    /// A newline always moves to column 1 of the next line.
    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "len_utf8 is at most 4"
    )]
    pub fn advance(&mut self, c: char) {
        self.offset = self.offset.saturating_add(c.len_utf8() as u32);
        if c == '\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A located run of source text: where it starts and how many bytes it covers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    /// First character of the span.
    pub start: Position,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a span.
    #[inline]
    pub const fn new(start: Position, len: u32) -> Self {
        Span { start, len }
    }

    /// Zero-length span at `start`.
    #[inline]
    pub const fn point(start: Position) -> Self {
        Span { start, len: 0 }
    }

    /// Span from `start` up to (exclusive) the byte offset `end`.
    #[inline]
    pub fn until(start: Position, end: u32) -> Self {
        Span {
            start,
            len: end.saturating_sub(start.offset),
        }
    }

    #[inline]
    pub const fn line(&self) -> u32 {
        self.start.line
    }

    #[inline]
    pub const fn column(&self) -> u32 {
        self.start.column
    }

    #[inline]
    pub const fn offset(&self) -> u32 {
        self.start.offset
    }

    /// Exclusive end offset.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start.offset.saturating_add(self.len)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if `other` lies entirely within this span.
    #[inline]
    pub fn encloses(&self, other: Span) -> bool {
        self.offset() <= other.offset() && other.end() <= self.end()
    }

    /// Byte range, for slicing the source.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.offset() as usize..self.end() as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}@{}+{}",
            self.start.line, self.start.column, self.start.offset, self.len
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}
