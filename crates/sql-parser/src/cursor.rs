//! Character cursor over the raw SQL text.
//!
//! The cursor is the only place that knows how byte offsets map to
//! lines and columns. Everything downstream asks it for a [`Position`].

use serde::Serialize;
use std::fmt;

/// A point in the source text.
///
/// `offset` is a byte offset from the start of the input. `line` and
/// `column` are 1-based; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Walks the input one `char` at a time while tracking line and column.
#[derive(Debug, Clone)]
pub struct SourceCursor<'a> {
    input: &'a str,
    position: Position,
}

impl<'a> SourceCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: Position::START,
        }
    }

    /// The character under the cursor, or `None` at end of input.
    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character `n` places after the one under the cursor.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume one character. Returns `None` (and does not move) at end of input.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.position.offset += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// Consume characters while `pred` holds.
    pub fn advance_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek_char().is_some_and(&mut pred) {
            self.advance();
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position.offset >= self.input.len()
    }

    /// Source text from `start` (a byte offset previously reported by
    /// [`SourceCursor::position`]) up to the cursor.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.position.offset]
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position.offset..]
    }
}
