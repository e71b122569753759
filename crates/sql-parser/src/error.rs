//! Error types for the SQL parser.
//!
//! Every failed parse produces exactly one [`ParseError`]. The first
//! failure wins: the lexer stops at its first bad character and the
//! parser stops at its first unexpected token.

use crate::cursor::Position;
use crate::token::Token;
use rowan::{TextRange, TextSize};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which stage of the pipeline rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Lexical,
    Syntactic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => f.write_str("lexical"),
            Phase::Syntactic => f.write_str("syntax"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A string literal reached end of input before its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A quoted identifier reached end of input before its closing quote.
    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,

    #[error("zero-length quoted identifier")]
    EmptyQuotedIdentifier,

    /// A `/* ... */` comment with no closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("malformed numeric literal '{0}'")]
    MalformedNumber(String),

    #[error("integer literal '{0}' is out of range")]
    IntegerOutOfRange(String),

    /// The parser found a token that cannot appear here.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    /// A SELECT clause keyword appeared after a clause that must follow it.
    #[error("{clause} clause is out of order; expected {expected}")]
    ClauseOutOfOrder { clause: String, expected: String },

    #[error("expression nesting exceeds the limit of {0}")]
    NestingTooDeep(usize),
}

impl ErrorKind {
    pub fn phase(&self) -> Phase {
        match self {
            ErrorKind::UnexpectedCharacter(_)
            | ErrorKind::UnterminatedString
            | ErrorKind::UnterminatedQuotedIdentifier
            | ErrorKind::EmptyQuotedIdentifier
            | ErrorKind::UnterminatedComment
            | ErrorKind::MalformedNumber(_)
            | ErrorKind::IntegerOutOfRange(_) => Phase::Lexical,
            ErrorKind::UnexpectedToken { .. }
            | ErrorKind::ClauseOutOfOrder { .. }
            | ErrorKind::NestingTooDeep(_) => Phase::Syntactic,
        }
    }
}

/// A lexical or syntax error with its location in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{} error at {position}: {kind}", .kind.phase())]
pub struct ParseError {
    pub kind: ErrorKind,
    pub position: Position,
    /// Source bytes the error points at. Empty at end of input.
    #[serde(skip)]
    pub range: TextRange,
}

impl ParseError {
    pub fn new(kind: ErrorKind, position: Position, range: TextRange) -> Self {
        Self {
            kind,
            position,
            range,
        }
    }

    /// A lexical error spanning `position` up to `end_offset`.
    pub(crate) fn lexical(kind: ErrorKind, position: Position, end_offset: usize) -> Self {
        let range = TextRange::new(text_size(position.offset), text_size(end_offset));
        Self::new(kind, position, range)
    }

    /// "expected X, found <token>" at the token's location.
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        Self::new(
            ErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.to_string(),
            },
            found.position,
            found.range,
        )
    }

    pub fn phase(&self) -> Phase {
        self.kind.phase()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

pub(crate) fn text_size(offset: usize) -> TextSize {
    // Inputs over 4GB are not supported.
    TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_kind() {
        assert_eq!(ErrorKind::UnterminatedString.phase(), Phase::Lexical);
        assert_eq!(
            ErrorKind::MalformedNumber("1e".into()).phase(),
            Phase::Lexical
        );
        assert_eq!(
            ErrorKind::UnexpectedToken {
                expected: "expression".into(),
                found: "keyword FROM".into()
            }
            .phase(),
            Phase::Syntactic
        );
    }

    #[test]
    fn display_includes_phase_and_location() {
        let err = ParseError::lexical(
            ErrorKind::UnexpectedCharacter('#'),
            Position {
                offset: 7,
                line: 1,
                column: 8,
            },
            8,
        );
        assert_eq!(
            err.to_string(),
            "lexical error at line 1, column 8: unexpected character '#'"
        );
        assert_eq!(err.message(), "unexpected character '#'");
        assert_eq!((err.line(), err.column(), err.offset()), (1, 8, 7));
        assert_eq!(usize::from(err.range.len()), 1);
    }
}
