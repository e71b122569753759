//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Character that delimits quoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierQuote {
    /// `"name"` (ANSI)
    #[default]
    Double,
    /// `` `name` `` (MySQL style)
    Backtick,
}

impl IdentifierQuote {
    pub fn as_char(self) -> char {
        match self {
            IdentifierQuote::Double => '"',
            IdentifierQuote::Backtick => '`',
        }
    }
}

/// Options shared by the lexer and the parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    pub identifier_quote: IdentifierQuote,
    /// Maximum nesting of expressions and subqueries.
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            identifier_quote: IdentifierQuote::Double,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn with_identifier_quote(mut self, quote: IdentifierQuote) -> Self {
        self.identifier_quote = quote;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
