//! sql-parser - lexer, parser and AST for a common subset of SQL
//!
//! Turns SQL text into an owned abstract syntax tree, or into exactly one
//! [`ParseError`] that says what was expected, what was found and where.
//!
//! The pipeline is pull-based:
//! - [`cursor`] walks the source one character at a time, tracking
//!   line and column
//! - [`lexer`] produces [`Token`]s on demand
//! - [`stream`] buffers two tokens of lookahead
//! - [`parser`] is a recursive-descent parser with one function per
//!   expression precedence level
//!
//! There is no error recovery: the first error ends the parse. The
//! [`printer`] turns a tree back into SQL that parses to an equal tree.
//!
//! ```
//! use sql_parser::{parse, StatementKind};
//!
//! let statement = parse("SELECT name FROM author WHERE id = 1").unwrap();
//! assert!(matches!(statement.kind, StatementKind::Select(_)));
//! assert_eq!(statement.to_string(), "SELECT name FROM author WHERE id = 1");
//! ```

pub mod ast;
pub mod config;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod stream;
pub mod token;

pub use ast::*;
pub use config::{IdentifierQuote, ParserConfig};
pub use cursor::Position;
pub use error::{ErrorKind, ParseError, Phase};
pub use lexer::{tokenize, tokenize_with, Lexer};
pub use parser::{parse, parse_script, parse_script_with, parse_with, Parser};
pub use printer::{to_sql, to_sql_with, FormatMode};
pub use token::{is_keyword, Keyword, Operator, Punctuation, Token, TokenKind};

/// Re-export Rowan types for convenience
pub use rowan::TextRange;
