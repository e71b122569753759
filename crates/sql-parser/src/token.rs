/// Token types produced by the lexer
use crate::cursor::Position;
use rowan::TextRange;
use serde::Serialize;
use std::fmt;

/// Reserved words of the supported SQL subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    All,
    And,
    As,
    Asc,
    Between,
    By,
    Create,
    Cross,
    Default,
    Delete,
    Desc,
    Distinct,
    Exists,
    False,
    From,
    Full,
    Group,
    Having,
    If,
    In,
    Inner,
    Insert,
    Into,
    Is,
    Join,
    Key,
    Left,
    Like,
    Limit,
    Not,
    Null,
    Offset,
    On,
    Or,
    Order,
    Outer,
    Primary,
    Right,
    Select,
    Set,
    Table,
    True,
    Unique,
    Update,
    Values,
    Where,
}

impl Keyword {
    /// Classify a bare word. Matching is ASCII case-insensitive.
    pub fn lookup(word: &str) -> Option<Keyword> {
        use Keyword::*;

        // Longest keyword is 8 bytes; anything longer is an identifier.
        if word.len() > 8 {
            return None;
        }
        let kw = match word.to_ascii_uppercase().as_str() {
            "ALL" => All,
            "AND" => And,
            "AS" => As,
            "ASC" => Asc,
            "BETWEEN" => Between,
            "BY" => By,
            "CREATE" => Create,
            "CROSS" => Cross,
            "DEFAULT" => Default,
            "DELETE" => Delete,
            "DESC" => Desc,
            "DISTINCT" => Distinct,
            "EXISTS" => Exists,
            "FALSE" => False,
            "FROM" => From,
            "FULL" => Full,
            "GROUP" => Group,
            "HAVING" => Having,
            "IF" => If,
            "IN" => In,
            "INNER" => Inner,
            "INSERT" => Insert,
            "INTO" => Into,
            "IS" => Is,
            "JOIN" => Join,
            "KEY" => Key,
            "LEFT" => Left,
            "LIKE" => Like,
            "LIMIT" => Limit,
            "NOT" => Not,
            "NULL" => Null,
            "OFFSET" => Offset,
            "ON" => On,
            "OR" => Or,
            "ORDER" => Order,
            "OUTER" => Outer,
            "PRIMARY" => Primary,
            "RIGHT" => Right,
            "SELECT" => Select,
            "SET" => Set,
            "TABLE" => Table,
            "TRUE" => True,
            "UNIQUE" => Unique,
            "UPDATE" => Update,
            "VALUES" => Values,
            "WHERE" => Where,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        use Keyword::*;
        match self {
            All => "ALL",
            And => "AND",
            As => "AS",
            Asc => "ASC",
            Between => "BETWEEN",
            By => "BY",
            Create => "CREATE",
            Cross => "CROSS",
            Default => "DEFAULT",
            Delete => "DELETE",
            Desc => "DESC",
            Distinct => "DISTINCT",
            Exists => "EXISTS",
            False => "FALSE",
            From => "FROM",
            Full => "FULL",
            Group => "GROUP",
            Having => "HAVING",
            If => "IF",
            In => "IN",
            Inner => "INNER",
            Insert => "INSERT",
            Into => "INTO",
            Is => "IS",
            Join => "JOIN",
            Key => "KEY",
            Left => "LEFT",
            Like => "LIKE",
            Limit => "LIMIT",
            Not => "NOT",
            Null => "NULL",
            Offset => "OFFSET",
            On => "ON",
            Or => "OR",
            Order => "ORDER",
            Outer => "OUTER",
            Primary => "PRIMARY",
            Right => "RIGHT",
            Select => "SELECT",
            Set => "SET",
            Table => "TABLE",
            True => "TRUE",
            Unique => "UNIQUE",
            Update => "UPDATE",
            Values => "VALUES",
            Where => "WHERE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `word` would lex as a keyword.
pub fn is_keyword(word: &str) -> bool {
    Keyword::lookup(word).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Eq,          // =
    LtGt,        // <>
    BangEq,      // !=
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    Concat,      // ||
    DoubleColon, // ::
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::LtGt => "<>",
            Operator::BangEq => "!=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Concat => "||",
            Operator::DoubleColon => "::",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Punctuation {
    LParen,    // (
    RParen,    // )
    Comma,     // ,
    Dot,       // .
    Semicolon, // ;
}

impl Punctuation {
    pub fn as_str(self) -> &'static str {
        match self {
            Punctuation::LParen => "(",
            Punctuation::RParen => ")",
            Punctuation::Comma => ",",
            Punctuation::Dot => ".",
            Punctuation::Semicolon => ";",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    /// Digits only; the lexer has already checked the value fits in `i64`.
    IntegerLiteral(i64),
    NumericLiteral,
    StringLiteral,
    Operator(Operator),
    Punctuation(Punctuation),
    EndOfInput,
}

/// A single lexeme.
///
/// For string literals and quoted identifiers `text` holds the decoded
/// content; for everything else it is the exact source slice. `range`
/// always covers the original bytes, quotes included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
    #[serde(skip)]
    pub range: TextRange,
}

impl Token {
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    pub fn is_operator(&self, op: Operator) -> bool {
        self.kind == TokenKind::Operator(op)
    }

    pub fn is_punct(&self, punct: Punctuation) -> bool {
        self.kind == TokenKind::Punctuation(punct)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

/// Human-readable description used in "found X" diagnostics.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Keyword(kw) => write!(f, "keyword {}", kw),
            TokenKind::Identifier => write!(f, "identifier \"{}\"", self.text),
            TokenKind::IntegerLiteral(_) | TokenKind::NumericLiteral => {
                write!(f, "number {}", self.text)
            }
            TokenKind::StringLiteral => write!(f, "string '{}'", self.text),
            TokenKind::Operator(op) => write!(f, "operator '{}'", op.as_str()),
            TokenKind::Punctuation(p) => write!(f, "'{}'", p.as_str()),
            TokenKind::EndOfInput => f.write_str("end of input"),
        }
    }
}
