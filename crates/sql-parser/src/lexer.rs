/// Lexer for SQL source text
use crate::config::ParserConfig;
use crate::cursor::{Position, SourceCursor};
use crate::error::{text_size, ErrorKind, ParseError, Result};
use crate::token::{Keyword, Operator, Punctuation, Token, TokenKind};
use rowan::TextRange;

/// Tokenize input text with the default configuration.
///
/// The returned vector always ends with a single `EndOfInput` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    tokenize_with(input, &ParserConfig::default())
}

pub fn tokenize_with(input: &str, config: &ParserConfig) -> Result<Vec<Token>> {
    Lexer::with_config(input, config).collect()
}

/// Pull-based lexer. Whitespace and comments never reach the caller.
///
/// Once `EndOfInput` has been produced, every further call to
/// [`Lexer::next_token`] produces it again. After an error the lexer is
/// stuck and keeps returning that error.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: SourceCursor<'a>,
    quote: char,
    failed: Option<ParseError>,
    // Iterator state: set once EndOfInput or an error has been yielded.
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, &ParserConfig::default())
    }

    pub fn with_config(input: &'a str, config: &ParserConfig) -> Self {
        Self {
            cursor: SourceCursor::new(input),
            quote: config.identifier_quote.as_char(),
            failed: None,
            done: false,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        self.scan().inspect_err(|err| {
            tracing::trace!(%err, "lexer stopped");
            self.failed = Some(err.clone());
        })
    }

    fn scan(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        let start = self.cursor.position();
        let Some(c) = self.cursor.peek_char() else {
            return Ok(self.finish(TokenKind::EndOfInput, start, String::new()));
        };

        let kind = match c {
            '(' => self.punct(Punctuation::LParen),
            ')' => self.punct(Punctuation::RParen),
            ',' => self.punct(Punctuation::Comma),
            '.' => self.punct(Punctuation::Dot),
            ';' => self.punct(Punctuation::Semicolon),
            '=' => self.op(1, Operator::Eq),
            '+' => self.op(1, Operator::Plus),
            '-' => self.op(1, Operator::Minus),
            '*' => self.op(1, Operator::Star),
            '/' => self.op(1, Operator::Slash),
            '%' => self.op(1, Operator::Percent),
            '<' => match self.cursor.peek_nth(1) {
                Some('=') => self.op(2, Operator::LtEq),
                Some('>') => self.op(2, Operator::LtGt),
                _ => self.op(1, Operator::Lt),
            },
            '>' => match self.cursor.peek_nth(1) {
                Some('=') => self.op(2, Operator::GtEq),
                _ => self.op(1, Operator::Gt),
            },
            '!' if self.cursor.peek_nth(1) == Some('=') => self.op(2, Operator::BangEq),
            '|' if self.cursor.peek_nth(1) == Some('|') => self.op(2, Operator::Concat),
            ':' if self.cursor.peek_nth(1) == Some(':') => self.op(2, Operator::DoubleColon),

            '\'' => {
                let text = self.consume_string(start)?;
                return Ok(self.finish(TokenKind::StringLiteral, start, text));
            }
            c if c == self.quote => {
                let text = self.consume_quoted_ident(start)?;
                return Ok(self.finish(TokenKind::Identifier, start, text));
            }

            c if c.is_ascii_digit() => self.consume_number(start)?,

            c if c.is_alphabetic() || c == '_' => self.consume_ident_or_keyword(start),

            _ => {
                self.cursor.advance();
                return Err(self.error(ErrorKind::UnexpectedCharacter(c), start));
            }
        };

        let text = self.cursor.slice_from(start.offset).to_string();
        Ok(self.finish(kind, start, text))
    }

    fn finish(&self, kind: TokenKind, start: Position, text: String) -> Token {
        Token {
            kind,
            text,
            position: start,
            range: self.range_from(start),
        }
    }

    fn error(&self, kind: ErrorKind, start: Position) -> ParseError {
        ParseError::lexical(kind, start, self.cursor.position().offset)
    }

    fn range_from(&self, start: Position) -> TextRange {
        TextRange::new(
            text_size(start.offset),
            text_size(self.cursor.position().offset),
        )
    }

    fn punct(&mut self, punct: Punctuation) -> TokenKind {
        self.cursor.advance();
        TokenKind::Punctuation(punct)
    }

    fn op(&mut self, len: usize, op: Operator) -> TokenKind {
        for _ in 0..len {
            self.cursor.advance();
        }
        TokenKind::Operator(op)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.cursor.peek_char(), self.cursor.peek_nth(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.cursor.advance_while(char::is_whitespace);
                }
                (Some('-'), Some('-')) => {
                    self.cursor.advance_while(|c| c != '\n');
                }
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.cursor.position();
        // Consume /*
        self.cursor.advance();
        self.cursor.advance();

        loop {
            match self.cursor.advance() {
                Some('*') if self.cursor.peek_char() == Some('/') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.error(ErrorKind::UnterminatedComment, start)),
            }
        }
    }

    /// Single-quoted literal; `''` stands for one quote.
    fn consume_string(&mut self, start: Position) -> Result<String> {
        self.consume_delimited('\'', start, ErrorKind::UnterminatedString)
    }

    fn consume_quoted_ident(&mut self, start: Position) -> Result<String> {
        let text =
            self.consume_delimited(self.quote, start, ErrorKind::UnterminatedQuotedIdentifier)?;
        if text.is_empty() {
            return Err(self.error(ErrorKind::EmptyQuotedIdentifier, start));
        }
        Ok(text)
    }

    fn consume_delimited(
        &mut self,
        quote: char,
        start: Position,
        unterminated: ErrorKind,
    ) -> Result<String> {
        // Consume opening quote
        self.cursor.advance();

        let mut text = String::new();
        loop {
            match self.cursor.advance() {
                Some(c) if c == quote => {
                    if self.cursor.peek_char() == Some(quote) {
                        self.cursor.advance();
                        text.push(quote);
                    } else {
                        return Ok(text);
                    }
                }
                Some(c) => text.push(c),
                None => return Err(self.error(unterminated, start)),
            }
        }
    }

    fn consume_number(&mut self, start: Position) -> Result<TokenKind> {
        self.cursor.advance_while(|c| c.is_ascii_digit());
        let mut is_integer = true;

        // Decimal point, digits after it are optional
        if self.cursor.peek_char() == Some('.') {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
            is_integer = false;
        }

        if matches!(self.cursor.peek_char(), Some('e' | 'E')) {
            self.cursor.advance();
            if matches!(self.cursor.peek_char(), Some('+' | '-')) {
                self.cursor.advance();
            }
            if !self.cursor.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.malformed_number(start));
            }
            self.cursor.advance_while(|c| c.is_ascii_digit());
            is_integer = false;
        }

        // `12abc` is neither a number nor an identifier
        if self.cursor.peek_char().is_some_and(is_ident_char) {
            self.cursor.advance_while(is_ident_char);
            return Err(self.malformed_number(start));
        }

        if !is_integer {
            return Ok(TokenKind::NumericLiteral);
        }

        let text = self.cursor.slice_from(start.offset);
        match text.parse::<i64>() {
            Ok(value) => Ok(TokenKind::IntegerLiteral(value)),
            Err(_) => Err(self.error(ErrorKind::IntegerOutOfRange(text.to_string()), start)),
        }
    }

    fn malformed_number(&self, start: Position) -> ParseError {
        let text = self.cursor.slice_from(start.offset).to_string();
        self.error(ErrorKind::MalformedNumber(text), start)
    }

    fn consume_ident_or_keyword(&mut self, start: Position) -> TokenKind {
        self.cursor.advance_while(is_ident_char);

        let text = self.cursor.slice_from(start.offset);
        match Keyword::lookup(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Yields every token up to and including `EndOfInput`, or the first error.
impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_token();
        self.done = !matches!(&item, Ok(token) if !token.is_eof());
        Some(item)
    }
}
