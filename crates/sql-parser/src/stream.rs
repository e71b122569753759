//! Lookahead buffer between the lexer and the parser.

use crate::error::{ParseError, Result};
use crate::lexer::Lexer;
use crate::token::{Keyword, Operator, Punctuation, Token, TokenKind};
use std::collections::VecDeque;

/// How many tokens the parser may look at before consuming them.
pub const LOOKAHEAD: usize = 2;

/// Token stream with two tokens of lookahead over a pull-based [`Lexer`].
///
/// Tokens are only pulled from the lexer when the parser looks at them, so
/// a lexical error surfaces from whichever call first reaches the bad token.
#[derive(Debug)]
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: VecDeque<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            buffer: VecDeque::with_capacity(LOOKAHEAD),
        }
    }

    fn fill(&mut self, n: usize) -> Result<()> {
        debug_assert!(n < LOOKAHEAD, "lookahead of {n} exceeds the buffer");
        while self.buffer.len() <= n {
            let token = self.lexer.next_token()?;
            self.buffer.push_back(token);
        }
        Ok(())
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> Result<&Token> {
        self.peek_nth(0)
    }

    /// The token `n` places ahead (0 is the next token).
    pub fn peek_nth(&mut self, n: usize) -> Result<&Token> {
        self.fill(n)?;
        Ok(&self.buffer[n])
    }

    /// Consume and return the next token. At end of input this keeps
    /// returning `EndOfInput`.
    pub fn next(&mut self) -> Result<Token> {
        self.fill(0)?;
        match self.buffer.pop_front() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    pub fn at_keyword(&mut self, kw: Keyword) -> Result<bool> {
        Ok(self.peek()?.is_keyword(kw))
    }

    pub fn at_punct(&mut self, punct: Punctuation) -> Result<bool> {
        Ok(self.peek()?.is_punct(punct))
    }

    pub fn at_eof(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_eof())
    }

    /// Consume the next token if it is `kw`.
    pub fn eat_keyword(&mut self, kw: Keyword) -> Result<bool> {
        self.eat_if(|t| t.is_keyword(kw))
    }

    pub fn eat_punct(&mut self, punct: Punctuation) -> Result<bool> {
        self.eat_if(|t| t.is_punct(punct))
    }

    pub fn eat_operator(&mut self, op: Operator) -> Result<bool> {
        self.eat_if(|t| t.is_operator(op))
    }

    fn eat_if(&mut self, pred: impl FnOnce(&Token) -> bool) -> Result<bool> {
        if pred(self.peek()?) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn expect_keyword(&mut self, kw: Keyword) -> Result<Token> {
        self.expect(|t| t.is_keyword(kw), || format!("keyword {kw}"))
    }

    pub fn expect_punct(&mut self, punct: Punctuation) -> Result<Token> {
        self.expect(|t| t.is_punct(punct), || format!("'{}'", punct.as_str()))
    }

    pub fn expect_operator(&mut self, op: Operator) -> Result<Token> {
        self.expect(|t| t.is_operator(op), || format!("'{}'", op.as_str()))
    }

    /// Consume an identifier (bare or quoted) and return its text.
    pub fn expect_identifier(&mut self, what: &str) -> Result<String> {
        let token = self.expect(|t| t.kind == TokenKind::Identifier, || what.to_string())?;
        Ok(token.text)
    }

    fn expect(
        &mut self,
        pred: impl FnOnce(&Token) -> bool,
        expected: impl FnOnce() -> String,
    ) -> Result<Token> {
        let token = self.peek()?;
        if pred(token) {
            self.next()
        } else {
            Err(ParseError::unexpected(expected(), token))
        }
    }

    /// Build an "expected X, found <next token>" error.
    pub fn unexpected(&mut self, expected: impl Into<String>) -> ParseError {
        match self.peek() {
            Ok(token) => ParseError::unexpected(expected, token),
            Err(err) => err,
        }
    }
}
