//! Recursive-descent parser.
//!
//! Statements are parsed in [`statements`], expressions by precedence
//! climbing in [`expressions`]. Every function returns a
//! [`Result`]; the first error aborts the parse and no partial tree is
//! returned.

mod expressions;
mod statements;

use crate::ast::Statement;
use crate::config::ParserConfig;
use crate::error::{ErrorKind, ParseError, Result};
use crate::lexer::Lexer;
use crate::stream::TokenStream;
use crate::token::Punctuation;

/// Parse a single statement, optionally followed by one `;`.
pub fn parse(source: &str) -> Result<Statement> {
    parse_with(source, &ParserConfig::default())
}

pub fn parse_with(source: &str, config: &ParserConfig) -> Result<Statement> {
    tracing::debug!(len = source.len(), "parsing statement");
    let mut parser = Parser::new(source, config);
    let result = parser.parse_single();
    if let Err(err) = &result {
        tracing::debug!(%err, "parse failed");
    }
    result
}

/// Parse zero or more statements separated by `;`.
pub fn parse_script(source: &str) -> Result<Vec<Statement>> {
    parse_script_with(source, &ParserConfig::default())
}

pub fn parse_script_with(source: &str, config: &ParserConfig) -> Result<Vec<Statement>> {
    tracing::debug!(len = source.len(), "parsing script");
    let mut parser = Parser::new(source, config);
    let result = parser.parse_statements();
    match &result {
        Ok(statements) => tracing::debug!(count = statements.len(), "parsed script"),
        Err(err) => tracing::debug!(%err, "parse failed"),
    }
    result
}

const RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

/// Parser state for one input. Not meant to be reused across inputs.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    max_depth: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, config: &ParserConfig) -> Self {
        Self {
            tokens: TokenStream::new(Lexer::with_config(source, config)),
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    fn parse_single(&mut self) -> Result<Statement> {
        let statement = self.parse_statement()?;
        self.tokens.eat_punct(Punctuation::Semicolon)?;
        if !self.tokens.at_eof()? {
            return Err(self.tokens.unexpected("end of input"));
        }
        Ok(statement)
    }

    fn parse_statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            while self.tokens.eat_punct(Punctuation::Semicolon)? {}
            if self.tokens.at_eof()? {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
            if !self.tokens.eat_punct(Punctuation::Semicolon)? && !self.tokens.at_eof()? {
                return Err(self.tokens.unexpected("';' or end of input"));
            }
        }
    }

    /// Run `f` one nesting level deeper, failing once the configured
    /// depth is exceeded.
    ///
    /// The stack is extended on the heap when less than [`RED_ZONE`] is
    /// left, so any depth the limit admits also fits on a small thread.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            let token = self.tokens.peek()?;
            return Err(ParseError::new(
                ErrorKind::NestingTooDeep(self.max_depth),
                token.position,
                token.range,
            ));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || f(self));
        self.depth -= 1;
        result
    }
}
