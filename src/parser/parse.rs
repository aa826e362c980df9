//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, cursor helpers, and the parse entry points.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: the statement grammar (recursive descent)
//! - `expressions`: arithmetic expressions via postfix conversion
//!
//! Parser methods are split across files using `impl Parser` blocks, each
//! extending the shared cursor over the token slice.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use thiserror::Error;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {location}:\n{context}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    pub context: String,
}

impl ParseError {
    /// Error pointing at `token`.
    pub(crate) fn at(token: &Token, message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            location: token.location,
            context: token.context.clone(),
        }
    }
}

/// Cursor over a borrowed token sequence.
///
/// The tokens are never mutated; AST nodes refer back to them by [`TokenId`].
pub struct Parser<'t> {
    pub(crate) tokens: &'t [Token],
    pub(crate) position: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Start parsing at an arbitrary token index.
    pub fn at_position(tokens: &'t [Token], position: usize) -> Self {
        Self { tokens, position }
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Parse the entire token sequence as a list of top-level statements
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            program.statements.push(self.parse_statement()?);
        }

        debug!(statements = program.statements.len(), "parsed program");
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn previous(&self) -> Option<&'t Token> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    /// `"{message}, found <token>"` at the current token.
    ///
    /// At the end of input the error points at the last token, since there
    /// is nothing after it to underline.
    pub(crate) fn unexpected(&self, message: &str) -> ParseError {
        match (self.peek(), self.previous()) {
            (Some(token), _) => ParseError::at(token, format!("{}, found {}", message, token)),
            (None, Some(last)) => ParseError::at(last, format!("{}, found end of input", message)),
            (None, None) => ParseError {
                message: format!("{}, found end of input", message),
                location: SourceLocation::new(1, 0),
                context: String::new(),
            },
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<&'t Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.position += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(message)),
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<VariableSite, ParseError> {
        let id = self.position;
        let token = self.expect_token(
            TokenKind::Identifier,
            &format!("Expected identifier {}", ctx),
        )?;
        Ok(VariableSite::new(token.text(), id, token.location))
    }
}

/// Parse a whole token sequence into top-level statements.
pub fn parse_statements(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Parse one expression starting at `*position`, stopping before `terminator`.
///
/// On success `*position` indexes the terminator token.
pub fn parse_expression(
    tokens: &[Token],
    position: &mut usize,
    terminator: TokenKind,
) -> Result<Expr, ParseError> {
    let mut parser = Parser::at_position(tokens, *position);
    let expr = parser.parse_expression(terminator)?;
    *position = parser.position;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_parse_program_counts_statements() {
        let tokens = tokenize("let x = 1; x = x + 1; display x;").unwrap();
        let program = parse_statements(&tokens).unwrap();

        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_empty_program() {
        let program = parse_statements(&[]).unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_parse_expression_stops_at_terminator() {
        let tokens = tokenize("let y = 2 * 3; display y;").unwrap();
        let mut position = 3;

        let expr = parse_expression(&tokens, &mut position, TokenKind::Semicolon).unwrap();

        assert_eq!(expr.evaluate_constant(), Some(6));
        assert_eq!(position, 6);
        assert_eq!(tokens[position].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_error_at_end_of_input_points_at_last_token() {
        let tokens = tokenize("display").unwrap();
        let err = parse_statements(&tokens).unwrap_err();

        assert!(err.message.ends_with("found end of input"));
        assert_eq!(err.location, SourceLocation::new(1, 0));
        assert_eq!(err.context, "display\n^~~~~~~");
    }
}
