//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= "let" IDENT "=" expr ";"
//!             | IDENT "=" expr ";"
//!             | "if" "(" expr ")" statement
//!             | "while" "(" expr ")" statement
//!             | "display" IDENT ";"
//!             | "{" statement* "}"
//! ```
//!
//! Bodies of `if` and `while` are a single statement, which may be a block.
//! Sub-expressions are handed to the postfix expression parser with the
//! token that ends them (`;` or `)`).

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl<'t> Parser<'t> {
    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("Expected a statement"));
        };
        let loc = token.location;

        match token.kind {
            TokenKind::Let => {
                self.advance();
                self.parse_variable_declaration(loc)
            }
            TokenKind::Identifier => self.parse_assignment(loc),
            TokenKind::If => {
                self.advance();
                let (condition, body) = self.parse_condition_and_body("'if'")?;
                Ok(Stmt::If {
                    condition,
                    body,
                    location: loc,
                })
            }
            TokenKind::While => {
                self.advance();
                let (condition, body) = self.parse_condition_and_body("'while'")?;
                Ok(Stmt::While {
                    condition,
                    body,
                    location: loc,
                })
            }
            TokenKind::Display => {
                self.advance();
                let site = self.expect_identifier("after 'display'")?;
                self.expect_token(TokenKind::Semicolon, "Expected ';' after display statement")?;
                Ok(Stmt::Display {
                    site,
                    location: loc,
                })
            }
            TokenKind::LBrace => {
                self.advance();
                let statements = self.parse_block_statements()?;
                self.expect_token(TokenKind::RBrace, "Expected '}' after block")?;
                Ok(Stmt::Block {
                    statements,
                    location: loc,
                })
            }
            _ => Err(self.unexpected("Expected a statement")),
        }
    }

    /// Parse block statements (inside braces, excluding the braces themselves)
    fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// `let` has been consumed
    fn parse_variable_declaration(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let site = self.expect_identifier("after 'let'")?;
        self.expect_token(TokenKind::Assign, "Expected '=' after variable name")?;
        let init = self.parse_expression(TokenKind::Semicolon)?;
        self.expect_token(TokenKind::Semicolon, "Expected ';' after declaration")?;

        Ok(Stmt::VarDecl {
            site,
            init,
            location: loc,
        })
    }

    fn parse_assignment(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let site = self.expect_identifier("at start of assignment")?;
        self.expect_token(TokenKind::Assign, "Expected '=' after variable name")?;
        let value = self.parse_expression(TokenKind::Semicolon)?;
        self.expect_token(TokenKind::Semicolon, "Expected ';' after assignment")?;

        Ok(Stmt::Assignment {
            site,
            value,
            location: loc,
        })
    }

    /// `( expr ) statement`, shared by `if` and `while`
    fn parse_condition_and_body(
        &mut self,
        keyword: &str,
    ) -> Result<(Expr, Box<Stmt>), ParseError> {
        self.expect_token(TokenKind::LParen, &format!("Expected '(' after {}", keyword))?;
        let condition = self.parse_expression(TokenKind::RParen)?;
        self.expect_token(
            TokenKind::RParen,
            &format!("Expected ')' after {} condition", keyword),
        )?;
        let body = Box::new(self.parse_statement()?);

        Ok((condition, body))
    }
}
