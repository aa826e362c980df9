//! Toy source code parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser cursor, errors and entry points (tokens → AST)
//! - [`ast`]: AST node definitions and constant folding
//!
//! # Language
//!
//! A single 64-bit integer type, `let` declarations, assignments, `if`,
//! `while`, `display` and nested `{ }` blocks. Expressions use `+ - * /`
//! and parentheses.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent for statements; expressions go through
//! an infix-to-postfix conversion that decides operator arity from position.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use expressions::{precedence, Arity};
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use parse::{parse_expression, parse_statements, ParseError, Parser};
