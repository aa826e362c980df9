//! # Introduction
//!
//! `toyc` is the front end of a small teaching compiler. It turns source text
//! into a validated abstract syntax tree in which every variable use is bound
//! to a stack frame offset, ready for IR lowering and code generation.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Symbol table → (IR builder, codegen)
//! ```
//!
//! 1. [`parser`]: tokenises the source, parses statements, and converts
//!    expressions to trees via postfix order.
//! 2. [`symbols`]: walks the tree with nested scopes, rejects duplicate and
//!    undeclared names, and assigns frame offsets.
//! 3. [`driver`]: runs the stages and tags failures with their stage.
//! 4. [`backend`]: the hand-off type and code generator interface.
//! 5. [`config`] and [`logging`]: command-line options and tracing setup.
//!
//! ## Language
//!
//! One integer type. `let x = e;`, `x = e;`, `if (e) s`, `while (e) s`,
//! `display x;` and `{ ... }` blocks. Expressions use `+ - * /`, unary `+`
//! and `-`, and parentheses.

pub mod backend;
pub mod config;
pub mod driver;
pub mod logging;
pub mod parser;
pub mod symbols;
