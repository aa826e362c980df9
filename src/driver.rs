//! Front-end pipeline: lexing, parsing, then symbol resolution.
//!
//! Each stage is all-or-nothing; the first error stops the pipeline and is
//! returned as a [`CompileError`] that knows which stage produced it.

use crate::backend::CompiledUnit;
use crate::parser::{parse_statements, tokenize, LexError, ParseError};
use crate::symbols::{SymbolError, SymbolTable};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl CompileError {
    pub fn stage(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "lexing",
            CompileError::Parse(_) => "parsing",
            CompileError::Symbol(_) => "symbol resolution",
        }
    }

    /// Diagnostic as printed by the command-line driver
    pub fn report(&self) -> String {
        format!("Compilation error during {}:\n{}", self.stage(), self)
    }
}

/// Run the front end over `source`.
pub fn compile(source: &str) -> Result<CompiledUnit, CompileError> {
    let tokens = tokenize(source)?;
    let mut program = parse_statements(&tokens)?;
    let frame_size = SymbolTable::build(&tokens, &mut program.statements)?.total_frame_size();

    debug!(
        tokens = tokens.len(),
        statements = program.statements.len(),
        frame_size,
        "front end finished"
    );
    Ok(CompiledUnit {
        program,
        frame_size,
    })
}
