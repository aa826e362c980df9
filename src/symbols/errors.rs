//! Name resolution error types
//!
//! [`SymbolError`] covers every failure of the symbol table pass. Errors copy
//! the locations and source excerpts they print out of the token store, so
//! they can be reported after the tokens are gone.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// A name declared twice in the same scope
    #[error(
        "Duplicate declaration of variable '{name}' at {location}:\n{context}\n\
         First declared at {first_location}:\n{first_context}"
    )]
    DuplicateDeclaration {
        name: String,
        location: SourceLocation,
        context: String,
        first_location: SourceLocation,
        first_context: String,
    },

    /// A name with no live declaration, or any lookup while no scope is open
    #[error("Use of undeclared variable '{name}' at {location}:\n{context}")]
    UndeclaredVariable {
        name: String,
        location: SourceLocation,
        context: String,
    },
}

impl SymbolError {
    pub fn name(&self) -> &str {
        match self {
            SymbolError::DuplicateDeclaration { name, .. }
            | SymbolError::UndeclaredVariable { name, .. } => name,
        }
    }

    /// Location of the offending use or declaration
    pub fn location(&self) -> SourceLocation {
        match self {
            SymbolError::DuplicateDeclaration { location, .. }
            | SymbolError::UndeclaredVariable { location, .. } => *location,
        }
    }
}
