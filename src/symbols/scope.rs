//! Lexical scopes as tracked by the [`SymbolTable`](super::table::SymbolTable).
//!
//! A scope owns the names declared directly inside it and remembers the
//! frame offset cursor from the moment it was entered, so leaving it hands
//! that offset space back to the enclosing scope.

use crate::parser::ast::TokenId;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Where a name was declared and which frame slot it received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationInfo {
    pub offset: u32,
    /// Identifier token of the declaration, for diagnostics
    pub site: TokenId,
}

#[derive(Debug, Default)]
pub struct Scope {
    symbols: FxHashMap<String, DeclarationInfo>,
    saved_offset: u32,
}

impl Scope {
    pub fn new(saved_offset: u32) -> Self {
        Self {
            symbols: FxHashMap::default(),
            saved_offset,
        }
    }

    /// Offset cursor to restore when this scope is left.
    pub fn saved_offset(&self) -> u32 {
        self.saved_offset
    }

    /// Lookup a name within this scope only.
    pub fn lookup(&self, name: &str) -> Option<&DeclarationInfo> {
        self.symbols.get(name)
    }

    /// Record a declaration. Names are unique per scope; on a clash the
    /// existing entry is returned and the scope is left unchanged.
    pub fn insert(&mut self, name: String, info: DeclarationInfo) -> Result<(), DeclarationInfo> {
        match self.symbols.entry(name) {
            Entry::Occupied(existing) => Err(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(info);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
