//! Symbol table: scope tracking and frame offset assignment
//!
//! The table walks the statement tree once, in source order. Every
//! [`VariableSite`] it meets is bound to a frame offset; the first
//! duplicate or undeclared name aborts the whole pass.
//!
//! # Frame layout
//!
//! Each variable takes one 8-byte slot. The offset cursor advances before a
//! slot is handed out, so the first variable sits at offset 8. Leaving a
//! scope rewinds the cursor to where it was on entry, which lets sibling
//! blocks share the same slots. [`SymbolTable::total_frame_size`] reports the
//! high-water mark over the whole pass.

use super::errors::SymbolError;
use super::scope::{DeclarationInfo, Scope};
use crate::parser::ast::{Expr, Stmt, VariableSite};
use crate::parser::lexer::Token;
use tracing::{debug, trace};

/// Bytes reserved per variable
pub const SLOT_SIZE: u32 = 8;

/// Nested scopes plus the frame offset cursor.
///
/// Borrows the token store so that diagnostics can quote the declaring
/// token of any variable in scope.
pub struct SymbolTable<'t> {
    tokens: &'t [Token],
    scopes: Vec<Scope>,
    current_offset: u32,
    max_offset: u32,
}

impl<'t> SymbolTable<'t> {
    /// Create an empty table with no open scope.
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            scopes: Vec::new(),
            current_offset: 0,
            max_offset: 0,
        }
    }

    /// Resolve every variable site in `statements`, in order.
    pub fn build(tokens: &'t [Token], statements: &mut [Stmt]) -> Result<Self, SymbolError> {
        let mut table = Self::new(tokens);

        for statement in statements.iter_mut() {
            table.validate_statement(statement)?;
        }

        debug!(
            frame_size = table.total_frame_size(),
            "symbol resolution finished"
        );
        Ok(table)
    }

    /// Bytes needed to hold every variable that is ever live at once.
    pub fn total_frame_size(&self) -> u32 {
        self.max_offset
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new(self.current_offset));
        trace!(depth = self.scopes.len(), offset = self.current_offset, "entered scope");
    }

    pub fn leave_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            self.current_offset = scope.saved_offset();
            trace!(
                depth = self.scopes.len(),
                offset = self.current_offset,
                released = scope.len(),
                "left scope"
            );
        }
    }

    /// Declare `site` in the innermost scope and assign it the next slot.
    ///
    /// A declaration made with no scope open opens the outermost one.
    pub fn declare(&mut self, site: &mut VariableSite) -> Result<u32, SymbolError> {
        if self.scopes.is_empty() {
            self.enter_scope();
        }

        let offset = self.current_offset + SLOT_SIZE;
        let info = DeclarationInfo {
            offset,
            site: site.token,
        };

        let Some(scope) = self.scopes.last_mut() else {
            return Err(self.undeclared(site));
        };
        if let Err(first) = scope.insert(site.name.clone(), info) {
            return Err(self.duplicate(site, first));
        }

        self.current_offset = offset;
        self.max_offset = self.max_offset.max(offset);
        site.resolve(offset);

        debug!(name = %site.name, offset, depth = self.scopes.len(), "declared variable");
        Ok(offset)
    }

    /// Bind `site` to the innermost live declaration of its name.
    pub fn resolve(&mut self, site: &mut VariableSite) -> Result<u32, SymbolError> {
        let offset = self
            .lookup(&site.name)
            .map(|info| info.offset)
            .ok_or_else(|| self.undeclared(site))?;

        site.resolve(offset);
        trace!(name = %site.name, offset, "resolved variable");
        Ok(offset)
    }

    /// Search the open scopes from innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<&DeclarationInfo> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(name))
    }

    fn validate_statement(&mut self, statement: &mut Stmt) -> Result<(), SymbolError> {
        match statement {
            // Initializer first: `let x = x;` refers to an outer x, or fails
            Stmt::VarDecl { site, init, .. } => {
                self.validate_expression(init)?;
                self.declare(site)?;
            }
            Stmt::Assignment { site, value, .. } => {
                self.resolve(site)?;
                self.validate_expression(value)?;
            }
            Stmt::If {
                condition, body, ..
            }
            | Stmt::While {
                condition, body, ..
            } => {
                self.validate_expression(condition)?;
                self.validate_statement(body)?;
            }
            Stmt::Display { site, .. } => {
                self.resolve(site)?;
            }
            Stmt::Block { statements, .. } => {
                self.enter_scope();
                for inner in statements.iter_mut() {
                    self.validate_statement(inner)?;
                }
                self.leave_scope();
            }
        }

        Ok(())
    }

    fn validate_expression(&mut self, expression: &mut Expr) -> Result<(), SymbolError> {
        match expression {
            Expr::Literal { .. } => Ok(()),
            Expr::Variable(site) => self.resolve(site).map(|_| ()),
            Expr::BinaryOp { left, right, .. } => {
                self.validate_expression(left)?;
                self.validate_expression(right)
            }
            Expr::UnaryOp { operand, .. } => self.validate_expression(operand),
        }
    }

    fn context_of(&self, token: usize) -> String {
        self.tokens
            .get(token)
            .map(|token| token.context.clone())
            .unwrap_or_default()
    }

    fn undeclared(&self, site: &VariableSite) -> SymbolError {
        SymbolError::UndeclaredVariable {
            name: site.name.clone(),
            location: site.location,
            context: self.context_of(site.token),
        }
    }

    fn duplicate(&self, site: &VariableSite, first: DeclarationInfo) -> SymbolError {
        let first_location = self
            .tokens
            .get(first.site)
            .map_or(site.location, |token| token.location);

        SymbolError::DuplicateDeclaration {
            name: site.name.clone(),
            location: site.location,
            context: self.context_of(site.token),
            first_location,
            first_context: self.context_of(first.site),
        }
    }
}
