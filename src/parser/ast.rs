// AST (Abstract Syntax Tree) definitions for the toy compiler

use std::fmt;

/// Index of a token in the sequence produced by the lexer.
///
/// Variable sites keep the index of their identifier token instead of a
/// reference, so the token store only has to outlive whoever renders a
/// diagnostic from it.
pub type TokenId = usize;

/// Source location information for error reporting
///
/// Lines are 1-based, columns are 0-based character offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A named place that the symbol table binds to a frame offset.
///
/// Declarations, assignments, variable references and `display` targets all
/// carry one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSite {
    pub name: String,
    pub token: TokenId,
    pub location: SourceLocation,
    resolved_offset: Option<u32>,
}

impl VariableSite {
    pub fn new(name: impl Into<String>, token: TokenId, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            token,
            location,
            resolved_offset: None,
        }
    }

    /// Frame offset assigned by the symbol table, `None` before resolution.
    pub fn resolved_offset(&self) -> Option<u32> {
        self.resolved_offset
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_offset.is_some()
    }

    /// Record the frame offset for this site. Each site is resolved once.
    pub fn resolve(&mut self, offset: u32) {
        debug_assert!(
            self.resolved_offset.is_none(),
            "variable site '{}' resolved twice",
            self.name
        );
        self.resolved_offset = Some(offset);
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Fold two known operands. Overflow and division by zero stay unknown.
    pub fn apply(self, left: i64, right: i64) -> Option<i64> {
        match self {
            BinOp::Add => left.checked_add(right),
            BinOp::Sub => left.checked_sub(right),
            BinOp::Mul => left.checked_mul(right),
            BinOp::Div => left.checked_div(right),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Identity, // +x
    Negate,   // -x
}

impl UnOp {
    pub fn apply(self, operand: i64) -> Option<i64> {
        match self {
            UnOp::Identity => Some(operand),
            UnOp::Negate => operand.checked_neg(),
        }
    }
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal {
        value: i64,
        location: SourceLocation,
    },
    Variable(VariableSite),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Best-effort compile-time value of this expression.
    ///
    /// Variables are never known at compile time, so any expression that
    /// mentions one yields `None`.
    pub fn evaluate_constant(&self) -> Option<i64> {
        match self {
            Expr::Literal { value, .. } => Some(*value),
            Expr::Variable(_) => None,
            Expr::BinaryOp {
                op, left, right, ..
            } => {
                let left = left.evaluate_constant()?;
                let right = right.evaluate_constant()?;
                op.apply(left, right)
            }
            Expr::UnaryOp { op, operand, .. } => op.apply(operand.evaluate_constant()?),
        }
    }

    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Literal { location, .. } => location,
            Expr::Variable(site) => &site.location,
            Expr::BinaryOp { location, .. } => location,
            Expr::UnaryOp { location, .. } => location,
        }
    }
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `let name = init;`
    VarDecl {
        site: VariableSite,
        init: Expr,
        location: SourceLocation,
    },
    /// `name = value;`
    Assignment {
        site: VariableSite,
        value: Expr,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    /// `display name;`
    Display {
        site: VariableSite,
        location: SourceLocation,
    },
    /// `{ ... }`, opens a nested scope
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::VarDecl { location, .. } => location,
            Stmt::Assignment { location, .. } => location,
            Stmt::If { location, .. } => location,
            Stmt::While { location, .. } => location,
            Stmt::Display { location, .. } => location,
            Stmt::Block { location, .. } => location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
