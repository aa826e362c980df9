//! Expression parsing implementation
//!
//! Expressions are parsed in two steps:
//!
//! 1. The infix token run is reordered into postfix order with an operator
//!    stack (shunting-yard). Parentheses recurse and splice the inner postfix
//!    run into the outer one.
//! 2. The postfix queue is folded left to right into an [`Expr`] tree with a
//!    value stack.
//!
//! # Arity
//!
//! `+` and `-` have no separate unary lexeme. An operator is unary when it
//! is the first token of the (sub)expression or directly follows another
//! operator, and binary otherwise, so `-3`, `1 - -2` and `1 - 2` all parse.
//!
//! # Precedence
//!
//! | operator        | arity  | precedence |
//! |-----------------|--------|------------|
//! | `+` `-`         | unary  | 2          |
//! | `*` `/`         | binary | 1          |
//! | `+` `-`         | binary | 0          |
//!
//! Unary operators are right-associative, binary operators left-associative.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};
use tracing::{trace, Level};

/// Whether an operator token takes one operand or two
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// One entry of the postfix queue, referring back to its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostfixItem {
    Operand(TokenId),
    Operator(TokenId, Arity),
}

/// Precedence keyed by (token kind, arity); `None` for combinations that
/// are not operators, such as a unary `*`.
pub fn precedence(kind: TokenKind, arity: Arity) -> Option<u8> {
    match (arity, kind) {
        (Arity::Unary, TokenKind::Plus | TokenKind::Minus) => Some(2),
        (Arity::Binary, TokenKind::Star | TokenKind::Slash) => Some(1),
        (Arity::Binary, TokenKind::Plus | TokenKind::Minus) => Some(0),
        _ => None,
    }
}

fn binary_op(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Plus => Some(BinOp::Add),
        TokenKind::Minus => Some(BinOp::Sub),
        TokenKind::Star => Some(BinOp::Mul),
        TokenKind::Slash => Some(BinOp::Div),
        _ => None,
    }
}

fn unary_op(kind: TokenKind) -> Option<UnOp> {
    match kind {
        TokenKind::Plus => Some(UnOp::Identity),
        TokenKind::Minus => Some(UnOp::Negate),
        _ => None,
    }
}

/// Stacked operator waiting for its operands to reach the output queue
#[derive(Clone, Copy)]
struct PendingOperator {
    token: TokenId,
    arity: Arity,
    precedence: u8,
}

impl PendingOperator {
    /// Whether `incoming` may be pushed on top of this operator without
    /// popping it first.
    fn yields_to(&self, arity: Arity, precedence: u8) -> bool {
        match arity {
            Arity::Unary => self.precedence <= precedence,
            Arity::Binary => self.precedence < precedence,
        }
    }
}

impl<'t> Parser<'t> {
    /// Parse an expression up to, but not including, `terminator`.
    ///
    /// On success the cursor rests on the terminator token.
    pub fn parse_expression(&mut self, terminator: TokenKind) -> Result<Expr, ParseError> {
        let postfix = self.to_postfix(terminator)?;

        if tracing::enabled!(Level::TRACE) {
            trace!(postfix = %self.render_postfix(&postfix), "expression in postfix order");
        }

        self.build_tree(&postfix)
    }

    /// Arity of the operator under the cursor, given where the current
    /// (sub)expression started.
    pub fn operator_arity(&self, start: TokenId) -> Arity {
        if self.position == start {
            return Arity::Unary;
        }

        match self.previous() {
            Some(previous) if previous.kind.is_arithmetic_operator() => Arity::Unary,
            _ => Arity::Binary,
        }
    }

    /// Reorder the tokens up to `terminator` into postfix order.
    pub(crate) fn to_postfix(
        &mut self,
        terminator: TokenKind,
    ) -> Result<Vec<PostfixItem>, ParseError> {
        let start = self.position;
        let mut output = Vec::new();
        let mut operators: Vec<PendingOperator> = Vec::new();

        loop {
            let token = match self.peek() {
                Some(token) if token.kind == terminator => break,
                Some(token) => token,
                None => {
                    return Err(self.unexpected(&format!(
                        "Expected {} to end expression",
                        terminator
                    )))
                }
            };
            let id = self.position;

            match token.kind {
                TokenKind::Identifier | TokenKind::IntLiteral => {
                    output.push(PostfixItem::Operand(id));
                }
                kind if kind.is_arithmetic_operator() => {
                    let arity = self.operator_arity(start);
                    let incoming = precedence(kind, arity).ok_or_else(|| {
                        ParseError::at(token, format!("{} cannot be used as a unary operator", kind))
                    })?;

                    while let Some(top) = operators.last() {
                        if top.yields_to(arity, incoming) {
                            break;
                        }
                        output.push(PostfixItem::Operator(top.token, top.arity));
                        operators.pop();
                    }

                    operators.push(PendingOperator {
                        token: id,
                        arity,
                        precedence: incoming,
                    });
                }
                TokenKind::LParen => {
                    self.advance();
                    let inner = self.to_postfix(TokenKind::RParen)?;
                    if inner.is_empty() {
                        return Err(ParseError::at(token, "Empty parentheses in expression"));
                    }
                    output.extend(inner);
                    // cursor is on the matching ')', consumed below
                }
                _ => {
                    return Err(ParseError::at(
                        token,
                        format!("Unexpected {} in expression", token),
                    ));
                }
            }

            self.advance();
        }

        while let Some(pending) = operators.pop() {
            output.push(PostfixItem::Operator(pending.token, pending.arity));
        }

        Ok(output)
    }

    /// Fold a postfix queue into a single expression tree.
    pub(crate) fn build_tree(&self, postfix: &[PostfixItem]) -> Result<Expr, ParseError> {
        // Each value remembers the token that produced it for diagnostics
        let mut values: Vec<(Expr, TokenId)> = Vec::new();

        for item in postfix {
            match *item {
                PostfixItem::Operand(id) => values.push((self.leaf(id)?, id)),
                PostfixItem::Operator(id, Arity::Binary) => {
                    let token = &self.tokens[id];
                    let op = binary_op(token.kind).ok_or_else(|| {
                        ParseError::at(token, format!("{} is not a binary operator", token))
                    })?;
                    let (Some((right, _)), Some((left, _))) = (values.pop(), values.pop()) else {
                        return Err(ParseError::at(
                            token,
                            format!("Missing operand for {}", token),
                        ));
                    };

                    values.push((
                        Expr::BinaryOp {
                            op,
                            left: Box::new(left),
                            right: Box::new(right),
                            location: token.location,
                        },
                        id,
                    ));
                }
                PostfixItem::Operator(id, Arity::Unary) => {
                    let token = &self.tokens[id];
                    let op = unary_op(token.kind).ok_or_else(|| {
                        ParseError::at(token, format!("{} is not a unary operator", token))
                    })?;
                    let Some((operand, _)) = values.pop() else {
                        return Err(ParseError::at(
                            token,
                            format!("Missing operand for {}", token),
                        ));
                    };

                    values.push((
                        Expr::UnaryOp {
                            op,
                            operand: Box::new(operand),
                            location: token.location,
                        },
                        id,
                    ));
                }
            }
        }

        if values.len() > 1 {
            let (_, stray) = values[1];
            return Err(ParseError::at(
                &self.tokens[stray],
                "Malformed expression: operands without an operator between them",
            ));
        }

        values
            .pop()
            .map(|(expr, _)| expr)
            .ok_or_else(|| self.unexpected("Expected an expression"))
    }

    fn leaf(&self, id: TokenId) -> Result<Expr, ParseError> {
        let token: &Token = &self.tokens[id];

        match token.kind {
            TokenKind::Identifier => Ok(Expr::Variable(VariableSite::new(
                token.text(),
                id,
                token.location,
            ))),
            TokenKind::IntLiteral => {
                let value = token.text().parse::<i64>().map_err(|_| {
                    ParseError::at(token, format!("Invalid integer literal: {}", token.text()))
                })?;
                Ok(Expr::Literal {
                    value,
                    location: token.location,
                })
            }
            _ => Err(ParseError::at(token, format!("Expected an operand, found {}", token))),
        }
    }

    fn render_postfix(&self, postfix: &[PostfixItem]) -> String {
        postfix
            .iter()
            .map(|item| match *item {
                PostfixItem::Operand(id) => self.tokens[id].text().to_string(),
                PostfixItem::Operator(id, Arity::Binary) => self.tokens[id].kind.to_string(),
                PostfixItem::Operator(id, Arity::Unary) => format!("unary {}", self.tokens[id].kind),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse_expression;

    fn parse(source: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(&format!("{};", source)).unwrap();
        let mut position = 0;
        parse_expression(&tokens, &mut position, TokenKind::Semicolon)
    }

    fn value(source: &str) -> Option<i64> {
        parse(source).unwrap().evaluate_constant()
    }

    #[test]
    fn test_unary_minus() {
        match parse("-3").unwrap() {
            Expr::UnaryOp {
                op: UnOp::Negate,
                operand,
                ..
            } => assert!(matches!(*operand, Expr::Literal { value: 3, .. })),
            other => panic!("Expected unary negation, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_minus() {
        match parse("1-2").unwrap() {
            Expr::BinaryOp {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Literal { value: 1, .. }));
                assert!(matches!(*right, Expr::Literal { value: 2, .. }));
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_minus_minus() {
        match parse("1--2").unwrap() {
            Expr::BinaryOp {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Literal { value: 1, .. }));
                match *right {
                    Expr::UnaryOp {
                        op: UnOp::Negate,
                        operand,
                        ..
                    } => assert!(matches!(*operand, Expr::Literal { value: 2, .. })),
                    other => panic!("Expected negation on the right, got {:?}", other),
                }
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
        assert_eq!(value("1--2"), Some(3));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(value("1+2*3"), Some(7));
        assert_eq!(value("(1+2)*3"), Some(9));
        assert_eq!(value("10-4/2"), Some(8));
        assert_eq!(value("2*(3+(4-1))"), Some(12));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(value("8-3-2"), Some(3));
        assert_eq!(value("64/4/2"), Some(8));
    }

    #[test]
    fn test_unary_binds_tighter_than_multiplication() {
        assert_eq!(value("2*-3*4"), Some(-24));
        assert_eq!(value("- -3"), Some(3));
        assert_eq!(value("+-+5"), Some(-5));
        assert_eq!(value("-(2+3)*2"), Some(-10));
    }

    #[test]
    fn test_operator_after_parenthesis_is_binary() {
        match parse("(4)-1").unwrap() {
            Expr::BinaryOp { op: BinOp::Sub, .. } => {}
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_variables_make_value_unknown() {
        let expr = parse("a * 2 + 1").unwrap();
        assert_eq!(expr.evaluate_constant(), None);

        match expr {
            Expr::BinaryOp {
                op: BinOp::Add,
                left,
                ..
            } => match *left {
                Expr::BinaryOp { left, .. } => match *left {
                    Expr::Variable(site) => {
                        assert_eq!(site.name, "a");
                        assert_eq!(site.token, 0);
                        assert_eq!(site.resolved_offset(), None);
                    }
                    other => panic!("Expected variable, got {:?}", other),
                },
                other => panic!("Expected multiplication, got {:?}", other),
            },
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_postfix_order() {
        let tokens = tokenize("1 - -2 * 3;").unwrap();
        let mut parser = Parser::new(&tokens);
        let postfix = parser.to_postfix(TokenKind::Semicolon).unwrap();

        // 1 2 neg 3 * -
        assert_eq!(
            postfix,
            vec![
                PostfixItem::Operand(0),
                PostfixItem::Operand(3),
                PostfixItem::Operator(2, Arity::Unary),
                PostfixItem::Operand(5),
                PostfixItem::Operator(4, Arity::Binary),
                PostfixItem::Operator(1, Arity::Binary),
            ]
        );
        assert_eq!(parser.position(), 6);
    }

    #[test]
    fn test_operator_arity() {
        let tokens = tokenize("-1 - 2").unwrap();
        let mut parser = Parser::new(&tokens);
        assert_eq!(parser.operator_arity(0), Arity::Unary);
        parser.position = 2;
        assert_eq!(parser.operator_arity(0), Arity::Binary);
    }

    #[test]
    fn test_empty_expression() {
        let err = parse("").unwrap_err();
        assert!(err.message.starts_with("Expected an expression"));
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse("1 -").unwrap_err();
        assert!(err.message.contains("Missing operand"));
    }

    #[test]
    fn test_adjacent_operands() {
        let err = parse("1 2").unwrap_err();
        assert!(err.message.starts_with("Malformed expression"));
        assert_eq!(err.location, SourceLocation::new(1, 2));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse("(1+2").is_err());
        assert!(parse("1+2)").is_err());
        assert!(parse("((1)").is_err());
        assert!(parse("()").is_err());
    }

    #[test]
    fn test_missing_terminator() {
        let tokens = tokenize("1 + 2").unwrap();
        let mut position = 0;
        let err = parse_expression(&tokens, &mut position, TokenKind::Semicolon).unwrap_err();
        assert!(err.message.contains("Expected ';'"));
    }

    #[test]
    fn test_unsupported_tokens() {
        assert!(parse("*3").unwrap_err().message.contains("unary"));
        assert!(parse("1 < 2").unwrap_err().message.contains("Unexpected '<'"));
        assert!(parse("4 % 2").is_err());
        assert!(parse("not x").is_err());
        assert!(parse("x = 1").is_err());
    }
}
