//! Lexer (tokenizer) for toy source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Every token carries its position and a pre-rendered excerpt of the line it
//! came from, so later stages can report errors without holding on to the
//! source text.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Carry source text
    Identifier,
    IntLiteral,

    // Keywords
    Let,
    If,
    While,
    Display,

    // Assignment
    Assign, // =

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Gt,    // >
    Ge,    // >=
    Lt,    // <
    Le,    // <=

    // Logical
    And, // and
    Or,  // or
    Not, // not

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;
}

/// Fixed operator and punctuation table, matched longest-first.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("=", TokenKind::Assign),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    (">", TokenKind::Gt),
    (">=", TokenKind::Ge),
    ("<", TokenKind::Lt),
    ("<=", TokenKind::Le),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (";", TokenKind::Semicolon),
];

/// Reserved words. A word that is not listed here is an identifier.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("let", TokenKind::Let),
    ("if", TokenKind::If),
    ("while", TokenKind::While),
    ("display", TokenKind::Display),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
];

impl TokenKind {
    /// Operators accepted inside arithmetic expressions.
    pub fn is_arithmetic_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    /// Whether tokens of this kind carry their source text.
    pub fn has_text(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::IntLiteral)
    }

    fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::IntLiteral => write!(f, "integer literal"),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Display => write!(f, "'display'"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::And => write!(f, "'and'"),
            TokenKind::Or => write!(f, "'or'"),
            TokenKind::Not => write!(f, "'not'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Semicolon => write!(f, "';'"),
        }
    }
}

/// A single lexical unit.
///
/// Only identifiers and integer literals carry `text`; every other token is
/// fully described by its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
    pub location: SourceLocation,
    /// The source line containing the token, followed by a marker line
    /// pointing at it.
    pub context: String,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation, context: String) -> Self {
        debug_assert!(!kind.has_text(), "{} token needs source text", kind);
        Self {
            kind,
            text: None,
            location,
            context,
        }
    }

    pub fn with_text(
        kind: TokenKind,
        text: impl Into<String>,
        location: SourceLocation,
        context: String,
    ) -> Self {
        debug_assert!(kind.has_text(), "{} token carries no text", kind);
        Self {
            kind,
            text: Some(text.into()),
            location,
            context,
        }
    }

    /// Source text of an identifier or literal, empty for other kinds.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text()),
            TokenKind::IntLiteral => write!(f, "integer literal {}", self.text()),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {location}:\n{context}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
    pub context: String,
}

/// Lexer for toy source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    line_start: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 0,
            line_start: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            trace!(token = %token, location = %token.location, "lexed token");
            tokens.push(token);
        }

        debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Get next token, the cursor is on a non-whitespace character
    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let loc = self.current_location();

        match self.peek() {
            Some(ch) if ch.is_ascii_digit() => self.number_literal(start, loc),
            Some(ch) if ch.is_ascii_alphabetic() => Ok(self.identifier_or_keyword(start, loc)),
            Some(ch) => match self.longest_punctuation() {
                Some((kind, len)) => {
                    for _ in 0..len {
                        self.advance();
                    }
                    Ok(Token::new(kind, loc, self.render_context(start, len)))
                }
                None => Err(LexError {
                    message: format!("Could not tokenize character '{}'", ch),
                    location: loc,
                    context: self.render_context(start, 1),
                }),
            },
            None => Err(LexError {
                message: "Unexpected end of file".to_string(),
                location: loc,
                context: self.render_context(start, 1),
            }),
        }
    }

    /// Parse numeric literal (decimal integers only)
    fn number_literal(&mut self, start: usize, loc: SourceLocation) -> Result<Token, LexError> {
        let mut digits = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let context = self.render_context(start, digits.chars().count());
        if digits.parse::<i64>().is_err() {
            return Err(LexError {
                message: format!("Invalid integer literal: {}", digits),
                location: loc,
                context,
            });
        }

        Ok(Token::with_text(TokenKind::IntLiteral, digits, loc, context))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, start: usize, loc: SourceLocation) -> Token {
        let mut word = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let context = self.render_context(start, word.chars().count());
        match TokenKind::keyword(&word) {
            Some(kind) => Token::new(kind, loc, context),
            None => Token::with_text(TokenKind::Identifier, word, loc, context),
        }
    }

    /// Longest entry of the punctuation table that matches at the cursor.
    fn longest_punctuation(&self) -> Option<(TokenKind, usize)> {
        PUNCTUATION
            .iter()
            .filter(|(text, _)| self.matches_ahead(text))
            .map(|(text, kind)| (*kind, text.chars().count()))
            .max_by_key(|(_, len)| *len)
    }

    fn matches_ahead(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| self.peek_ahead(i) == Some(expected))
    }

    /// Render the current line with a marker under `len` characters from `start`.
    fn render_context(&self, start: usize, len: usize) -> String {
        let line_end = self.input[self.line_start..]
            .iter()
            .position(|&ch| ch == '\n')
            .map_or(self.input.len(), |offset| self.line_start + offset);

        let line: String = self.input[self.line_start..line_end].iter().collect();
        let padding: String = self.input[self.line_start..start]
            .iter()
            .map(|&ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();

        format!(
            "{}\n{}^{}",
            line.trim_end_matches('\r'),
            padding,
            "~".repeat(len.saturating_sub(1))
        )
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 0;
            self.line_start = self.position;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize a complete source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_simple_statement() {
        let tokens = tokenize("let x = 42;").unwrap();

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert_eq!(tokens[0].text, None);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "x");
        assert_eq!(tokens[2].kind, TokenKind::Assign);
        assert_eq!(tokens[3].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[3].text(), "42");
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(kinds(">="), vec![TokenKind::Ge]);
        assert_eq!(kinds("<= == !="), vec![TokenKind::Le, TokenKind::EqEq, TokenKind::NotEq]);
        assert_eq!(kinds("> ="), vec![TokenKind::Gt, TokenKind::Assign]);
        assert_eq!(kinds("==="), vec![TokenKind::EqEq, TokenKind::Assign]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("if while display and or not"),
            vec![
                TokenKind::If,
                TokenKind::While,
                TokenKind::Display,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
            ]
        );

        // Keywords only match whole words
        let tokens = tokenize("android letter if_1").unwrap();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
        assert_eq!(tokens[0].text(), "android");
        assert_eq!(tokens[2].text(), "if_1");
    }

    #[test]
    fn test_digits_then_letters_split() {
        let tokens = tokenize("12ab").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[0].text(), "12");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "ab");
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("let a = 1;\n  display a;").unwrap();

        assert_eq!(tokens[0].location, SourceLocation::new(1, 0));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 4));
        assert_eq!(tokens[4].location, SourceLocation::new(1, 9));
        assert_eq!(tokens[5].location, SourceLocation::new(2, 2));
        assert_eq!(tokens[6].location, SourceLocation::new(2, 10));
    }

    #[test]
    fn test_context_marks_token() {
        let tokens = tokenize("let total = 7;").unwrap();
        assert_eq!(tokens[1].context, "let total = 7;\n    ^~~~~");

        let tokens = tokenize("a;\n\tb >= c;").unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Ge);
        assert_eq!(tokens[3].context, "\tb >= c;\n\t  ^~");
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("let x = 1;\nx = 2 $ 3;").unwrap_err();

        assert_eq!(err.location, SourceLocation::new(2, 6));
        assert!(err.message.contains("'$'"));
        assert_eq!(err.context, "x = 2 $ 3;\n      ^");
        assert!(err.to_string().contains("line 2, column 6"));
    }

    #[test]
    fn test_lone_bang_is_rejected() {
        assert!(tokenize("!x").is_err());
        assert!(tokenize("_x").is_err());
    }

    #[test]
    fn test_integer_literal_overflow() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(err.message.contains("Invalid integer literal"));
    }

    #[test]
    fn test_token_display() {
        let tokens = tokenize("let x = 5 { }").unwrap();
        assert_eq!(tokens[0].to_string(), "'let'");
        assert_eq!(tokens[1].to_string(), "identifier 'x'");
        assert_eq!(tokens[3].to_string(), "integer literal 5");
        assert_eq!(tokens[4].to_string(), "'{'");
        assert_eq!(tokens[5].to_string(), "'}'");
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \n\t ").unwrap().is_empty());
    }
}
