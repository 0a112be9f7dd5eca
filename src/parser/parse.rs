//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the [`SyntaxError`] type, helper methods, and the main parse entry
//! point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: Parsing statements (`def`, `return`, `if`, assignments, ...)
//! - `expressions`: Parsing expressions with one method per precedence level
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Malformed input reported by the front-end
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Syntax error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct SyntaxError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        SyntaxError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Nesting the parser accepts before giving up, unless configured otherwise
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Parse source text into a `Module` node.
pub fn parse(source: &str) -> Result<SyntaxNode, SyntaxError> {
    parse_with_max_nesting(source, DEFAULT_MAX_NESTING)
}

/// Parse with an explicit bound on expression and block nesting.
///
/// Deeper input is a `SyntaxError` instead of exhausting the stack.
pub fn parse_with_max_nesting(source: &str, max_nesting: usize) -> Result<SyntaxNode, SyntaxError> {
    Parser::new(source)?
        .with_max_nesting(max_nesting)
        .parse_module()
}

/// Recursive descent parser for the Python-like subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Current nesting of expressions and blocks
    depth: usize,
    max_nesting: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
            max_nesting: DEFAULT_MAX_NESTING,
        })
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parse the entire program into a `Module` node
    pub fn parse_module(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let location = SourceLocation::new(1, 1);
        let mut body = Vec::new();

        while !self.is_at_end() {
            if self.match_token(&Token::Newline(self.current_location())) {
                continue;
            }
            body.push(self.parse_statement()?);
        }

        Ok(SyntaxNode::Module { body, location })
    }

    // ===== Helper methods =====

    /// Go one level deeper, failing once the nesting bound is reached
    pub(crate) fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= self.max_nesting {
            return Err(self.error(format!(
                "Nesting exceeds the depth limit of {}",
                self.max_nesting
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    /// Run `parse` one nesting level deeper
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        self.enter()?;
        let result = parse(self);
        self.leave(1);
        result
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof, and `advance` never
        // moves past it.
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), SyntaxError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_colon(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        self.expect_token(
            &Token::Colon(self.current_location()),
            &format!("Expected ':' {ctx}"),
        )
    }

    /// A simple statement ends at a newline (or at end of input).
    pub(crate) fn expect_newline(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        if self.is_at_end() {
            return Ok(());
        }
        self.expect_token(
            &Token::Newline(self.current_location()),
            &format!("Expected end of line {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!("Expected identifier, found {}", self.peek())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_body(source: &str) -> Vec<SyntaxNode> {
        match parse(source).unwrap() {
            SyntaxNode::Module { body, .. } => body,
            other => panic!("Expected module, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sample_program() {
        let source = "a= 2\nb = a + 3\nprint(b)\ndef my_function(x):\n    return x * 2\nresult = my_function(5)\nprint(result)\n";
        let body = module_body(source);

        let kinds: Vec<NodeKind> = body.iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Assign,
                NodeKind::Assign,
                NodeKind::Expr,
                NodeKind::FunctionDef,
                NodeKind::Assign,
                NodeKind::Expr,
            ]
        );

        match &body[3] {
            SyntaxNode::FunctionDef {
                name, params, body, ..
            } => {
                assert_eq!(name, "my_function");
                assert_eq!(params, &vec!["x".to_string()]);
                assert_eq!(body.len(), 1);
                assert_eq!(body[0].kind(), NodeKind::Return);
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_parse_empty_program() {
        assert!(module_body("").is_empty());
        assert!(module_body("\n\n# only a comment\n").is_empty());
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let err = parse("x = (1 + \n").unwrap_err();
        assert!(err.message.contains("Expected"), "{}", err);

        let err = parse("a = 1\nb = = 2\n").unwrap_err();
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        let deep_unary = format!("x = {}1\n", "-".repeat(200_000));
        let err = parse(&deep_unary).unwrap_err();
        assert!(err.message.contains("depth limit of 256"), "{}", err);

        let deep_parens = format!("x = {}1{}\n", "(".repeat(100_000), ")".repeat(100_000));
        assert!(parse(&deep_parens).is_err());

        let long_chain = format!("x = 1{}\n", " + 1".repeat(100_000));
        assert!(parse(&long_chain).is_err());

        let deep_call = format!("x = {}1{}\n", "f(".repeat(100_000), ")".repeat(100_000));
        assert!(parse(&deep_call).is_err());
    }

    #[test]
    fn test_nesting_bound_is_configurable() {
        let source = format!("x = {}1\n", "-".repeat(20));
        assert!(parse(&source).is_ok());

        let err = parse_with_max_nesting(&source, 10).unwrap_err();
        assert_eq!(err.message, "Nesting exceeds the depth limit of 10");
        assert_eq!(err.location.line, 1);

        // Nested blocks count too
        let mut blocks = String::new();
        for level in 0..12 {
            blocks.push_str(&format!("{}if x:\n", "    ".repeat(level)));
        }
        blocks.push_str(&format!("{}pass\n", "    ".repeat(12)));
        assert!(parse(&blocks).is_ok());
        assert!(parse_with_max_nesting(&blocks, 10).is_err());
    }

    #[test]
    fn test_lex_error_becomes_syntax_error() {
        let err = parse("x = 1 $ 2\n").unwrap_err();
        assert!(err.message.contains("Unexpected character"));
        assert_eq!(err.location, SourceLocation::new(1, 7));
    }
}
