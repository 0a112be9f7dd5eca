//! Lexer (tokenizer) for the Python-like source subset
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Indentation is significant: the lexer tracks an indentation stack and emits
//! [`Token::Indent`] / [`Token::Dedent`] at the start of logical lines, the
//! way the parser expects block structure to be delimited. Newlines inside
//! parentheses do not end a logical line.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that syntax errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Def(SourceLocation),
    Return(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Pass(SourceLocation),
    Not(SourceLocation),
    True(SourceLocation),
    False(SourceLocation),
    None(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),        // +
    Minus(SourceLocation),       // -
    Star(SourceLocation),        // *
    StarStar(SourceLocation),    // **
    Slash(SourceLocation),       // /
    SlashSlash(SourceLocation),  // //
    Percent(SourceLocation),     // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Assignment
    Eq(SourceLocation), // =

    // Punctuation
    LParen(SourceLocation), // (
    RParen(SourceLocation), // )
    Comma(SourceLocation),  // ,
    Colon(SourceLocation),  // :

    // Layout
    Newline(SourceLocation),
    Indent(SourceLocation),
    Dedent(SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Def(loc)
            | Token::Return(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Pass(loc)
            | Token::Not(loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::None(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::StarStar(loc)
            | Token::Slash(loc)
            | Token::SlashSlash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Eq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::Comma(loc)
            | Token::Colon(loc)
            | Token::Newline(loc)
            | Token::Indent(loc)
            | Token::Dedent(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::FloatLiteral(x, _) => write!(f, "float literal {}", x),
            Token::StringLiteral(s, _) => write!(f, "string literal {:?}", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Def(_) => write!(f, "'def'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::While(_) => write!(f, "'while'"),
            Token::Pass(_) => write!(f, "'pass'"),
            Token::Not(_) => write!(f, "'not'"),
            Token::True(_) => write!(f, "'True'"),
            Token::False(_) => write!(f, "'False'"),
            Token::None(_) => write!(f, "'None'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::StarStar(_) => write!(f, "'**'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::SlashSlash(_) => write!(f, "'//'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Eq(_) => write!(f, "'='"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Newline(_) => write!(f, "newline"),
            Token::Indent(_) => write!(f, "indent"),
            Token::Dedent(_) => write!(f, "dedent"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for the Python-like subset
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    indent_stack: Vec<usize>,
    paren_depth: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            paren_depth: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut at_line_start = true;

        loop {
            if at_line_start && self.paren_depth == 0 {
                // Blank and comment-only lines do not affect indentation
                let Some(width) = self.measure_indent() else {
                    break;
                };
                self.handle_indent(width, &mut tokens)?;
                at_line_start = false;
            }

            self.skip_inline_whitespace_and_comments();

            let Some(ch) = self.peek() else {
                break;
            };

            if ch == '\n' {
                let loc = self.current_location();
                self.advance();
                if self.paren_depth == 0 {
                    tokens.push(Token::Newline(loc));
                    at_line_start = true;
                }
                continue;
            }

            tokens.push(self.next_token()?);
        }

        let loc = self.current_location();
        if !matches!(tokens.last(), None | Some(Token::Newline(_))) {
            tokens.push(Token::Newline(loc));
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            tokens.push(Token::Dedent(loc));
        }
        tokens.push(Token::Eof(loc));

        Ok(tokens)
    }

    /// Consume leading whitespace of the next non-blank line and return its
    /// width, or `None` at end of input.
    fn measure_indent(&mut self) -> Option<usize> {
        loop {
            let mut width = 0;
            while let Some(ch) = self.peek() {
                match ch {
                    ' ' => width += 1,
                    '\t' => width += 8 - (width % 8),
                    '\r' => {}
                    _ => break,
                }
                self.advance();
            }

            match self.peek() {
                None => return None,
                Some('\n') => {
                    self.advance();
                }
                Some('#') => {
                    self.skip_comment();
                }
                Some(_) => return Some(width),
            }
        }
    }

    fn handle_indent(&mut self, width: usize, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let loc = self.current_location();
        let current = self.indent_stack.last().copied().unwrap_or(0);

        if width > current {
            self.indent_stack.push(width);
            tokens.push(Token::Indent(loc));
            return Ok(());
        }

        while width < self.indent_stack.last().copied().unwrap_or(0) {
            self.indent_stack.pop();
            tokens.push(Token::Dedent(loc));
        }

        if width != self.indent_stack.last().copied().unwrap_or(0) {
            return Err(LexError {
                message: "Unindent does not match any outer indentation level".to_string(),
                location: loc,
            });
        }

        Ok(())
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '"' | '\'' => self.string_literal(ch, loc),
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '%' => Ok(Token::Percent(loc)),
            ',' => Ok(Token::Comma(loc)),
            ':' => Ok(Token::Colon(loc)),
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    Ok(Token::StarStar(loc))
                } else {
                    Ok(Token::Star(loc))
                }
            }
            '/' => {
                if self.peek() == Some('/') {
                    self.advance();
                    Ok(Token::SlashSlash(loc))
                } else {
                    Ok(Token::Slash(loc))
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Unexpected character '!'".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Le(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '(' => {
                self.paren_depth += 1;
                Ok(Token::LParen(loc))
            }
            ')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Ok(Token::RParen(loc))
            }

            _ => Err(LexError {
                message: format!("Unexpected character '{}'", ch),
                location: loc,
            }),
        }
    }

    fn string_literal(&mut self, quote: char, start: SourceLocation) -> Result<Token, LexError> {
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();

            if ch == quote {
                return Ok(Token::StringLiteral(value, start));
            }

            if ch == '\\' {
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unterminated string literal".to_string(),
                    location: start,
                })?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            } else {
                value.push(ch);
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: start,
        })
    }

    fn number_literal(&mut self, first: char, start: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::from(first);
        let mut is_float = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                if ch != '_' {
                    text.push(ch);
                }
                self.advance();
            } else if ch == '.' && !is_float && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(|x| Token::FloatLiteral(x, start))
                .map_err(|_| LexError {
                    message: format!("Invalid float literal '{}'", text),
                    location: start,
                })
        } else {
            text.parse::<i64>()
                .map(|n| Token::IntLiteral(n, start))
                .map_err(|_| LexError {
                    message: format!("Integer literal '{}' out of range", text),
                    location: start,
                })
        }
    }

    fn identifier_or_keyword(&mut self, first: char, start: SourceLocation) -> Token {
        let mut ident = String::from(first);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "def" => Token::Def(start),
            "return" => Token::Return(start),
            "if" => Token::If(start),
            "else" => Token::Else(start),
            "while" => Token::While(start),
            "pass" => Token::Pass(start),
            "not" => Token::Not(start),
            "True" => Token::True(start),
            "False" => Token::False(start),
            "None" => Token::None(start),
            _ => Token::Ident(ident, start),
        }
    }

    fn skip_inline_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' if self.paren_depth > 0 => {
                    self.advance();
                }
                '#' => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
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
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("a = 2\n");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "a"));
        assert!(matches!(tokens[1], Token::Eq(_)));
        assert!(matches!(tokens[2], Token::IntLiteral(2, _)));
        assert!(matches!(tokens[3], Token::Newline(_)));
        assert!(matches!(tokens[4], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("** // == != <= >= * /");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::StarStar(_)));
        assert!(matches!(tokens[1], Token::SlashSlash(_)));
        assert!(matches!(tokens[2], Token::EqEq(_)));
        assert!(matches!(tokens[3], Token::NotEq(_)));
        assert!(matches!(tokens[4], Token::Le(_)));
        assert!(matches!(tokens[5], Token::Ge(_)));
        assert!(matches!(tokens[6], Token::Star(_)));
        assert!(matches!(tokens[7], Token::Slash(_)));
    }

    #[test]
    fn test_indent_and_dedent() {
        let mut lexer = Lexer::new("def f(x):\n    return x\ny = 1\n");
        let tokens = lexer.tokenize().unwrap();

        let indent = tokens.iter().position(|t| matches!(t, Token::Indent(_)));
        let dedent = tokens.iter().position(|t| matches!(t, Token::Dedent(_)));
        assert!(matches!(tokens[indent.unwrap() + 1], Token::Return(_)));
        assert!(matches!(tokens[dedent.unwrap() + 1], Token::Ident(ref s, _) if s == "y"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let mut lexer = Lexer::new("# header\n\nx = 1  # trailing\n\n   # indented comment\ny = 2");
        let tokens = lexer.tokenize().unwrap();

        assert!(!tokens.iter().any(|t| matches!(t, Token::Indent(_))));
        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
        assert!(matches!(tokens.last(), Some(Token::Eof(_))));
    }

    #[test]
    fn test_newlines_inside_parens_are_ignored() {
        let mut lexer = Lexer::new("print(1,\n      2)\n");
        let tokens = lexer.tokenize().unwrap();

        let newlines = tokens.iter().filter(|t| matches!(t, Token::Newline(_))).count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn test_string_and_float_literals() {
        let mut lexer = Lexer::new("'hi\\n' \"x\" 2.5 1_000");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::StringLiteral(ref s, _) if s == "hi\n"));
        assert!(matches!(tokens[1], Token::StringLiteral(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::FloatLiteral(x, _) if x == 2.5));
        assert!(matches!(tokens[3], Token::IntLiteral(1000, _)));
    }

    #[test]
    fn test_inconsistent_dedent_is_error() {
        let mut lexer = Lexer::new("def f():\n    x = 1\n  y = 2\n");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.location.line, 3);
    }
}
