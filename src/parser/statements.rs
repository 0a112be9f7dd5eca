//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= def_stmt | return_stmt | if_stmt | while_stmt
//!             | "pass" | assign_stmt | expr_stmt
//! block     ::= ":" NEWLINE INDENT statement+ DEDENT
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let loc = self.current_location();

        if self.match_token(&Token::Def(loc)) {
            return self.parse_function_def(loc);
        }

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement(loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::While(loc)) {
            let test = Box::new(self.parse_expression()?);
            let body = self.parse_block("after 'while' condition")?;
            return Ok(SyntaxNode::While {
                test,
                body,
                location: loc,
            });
        }

        if self.match_token(&Token::Pass(loc)) {
            self.expect_newline("after 'pass'")?;
            return Ok(SyntaxNode::Pass { location: loc });
        }

        self.parse_assignment_or_expression(loc)
    }

    /// Parse `name = name = ... = value` or a bare expression statement
    fn parse_assignment_or_expression(
        &mut self,
        loc: SourceLocation,
    ) -> Result<SyntaxNode, SyntaxError> {
        let mut value = self.parse_expression()?;

        if !self.check(&Token::Eq(loc)) {
            self.expect_newline("after expression")?;
            return Ok(SyntaxNode::Expr {
                value: Box::new(value),
                location: loc,
            });
        }

        let mut targets = Vec::new();
        while self.match_token(&Token::Eq(loc)) {
            match value {
                SyntaxNode::Name(id, _) => targets.push(id),
                other => {
                    return Err(SyntaxError {
                        message: format!("Cannot assign to {}", other.kind()),
                        location: *other.location(),
                    });
                }
            }
            value = self.parse_expression()?;
        }

        self.expect_newline("after assignment")?;
        Ok(SyntaxNode::Assign {
            targets,
            value: Box::new(value),
            location: loc,
        })
    }

    fn parse_function_def(&mut self, loc: SourceLocation) -> Result<SyntaxNode, SyntaxError> {
        let name = self.expect_identifier()?;

        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after function name",
        )?;

        let mut params = Vec::new();
        if !self.check(&Token::RParen(loc)) {
            loop {
                let param = self.expect_identifier()?;
                if params.contains(&param) {
                    return Err(SyntaxError {
                        message: format!("Duplicate parameter '{}'", param),
                        location: self.previous_location(),
                    });
                }
                params.push(param);
                if !self.match_token(&Token::Comma(loc)) {
                    break;
                }
            }
        }
        self.expect_rparen("after parameters")?;

        let body = self.parse_block("after function signature")?;

        Ok(SyntaxNode::FunctionDef {
            name,
            params,
            body,
            location: loc,
        })
    }

    fn parse_return_statement(&mut self, loc: SourceLocation) -> Result<SyntaxNode, SyntaxError> {
        let value = if self.check(&Token::Newline(loc)) || self.is_at_end() {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_newline("after return value")?;

        Ok(SyntaxNode::Return {
            value,
            location: loc,
        })
    }

    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<SyntaxNode, SyntaxError> {
        let test = Box::new(self.parse_expression()?);
        let body = self.parse_block("after 'if' condition")?;

        let orelse = if self.match_token(&Token::Else(loc)) {
            self.parse_block("after 'else'")?
        } else {
            Vec::new()
        };

        Ok(SyntaxNode::If {
            test,
            body,
            orelse,
            location: loc,
        })
    }

    /// Parse an indented block introduced by `:`
    pub(crate) fn parse_block(&mut self, ctx: &str) -> Result<Vec<SyntaxNode>, SyntaxError> {
        self.expect_colon(ctx)?;
        self.expect_token(
            &Token::Newline(self.current_location()),
            "Expected newline before indented block",
        )?;
        self.expect_token(
            &Token::Indent(self.current_location()),
            "Expected an indented block",
        )?;

        let mut statements = Vec::new();
        while !self.check(&Token::Dedent(self.current_location())) && !self.is_at_end() {
            statements.push(self.nested(Self::parse_statement)?);
        }
        self.match_token(&Token::Dedent(self.current_location()));

        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse;

    fn first_statement(source: &str) -> SyntaxNode {
        match parse(source).unwrap() {
            SyntaxNode::Module { mut body, .. } => body.remove(0),
            other => panic!("Expected module, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_target_assignment() {
        match first_statement("a = b = 7\n") {
            SyntaxNode::Assign { targets, value, .. } => {
                assert_eq!(targets, vec!["a".to_string(), "b".to_string()]);
                assert!(matches!(*value, SyntaxNode::Constant(Literal::Int(7), _)));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_assign_to_call_is_rejected() {
        let err = parse("f(x) = 1\n").unwrap_err();
        assert!(err.message.contains("Cannot assign to Call"));
    }

    #[test]
    fn test_if_else_and_while() {
        let source = "if x > 0:\n    y = 1\nelse:\n    y = 2\nwhile y:\n    pass\n";
        let body = match parse(source).unwrap() {
            SyntaxNode::Module { body, .. } => body,
            _ => unreachable!(),
        };

        match &body[0] {
            SyntaxNode::If {
                test, body, orelse, ..
            } => {
                assert_eq!(test.kind(), NodeKind::Compare);
                assert_eq!(body.len(), 1);
                assert_eq!(orelse.len(), 1);
            }
            other => panic!("Expected if, got {:?}", other),
        }
        assert_eq!(body[1].kind(), NodeKind::While);
    }

    #[test]
    fn test_bare_return() {
        let source = "def f():\n    return\n";
        match first_statement(source) {
            SyntaxNode::FunctionDef { params, body, .. } => {
                assert!(params.is_empty());
                assert!(matches!(body[0], SyntaxNode::Return { value: None, .. }));
            }
            other => panic!("Expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_indented_block() {
        let err = parse("def f():\nreturn 1\n").unwrap_err();
        assert!(err.message.contains("indented block"));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = parse("def f(x, x):\n    return x\n").unwrap_err();
        assert!(err.message.contains("Duplicate parameter"));
    }
}
