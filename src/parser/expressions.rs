//! Expression parsing implementation
//!
//! One method per precedence level, lowest first:
//! comparison → additive → multiplicative → unary → power → primary.
//! `**` is right-associative and binds tighter than a unary minus on its
//! left (`-2 ** 2` is `-(2 ** 2)`), as in Python.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<SyntaxNode, SyntaxError> {
        self.nested(Self::parse_comparison)
    }

    /// Parse a single, non-chained comparison
    fn parse_comparison(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let left = self.parse_additive()?;

        let loc = self.current_location();
        let op = match self.peek() {
            Token::EqEq(_) => CmpOp::Eq,
            Token::NotEq(_) => CmpOp::NotEq,
            Token::Lt(_) => CmpOp::Lt,
            Token::Le(_) => CmpOp::LtE,
            Token::Gt(_) => CmpOp::Gt,
            Token::Ge(_) => CmpOp::GtE,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_additive()?;
        Ok(SyntaxNode::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location: loc,
        })
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut left = self.parse_multiplicative()?;
        // Each operator deepens the left spine of the tree
        let mut levels = 0;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let loc = self.previous_location();
            self.enter()?;
            levels += 1;
            let right = self.parse_multiplicative()?;
            left = SyntaxNode::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        self.leave(levels);
        Ok(left)
    }

    /// Parse multiplicative (* / // %)
    fn parse_multiplicative(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut left = self.parse_unary()?;
        let mut levels = 0;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mult,
                Token::Slash(_) => BinOp::Div,
                Token::SlashSlash(_) => BinOp::FloorDiv,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let loc = self.previous_location();
            self.enter()?;
            levels += 1;
            let right = self.parse_unary()?;
            left = SyntaxNode::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        self.leave(levels);
        Ok(left)
    }

    /// Parse unary (- + not)
    fn parse_unary(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let loc = self.current_location();
        let op = match self.peek() {
            Token::Minus(_) => UnOp::USub,
            Token::Plus(_) => UnOp::UAdd,
            Token::Not(_) => UnOp::Not,
            _ => return self.parse_power(),
        };
        self.advance();

        let operand = self.nested(Self::parse_unary)?;
        Ok(SyntaxNode::UnaryOp {
            op,
            operand: Box::new(operand),
            location: loc,
        })
    }

    /// Parse power (**), right-associative
    fn parse_power(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let base = self.parse_primary()?;

        if self.match_token(&Token::StarStar(self.current_location())) {
            let loc = self.previous_location();
            let exponent = self.nested(Self::parse_unary)?;
            return Ok(SyntaxNode::BinaryOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
                location: loc,
            });
        }

        Ok(base)
    }

    /// Parse primary expressions: literals, names, calls, parenthesized
    fn parse_primary(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let loc = self.current_location();
        let literal = match self.peek() {
            Token::IntLiteral(n, _) => Some(Literal::Int(*n)),
            Token::FloatLiteral(x, _) => Some(Literal::Float(*x)),
            Token::StringLiteral(s, _) => Some(Literal::Str(s.clone())),
            Token::True(_) => Some(Literal::Bool(true)),
            Token::False(_) => Some(Literal::Bool(false)),
            Token::None(_) => Some(Literal::None),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(SyntaxNode::Constant(literal, loc));
        }

        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();

            if self.match_token(&Token::LParen(loc)) {
                let args = self.parse_call_arguments()?;
                return Ok(SyntaxNode::Call {
                    func: name,
                    args,
                    location: loc,
                });
            }
            return Ok(SyntaxNode::Name(name, loc));
        }

        if self.match_token(&Token::LParen(loc)) {
            let expr = self.parse_expression()?;
            self.expect_rparen("after parenthesized expression")?;
            return Ok(expr);
        }

        Err(self.error(format!("Expected expression, found {}", self.peek())))
    }

    /// Parse call arguments after the opening parenthesis
    fn parse_call_arguments(&mut self) -> Result<Vec<SyntaxNode>, SyntaxError> {
        let mut args = Vec::new();

        if self.match_token(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
            // Trailing comma
            if matches!(self.peek_ahead(0), Some(Token::RParen(_))) {
                break;
            }
        }
        self.expect_rparen("after call arguments")?;

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse;

    fn expression(source: &str) -> SyntaxNode {
        match parse(source).unwrap() {
            SyntaxNode::Module { mut body, .. } => match body.remove(0) {
                SyntaxNode::Expr { value, .. } => *value,
                SyntaxNode::Assign { value, .. } => *value,
                other => panic!("Expected expression statement, got {:?}", other),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 => Add(1, Mult(2, 3))
        match expression("1 + 2 * 3\n") {
            SyntaxNode::BinaryOp {
                op: BinOp::Add,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, SyntaxNode::Constant(Literal::Int(1), _)));
                assert!(matches!(
                    *right,
                    SyntaxNode::BinaryOp {
                        op: BinOp::Mult,
                        ..
                    }
                ));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_left_associative_subtraction() {
        // 10 - 3 - 2 => Sub(Sub(10, 3), 2)
        match expression("10 - 3 - 2\n") {
            SyntaxNode::BinaryOp {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, SyntaxNode::BinaryOp { op: BinOp::Sub, .. }));
                assert!(matches!(*right, SyntaxNode::Constant(Literal::Int(2), _)));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        match expression("-2 ** 2\n") {
            SyntaxNode::UnaryOp {
                op: UnOp::USub,
                operand,
                ..
            } => {
                assert!(matches!(*operand, SyntaxNode::BinaryOp { op: BinOp::Pow, .. }));
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_call_with_nested_arguments() {
        match expression("print(a, 1 + b, f(2),)\n") {
            SyntaxNode::Call { func, args, .. } => {
                assert_eq!(func, "print");
                assert_eq!(args.len(), 3);
                assert_eq!(args[0].kind(), NodeKind::Name);
                assert_eq!(args[1].kind(), NodeKind::BinaryOp);
                assert_eq!(args[2].kind(), NodeKind::Call);
            }
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        match expression("(1 + 2) * 3\n") {
            SyntaxNode::BinaryOp {
                op: BinOp::Mult,
                left,
                ..
            } => assert!(matches!(*left, SyntaxNode::BinaryOp { op: BinOp::Add, .. })),
            other => panic!("Unexpected tree {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert!(matches!(expression("x = None\n"), SyntaxNode::Constant(Literal::None, _)));
        assert!(matches!(expression("x = True\n"), SyntaxNode::Constant(Literal::Bool(true), _)));
        assert!(matches!(expression("x = 'ok'\n"), SyntaxNode::Constant(Literal::Str(ref s), _) if s == "ok"));
    }
}
