// Syntax tree definitions consumed by the trace extractor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Literal values carried by `Constant` nodes.
///
/// Serialized untagged so that a literal reads as the plain JSON scalar
/// (`3`, `2.5`, `"hi"`, `true`, `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => write!(f, "None"),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mult => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    USub, // -x
    UAdd, // +x
    Not,  // not x
}

/// Comparison operators (parsed, not modelled by the extractor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

/// Kind tag of a [`SyntaxNode`], used for logging and for `Unsupported` markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Assign,
    Call,
    BinaryOp,
    UnaryOp,
    Constant,
    Name,
    FunctionDef,
    Return,
    Expr,
    Compare,
    If,
    While,
    Pass,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Assign => "Assign",
            NodeKind::Call => "Call",
            NodeKind::BinaryOp => "BinaryOp",
            NodeKind::UnaryOp => "UnaryOp",
            NodeKind::Constant => "Constant",
            NodeKind::Name => "Name",
            NodeKind::FunctionDef => "FunctionDef",
            NodeKind::Return => "Return",
            NodeKind::Expr => "Expr",
            NodeKind::Compare => "Compare",
            NodeKind::If => "If",
            NodeKind::While => "While",
            NodeKind::Pass => "Pass",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntax tree nodes produced by the front-end
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Module {
        body: Vec<SyntaxNode>,
        location: SourceLocation,
    },

    // Statements
    Assign {
        targets: Vec<String>,
        value: Box<SyntaxNode>,
        location: SourceLocation,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<SyntaxNode>,
        location: SourceLocation,
    },
    Return {
        value: Option<Box<SyntaxNode>>,
        location: SourceLocation,
    },
    Expr {
        value: Box<SyntaxNode>,
        location: SourceLocation,
    },
    If {
        test: Box<SyntaxNode>,
        body: Vec<SyntaxNode>,
        orelse: Vec<SyntaxNode>,
        location: SourceLocation,
    },
    While {
        test: Box<SyntaxNode>,
        body: Vec<SyntaxNode>,
        location: SourceLocation,
    },
    Pass {
        location: SourceLocation,
    },

    // Expressions
    Call {
        func: String,
        args: Vec<SyntaxNode>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<SyntaxNode>,
        location: SourceLocation,
    },
    Compare {
        op: CmpOp,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
        location: SourceLocation,
    },
    Constant(Literal, SourceLocation),
    Name(String, SourceLocation),
}

impl SyntaxNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            SyntaxNode::Module { .. } => NodeKind::Module,
            SyntaxNode::Assign { .. } => NodeKind::Assign,
            SyntaxNode::FunctionDef { .. } => NodeKind::FunctionDef,
            SyntaxNode::Return { .. } => NodeKind::Return,
            SyntaxNode::Expr { .. } => NodeKind::Expr,
            SyntaxNode::If { .. } => NodeKind::If,
            SyntaxNode::While { .. } => NodeKind::While,
            SyntaxNode::Pass { .. } => NodeKind::Pass,
            SyntaxNode::Call { .. } => NodeKind::Call,
            SyntaxNode::BinaryOp { .. } => NodeKind::BinaryOp,
            SyntaxNode::UnaryOp { .. } => NodeKind::UnaryOp,
            SyntaxNode::Compare { .. } => NodeKind::Compare,
            SyntaxNode::Constant(..) => NodeKind::Constant,
            SyntaxNode::Name(..) => NodeKind::Name,
        }
    }

    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            SyntaxNode::Module { location, .. } => location,
            SyntaxNode::Assign { location, .. } => location,
            SyntaxNode::FunctionDef { location, .. } => location,
            SyntaxNode::Return { location, .. } => location,
            SyntaxNode::Expr { location, .. } => location,
            SyntaxNode::If { location, .. } => location,
            SyntaxNode::While { location, .. } => location,
            SyntaxNode::Pass { location } => location,
            SyntaxNode::Call { location, .. } => location,
            SyntaxNode::BinaryOp { location, .. } => location,
            SyntaxNode::UnaryOp { location, .. } => location,
            SyntaxNode::Compare { location, .. } => location,
            SyntaxNode::Constant(_, loc) => loc,
            SyntaxNode::Name(_, loc) => loc,
        }
    }

    /// Direct child nodes in source order.
    ///
    /// Identifier fields (assignment targets, callee and parameter names) are
    /// plain strings, not nodes, and are therefore not children.
    pub fn children(&self) -> Vec<&SyntaxNode> {
        match self {
            SyntaxNode::Module { body, .. } | SyntaxNode::FunctionDef { body, .. } => {
                body.iter().collect()
            }
            SyntaxNode::Assign { value, .. } | SyntaxNode::Expr { value, .. } => vec![value.as_ref()],
            SyntaxNode::Return { value, .. } => value.iter().map(|v| v.as_ref()).collect(),
            SyntaxNode::If {
                test, body, orelse, ..
            } => std::iter::once(test.as_ref())
                .chain(body.iter())
                .chain(orelse.iter())
                .collect(),
            SyntaxNode::While { test, body, .. } => {
                std::iter::once(test.as_ref()).chain(body.iter()).collect()
            }
            SyntaxNode::Call { args, .. } => args.iter().collect(),
            SyntaxNode::BinaryOp { left, right, .. } | SyntaxNode::Compare { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            SyntaxNode::UnaryOp { operand, .. } => vec![operand.as_ref()],
            SyntaxNode::Pass { .. } | SyntaxNode::Constant(..) | SyntaxNode::Name(..) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_children_follow_source_order() {
        let node = SyntaxNode::If {
            test: Box::new(SyntaxNode::Name("x".to_string(), loc())),
            body: vec![SyntaxNode::Pass { location: loc() }],
            orelse: vec![SyntaxNode::Constant(Literal::Int(1), loc())],
            location: loc(),
        };

        let kinds: Vec<NodeKind> = node.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Name, NodeKind::Pass, NodeKind::Constant]);
    }

    #[test]
    fn test_assign_targets_are_not_children() {
        let node = SyntaxNode::Assign {
            targets: vec!["a".to_string(), "b".to_string()],
            value: Box::new(SyntaxNode::Constant(Literal::Int(1), loc())),
            location: loc(),
        };
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn test_literal_display_matches_python() {
        assert_eq!(Literal::None.to_string(), "None");
        assert_eq!(Literal::Bool(true).to_string(), "True");
        assert_eq!(Literal::Float(5.0).to_string(), "5.0");
        assert_eq!(Literal::Str("hi".to_string()).to_string(), "\"hi\"");
    }
}
