//! Trace records produced by the extractor
//!
//! A [`Step`] mirrors the syntax node it came from, but every nested
//! sub-expression has already been resolved to a [`StepValue`]: a literal, an
//! identifier that is looked up only at execution time, or a nested step.

use crate::parser::ast::{BinOp, Literal, UnOp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a [`Step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Assign,
    Call,
    BinaryOp,
    UnaryOp,
    Constant,
    Name,
    FunctionDef,
    Return,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Assign => "Assign",
            StepKind::Call => "Call",
            StepKind::BinaryOp => "BinaryOp",
            StepKind::UnaryOp => "UnaryOp",
            StepKind::Constant => "Constant",
            StepKind::Name => "Name",
            StepKind::FunctionDef => "FunctionDef",
            StepKind::Return => "Return",
        };
        f.write_str(name)
    }
}

/// A normalized, immutable trace unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Step {
    Assign {
        targets: Vec<String>,
        value: StepValue,
    },
    Call {
        function: String,
        args: Vec<StepValue>,
    },
    BinaryOp {
        op: BinOp,
        left: StepValue,
        right: StepValue,
    },
    UnaryOp {
        op: UnOp,
        operand: StepValue,
    },
    Constant {
        value: Literal,
    },
    Name {
        id: String,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<StepValue>,
    },
    Return {
        value: StepValue,
    },
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Assign { .. } => StepKind::Assign,
            Step::Call { .. } => StepKind::Call,
            Step::BinaryOp { .. } => StepKind::BinaryOp,
            Step::UnaryOp { .. } => StepKind::UnaryOp,
            Step::Constant { .. } => StepKind::Constant,
            Step::Name { .. } => StepKind::Name,
            Step::FunctionDef { .. } => StepKind::FunctionDef,
            Step::Return { .. } => StepKind::Return,
        }
    }
}

/// One line per step: the kind, then the step as JSON
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{} {}", self.kind(), json)
    }
}

/// What a sub-expression resolved to at extraction time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepValue {
    Literal(Literal),
    /// A name, looked up in the environment only when the step executes
    Identifier(String),
    Step(Box<Step>),
    /// A sub-expression whose node kind the extractor does not model
    Unsupported {
        kind: String,
    },
}

impl StepValue {
    pub fn identifier(name: impl Into<String>) -> Self {
        StepValue::Identifier(name.into())
    }

    pub fn step(step: Step) -> Self {
        StepValue::Step(Box::new(step))
    }

    pub fn as_step(&self) -> Option<&Step> {
        match self {
            StepValue::Step(step) => Some(step),
            _ => None,
        }
    }
}

impl From<Literal> for StepValue {
    fn from(literal: Literal) -> Self {
        StepValue::Literal(literal)
    }
}

impl From<i64> for StepValue {
    fn from(n: i64) -> Self {
        StepValue::Literal(Literal::Int(n))
    }
}

impl From<Step> for StepValue {
    fn from(step: Step) -> Self {
        StepValue::step(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_step_serializes_with_kind_field() {
        let step = Step::Assign {
            targets: vec!["b".to_string()],
            value: StepValue::step(Step::BinaryOp {
                op: BinOp::Add,
                left: StepValue::identifier("a"),
                right: StepValue::from(3),
            }),
        };

        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({
                "kind": "Assign",
                "targets": ["b"],
                "value": {
                    "step": {
                        "kind": "BinaryOp",
                        "op": "Add",
                        "left": { "identifier": "a" },
                        "right": { "literal": 3 }
                    }
                }
            })
        );
    }

    #[test]
    fn test_step_json_reads_back() {
        let step = Step::FunctionDef {
            name: "f".to_string(),
            params: vec!["x".to_string()],
            body: vec![StepValue::step(Step::Return {
                value: StepValue::Literal(Literal::Float(2.5)),
            })],
        };

        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_display_prefixes_kind() {
        let step = Step::Call {
            function: "print".to_string(),
            args: vec![StepValue::identifier("b")],
        };
        assert_eq!(
            step.to_string(),
            r#"Call {"kind":"Call","function":"print","args":[{"identifier":"b"}]}"#
        );
    }
}
