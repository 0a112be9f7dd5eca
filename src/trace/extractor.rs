//! Syntax tree → step trace
//!
//! The extractor walks a [`SyntaxNode`] tree in one of two modes:
//!
//! - **statement mode** ([`TraceExtractor::visit_as_statement`]): the step a
//!   node produces is appended to the caller's accumulator;
//! - **value mode** ([`TraceExtractor::visit_as_value`]): the node is resolved
//!   to a [`StepValue`] that the caller embeds in its own step.
//!
//! Both share one kind-dispatch core. Node kinds without a handler are walked
//! generically: their children are visited in the same mode and nothing is
//! emitted for the node itself.

use crate::parser::ast::{Literal, SyntaxNode};
use crate::trace::step::{Step, StepValue};
use thiserror::Error;
use tracing::{debug, trace};

/// Default bound on syntax tree nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How call arguments that are plain literals or names are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentPolicy {
    /// Read literals and identifiers straight off the node
    #[default]
    ShortCircuit,
    /// Send every argument through a full value-mode visit
    Recurse,
}

/// Extractor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub max_depth: usize,
    pub argument_policy: ArgumentPolicy,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            argument_policy: ArgumentPolicy::default(),
        }
    }
}

/// Extraction failures. Unknown node kinds are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("Syntax tree nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Where the result of a visit goes
enum Mode<'a> {
    Statement(&'a mut Vec<Step>),
    Value,
}

impl Mode<'_> {
    fn emit(self, step: Step) -> Option<StepValue> {
        match self {
            Mode::Statement(steps) => {
                trace!(kind = %step.kind(), index = steps.len(), "emit step");
                steps.push(step);
                None
            }
            Mode::Value => Some(StepValue::step(step)),
        }
    }
}

/// Recursive, kind-dispatched syntax tree visitor
#[derive(Debug, Default)]
pub struct TraceExtractor {
    config: ExtractorConfig,
    depth: usize,
}

/// Extract the step trace of `root` with the default configuration.
pub fn extract(root: &SyntaxNode) -> Result<Vec<Step>, TraceError> {
    TraceExtractor::default().extract(root)
}

impl TraceExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config, depth: 0 }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Produce the ordered top-level steps of `root`.
    #[tracing::instrument(level = "debug", skip_all, fields(root = %root.kind()))]
    pub fn extract(&mut self, root: &SyntaxNode) -> Result<Vec<Step>, TraceError> {
        self.depth = 0;
        let mut steps = Vec::new();
        self.visit_as_statement(root, &mut steps)?;
        debug!(count = steps.len(), "extraction complete");
        Ok(steps)
    }

    /// Visit `node` and append whatever steps it produces to `steps`.
    pub fn visit_as_statement(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<Step>,
    ) -> Result<(), TraceError> {
        self.visit(node, Mode::Statement(steps)).map(|_| ())
    }

    /// Resolve `node` to a value for embedding in an enclosing step.
    pub fn visit_as_value(&mut self, node: &SyntaxNode) -> Result<StepValue, TraceError> {
        let value = self.visit(node, Mode::Value)?;
        Ok(value.unwrap_or_else(|| StepValue::Unsupported {
            kind: node.kind().to_string(),
        }))
    }

    fn visit(&mut self, node: &SyntaxNode, mode: Mode<'_>) -> Result<Option<StepValue>, TraceError> {
        if self.depth >= self.config.max_depth {
            return Err(TraceError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        self.depth += 1;
        let result = self.dispatch(node, mode);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, node: &SyntaxNode, mode: Mode<'_>) -> Result<Option<StepValue>, TraceError> {
        let step = match node {
            SyntaxNode::Assign { targets, value, .. } => Step::Assign {
                targets: targets.clone(),
                value: self.visit_as_value(value)?,
            },

            SyntaxNode::Call { func, args, .. } => Step::Call {
                function: func.clone(),
                args: args
                    .iter()
                    .map(|arg| self.resolve_argument(arg))
                    .collect::<Result<_, _>>()?,
            },

            SyntaxNode::BinaryOp {
                op, left, right, ..
            } => Step::BinaryOp {
                op: *op,
                left: self.visit_as_value(left)?,
                right: self.visit_as_value(right)?,
            },

            SyntaxNode::UnaryOp { op, operand, .. } => Step::UnaryOp {
                op: *op,
                operand: self.visit_as_value(operand)?,
            },

            SyntaxNode::Constant(literal, _) => match mode {
                Mode::Value => return Ok(Some(StepValue::Literal(literal.clone()))),
                Mode::Statement(_) => Step::Constant {
                    value: literal.clone(),
                },
            },

            SyntaxNode::Name(id, _) => match mode {
                Mode::Value => return Ok(Some(StepValue::Identifier(id.clone()))),
                Mode::Statement(_) => Step::Name { id: id.clone() },
            },

            SyntaxNode::FunctionDef {
                name, params, body, ..
            } => Step::FunctionDef {
                name: name.clone(),
                params: params.clone(),
                body: body
                    .iter()
                    .map(|stmt| self.visit_as_value(stmt))
                    .collect::<Result<_, _>>()?,
            },

            SyntaxNode::Return { value, .. } => Step::Return {
                value: match value {
                    Some(value) => self.visit_as_value(value)?,
                    None => StepValue::Literal(Literal::None),
                },
            },

            SyntaxNode::Module { .. }
            | SyntaxNode::Expr { .. }
            | SyntaxNode::Compare { .. }
            | SyntaxNode::If { .. }
            | SyntaxNode::While { .. }
            | SyntaxNode::Pass { .. } => return self.visit_children(node, mode),
        };

        Ok(mode.emit(step))
    }

    /// Fallback for node kinds without a handler.
    ///
    /// In value mode a single-child node (an expression statement) is
    /// transparent; any other shape resolves to `Unsupported`.
    fn visit_children(
        &mut self,
        node: &SyntaxNode,
        mode: Mode<'_>,
    ) -> Result<Option<StepValue>, TraceError> {
        trace!(
            kind = %node.kind(),
            line = node.location().line,
            "no handler for node kind, visiting children"
        );

        let children = node.children();
        match mode {
            Mode::Statement(steps) => {
                for child in children {
                    self.visit(child, Mode::Statement(&mut *steps))?;
                }
                Ok(None)
            }
            Mode::Value => {
                if let [only] = children.as_slice() {
                    return self.visit(only, Mode::Value);
                }
                for child in children {
                    self.visit(child, Mode::Value)?;
                }
                Ok(Some(StepValue::Unsupported {
                    kind: node.kind().to_string(),
                }))
            }
        }
    }

    fn resolve_argument(&mut self, arg: &SyntaxNode) -> Result<StepValue, TraceError> {
        match (self.config.argument_policy, arg) {
            (ArgumentPolicy::ShortCircuit, SyntaxNode::Constant(literal, _)) => {
                Ok(StepValue::Literal(literal.clone()))
            }
            (ArgumentPolicy::ShortCircuit, SyntaxNode::Name(id, _)) => {
                Ok(StepValue::Identifier(id.clone()))
            }
            _ => self.visit_as_value(arg),
        }
    }
}
