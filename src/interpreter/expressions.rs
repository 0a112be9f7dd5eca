// Step evaluation: turns a StepValue or an embedded Step into a runtime Value

use crate::interpreter::engine::StepInterpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::trace::{Step, StepValue};
use tracing::debug;

impl StepInterpreter {
    /// Evaluate a resolved operand
    pub(crate) fn evaluate(&mut self, value: &StepValue) -> Result<Value, RuntimeError> {
        match value {
            StepValue::Literal(literal) => Ok(Value::from(literal)),
            StepValue::Identifier(name) => self.lookup(name),
            StepValue::Step(step) => self.evaluate_step(step),
            StepValue::Unsupported { kind } => {
                Err(RuntimeError::UnsupportedValue { kind: kind.clone() })
            }
        }
    }

    /// Evaluate a step for its value, bounded by `max_depth`
    pub(crate) fn evaluate_step(&mut self, step: &Step) -> Result<Value, RuntimeError> {
        let limit = self.config().max_depth;
        if self.depth >= limit {
            return Err(RuntimeError::DepthLimitExceeded { limit });
        }

        self.depth += 1;
        let result = self.evaluate_step_inner(step);
        self.depth -= 1;
        result
    }

    fn evaluate_step_inner(&mut self, step: &Step) -> Result<Value, RuntimeError> {
        match step {
            Step::Constant { value } => Ok(Value::from(value)),
            Step::Name { id } => self.lookup(id),
            Step::BinaryOp { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.evaluate_binary_op(*op, &left, &right)
            }
            Step::UnaryOp { op, operand } => {
                let operand = self.evaluate(operand)?;
                self.evaluate_unary_op(*op, &operand)
            }
            Step::Call { function, args } => {
                let args = self.evaluate_args(args)?;
                self.call_function(function, args)
            }
            // Statements have no value; Python rejects them in expression position too
            Step::Assign { .. } | Step::FunctionDef { .. } | Step::Return { .. } => {
                Err(RuntimeError::UnsupportedValue {
                    kind: step.kind().to_string(),
                })
            }
        }
    }

    pub(crate) fn evaluate_args(&mut self, args: &[StepValue]) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.evaluate(arg)).collect()
    }

    fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnboundIdentifier {
                name: name.to_string(),
            })
    }

    /// Call a user-defined function or a built-in
    ///
    /// A `def` shadows a built-in of the same name. Defined functions run
    /// through the installed invoker; with none installed they are not
    /// callable.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if let Some(function) = self.functions.get(name) {
            let Some(invoker) = self.invoker.as_mut() else {
                return Err(RuntimeError::UnknownCallable {
                    name: name.to_string(),
                });
            };

            if args.len() != function.arity() {
                return Err(RuntimeError::ArgumentCountMismatch {
                    function: name.to_string(),
                    expected: function.arity(),
                    got: args.len(),
                });
            }

            debug!(function = name, args = args.len(), "invoking user-defined function");
            return invoker.invoke(function, args);
        }

        match self.call_builtin(name, &args) {
            Some(result) => result,
            None => Err(RuntimeError::UnknownCallable {
                name: name.to_string(),
            }),
        }
    }
}
