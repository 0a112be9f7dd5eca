//! Calling user-defined functions
//!
//! A `FunctionDef` step only registers a [`FunctionDefinition`]; nothing runs
//! its body. Whoever embeds the interpreter decides what a call means by
//! installing a [`FunctionInvoker`] with
//! [`StepInterpreter::with_invoker`](crate::interpreter::engine::StepInterpreter::with_invoker).
//! Without one, calling a defined function fails with
//! [`RuntimeError::UnknownCallable`].

use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::trace::{Step, StepValue};
use serde::Serialize;

/// A function registered by a `FunctionDef` step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<StepValue>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<StepValue>) -> Self {
        FunctionDefinition {
            name: name.into(),
            params,
            body,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Body entries that resolved to steps, in order
    pub fn body_steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.body.iter().filter_map(StepValue::as_step)
    }
}

/// Strategy for calling user-defined functions
///
/// The interpreter checks the argument count against `function.params` before
/// calling `invoke`.
pub trait FunctionInvoker {
    fn invoke(
        &mut self,
        function: &FunctionDefinition,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}

impl<F> FunctionInvoker for F
where
    F: FnMut(&FunctionDefinition, Vec<Value>) -> Result<Value, RuntimeError>,
{
    fn invoke(
        &mut self,
        function: &FunctionDefinition,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        self(function, args)
    }
}
