//! Operator evaluation, split by arity
//!
//! Both halves extend [`StepInterpreter`](crate::interpreter::engine::StepInterpreter)
//! with `pub(crate)` helpers called from step evaluation.

mod binary;
mod unary;
