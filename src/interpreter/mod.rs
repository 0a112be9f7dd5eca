//! Step execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: [`StepInterpreter`], which runs a step sequence in order
//! - [`errors`]: Runtime error types
//! - [`invoke`]: The [`FunctionInvoker`] extension point for defined functions
//! - [`builtins`]: `print` and the other names callable without a `def`
//!
//! # Execution Model
//!
//! Each top-level step runs once, top to bottom. Nested step values are
//! evaluated recursively; identifiers are looked up in the flat
//! [`Environment`](crate::memory::Environment) at the moment they are needed.
//! After each state-changing step (assignment, call, definition, return) a
//! [`Snapshot`](crate::snapshot::Snapshot) of the environment is appended to
//! the value trace.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
pub mod invoke;
mod ops;

pub use engine::{InterpreterConfig, StepInterpreter};
pub use errors::RuntimeError;
pub use invoke::{FunctionDefinition, FunctionInvoker};
