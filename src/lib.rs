//! # Introduction
//!
//! steptrace turns a small Python-like program into a flat, ordered trace of
//! [`trace::Step`]s and then replays that trace, recording how the values of
//! every identifier evolve.  The trace doubles as an executable instruction
//! list and as a visualization unit.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → SyntaxNode → TraceExtractor → Steps → StepInterpreter → ValueTrace
//! ```
//!
//! 1. [`parser`] — tokenises the source and builds a [`parser::ast::SyntaxNode`] tree.
//! 2. [`trace`] — walks the tree in statement mode and value mode, emitting
//!    one step per top-level statement with nested sub-expressions resolved
//!    in place.
//! 3. [`interpreter`] — executes the steps against a flat environment,
//!    dispatching calls to built-ins or to a pluggable
//!    [`interpreter::FunctionInvoker`].
//! 4. [`memory`] — runtime [`memory::Value`]s and the [`memory::Environment`].
//! 5. [`snapshot`] — the append-only [`snapshot::ValueTrace`] and the
//!    [`snapshot::Terminal`] that captures `print` output.
//!
//! ## Example
//!
//! ```
//! use steptrace::interpreter::StepInterpreter;
//! use steptrace::memory::Value;
//!
//! let mut interpreter = StepInterpreter::from_source("a = 2\nb = a + 3\nprint(b)\n")?;
//! interpreter.execute()?;
//!
//! assert_eq!(interpreter.environment().get("b"), Some(&Value::Int(5)));
//! assert_eq!(interpreter.output(), ["5".to_string()]);
//! # Ok::<(), steptrace::Error>(())
//! ```

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod trace;

pub use error::{Error, Result};

/// Parse `source` and extract its step trace with the default configuration
pub fn trace_source(source: &str) -> Result<Vec<trace::Step>> {
    let tree = parser::parse(source)?;
    Ok(trace::extract(&tree)?)
}
