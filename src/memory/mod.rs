//! Runtime state for the step interpreter
//!
//! - [`value`]: Runtime value representation (None, Bool, Int, Float, Str)
//! - [`environment`]: The flat identifier → value namespace
//!
//! There is no scoping: one [`environment::Environment`] serves the whole
//! program, and only the interpreter mutates it.

pub mod environment;
pub mod value;

pub use environment::Environment;
pub use value::Value;
