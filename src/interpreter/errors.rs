//! Runtime error types for the step interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can
//! occur while executing a step sequence (as opposed to syntax errors or
//! extraction limits).
//!
//! All runtime errors are fatal to the current `execute()` call. State built
//! up by the steps that completed before the failure stays inspectable.

use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Call to a name that is neither a built-in nor an invokable function
    #[error("Unknown callable '{name}'")]
    UnknownCallable { name: String },

    /// Identifier lookup missed the environment
    #[error("Name '{name}' is not defined")]
    UnboundIdentifier { name: String },

    /// Operand types do not support the operation
    #[error("Type error: unsupported operand type(s) for {operation}: {got}")]
    TypeError { operation: String, got: String },

    /// Division or modulo by zero
    #[error("{operation} by zero")]
    DivisionByZero { operation: String },

    /// Integer overflow in arithmetic operation
    #[error("Integer overflow in operation: {operation}")]
    IntegerOverflow { operation: String },

    /// Float result out of range where Python raises instead of producing `inf`
    #[error("Numerical result out of range in operation: {operation}")]
    FloatOverflow { operation: String },

    /// A string result larger than the interpreter's memory budget
    #[error("Value of {size} bytes exceeds the limit of {limit}")]
    ValueTooLarge { size: usize, limit: usize },

    /// Built-in or function argument count mismatch
    #[error("{function}() takes {expected} argument{}, got {got}", plural(.expected))]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    /// Built-in received a value it cannot convert
    #[error("Invalid value for {function}(): {message}")]
    InvalidArgument { function: String, message: String },

    /// A value of a node kind the extractor does not model
    #[error("Cannot evaluate unsupported '{kind}' expression")]
    UnsupportedValue { kind: String },

    /// Nested step evaluation went deeper than the configured limit
    #[error("Evaluation exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// Snapshot history limit exceeded
    #[error("Snapshot memory limit exceeded: {current} bytes needed, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RuntimeError::UnknownCallable {
            name: "my_function".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown callable 'my_function'");

        let err = RuntimeError::ArgumentCountMismatch {
            function: "len".to_string(),
            expected: 1,
            got: 2,
        };
        assert_eq!(err.to_string(), "len() takes 1 argument, got 2");

        let err = RuntimeError::DivisionByZero {
            operation: "integer division".to_string(),
        };
        assert_eq!(err.to_string(), "integer division by zero");

        let err = RuntimeError::ValueTooLarge { size: 10, limit: 4 };
        assert_eq!(err.to_string(), "Value of 10 bytes exceeds the limit of 4");
    }
}
