//! Crate-level error type
//!
//! Each stage has its own error enum; [`Error`] joins them for callers that
//! go from source text to execution in one call.

use crate::interpreter::errors::RuntimeError;
use crate::parser::SyntaxError;
use crate::trace::TraceError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
