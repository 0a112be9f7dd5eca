//! Step traces
//!
//! - [`step`]: the [`Step`] / [`StepValue`] records that make up a trace
//! - [`extractor`]: the [`TraceExtractor`] that turns a syntax tree into steps
//!
//! A trace is the only schedule the interpreter follows: steps run in the
//! order the extractor emitted them, which is the source order of the
//! top-level statements.

pub mod extractor;
pub mod step;

pub use extractor::{extract, ArgumentPolicy, ExtractorConfig, TraceError, TraceExtractor};
pub use step::{Step, StepKind, StepValue};
