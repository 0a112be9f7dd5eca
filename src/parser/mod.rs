//! Front-end for the Python-like source subset
//!
//! This module transforms source text into a [`ast::SyntaxNode`] tree:
//! - [`lexer`]: Tokenization (source text → tokens, including indentation)
//! - [`parse`]: Parsing (tokens → syntax tree) and the [`parse::SyntaxError`] type
//! - [`ast`]: Syntax tree node definitions
//!
//! # Supported Subset
//!
//! - Statements: assignments (including `a = b = value`), `def`, `return`,
//!   `if`/`else`, `while`, `pass`, expression statements
//! - Expressions: int, float, string, `True`/`False`/`None` literals, names,
//!   calls by name, `+ - * / // % **`, unary `- + not`, single comparisons
//!
//! Only part of this surface is modelled by the trace extractor; the rest is
//! parsed so that the extractor's fallback traversal has something to walk.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse, parse_with_max_nesting, SyntaxError, DEFAULT_MAX_NESTING};
