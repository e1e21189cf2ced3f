//! # Filter Expressions
//!
//! Boolean filters over JSON documents:
//! - Comparisons (`equals`, `lessthan`, `greaterequal`) between field
//!   projections and literal values
//! - Logical connectives (`and`, `or`, `not`)
//! - Array quantifiers (`anyin`, `everyin`) binding elements to slots
//!
//! Filters are compiled once from their JSON-array wire form and evaluated
//! many times by [`crate::matcher::Matcher`].

pub mod ast;
pub mod parser;

// Re-exports
pub use ast::*;
pub use parser::*;
