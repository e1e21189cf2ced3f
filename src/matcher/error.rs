//! Evaluation errors.
use std::error::Error;
use std::fmt;

use crate::filter::Slot;

/// Represents errors that can occur while evaluating a filter against a
/// document. Any of these makes the whole match call come out `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The document bytes are not well-formed UTF-8 JSON.
    Document(String),
    /// A field path names a member or element that does not exist.
    MissingField(String),
    /// A field path could not be parsed.
    InvalidPath(String),
    /// Comparison operands have incompatible types.
    TypeMismatch {
        /// Operator name
        operator: &'static str,
        /// Type of the left operand
        lhs: &'static str,
        /// Type of the right operand
        rhs: &'static str,
    },
    /// A value of this type cannot be compared.
    InvalidOperand(&'static str),
    /// A quantifier source resolved to a value of this non-array type.
    NotAnArray(&'static str),
    /// A field read a slot with no binding.
    UnboundSlot(Slot),
    /// The expression is valid but cannot be evaluated.
    Unsupported(&'static str),
    /// Evaluation recursed deeper than the configured limit.
    DepthExceeded(usize),
    /// Evaluation ran past its time budget.
    DeadlineExceeded,
}

impl Error for MatchError {}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(msg) => write!(f, "Invalid document: {msg}"),
            Self::MissingField(path) => write!(f, "No such field: {path}"),
            Self::InvalidPath(path) => write!(f, "Invalid field path: {path}"),
            Self::TypeMismatch { operator, lhs, rhs } => write!(
                f,
                "Cannot apply `{operator}` to {lhs} and {rhs}"
            ),
            Self::InvalidOperand(kind) => {
                write!(f, "A value of type {kind} cannot be compared")
            }
            Self::NotAnArray(kind) => {
                write!(f, "Quantifier source is {kind}, expected array")
            }
            Self::UnboundSlot(slot) => write!(f, "Slot {slot} is not bound"),
            Self::Unsupported(what) => write!(f, "Unsupported: {what}"),
            Self::DepthExceeded(limit) => {
                write!(f, "Evaluation exceeded depth limit of {limit}")
            }
            Self::DeadlineExceeded => {
                write!(f, "Evaluation time budget exceeded")
            }
        }
    }
}
