//! Typed comparison operands.
//!
//! Both sides of a comparison resolve to an [`Operand`] before they are
//! compared. Operands of different coarse types never compare: that is an
//! evaluation error, not `false`.
use core::cmp::Ordering;
use serde_json_borrow::Value;

use crate::filter::Literal;
use crate::matcher::{MatchError, document};

/// A resolved comparison operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    /// String, compared byte-wise
    String(&'a str),
    /// Integral number
    Integer(i64),
    /// Non-integral number, or an integer outside the `i64` range
    Float(f64),
    /// Boolean, `false < true`
    Boolean(bool),
    /// `null`, equal only to itself
    Null,
}

/// The comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `lhs == rhs`
    Equals,
    /// `lhs < rhs`
    LessThan,
    /// `lhs >= rhs`
    GreaterEqual,
}

impl Comparison {
    /// Operator name used by the wire grammar.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::LessThan => "lessthan",
            Self::GreaterEqual => "greaterequal",
        }
    }

    const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equals => matches!(ordering, Ordering::Equal),
            Self::LessThan => matches!(ordering, Ordering::Less),
            Self::GreaterEqual => !matches!(ordering, Ordering::Less),
        }
    }
}

impl<'a> Operand<'a> {
    /// Convert a document value into an operand.
    ///
    /// # Errors
    ///
    /// Arrays and objects are never valid operands; arrays are only
    /// iterated by quantifiers.
    pub fn from_value<'d: 'a>(
        value: &'a Value<'d>,
    ) -> Result<Self, MatchError> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(*b),
            Value::Str(s) => Self::String(s),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Integer(i),
                (None, Some(f)) => Self::Float(f),
                (None, None) => {
                    let kind = document::kind(value);
                    return Err(MatchError::InvalidOperand(kind));
                }
            },
            Value::Array(_) | Value::Object(_) => {
                return Err(MatchError::InvalidOperand(document::kind(value)));
            }
        })
    }

    /// Borrow a filter literal as an operand.
    #[must_use]
    pub fn from_literal(literal: &'a Literal) -> Self {
        match literal {
            Literal::String(s) => Self::String(s),
            Literal::Integer(i) => Self::Integer(*i),
            Literal::Float(f) => Self::Float(*f),
            Literal::Boolean(b) => Self::Boolean(*b),
            Literal::Null => Self::Null,
        }
    }

    /// Name of the operand's type, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
        }
    }
}

/// Evaluate `lhs <op> rhs`.
///
/// Strings order byte-wise, numbers numerically (integers and floats
/// together), booleans `false < true`. `null` is its own type and compares
/// only against `null`.
///
/// # Errors
///
/// Returns [`MatchError::TypeMismatch`] when the operands have different
/// coarse types.
#[allow(clippy::cast_precision_loss)]
pub fn compare(
    op: Comparison,
    lhs: &Operand,
    rhs: &Operand,
) -> Result<bool, MatchError> {
    let mismatch = || MatchError::TypeMismatch {
        operator: op.name(),
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    };

    let ordering = match (lhs, rhs) {
        (Operand::String(a), Operand::String(b)) => {
            Some(a.as_bytes().cmp(b.as_bytes()))
        }
        (Operand::Integer(a), Operand::Integer(b)) => Some(a.cmp(b)),
        (Operand::Integer(a), Operand::Float(b)) => (*a as f64).partial_cmp(b),
        (Operand::Float(a), Operand::Integer(b)) => a.partial_cmp(&(*b as f64)),
        (Operand::Float(a), Operand::Float(b)) => a.partial_cmp(b),
        (Operand::Boolean(a), Operand::Boolean(b)) => Some(a.cmp(b)),
        (Operand::Null, Operand::Null) => Some(Ordering::Equal),
        _ => return Err(mismatch()),
    };

    // NaN never satisfies a comparison
    Ok(ordering.is_some_and(|ordering| op.holds(ordering)))
}
