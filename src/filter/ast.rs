/*!
# Filter Expression AST

Defines the compiled form of a filter: a closed set of immutable expression
nodes. Nodes hold data only; every evaluation rule lives in
[`crate::matcher`].

# Examples

Expressions can be built with the constructor helpers:

```
use jsonsm::filter::Expression;
let expr = Expression::not(Expression::greater_equal(
    Expression::field(0, "age"),
    Expression::value(10),
));
assert_eq!(
    expr.to_string(),
    r#"["not",["greaterequal",["field","age"],["value",10]]]"#
);
```

or parsed from the JSON-array wire form:

```
use jsonsm::filter::Expression;
let expr: Expression = r#"["equals", ["field", "name"], ["value", "mike"]]"#
    .parse()
    .expect("valid filter");
assert_eq!(
    expr,
    Expression::equals(Expression::field(0, "name"), Expression::value("mike"))
);
```
*/
use std::{fmt::Display, str::FromStr};

use super::{FilterParseError, parse_filter_str};

/// Index of a binding cell. Slot `0` always holds the document root;
/// quantifiers bind their elements to nonzero slots.
pub type Slot = usize;

/// The slot bound to the document root.
pub const ROOT_SLOT: Slot = 0;

/// A constant carried by [`Expression::Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String constant
    String(String),
    /// Integral number constant
    Integer(i64),
    /// Non-integral number constant
    Float(f64),
    /// Boolean constant
    Boolean(bool),
    /// `null`
    Null,
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => {
                write!(f, "{}", serde_json::Value::from(s.as_str()))
            }
            Self::Integer(n) => write!(f, "{n}"),
            // NOTE: `serde_json::Number` keeps the fraction (`10.0`), so the
            // rendered literal parses back as a float.
            Self::Float(n) => match serde_json::Number::from_f64(*n) {
                Some(number) => write!(f, "{number}"),
                None => write!(f, "null"),
            },
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A compiled filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant true
    True,
    /// Constant false
    False,
    /// True iff non-empty and every child is true
    And(Vec<Self>),
    /// True iff any child is true
    Or(Vec<Self>),
    /// Negation
    Not(Box<Self>),
    /// Same-type equality
    Equals(Box<Self>, Box<Self>),
    /// Same-type strict ordering, `lhs < rhs`
    LessThan(Box<Self>, Box<Self>),
    /// Same-type ordering, `lhs >= rhs`
    GreaterEqual(Box<Self>, Box<Self>),
    /// Projection of the value bound at `root`, through `path`
    Field {
        /// Binding slot the path starts from
        root: Slot,
        /// Dotted/indexed path, empty for the bound value itself
        path: String,
    },
    /// Literal constant
    Value(Literal),
    /// Existential quantifier over an array
    AnyIn {
        /// Slot each element is bound to
        slot: Slot,
        /// Expression resolving to the iterated array
        source: Box<Self>,
        /// Predicate evaluated per element
        predicate: Box<Self>,
    },
    /// Universal quantifier over an array
    EveryIn {
        /// Slot each element is bound to
        slot: Slot,
        /// Expression resolving to the iterated array
        source: Box<Self>,
        /// Predicate evaluated per element
        predicate: Box<Self>,
    },
    /// Declared by the wire grammar but has no evaluation rule; the matcher
    /// rejects it.
    AnyEveryIn {
        /// Slot each element is bound to
        slot: Slot,
        /// Expression resolving to the iterated array
        source: Box<Self>,
        /// Predicate evaluated per element
        predicate: Box<Self>,
    },
}

impl Expression {
    /// Field projection from `root` through `path`.
    pub fn field<T: Into<String>>(root: Slot, path: T) -> Self {
        Self::Field { root, path: path.into() }
    }

    /// Literal constant.
    pub fn value<T: Into<Literal>>(value: T) -> Self {
        Self::Value(value.into())
    }

    /// `lhs == rhs`
    #[must_use]
    pub fn equals(lhs: Self, rhs: Self) -> Self {
        Self::Equals(Box::new(lhs), Box::new(rhs))
    }

    /// `lhs < rhs`
    #[must_use]
    pub fn less_than(lhs: Self, rhs: Self) -> Self {
        Self::LessThan(Box::new(lhs), Box::new(rhs))
    }

    /// `lhs >= rhs`
    #[must_use]
    pub fn greater_equal(lhs: Self, rhs: Self) -> Self {
        Self::GreaterEqual(Box::new(lhs), Box::new(rhs))
    }

    /// Negation of `expr`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    /// Conjunction of `children`.
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    /// Disjunction of `children`.
    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    /// True if `predicate` holds for some element of `source`.
    #[must_use]
    pub fn any_in(slot: Slot, source: Self, predicate: Self) -> Self {
        Self::AnyIn {
            slot,
            source: Box::new(source),
            predicate: Box::new(predicate),
        }
    }

    /// True if `predicate` holds for every element of `source`.
    #[must_use]
    pub fn every_in(slot: Slot, source: Self, predicate: Self) -> Self {
        Self::EveryIn {
            slot,
            source: Box::new(source),
            predicate: Box::new(predicate),
        }
    }

    /// An `anyeveryin` node, kept for wire compatibility.
    #[must_use]
    pub fn any_every_in(slot: Slot, source: Self, predicate: Self) -> Self {
        Self::AnyEveryIn {
            slot,
            source: Box::new(source),
            predicate: Box::new(predicate),
        }
    }

    /// Operator name used by the wire grammar.
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::Equals(..) => "equals",
            Self::LessThan(..) => "lessthan",
            Self::GreaterEqual(..) => "greaterequal",
            Self::Field { .. } => "field",
            Self::Value(_) => "value",
            Self::AnyIn { .. } => "anyin",
            Self::EveryIn { .. } => "everyin",
            Self::AnyEveryIn { .. } => "anyeveryin",
        }
    }

    /// Nesting depth of the expression tree; leaves have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::True | Self::False | Self::Field { .. } | Self::Value(_) => 1,
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => 1 + inner.depth(),
            Self::Equals(lhs, rhs)
            | Self::LessThan(lhs, rhs)
            | Self::GreaterEqual(lhs, rhs) => 1 + lhs.depth().max(rhs.depth()),
            Self::AnyIn { source, predicate, .. }
            | Self::EveryIn { source, predicate, .. }
            | Self::AnyEveryIn { source, predicate, .. } => {
                1 + source.depth().max(predicate.depth())
            }
        }
    }

    /// Highest slot referenced or bound anywhere in the tree.
    #[must_use]
    pub fn max_slot(&self) -> Slot {
        match self {
            Self::True | Self::False | Self::Value(_) => ROOT_SLOT,
            Self::Field { root, .. } => *root,
            Self::And(children) | Self::Or(children) => {
                children.iter().map(Self::max_slot).max().unwrap_or(ROOT_SLOT)
            }
            Self::Not(inner) => inner.max_slot(),
            Self::Equals(lhs, rhs)
            | Self::LessThan(lhs, rhs)
            | Self::GreaterEqual(lhs, rhs) => {
                lhs.max_slot().max(rhs.max_slot())
            }
            Self::AnyIn { slot, source, predicate }
            | Self::EveryIn { slot, source, predicate }
            | Self::AnyEveryIn { slot, source, predicate } => {
                (*slot).max(source.max_slot()).max(predicate.max_slot())
            }
        }
    }
}

/// Renders the compact JSON-array wire form accepted by
/// [`super::parse_filter`].
impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[\"{}\"", self.operator())?;
        match self {
            Self::True | Self::False => {}
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    write!(f, ",{child}")?;
                }
            }
            Self::Not(inner) => write!(f, ",{inner}")?,
            Self::Equals(lhs, rhs)
            | Self::LessThan(lhs, rhs)
            | Self::GreaterEqual(lhs, rhs) => write!(f, ",{lhs},{rhs}")?,
            Self::Field { root, path } => {
                // the root slot is implied when it is 0 and a path follows
                if *root != ROOT_SLOT || path.is_empty() {
                    write!(f, ",{root}")?;
                }
                if !path.is_empty() {
                    write!(f, ",{}", serde_json::Value::from(path.as_str()))?;
                }
            }
            Self::Value(literal) => write!(f, ",{literal}")?,
            Self::AnyIn { slot, source, predicate }
            | Self::EveryIn { slot, source, predicate }
            | Self::AnyEveryIn { slot, source, predicate } => {
                write!(f, ",{slot},{source},{predicate}")?;
            }
        }
        write!(f, "]")
    }
}

impl FromStr for Expression {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter_str(s)
    }
}
