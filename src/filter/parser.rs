/*!
# Filter Parser

Compiles the JSON-array wire form of a filter into an [`Expression`] tree.

A filter is an array whose first element names the operator and whose
remaining elements are its arguments, nested recursively:

| Operator | Arguments |
|---|---|
| `equals`, `lessthan`, `greaterequal` | `lhs`, `rhs` |
| `and`, `or` | any number of sub-expressions |
| `not` | one sub-expression |
| `field` | optional integer slot (default 0), then path segments |
| `value` | one JSON scalar |
| `anyin`, `everyin`, `anyeveryin` | integer slot, source, predicate |
| `true`, `false` | none |

Path segments of a `field` are concatenated verbatim into one path string.

## Examples

```rust
use jsonsm::filter::{Expression, parser};
let expr = parser::parse_filter(br#"["not", ["field", "active"]]"#)
    .expect("valid filter");
assert_eq!(expr, Expression::not(Expression::field(0, "active")));
```

## Errors

Malformed filters are rejected before anything is evaluated:

```rust
use jsonsm::filter::parser::{self, FilterParseError};

let result = parser::parse_filter(br#"["between", 1, 2]"#);
assert!(matches!(result, Err(FilterParseError::UnknownOperator(_))));
```
*/
use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::filter::{Expression, Literal, ROOT_SLOT, Slot};

/// Maximum nesting depth of a filter. Deeper filters are rejected at compile
/// time so evaluation recursion stays bounded.
pub const MAX_FILTER_DEPTH: usize = 64;

/// Highest slot id a filter may name. Every quantifier adds a nesting level,
/// so a filter within [`MAX_FILTER_DEPTH`] never needs more distinct slots.
pub const MAX_SLOT: Slot = MAX_FILTER_DEPTH;

/// Represents errors that can occur while compiling a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    /// The filter bytes are not well-formed JSON.
    InvalidJson(String),
    /// An expression was expected, but this JSON value is not a non-empty
    /// array headed by an operator name.
    ExpectedExpression(String),
    /// The operator name is not part of the grammar.
    UnknownOperator(String),
    /// The operator got the wrong number of arguments.
    Arity {
        /// Operator name
        operator: &'static str,
        /// Human-readable expected count
        expected: &'static str,
        /// Number of arguments found
        found: usize,
    },
    /// An argument has the wrong JSON type or value.
    InvalidArgument {
        /// Operator name
        operator: &'static str,
        /// What went wrong
        reason: String,
    },
    /// The filter nests deeper than [`MAX_FILTER_DEPTH`].
    TooDeep(usize),
}

impl Error for FilterParseError {}

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "Invalid filter JSON: {msg}"),
            Self::ExpectedExpression(found) => {
                write!(f, "Expected an expression array, got: {found}")
            }
            Self::UnknownOperator(op) => write!(f, "Unknown operator: {op}"),
            Self::Arity { operator, expected, found } => write!(
                f,
                "Operator `{operator}` takes {expected} argument(s), \
                 got {found}"
            ),
            Self::InvalidArgument { operator, reason } => {
                write!(f, "Invalid argument to `{operator}`: {reason}")
            }
            Self::TooDeep(limit) => {
                write!(f, "Filter nests deeper than {limit} levels")
            }
        }
    }
}

/// Parse the JSON-array wire form of a filter into an [`Expression`].
///
/// # Errors
///
/// Returns a [`FilterParseError`] describing how the compilation failed.
pub fn parse_filter(input: &[u8]) -> Result<Expression, FilterParseError> {
    let json: Value = serde_json::from_slice(input)
        .map_err(|e| FilterParseError::InvalidJson(e.to_string()))?;
    parse_filter_value(&json)
}

/// Parse a filter given as text. See [`parse_filter`].
///
/// # Errors
///
/// Returns a [`FilterParseError`] describing how the compilation failed.
pub fn parse_filter_str(input: &str) -> Result<Expression, FilterParseError> {
    parse_filter(input.as_bytes())
}

/// Compile an already-parsed JSON value into an [`Expression`].
///
/// # Errors
///
/// Returns a [`FilterParseError`] describing how the compilation failed.
pub fn parse_filter_value(
    json: &Value,
) -> Result<Expression, FilterParseError> {
    let expression = parse_expression(json, 1)?;

    #[cfg(test)]
    println!("Compiled filter:\n{expression:?}");

    Ok(expression)
}

/// Parse one `[op, ...args]` array at nesting level `depth`.
fn parse_expression(
    json: &Value,
    depth: usize,
) -> Result<Expression, FilterParseError> {
    if depth > MAX_FILTER_DEPTH {
        return Err(FilterParseError::TooDeep(MAX_FILTER_DEPTH));
    }

    let Some((head, args)) = json.as_array().and_then(|a| a.split_first())
    else {
        return Err(FilterParseError::ExpectedExpression(json.to_string()));
    };
    let Some(op) = head.as_str() else {
        return Err(FilterParseError::ExpectedExpression(json.to_string()));
    };

    let child = |arg: &Value| parse_expression(arg, depth + 1);

    match op {
        "true" => {
            expect_arity("true", args, 0)?;
            Ok(Expression::True)
        }
        "false" => {
            expect_arity("false", args, 0)?;
            Ok(Expression::False)
        }
        "and" => Ok(Expression::And(
            args.iter().map(child).collect::<Result<Vec<_>, _>>()?,
        )),
        "or" => Ok(Expression::Or(
            args.iter().map(child).collect::<Result<Vec<_>, _>>()?,
        )),
        "not" => {
            expect_arity("not", args, 1)?;
            Ok(Expression::not(child(&args[0])?))
        }
        "equals" => {
            expect_arity("equals", args, 2)?;
            Ok(Expression::equals(child(&args[0])?, child(&args[1])?))
        }
        "lessthan" => {
            expect_arity("lessthan", args, 2)?;
            Ok(Expression::less_than(child(&args[0])?, child(&args[1])?))
        }
        "greaterequal" => {
            expect_arity("greaterequal", args, 2)?;
            Ok(Expression::greater_equal(child(&args[0])?, child(&args[1])?))
        }
        "field" => parse_field(args),
        "value" => {
            expect_arity("value", args, 1)?;
            Ok(Expression::Value(parse_literal(&args[0])?))
        }
        "anyin" => {
            let (slot, source, predicate) = parse_quantifier("anyin", args)?;
            Ok(Expression::any_in(slot, child(source)?, child(predicate)?))
        }
        "everyin" => {
            let (slot, source, predicate) = parse_quantifier("everyin", args)?;
            Ok(Expression::every_in(slot, child(source)?, child(predicate)?))
        }
        "anyeveryin" => {
            let (slot, source, predicate) =
                parse_quantifier("anyeveryin", args)?;
            Ok(Expression::any_every_in(
                slot,
                child(source)?,
                child(predicate)?,
            ))
        }
        _ => Err(FilterParseError::UnknownOperator(op.to_string())),
    }
}

/// Check that `operator` got exactly `expected` arguments.
fn expect_arity(
    operator: &'static str,
    args: &[Value],
    expected: usize,
) -> Result<(), FilterParseError> {
    if args.len() == expected {
        return Ok(());
    }
    let expected = match expected {
        0 => "no",
        1 => "exactly 1",
        2 => "exactly 2",
        _ => "exactly 3",
    };
    Err(FilterParseError::Arity { operator, expected, found: args.len() })
}

/// Parse an integer slot id in `0..=MAX_SLOT`.
fn parse_slot(
    operator: &'static str,
    json: &Value,
) -> Result<Slot, FilterParseError> {
    json.as_u64()
        .and_then(|n| Slot::try_from(n).ok())
        .filter(|&slot| slot <= MAX_SLOT)
        .ok_or_else(|| FilterParseError::InvalidArgument {
            operator,
            reason: format!("expected a slot id, got {json}"),
        })
}

/// Parse `field` arguments: an optional leading slot, then path segments.
fn parse_field(args: &[Value]) -> Result<Expression, FilterParseError> {
    if args.is_empty() {
        return Err(FilterParseError::Arity {
            operator: "field",
            expected: "at least 1",
            found: 0,
        });
    }

    let (root, segments) = match args.split_first() {
        Some((first, rest)) if first.is_number() => {
            (parse_slot("field", first)?, rest)
        }
        _ => (ROOT_SLOT, args),
    };

    let mut path = String::new();
    for segment in segments {
        let Some(segment) = segment.as_str() else {
            return Err(FilterParseError::InvalidArgument {
                operator: "field",
                reason: format!("expected a path segment, got {segment}"),
            });
        };
        path.push_str(segment);
    }

    Ok(Expression::Field { root, path })
}

/// Parse a literal JSON scalar for `value`.
fn parse_literal(json: &Value) -> Result<Literal, FilterParseError> {
    match json {
        Value::Null => Ok(Literal::Null),
        Value::Bool(b) => Ok(Literal::Boolean(*b)),
        Value::String(s) => Ok(Literal::String(s.clone())),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Literal::Integer(i)),
            (None, Some(f)) => Ok(Literal::Float(f)),
            (None, None) => Err(FilterParseError::InvalidArgument {
                operator: "value",
                reason: format!("unrepresentable number {n}"),
            }),
        },
        Value::Array(_) | Value::Object(_) => {
            Err(FilterParseError::InvalidArgument {
                operator: "value",
                reason: format!("expected a scalar, got {json}"),
            })
        }
    }
}

/// Parse `[slot, source, predicate]` quantifier arguments. The slot must not
/// shadow the document root.
fn parse_quantifier<'a>(
    operator: &'static str,
    args: &'a [Value],
) -> Result<(Slot, &'a Value, &'a Value), FilterParseError> {
    expect_arity(operator, args, 3)?;
    let slot = parse_slot(operator, &args[0])?;
    if slot == ROOT_SLOT {
        return Err(FilterParseError::InvalidArgument {
            operator,
            reason: "slot 0 is reserved for the document root".to_string(),
        });
    }
    Ok((slot, &args[1], &args[2]))
}
