/*!
# Document Model

Parses document bytes into a navigable JSON tree and resolves field paths
against it. Documents are parsed with [`serde_json_borrow`], so strings
without escapes borrow from the input instead of being copied.

Paths are a sequence of segments:
- `name` or `.name` selects an object member,
- `[3]` selects an array element,
- `['na.me']` or `["na.me"]` selects a member whose name needs quoting.

A segment that does not exist is an error, which keeps "not found" distinct
from a member that is present with a `null` value.
*/
use serde_json_borrow::Value;

use crate::matcher::MatchError;

/// Parse UTF-8 JSON bytes into a document tree.
///
/// # Errors
///
/// Returns [`MatchError::Document`] on malformed input.
pub fn parse_document(bytes: &[u8]) -> Result<Value<'_>, MatchError> {
    serde_json::from_slice(bytes)
        .map_err(|e| MatchError::Document(e.to_string()))
}

/// Name of the JSON type of `value`, for error messages.
#[must_use]
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Str(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One step of a field path.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Segment<'p> {
    /// Object member
    Key(&'p str),
    /// Array element
    Index(usize),
}

/// Split the next segment off the front of a non-empty `path`.
fn next_segment(path: &str) -> Result<(Segment<'_>, &str), MatchError> {
    let invalid = || MatchError::InvalidPath(path.to_string());

    if let Some(bracketed) = path.strip_prefix('[') {
        if let Some(quote @ ('\'' | '"')) = bracketed.chars().next() {
            let quoted = &bracketed[1..];
            let end = quoted.find(quote).ok_or_else(invalid)?;
            let rest = quoted[end + 1..].strip_prefix(']').ok_or_else(invalid)?;
            return Ok((Segment::Key(&quoted[..end]), rest));
        }
        let end = bracketed.find(']').ok_or_else(invalid)?;
        let index = bracketed[..end].parse::<usize>().map_err(|_| invalid())?;
        return Ok((Segment::Index(index), &bracketed[end + 1..]));
    }

    let name = path.strip_prefix('.').unwrap_or(path);
    let end = name.find(['.', '[']).unwrap_or(name.len());
    if end == 0 {
        return Err(invalid());
    }
    Ok((Segment::Key(&name[..end]), &name[end..]))
}

/// Resolve `path` starting from `value`. An empty path resolves to `value`
/// itself.
///
/// # Errors
///
/// Returns [`MatchError::MissingField`] when a segment does not exist, and
/// [`MatchError::InvalidPath`] when the path is malformed.
pub fn resolve<'v, 'd>(
    value: &'v Value<'d>,
    path: &str,
) -> Result<&'v Value<'d>, MatchError> {
    let mut current = value;
    let mut rest = path;

    while !rest.is_empty() {
        let (segment, tail) = next_segment(rest)?;
        let next = match (segment, current) {
            (Segment::Key(key), Value::Object(members)) => members.get(key),
            (Segment::Index(index), Value::Array(items)) => items.get(index),
            _ => None,
        };
        current =
            next.ok_or_else(|| MatchError::MissingField(path.to_string()))?;
        rest = tail;
    }

    Ok(current)
}
