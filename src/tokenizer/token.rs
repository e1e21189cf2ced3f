//! # JSON Token
//!
//! Defines the token classes produced by lexing a JSON document byte
//! sequence, and the token itself: a class plus the verbatim source span.
use serde::Serialize;
use std::fmt::Display;

/// Classifies a lexed span of a JSON document.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TokenType {
    /* Reserved */
    /// The bytes at the cursor could not be lexed
    Unknown,

    /// End of input. Returned forever once reached.
    End,

    /* Values */
    /// String without escapes or raw control/extended bytes
    String,

    /// String that needs unescaping before use
    EscapeString,

    /// Number with a fraction and/or an exponent
    Number,

    /// Number with neither a fraction nor an exponent
    Integer,

    /* Delimiters */
    /// Opening curly brace
    ObjectStart,

    /// Closing curly brace
    ObjectEnd,

    /// Colon character
    ObjectKeyDelim,

    /// Opening square bracket
    ArrayStart,

    /// Closing square bracket
    ArrayEnd,

    /// Comma character
    ListDelim,

    /* Literals */
    /// `true`
    True,

    /// `false`
    False,

    /// `null`
    Null,
}

impl TokenType {
    /// Returns whether this token carries a scalar value.
    #[must_use]
    pub const fn is_value(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::EscapeString
                | Self::Number
                | Self::Integer
                | Self::True
                | Self::False
                | Self::Null
        )
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::End => "end",
            Self::String => "string",
            Self::EscapeString => "escape-string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::ObjectStart => "object-start",
            Self::ObjectEnd => "object-end",
            Self::ObjectKeyDelim => "object-key-delim",
            Self::ArrayStart => "array-start",
            Self::ArrayEnd => "array-end",
            Self::ListDelim => "list-delim",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        };
        write!(f, "{name}")
    }
}

/// A lexed token: its class and the exact bytes it was lexed from, quotes,
/// sign and exponent included. The bytes borrow from the tokenizer's input.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'a> {
    /// Token class
    pub kind: TokenType,
    /// Verbatim source span
    pub raw: &'a [u8],
}

impl<'a> Token<'a> {
    /// Creates a token of the given class over `raw`.
    #[must_use]
    pub const fn new(kind: TokenType, raw: &'a [u8]) -> Self {
        Self { kind, raw }
    }

    /// The end-of-input token.
    #[must_use]
    pub const fn end() -> Self {
        Self { kind: TokenType::End, raw: &[] }
    }

    /// Returns the raw span as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'a, str> {
        String::from_utf8_lossy(self.raw)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.text())
    }
}
