//! # JSON Lexer
//!
//! A restartable, byte-level lexer that classifies an input JSON document
//! into typed tokens one [`Tokenizer::step`] at a time, without building a
//! tree. The cursor can be read with [`Tokenizer::position`] and rewound with
//! [`Tokenizer::seek`]; lexing from a given position is deterministic.
use crate::tokenizer::{Token, TokenType};

/// Lexer state while a single token is being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Nothing consumed yet
    BeginValue,
    /// Inside a string, after the opening quote
    InString,
    /// After a backslash inside a string
    InStringEscape,
    /// Inside a `\u` escape, with this many hex digits seen
    InStringUnicode(u8),
    /// After a leading minus sign
    Negative,
    /// After a leading `0`
    Zero,
    /// Inside an integer part starting with `1`-`9`
    Digits,
    /// After the decimal point
    Dot,
    /// Inside the fraction digits
    Fraction,
    /// After `e`/`E`
    Exponent,
    /// After the exponent sign
    ExponentSign,
    /// Inside the exponent digits
    ExponentDigits,
    /// Matching one of `true`/`false`/`null`, `matched` bytes in
    Keyword {
        literal: &'static [u8],
        matched: usize,
        kind: TokenType,
    },
}

impl LexState {
    const fn keyword(literal: &'static [u8], kind: TokenType) -> Self {
        Self::Keyword { literal, matched: 1, kind }
    }

    /// Returns whether end of input can terminate a token in this state.
    const fn accepts_end(self) -> bool {
        matches!(
            self,
            Self::Zero | Self::Digits | Self::Fraction | Self::ExponentDigits
        )
    }
}

/// A tokenizer over an immutable byte buffer.
///
/// ```
/// use jsonsm::tokenizer::{Tokenizer, TokenType};
///
/// let mut tokenizer = Tokenizer::new(br#"{"a": 1.5}"#);
/// assert_eq!(tokenizer.step().kind, TokenType::ObjectStart);
/// let key = tokenizer.step();
/// assert_eq!((key.kind, key.raw), (TokenType::String, &br#""a""#[..]));
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    /// The input sequence of bytes to tokenize
    input: &'a [u8],
    /// Index of the next unconsumed byte
    position: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the cursor: the index of the next byte to be lexed.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `position`, typically one previously returned by
    /// [`Tokenizer::position`]. Positions past the end of input yield
    /// [`TokenType::End`].
    pub const fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Rebinds the tokenizer to a new buffer, at position 0.
    pub const fn reset(&mut self, input: &'a [u8]) {
        self.input = input;
        self.position = 0;
    }

    /// Consume whitespace byte(s) starting from the current position.
    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') =
            self.input.get(self.position).copied()
        {
            self.position += 1;
        }
    }

    /// Builds the token spanning `start` to the cursor.
    fn emit(&self, kind: TokenType, start: usize) -> Token<'a> {
        Token::new(kind, &self.input[start..self.position])
    }

    /// Finalizes a number after reading one byte past its end. That byte is
    /// not part of the number, so the cursor goes back over it.
    fn finish_number(&mut self, start: usize, non_integer: bool) -> Token<'a> {
        self.position -= 1;
        self.emit(number_kind(non_integer), start)
    }

    /// Lexes exactly one token from the cursor, skipping leading whitespace,
    /// and advances past it.
    ///
    /// A failed lex returns [`TokenType::Unknown`] with the bytes consumed so
    /// far, always at least one, so repeated calls reach [`TokenType::End`].
    pub fn step(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let start = self.position;
        if start >= self.input.len() {
            return Token::end();
        }

        let mut state = LexState::BeginValue;
        let mut has_escapes = false;
        let mut non_integer = false;

        loop {
            let Some(&byte) = self.input.get(self.position) else {
                let kind = if state.accepts_end() {
                    number_kind(non_integer)
                } else {
                    TokenType::Unknown
                };
                return self.emit(kind, start);
            };
            self.position += 1;

            state = match state {
                LexState::BeginValue => match byte {
                    b'{' => return self.emit(TokenType::ObjectStart, start),
                    b'}' => return self.emit(TokenType::ObjectEnd, start),
                    b':' => return self.emit(TokenType::ObjectKeyDelim, start),
                    b'[' => return self.emit(TokenType::ArrayStart, start),
                    b']' => return self.emit(TokenType::ArrayEnd, start),
                    b',' => return self.emit(TokenType::ListDelim, start),
                    b'"' => LexState::InString,
                    b'-' => LexState::Negative,
                    b'0' => LexState::Zero,
                    b'1'..=b'9' => LexState::Digits,
                    b't' => LexState::keyword(b"true", TokenType::True),
                    b'f' => LexState::keyword(b"false", TokenType::False),
                    b'n' => LexState::keyword(b"null", TokenType::Null),
                    _ => return self.emit(TokenType::Unknown, start),
                },

                LexState::InString => match byte {
                    b'"' => {
                        let kind = if has_escapes {
                            TokenType::EscapeString
                        } else {
                            TokenType::String
                        };
                        return self.emit(kind, start);
                    }
                    b'\\' => LexState::InStringEscape,
                    // raw control or non-ASCII bytes
                    0x00..=0x1f | 0x7f..=0xff => {
                        has_escapes = true;
                        LexState::InString
                    }
                    _ => LexState::InString,
                },

                LexState::InStringEscape => {
                    has_escapes = true;
                    match byte {
                        b'b' | b'f' | b'n' | b'r' | b't' | b'\\' | b'/'
                        | b'"' => LexState::InString,
                        b'u' => LexState::InStringUnicode(0),
                        _ => return self.emit(TokenType::Unknown, start),
                    }
                }

                LexState::InStringUnicode(seen) => {
                    if !byte.is_ascii_hexdigit() {
                        return self.emit(TokenType::Unknown, start);
                    }
                    if seen == 3 {
                        LexState::InString
                    } else {
                        LexState::InStringUnicode(seen + 1)
                    }
                }

                LexState::Negative => match byte {
                    b'0' => LexState::Zero,
                    b'1'..=b'9' => LexState::Digits,
                    _ => return self.emit(TokenType::Unknown, start),
                },

                LexState::Zero | LexState::Digits => match byte {
                    b'0'..=b'9' if state == LexState::Digits => state,
                    b'.' => LexState::Dot,
                    b'e' | b'E' => LexState::Exponent,
                    _ => return self.finish_number(start, non_integer),
                },

                LexState::Dot => {
                    non_integer = true;
                    match byte {
                        b'0'..=b'9' => LexState::Fraction,
                        _ => return self.emit(TokenType::Unknown, start),
                    }
                }

                LexState::Fraction => match byte {
                    b'0'..=b'9' => LexState::Fraction,
                    b'e' | b'E' => LexState::Exponent,
                    _ => return self.finish_number(start, non_integer),
                },

                LexState::Exponent => {
                    non_integer = true;
                    match byte {
                        b'+' | b'-' => LexState::ExponentSign,
                        b'0'..=b'9' => LexState::ExponentDigits,
                        _ => return self.emit(TokenType::Unknown, start),
                    }
                }

                LexState::ExponentSign => match byte {
                    b'0'..=b'9' => LexState::ExponentDigits,
                    _ => return self.emit(TokenType::Unknown, start),
                },

                LexState::ExponentDigits => match byte {
                    b'0'..=b'9' => LexState::ExponentDigits,
                    _ => return self.finish_number(start, non_integer),
                },

                LexState::Keyword { literal, matched, kind } => {
                    if byte != literal[matched] {
                        return self.emit(TokenType::Unknown, start);
                    }
                    if matched + 1 == literal.len() {
                        return self.emit(kind, start);
                    }
                    LexState::Keyword { literal, matched: matched + 1, kind }
                }
            };
        }
    }
}

/// Class of a finished number token.
const fn number_kind(non_integer: bool) -> TokenType {
    if non_integer {
        TokenType::Number
    } else {
        TokenType::Integer
    }
}

/// Yields tokens until end of input. [`TokenType::End`] itself is not
/// yielded.
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.step();
        (token.kind != TokenType::End).then_some(token)
    }
}

/// Tokenize a whole JSON document, returning every token including the
/// trailing [`TokenType::End`].
#[must_use]
pub fn tokenize(text: &[u8]) -> Vec<Token<'_>> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens: Vec<Token> = vec![];

    loop {
        let token = tokenizer.step();
        let is_end = token.kind == TokenType::End;

        tokens.push(token);

        if is_end {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Steps once and checks both the class and the verbatim span.
    fn expect_step(tokenizer: &mut Tokenizer, kind: TokenType, raw: &str) {
        let token = tokenizer.step();
        assert_eq!(token.kind, kind, "unexpected class for {token}");
        assert_eq!(token.raw, raw.as_bytes(), "unexpected span for {token}");
    }

    /// Checks `text` lexes to a single token, alone and padded with
    /// whitespace on either side.
    fn expect_single(text: &str, kind: TokenType) {
        let padding = "  \t  \n \r";
        for input in [
            text.to_string(),
            format!("{padding}{text}"),
            format!("{text}{padding}"),
        ] {
            let mut tokenizer = Tokenizer::new(input.as_bytes());
            expect_step(&mut tokenizer, kind, text);
            expect_step(&mut tokenizer, TokenType::End, "");
        }
    }

    #[test]
    fn empty() {
        let tokens = tokenize(b"");
        assert_eq!(tokens, vec![Token::end()]);
    }

    #[test]
    fn whitespace_only() {
        let tokens = tokenize(b" \t\r\n ");
        assert_eq!(tokens, vec![Token::end()]);
    }

    #[test]
    fn object() {
        let json = r#"{ "a": "5b47eb0936ff92a567a0307e", "b": false }"#;
        let mut tokenizer = Tokenizer::new(json.as_bytes());

        expect_step(&mut tokenizer, TokenType::ObjectStart, "{");
        expect_step(&mut tokenizer, TokenType::String, r#""a""#);
        expect_step(&mut tokenizer, TokenType::ObjectKeyDelim, ":");
        expect_step(
            &mut tokenizer,
            TokenType::String,
            r#""5b47eb0936ff92a567a0307e""#,
        );
        expect_step(&mut tokenizer, TokenType::ListDelim, ",");
        expect_step(&mut tokenizer, TokenType::String, r#""b""#);
        expect_step(&mut tokenizer, TokenType::ObjectKeyDelim, ":");
        expect_step(&mut tokenizer, TokenType::False, "false");
        expect_step(&mut tokenizer, TokenType::ObjectEnd, "}");
        expect_step(&mut tokenizer, TokenType::End, "");
    }

    #[test]
    fn array() {
        let json = "[1, 2999.22, null, \"hello\u{2932}world\" ]";
        let mut tokenizer = Tokenizer::new(json.as_bytes());

        expect_step(&mut tokenizer, TokenType::ArrayStart, "[");
        expect_step(&mut tokenizer, TokenType::Integer, "1");
        expect_step(&mut tokenizer, TokenType::ListDelim, ",");
        expect_step(&mut tokenizer, TokenType::Number, "2999.22");
        expect_step(&mut tokenizer, TokenType::ListDelim, ",");
        expect_step(&mut tokenizer, TokenType::Null, "null");
        expect_step(&mut tokenizer, TokenType::ListDelim, ",");
        expect_step(
            &mut tokenizer,
            TokenType::EscapeString,
            "\"hello\u{2932}world\"",
        );
        expect_step(&mut tokenizer, TokenType::ArrayEnd, "]");
        expect_step(&mut tokenizer, TokenType::End, "");
    }

    #[test]
    fn seek_replays_token() {
        let json = r#"{ "a": "5b47eb0936ff92a567a0307e", "b": false }"#;
        let mut tokenizer = Tokenizer::new(json.as_bytes());

        expect_step(&mut tokenizer, TokenType::ObjectStart, "{");
        expect_step(&mut tokenizer, TokenType::String, r#""a""#);

        let position = tokenizer.position();
        expect_step(&mut tokenizer, TokenType::ObjectKeyDelim, ":");

        tokenizer.seek(position);
        expect_step(&mut tokenizer, TokenType::ObjectKeyDelim, ":");
        expect_step(
            &mut tokenizer,
            TokenType::String,
            r#""5b47eb0936ff92a567a0307e""#,
        );
    }

    #[test]
    fn seek_replays_every_position() {
        let json = br#"[-12.5e3, {"k\n": [true, null]}, 0, "x"]"#;
        let mut tokenizer = Tokenizer::new(json);
        let mut observed = vec![];
        loop {
            let position = tokenizer.position();
            let token = tokenizer.step();
            observed.push((position, token));
            if token.kind == TokenType::End {
                break;
            }
        }

        for (position, token) in observed.into_iter().rev() {
            tokenizer.seek(position);
            assert_eq!(tokenizer.step(), token);
        }
    }

    #[test]
    fn ends_forever() {
        let mut tokenizer = Tokenizer::new(br#""hello world""#);
        expect_step(&mut tokenizer, TokenType::String, r#""hello world""#);
        expect_step(&mut tokenizer, TokenType::End, "");
        expect_step(&mut tokenizer, TokenType::End, "");
        expect_step(&mut tokenizer, TokenType::End, "");
    }

    #[test]
    fn reset_rebinds_buffer() {
        let mut tokenizer = Tokenizer::new(b"true");
        expect_step(&mut tokenizer, TokenType::True, "true");
        expect_step(&mut tokenizer, TokenType::End, "");

        tokenizer.reset(b"[null]");
        assert_eq!(tokenizer.position(), 0);
        expect_step(&mut tokenizer, TokenType::ArrayStart, "[");
        expect_step(&mut tokenizer, TokenType::Null, "null");
    }

    #[test]
    fn strings() {
        expect_single(r#""lol""#, TokenType::String);
        expect_single(r#""""#, TokenType::String);
        expect_single("\"l\nol\"", TokenType::EscapeString);
        expect_single("\"l\u{2321}ol\"", TokenType::EscapeString);
        expect_single(r#""l\u2321ol""#, TokenType::EscapeString);
        expect_single(r#""a\"b""#, TokenType::EscapeString);
    }

    #[test]
    fn escape_sequences() {
        let cases = [
            r#""Test \"quoted\" text""#,
            r#""Backslash: \\""#,
            r#""Forward slash: \/""#,
            r#""Backspace: \b""#,
            r#""Form feed: \f""#,
            r#""Newline: \n""#,
            r#""Carriage return: \r""#,
            r#""Tab: \t""#,
            r#""Unicode: \u0041\u0042\u00aF""#,
            r#""Mixed: \"\\\n\t\u0020""#,
        ];

        for input in &cases {
            let tokens = tokenize(input.as_bytes());
            assert_eq!(
                tokens,
                vec![
                    Token::new(TokenType::EscapeString, input.as_bytes()),
                    Token::end()
                ]
            );
        }
    }

    #[test]
    fn invalid_escapes() {
        for input in [r#""\x""#, r#""\u12G4""#, r#""\u12""#, r#""abc"#] {
            let mut tokenizer = Tokenizer::new(input.as_bytes());
            assert_eq!(tokenizer.step().kind, TokenType::Unknown, "{input}");
        }
    }

    #[test]
    fn integers() {
        expect_single("0", TokenType::Integer);
        expect_single("-0", TokenType::Integer);
        expect_single("123", TokenType::Integer);
        expect_single("-123", TokenType::Integer);
        expect_single("4565464651846548", TokenType::Integer);
    }

    #[test]
    fn numbers() {
        expect_single("0.1", TokenType::Number);
        expect_single("1999.1", TokenType::Number);
        expect_single("14.29438383", TokenType::Number);
        expect_single("1.0E+2", TokenType::Number);
        expect_single("1.9e+22", TokenType::Number);
        expect_single("0.001e-10", TokenType::Number);
        expect_single("5E3", TokenType::Number);
    }

    #[test]
    fn number_rewinds_terminator() {
        let mut tokenizer = Tokenizer::new(b"12,3.5]7e1}");
        expect_step(&mut tokenizer, TokenType::Integer, "12");
        assert_eq!(tokenizer.position(), 2);
        expect_step(&mut tokenizer, TokenType::ListDelim, ",");
        expect_step(&mut tokenizer, TokenType::Number, "3.5");
        expect_step(&mut tokenizer, TokenType::ArrayEnd, "]");
        expect_step(&mut tokenizer, TokenType::Number, "7e1");
        expect_step(&mut tokenizer, TokenType::ObjectEnd, "}");
        expect_step(&mut tokenizer, TokenType::End, "");
    }

    #[test]
    fn leading_zero_stops_number() {
        let mut tokenizer = Tokenizer::new(b"01");
        expect_step(&mut tokenizer, TokenType::Integer, "0");
        expect_step(&mut tokenizer, TokenType::Integer, "1");
    }

    #[test]
    fn truncated_numbers() {
        for input in ["-", "1.", "1e", "1e+", "-x", "1.e5"] {
            let mut tokenizer = Tokenizer::new(input.as_bytes());
            assert_eq!(tokenizer.step().kind, TokenType::Unknown, "{input}");
        }
    }

    #[test]
    fn literals() {
        expect_single("true", TokenType::True);
        expect_single("false", TokenType::False);
        expect_single("null", TokenType::Null);
    }

    #[test]
    fn misspelled_literals() {
        for input in ["tru", "trux", "fals", "nul", "nill", "x"] {
            let mut tokenizer = Tokenizer::new(input.as_bytes());
            assert_eq!(tokenizer.step().kind, TokenType::Unknown, "{input}");
        }
    }

    #[test]
    fn unknown_always_progresses() {
        let input = b"@@ tru [ \"\\q\" 1.";
        let mut tokenizer = Tokenizer::new(input);
        let mut steps = 0;
        while tokenizer.step().kind != TokenType::End {
            steps += 1;
            assert!(steps <= input.len(), "tokenizer did not progress");
        }
    }

    #[test]
    fn iterator_stops_before_end() {
        let kinds: Vec<TokenType> =
            Tokenizer::new(b"[1, 2]").map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::ArrayStart,
                TokenType::Integer,
                TokenType::ListDelim,
                TokenType::Integer,
                TokenType::ArrayEnd,
            ]
        );
    }
}
