//! `tokens` subcommand.
use anyhow::Result;
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, Write};

use crate::tokenizer::{Token, TokenType, Tokenizer};
use crate::utils;

/// A token as written by `jsm tokens --json`.
#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    offset: usize,
    kind: TokenType,
    text: Cow<'a, str>,
}

/// Lex `input` into `(offset, token)` pairs, excluding the final
/// [`TokenType::End`].
fn lex(input: &[u8]) -> Vec<(usize, Token<'_>)> {
    let mut tokenizer = Tokenizer::new(input);
    std::iter::from_fn(|| {
        let token = tokenizer.step();
        let offset = tokenizer.position() - token.raw.len();
        (token.kind != TokenType::End).then_some((offset, token))
    })
    .collect()
}

/// Write the token stream of `input` to `writer`, one token per line or as a
/// single JSON array.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_tokens<W: Write>(
    writer: &mut W,
    input: &[u8],
    json: bool,
    color: bool,
) -> io::Result<()> {
    let tokens = lex(input);

    if json {
        let records: Vec<TokenRecord> = tokens
            .iter()
            .map(|(offset, token)| TokenRecord {
                offset: *offset,
                kind: token.kind,
                text: token.text(),
            })
            .collect();
        serde_json::to_writer(&mut *writer, &records)?;
        return writeln!(writer);
    }

    for (offset, token) in &tokens {
        utils::write_token(writer, *offset, token, color)?;
    }
    Ok(())
}

/// Print the token stream of `input` to STDOUT.
///
/// # Errors
///
/// Returns an error if writing to STDOUT fails.
pub fn print_tokens(input: &[u8], json: bool) -> Result<()> {
    let color = !json && utils::use_color();
    utils::write_output(&mut io::stdout().lock(), |out| {
        write_tokens(out, input, json, color)
    })
}
