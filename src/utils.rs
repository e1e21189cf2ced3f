//! Miscellaneous utility functions.

use anyhow::Context as _;
use colored::{ColoredString, Colorize};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, ErrorKind, IsTerminal, Read, Write};
use std::ops::Deref;
use std::path::Path;

use crate::tokenizer::{Token, TokenType};

// =============================================================================
// Input
// =============================================================================

/// Raw input bytes, either memory-mapped from a file or read from STDIN.
#[derive(Debug)]
pub enum Input {
    /// Memory-mapped file contents
    Mapped(Mmap),
    /// Bytes read into memory
    Buffered(Vec<u8>),
}

impl Deref for Input {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => map,
            Self::Buffered(bytes) => bytes,
        }
    }
}

/// Memory-map the file at `path`, or read all of STDIN when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or mapped, or if reading
/// STDIN fails.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<Input> {
    let Some(path) = path else {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("read STDIN")?;
        return Ok(Input::Buffered(buffer));
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    // SAFETY: the map is read-only and the file is not modified while mapped.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.display()))?;
    Ok(Input::Mapped(map))
}

/// Split `bytes` into newline-delimited documents, skipping blank lines.
pub fn documents(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|&b| b == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|line| !line.is_empty())
}

/// Whether output should be colorized.
#[must_use]
pub fn use_color() -> bool {
    io::stdout().is_terminal()
}

/// Run `write` against `writer`, treating a broken pipe as success so that
/// piping to tools like `head` exits cleanly.
///
/// # Errors
///
/// Returns any other I/O error raised by `write`.
pub fn write_output<W, F>(writer: &mut W, write: F) -> anyhow::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    match write(writer).and_then(|()| writer.flush()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write to stdout"),
    }
}

// =============================================================================
// Token Output
// =============================================================================

/// Write one token as `offset kind text`, highlighting the token class.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_token<W: Write>(
    writer: &mut W,
    offset: usize,
    token: &Token,
    color: bool,
) -> io::Result<()> {
    let kind = token.kind.to_string();
    let text = token.text();
    if color {
        writeln!(
            writer,
            "{} {} {}",
            format!("{offset:>8}").dimmed(),
            paint(token.kind, &kind).bold(),
            paint(token.kind, &text)
        )
    } else {
        writeln!(writer, "{offset:>8} {kind} {text}")
    }
}

/// Pick a color for `text` by token class.
fn paint(kind: TokenType, text: &str) -> ColoredString {
    if !kind.is_value() {
        return match kind {
            TokenType::Unknown => text.red(),
            TokenType::End => text.dimmed(),
            _ => text.cyan(),
        };
    }
    match kind {
        TokenType::String | TokenType::EscapeString => text.green(),
        TokenType::True | TokenType::False => text.yellow().bold(),
        TokenType::Null => text.red().dimmed(),
        _ => text.yellow(),
    }
}
