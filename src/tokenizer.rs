//! # Tokenizer/ Lexer
//!
//! Classifies an input sequence of bytes from a JSON document into a token
//! stream, one token per step, without materializing a tree.
pub mod lexer;
pub mod token;

// Re-exports
pub use lexer::{Tokenizer, tokenize};
pub use token::{Token, TokenType};
