//! Implementations of the `jsm` subcommands.
pub mod generate;
pub mod tokens;
