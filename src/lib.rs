/*!
# `jsonsm` Library

Compiles boolean filters over JSON documents and evaluates them against
documents one at a time, plus a byte-level JSON tokenizer.

```
use jsonsm::{Matcher, tokenizer::{Tokenizer, TokenType}};

let filter = br#"["equals", ["field", "name"], ["value", "mike"]]"#;
let mut matcher = Matcher::compile(&[filter]).expect("valid filter");
assert!(matcher.match_document(br#"{"name": "mike"}"#));

let mut tokenizer = Tokenizer::new(b"[1]");
assert_eq!(tokenizer.step().kind, TokenType::ArrayStart);
```
*/

pub mod commands;
pub mod filter;
pub mod matcher;
pub mod tokenizer;
pub mod utils;

// Re-exports
pub use filter::{Expression, FilterParseError};
pub use matcher::{MatchError, Matcher, MatcherConfig};
