/*!
# Matcher

Evaluates a list of compiled filter [`Expression`]s against JSON documents.

A document matches when the first expression is true and no later
expression is false. Any evaluation error (a missing field, a cross-type
comparison, an unsupported node) fails the match closed.

# Examples

```
use jsonsm::matcher::Matcher;

let mut matcher = Matcher::compile(&[
    br#"["not", ["greaterequal", ["field", "age"], ["value", 10]]]"#.as_slice(),
])
.expect("valid filter");

assert!(matcher.match_document(br#"{"age": 5}"#));
assert!(!matcher.match_document(br#"{"age": 15}"#));
assert!(!matcher.match_document(br#"{"age": "five"}"#));
```
*/
use log::{debug, trace};
use std::time::{Duration, Instant};

use crate::filter::{Expression, FilterParseError, parse_filter};

pub mod document;
pub mod error;
pub mod eval;
pub mod operand;

// Re-exports
pub use error::MatchError;
pub use eval::Evaluator;

/// Default limit on evaluation recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource limits applied to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Deepest expression nesting the evaluator will descend into
    pub max_depth: usize,
    /// Wall-clock budget per document, checked at quantifier iterations
    pub time_budget: Option<Duration>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, time_budget: None }
    }
}

impl MatcherConfig {
    /// Set the recursion depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the per-document time budget.
    #[must_use]
    pub const fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Outcome of evaluating every expression against one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Aggregate result
    pub matched: bool,
    /// Result of each top-level expression, by index
    pub expression_matches: Vec<bool>,
}

/// A compiled list of filter expressions.
#[derive(Debug, Clone)]
pub struct Matcher {
    expressions: Vec<Expression>,
    expression_matches: Vec<bool>,
    config: MatcherConfig,
}

impl Matcher {
    /// Create a matcher over `expressions` with the default configuration.
    #[must_use]
    pub fn new(expressions: Vec<Expression>) -> Self {
        Self::with_config(expressions, MatcherConfig::default())
    }

    /// Create a matcher over `expressions` with `config`.
    #[must_use]
    pub fn with_config(
        expressions: Vec<Expression>,
        config: MatcherConfig,
    ) -> Self {
        let expression_matches = vec![false; expressions.len()];
        Self { expressions, expression_matches, config }
    }

    /// Compile each filter from its JSON-array wire form.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterParseError`] encountered.
    pub fn compile<T: AsRef<[u8]>>(
        filters: &[T],
    ) -> Result<Self, FilterParseError> {
        let expressions = filters
            .iter()
            .map(|filter| parse_filter(filter.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(expressions))
    }

    /// The compiled expressions, in evaluation order.
    #[must_use]
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Evaluate every expression against `bytes` without recording any
    /// state on the matcher.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError`] when the document does not parse or any
    /// expression fails to evaluate.
    pub fn evaluate(&self, bytes: &[u8]) -> Result<Evaluation, MatchError> {
        let mut expression_matches = vec![false; self.expressions.len()];
        let matched = self.run(bytes, &mut expression_matches)?;
        Ok(Evaluation { matched, expression_matches })
    }

    /// Shorthand for [`Matcher::evaluate`] that fails closed.
    #[must_use]
    pub fn is_match(&self, bytes: &[u8]) -> bool {
        self.evaluate(bytes).is_ok_and(|evaluation| evaluation.matched)
    }

    /// Match `bytes` against every expression, recording each expression's
    /// result for [`Matcher::expression_matched`].
    ///
    /// Returns `false` for malformed documents and on any evaluation error;
    /// results recorded before the error are kept.
    pub fn match_document(&mut self, bytes: &[u8]) -> bool {
        let mut expression_matches =
            std::mem::take(&mut self.expression_matches);
        let result = self.run(bytes, &mut expression_matches);
        self.expression_matches = expression_matches;

        result.unwrap_or_else(|err| {
            debug!("Match aborted: {err}");
            false
        })
    }

    /// The result recorded for expression `index` by the last
    /// [`Matcher::match_document`] call; `false` if out of range.
    #[must_use]
    pub fn expression_matched(&self, index: usize) -> bool {
        self.expression_matches.get(index).copied().unwrap_or(false)
    }

    /// Clear all recorded expression results.
    pub fn reset(&mut self) {
        self.expression_matches.fill(false);
    }

    /// Parse `bytes` and evaluate each expression in order, writing results
    /// into `expression_matches` as they are produced.
    fn run(
        &self,
        bytes: &[u8],
        expression_matches: &mut [bool],
    ) -> Result<bool, MatchError> {
        let doc = document::parse_document(bytes).inspect_err(|err| {
            debug!("Skipping document: {err}");
        })?;

        let deadline =
            self.config.time_budget.map(|budget| Instant::now() + budget);
        let mut evaluator = Evaluator::new(&doc, self.config.max_depth)
            .with_deadline(deadline);

        let mut matched = !self.expressions.is_empty();
        for (index, expr) in self.expressions.iter().enumerate() {
            let result = evaluator.evaluate_root(expr)?;
            trace!("Expression {index} evaluated to {result}");
            expression_matches[index] = result;
            matched &= result;
        }

        Ok(matched)
    }
}
