/*!
# Expression Evaluator

Walks a compiled [`Expression`] against one parsed document. All evaluation
rules live in [`Evaluator::evaluate`]; the expression tree itself carries no
behavior.

An evaluator is built per document and owns the bindings for that call, so
they never outlive the match that created them. Bindings are a stack of
`(slot, value)` pairs searched from the top, so the newest binding of a slot
shadows older ones and slot ids never size an allocation.
*/
use serde_json_borrow::Value;
use std::time::Instant;

use crate::filter::{Expression, ROOT_SLOT, Slot};
use crate::matcher::operand::{Comparison, Operand, compare};
use crate::matcher::{MatchError, document};

/// Per-call evaluation state: the bindings and the resource limits.
#[derive(Debug)]
pub struct Evaluator<'v, 'd> {
    /// Live bindings, innermost last; the root binding is always first
    bindings: Vec<(Slot, &'v Value<'d>)>,
    max_depth: usize,
    deadline: Option<Instant>,
}

impl<'v, 'd> Evaluator<'v, 'd> {
    /// Create an evaluator with `root` bound to slot 0.
    #[must_use]
    pub fn new(root: &'v Value<'d>, max_depth: usize) -> Self {
        Self { bindings: vec![(ROOT_SLOT, root)], max_depth, deadline: None }
    }

    /// Fail evaluation with [`MatchError::DeadlineExceeded`] once `deadline`
    /// passes.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Evaluate a top-level expression.
    ///
    /// # Errors
    ///
    /// Returns the first [`MatchError`] hit anywhere in the tree.
    pub fn evaluate_root(
        &mut self,
        expr: &Expression,
    ) -> Result<bool, MatchError> {
        match expr {
            Expression::True => Ok(true),
            Expression::False => Ok(false),
            _ => self.evaluate(expr, 1),
        }
    }

    /// Evaluate `expr` in boolean position, `depth` levels below the root.
    fn evaluate(
        &mut self,
        expr: &Expression,
        depth: usize,
    ) -> Result<bool, MatchError> {
        if depth > self.max_depth {
            return Err(MatchError::DepthExceeded(self.max_depth));
        }

        match expr {
            Expression::True => Ok(true),
            Expression::False => Ok(false),
            Expression::And(children) => {
                if children.is_empty() {
                    return Ok(false);
                }
                for child in children {
                    if !self.evaluate(child, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expression::Or(children) => {
                for child in children {
                    if self.evaluate(child, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expression::Not(inner) => Ok(!self.evaluate(inner, depth + 1)?),
            Expression::Equals(lhs, rhs) => {
                self.comparison(Comparison::Equals, lhs, rhs)
            }
            Expression::LessThan(lhs, rhs) => {
                self.comparison(Comparison::LessThan, lhs, rhs)
            }
            Expression::GreaterEqual(lhs, rhs) => {
                self.comparison(Comparison::GreaterEqual, lhs, rhs)
            }
            Expression::AnyIn { slot, source, predicate } => {
                self.quantify(*slot, source, predicate, depth, true)
            }
            Expression::EveryIn { slot, source, predicate } => {
                self.quantify(*slot, source, predicate, depth, false)
            }
            Expression::AnyEveryIn { .. } => Err(MatchError::Unsupported(
                "`anyeveryin` has no evaluation rule",
            )),
            Expression::Field { .. } => {
                Err(MatchError::Unsupported("`field` used as a condition"))
            }
            Expression::Value(_) => {
                Err(MatchError::Unsupported("`value` used as a condition"))
            }
        }
    }

    /// The value most recently bound at `slot`.
    fn lookup(&self, slot: Slot) -> Result<&'v Value<'d>, MatchError> {
        self.bindings
            .iter()
            .rev()
            .find_map(|&(bound, value)| (bound == slot).then_some(value))
            .ok_or(MatchError::UnboundSlot(slot))
    }

    /// Resolve a `Field` node to the document value it names.
    fn field(
        &self,
        root: Slot,
        path: &str,
    ) -> Result<&'v Value<'d>, MatchError> {
        let bound = self.lookup(root)?;
        if path.is_empty() {
            return Ok(bound);
        }
        document::resolve(bound, path)
    }

    fn comparison(
        &self,
        op: Comparison,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<bool, MatchError> {
        let lhs = self.operand(lhs)?;
        let rhs = self.operand(rhs)?;
        compare(op, &lhs, &rhs)
    }

    /// Resolve a comparison argument to a typed operand.
    fn operand<'a>(
        &self,
        expr: &'a Expression,
    ) -> Result<Operand<'a>, MatchError>
    where
        'v: 'a,
        'd: 'a,
    {
        match expr {
            Expression::Field { root, path } => {
                Operand::from_value(self.field(*root, path)?)
            }
            Expression::Value(literal) => Ok(Operand::from_literal(literal)),
            _ => Err(MatchError::Unsupported(
                "comparison operands must be `field` or `value`",
            )),
        }
    }

    /// Resolve a quantifier source to the array it iterates.
    fn array(
        &self,
        source: &Expression,
    ) -> Result<&'v [Value<'d>], MatchError> {
        match source {
            Expression::Field { root, path } => match self.field(*root, path)? {
                Value::Array(items) => Ok(items.as_slice()),
                other => Err(MatchError::NotAnArray(document::kind(other))),
            },
            Expression::Value(literal) => Err(MatchError::NotAnArray(
                Operand::from_literal(literal).kind(),
            )),
            _ => Err(MatchError::Unsupported(
                "quantifier source must be a `field`",
            )),
        }
    }

    /// Bind `slot` to each element of `source` in order and evaluate
    /// `predicate`. Stops at the first element whose result equals `stop_on`
    /// and returns it; returns `!stop_on` once the array is exhausted.
    ///
    /// Each element's binding is popped before the next is pushed, so nested
    /// quantifiers reusing a slot do not leak into each other.
    fn quantify(
        &mut self,
        slot: Slot,
        source: &Expression,
        predicate: &Expression,
        depth: usize,
        stop_on: bool,
    ) -> Result<bool, MatchError> {
        let items = self.array(source)?;

        for item in items {
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
            {
                return Err(MatchError::DeadlineExceeded);
            }

            self.bindings.push((slot, item));
            let result = self.evaluate(predicate, depth + 1);
            self.bindings.pop();

            if result? == stop_on {
                return Ok(stop_on);
            }
        }

        Ok(!stop_on)
    }
}
