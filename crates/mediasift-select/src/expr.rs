//! Expression tree for composing [`Condition`] nodes.
//!
//! JSON format (adjacently tagged with `"type"` / `"value"`):
//!
//! ```json
//! { "type": "condition", "value": { "type": "language", "value": ["en"] } }
//! { "type": "and", "value": [ ... ] }
//! { "type": "or",  "value": [ ... ] }
//! { "type": "not", "value": { ... } }
//! { "type": "const", "value": true }
//! ```

use mediasift_core::Track;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::language::LanguageMatcher;

/// A boolean expression tree over track conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Expr {
    /// A leaf condition.
    Condition(Condition),
    /// All sub-expressions must match. Empty is `true`.
    And(Vec<Expr>),
    /// At least one sub-expression must match. Empty is `false`.
    Or(Vec<Expr>),
    /// Negates the inner expression.
    Not(Box<Expr>),
    /// A fixed outcome.
    Const(bool),
}

impl Expr {
    /// Shorthand for `Expr::Condition`.
    pub fn cond(condition: Condition) -> Self {
        Expr::Condition(condition)
    }

    /// Shorthand for `Expr::Not`.
    pub fn negate(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Evaluate the expression tree against a track.
    pub fn evaluate(&self, track: &Track, languages: &LanguageMatcher) -> bool {
        match self {
            Expr::Condition(cond) => cond.evaluate(track, languages),
            Expr::And(exprs) => exprs.iter().all(|e| e.evaluate(track, languages)),
            Expr::Or(exprs) => exprs.iter().any(|e| e.evaluate(track, languages)),
            Expr::Not(inner) => !inner.evaluate(track, languages),
            Expr::Const(value) => *value,
        }
    }
}
