use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque predicate over the property registry and event history.
///
/// The condition grammar is owned by the evaluator; this type only carries the
/// source text and rejects text no evaluator could accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(String);

impl Condition {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.0
    }

    /// Structural checks: non-blank, balanced parentheses, closed string
    /// literals.
    pub fn validate(&self) -> ModelResult<()> {
        if self.0.trim().is_empty() {
            return Err(ModelError::invalid("Condition is empty"));
        }

        let mut depth: i32 = 0;
        let mut quote: Option<char> = None;
        let mut chars = self.0.chars();
        while let Some(c) = chars.next() {
            match (quote, c) {
                (Some(_), '\\') => {
                    chars.next();
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ModelError::invalid(
                            "Condition has unbalanced parentheses",
                        ));
                    }
                }
                (None, _) => {}
            }
        }

        if quote.is_some() {
            return Err(ModelError::invalid(
                "Condition has an unterminated string literal",
            ));
        }
        if depth != 0 {
            return Err(ModelError::invalid("Condition has unbalanced parentheses"));
        }
        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
