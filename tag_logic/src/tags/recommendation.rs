//! Recommendation definitions - actionable output statements.

use serde::{Deserialize, Serialize};

use super::Fact;
use crate::argument::Argument;

/// An actionable statement produced by rule activation.
///
/// Shares the fact shape but is its own type: the discriminant is the type
/// itself, not a naming convention. Displays with a leading `@`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Recommendation(pub Fact);

impl Recommendation {
    /// Create a recommendation with no arguments and full confidence.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Fact::new(name))
    }

    /// Append one argument.
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.0 = self.0.with_argument(argument);
        self
    }

    /// Set the confidence, clamped to 0.0 - 1.0.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.0 = self.0.with_confidence(confidence);
        self
    }

    /// The underlying statement shape.
    pub fn fact(&self) -> &Fact {
        &self.0
    }

    /// Unwrap into the underlying statement shape.
    pub fn into_fact(self) -> Fact {
        self.0
    }

    /// The bare `@Name(arg1,...)` form, without the confidence suffix.
    pub fn signature(&self) -> String {
        format!("@{}", self.0.signature())
    }
}

impl From<Fact> for Recommendation {
    fn from(fact: Fact) -> Self {
        Self(fact)
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
