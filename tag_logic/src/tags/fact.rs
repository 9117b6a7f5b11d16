//! Fact definitions - concrete statements held in working memory.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::percent;
use crate::argument::Argument;

/// A typed logical statement: a predicate name over an ordered argument list.
///
/// Identity is structural - two facts are equal when their names and ordered
/// argument lists are equal. Confidence and the age stamp are bookkeeping and
/// take no part in equality, hashing, or ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub arguments: Vec<Argument>,

    /// Strength of belief in this statement, 0.0 - 1.0.
    pub confidence: f64,

    /// Derivation stamp (the think cycle that produced it; 0 for seeds).
    pub age: u64,
}

impl Fact {
    /// Create a fact with no arguments and full confidence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            confidence: 1.0,
            age: 0,
        }
    }

    /// Append one argument.
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Append multiple arguments.
    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Set the confidence, clamped to 0.0 - 1.0.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Set the age stamp.
    pub fn with_age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    /// Number of argument positions.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Whether any position is a wildcard or variable.
    pub fn has_variables(&self) -> bool {
        self.arguments.iter().any(Argument::is_variable)
    }

    /// The bare `Name(arg1,arg2,...)` form, without the confidence suffix.
    pub fn signature(&self) -> String {
        let arguments: Vec<String> = self.arguments.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, arguments.join(","))
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arguments == other.arguments
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.arguments.hash(state);
    }
}

impl PartialOrd for Fact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.arguments.cmp(&other.arguments))
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}%", self.signature(), percent(self.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::NumericOp;

    #[test]
    fn test_fact_creation() {
        let fact = Fact::new("Dog");
        assert_eq!(fact.name, "Dog");
        assert_eq!(fact.arity(), 0);
        assert_eq!(fact.confidence, 1.0);
        assert_eq!(fact.age, 0);
    }

    #[test]
    fn test_fact_builder() {
        let fact = Fact::new("Dog")
            .with_argument(Argument::string("friendly"))
            .with_argument(Argument::labelled("breed", "pug"))
            .with_confidence(0.9);

        assert_eq!(fact.arity(), 2);
        assert_eq!(fact.confidence, 0.9);
    }

    #[test]
    fn test_confidence_clamping() {
        assert_eq!(Fact::new("A").with_confidence(1.5).confidence, 1.0);
        assert_eq!(Fact::new("A").with_confidence(-0.5).confidence, 0.0);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Fact::new("Dog").with_argument(Argument::string("friendly"));
        let b = Fact::new("Dog")
            .with_argument(Argument::string("friendly"))
            .with_confidence(0.4)
            .with_age(7);

        // Confidence and age are bookkeeping, not identity.
        assert_eq!(a, b);

        let c = Fact::new("Dog").with_argument(Argument::string("grumpy"));
        assert_ne!(a, c);

        let d = Fact::new("Cat").with_argument(Argument::string("friendly"));
        assert_ne!(a, d);
    }

    #[test]
    fn test_hash_matches_equality() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Fact::new("A").with_confidence(1.0));
        set.insert(Fact::new("A").with_confidence(0.5));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_by_name_then_arguments() {
        let mut facts = vec![
            Fact::new("B"),
            Fact::new("A").with_argument(Argument::string("z")),
            Fact::new("A").with_argument(Argument::string("a")),
        ];
        facts.sort();
        assert_eq!(facts[0].name, "A");
        assert_eq!(facts[0].arguments[0], Argument::string("a"));
        assert_eq!(facts[2].name, "B");
    }

    #[test]
    fn test_display() {
        let fact = Fact::new("Dog")
            .with_argument(Argument::variable("x"))
            .with_argument(Argument::labelled("breed", "pug"))
            .with_argument(Argument::numeric("age", NumericOp::Eq, 1));
        assert_eq!(fact.to_string(), "Dog(&x,breed=pug,age=1) 100%");

        assert_eq!(Fact::new("A").to_string(), "A() 100%");
        assert_eq!(
            Fact::new("A").with_confidence(0.42).to_string(),
            "A() 42%"
        );
    }

    #[test]
    fn test_has_variables() {
        assert!(Fact::new("Dog").with_argument(Argument::match_one()).has_variables());
        assert!(!Fact::new("Dog").with_argument(Argument::string("x")).has_variables());
    }
}
