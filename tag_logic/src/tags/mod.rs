//! Tags module - the typed statements the engine reasons over.
//!
//! A tag is one of:
//! - **Fact**: a named statement with arguments, e.g. `Dog(breed=pug)`
//! - **Rule**: input facts implying output predicates, e.g. `{A() B()=>D()}`
//! - **Recommendation**: an action suggestion, e.g. `@Alert(high)`
//!
//! Facts and recommendations compare and hash on name and arguments only;
//! confidence and age are metadata. Rules compare on their canonicalized
//! input and output sets.

mod fact;
mod recommendation;
mod rule;

pub use fact::*;
pub use recommendation::*;
pub use rule::*;

use serde::{Deserialize, Serialize};

use crate::argument::Argument;

/// Render a confidence in `[0.0, 1.0]` as a whole percentage.
pub(crate) fn percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// A rule output: either a fact to assert or a recommendation to surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Predicate {
    Fact(Fact),
    Recommendation(Recommendation),
}

impl Predicate {
    /// The predicate name.
    pub fn name(&self) -> &str {
        &self.as_fact().name
    }

    /// The predicate arguments.
    pub fn arguments(&self) -> &[Argument] {
        &self.as_fact().arguments
    }

    /// The confidence in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f64 {
        self.as_fact().confidence
    }

    /// The age stamp.
    pub fn age(&self) -> u64 {
        self.as_fact().age
    }

    /// True for the recommendation variant.
    pub fn is_recommendation(&self) -> bool {
        matches!(self, Predicate::Recommendation(_))
    }

    /// A view of the underlying fact, whichever variant holds it.
    pub fn as_fact(&self) -> &Fact {
        match self {
            Predicate::Fact(fact) => fact,
            Predicate::Recommendation(recommendation) => recommendation.fact(),
        }
    }

    /// Rebuild the predicate from a transformed copy of its fact,
    /// preserving the variant.
    pub fn map_fact(self, transform: impl FnOnce(Fact) -> Fact) -> Self {
        match self {
            Predicate::Fact(fact) => Predicate::Fact(transform(fact)),
            Predicate::Recommendation(recommendation) => {
                Predicate::Recommendation(Recommendation(transform(recommendation.into_fact())))
            }
        }
    }

    /// Set the confidence, clamped to `[0.0, 1.0]`.
    pub fn with_confidence(self, confidence: f64) -> Self {
        self.map_fact(|fact| fact.with_confidence(confidence))
    }

    /// Set the age stamp.
    pub fn with_age(self, age: u64) -> Self {
        self.map_fact(|fact| fact.with_age(age))
    }

    /// The `Name(args)` form, prefixed with `@` for recommendations.
    pub fn signature(&self) -> String {
        match self {
            Predicate::Fact(fact) => fact.signature(),
            Predicate::Recommendation(recommendation) => recommendation.signature(),
        }
    }

    /// Promote to a working-memory tag.
    pub fn into_tag(self) -> Tag {
        match self {
            Predicate::Fact(fact) => Tag::Fact(fact),
            Predicate::Recommendation(recommendation) => Tag::Recommendation(recommendation),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Fact(fact) => fact.fmt(f),
            Predicate::Recommendation(recommendation) => recommendation.fmt(f),
        }
    }
}

impl From<Fact> for Predicate {
    fn from(fact: Fact) -> Self {
        Predicate::Fact(fact)
    }
}

impl From<Recommendation> for Predicate {
    fn from(recommendation: Recommendation) -> Self {
        Predicate::Recommendation(recommendation)
    }
}

/// Any statement working memory can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Fact(Fact),
    Rule(Rule),
    Recommendation(Recommendation),
}

impl Tag {
    /// The confidence in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f64 {
        match self {
            Tag::Fact(fact) => fact.confidence,
            Tag::Rule(rule) => rule.confidence(),
            Tag::Recommendation(recommendation) => recommendation.fact().confidence,
        }
    }

    /// The age stamp.
    pub fn age(&self) -> u64 {
        match self {
            Tag::Fact(fact) => fact.age,
            Tag::Rule(rule) => rule.age(),
            Tag::Recommendation(recommendation) => recommendation.fact().age,
        }
    }

    /// The identity-bearing text form, without confidence.
    pub fn signature(&self) -> String {
        match self {
            Tag::Fact(fact) => fact.signature(),
            Tag::Rule(rule) => rule.signature(),
            Tag::Recommendation(recommendation) => recommendation.signature(),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Fact(fact) => fact.fmt(f),
            Tag::Rule(rule) => rule.fmt(f),
            Tag::Recommendation(recommendation) => recommendation.fmt(f),
        }
    }
}

impl From<Fact> for Tag {
    fn from(fact: Fact) -> Self {
        Tag::Fact(fact)
    }
}

impl From<Rule> for Tag {
    fn from(rule: Rule) -> Self {
        Tag::Rule(rule)
    }
}

impl From<Recommendation> for Tag {
    fn from(recommendation: Recommendation) -> Self {
        Tag::Recommendation(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::NumericOp;

    #[test]
    fn test_predicate_round_trip_through_tag() {
        let predicate = Predicate::Recommendation(Recommendation::new("Alert"));
        let tag = predicate.clone().into_tag();
        assert_eq!(tag.signature(), "@Alert()");
        assert_eq!(predicate.signature(), "@Alert()");
    }

    #[test]
    fn test_predicate_map_preserves_variant() {
        let predicate = Predicate::Recommendation(Recommendation::new("Alert"));
        let aged = predicate.with_age(7);
        assert!(aged.is_recommendation());
        assert_eq!(aged.age(), 7);
    }

    #[test]
    fn test_tag_metadata() {
        let tag = Tag::from(Fact::new("A").with_confidence(0.5).with_age(3));
        assert!((tag.confidence() - 0.5).abs() < 1e-9);
        assert_eq!(tag.age(), 3);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1.0), 100);
        assert_eq!(percent(0.955), 96);
        assert_eq!(percent(0.0), 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let tags = vec![
            Tag::Fact(
                Fact::new("Dog")
                    .with_argument(Argument::labelled("breed", "pug"))
                    .with_argument(Argument::numeric("age", NumericOp::Gt, 2))
                    .with_confidence(0.9)
                    .with_age(3),
            ),
            Tag::Rule(Rule::new(
                vec![Fact::new("Dog").with_argument(Argument::variable("x"))],
                vec![Predicate::Recommendation(Recommendation::new("Adopt"))],
            )),
            Tag::Recommendation(Recommendation::new("Adopt").with_confidence(0.8)),
        ];

        let json = serde_json::to_string(&tags).unwrap();
        let restored: Vec<Tag> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, tags);
        // Equality ignores confidence and age, so check them directly.
        assert!((restored[0].confidence() - 0.9).abs() < 1e-9);
        assert_eq!(restored[0].age(), 3);
        assert!((restored[2].confidence() - 0.8).abs() < 1e-9);
    }
}
