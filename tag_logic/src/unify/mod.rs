//! Unifier module - pairwise matching of facts with variable binding.
//!
//! Matching compares a concrete candidate fact against a pattern fact
//! position by position:
//! - predicate names must be equal
//! - `*` on either side consumes the rest of both argument lists
//! - a named variable in the pattern binds the candidate's argument
//! - `?` consumes exactly one concrete argument
//! - string and numeric leaves match per their own tables
//!
//! The result is [`None`] for a mismatch, or the accumulated [`Bindings`]
//! (possibly empty) for a match.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::argument::{Argument, VariableArgument};
use crate::tags::{Fact, Predicate};

/// Variable name to concrete argument mapping produced by a match.
///
/// A variable bound at several positions keeps the last binding; there is
/// no occurs check or consistency constraint across positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    entries: HashMap<String, Argument>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The argument bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.entries.get(name)
    }

    /// Record a binding, replacing any previous binding for `name`.
    pub fn insert(&mut self, name: impl Into<String>, argument: Argument) {
        self.entries.insert(name.into(), argument);
    }

    /// Fold another binding set into this one; its entries win on conflict.
    pub fn merge(&mut self, other: Bindings) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replace every bound named variable in the fact's argument list with
    /// its bound argument. Unbound variables stay in place.
    pub fn substitute_fact(&self, fact: Fact) -> Fact {
        let arguments = fact
            .arguments
            .into_iter()
            .map(|argument| match &argument {
                Argument::Variable(VariableArgument::Named(name)) => {
                    self.get(name).cloned().unwrap_or(argument)
                }
                _ => argument,
            })
            .collect();
        Fact { arguments, ..fact }
    }

    /// Substitute into a predicate, preserving its variant.
    pub fn substitute(&self, predicate: Predicate) -> Predicate {
        predicate.map_fact(|fact| self.substitute_fact(fact))
    }
}

impl std::fmt::Display for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<String> = self
            .entries
            .iter()
            .map(|(name, argument)| format!("&{}={}", name, argument))
            .collect();
        entries.sort();
        write!(f, "{}", entries.join(" "))
    }
}

/// Verdict for a single aligned argument position.
enum Position {
    Mismatch,
    Match,
    Bind(String, Argument),
    /// A `*` was hit; the whole comparison succeeds here.
    MatchRest,
}

/// Match a concrete candidate fact against a pattern fact.
///
/// Returns the bindings collected up to the point the match succeeded, or
/// [`None`] on any mismatch.
pub fn match_facts(candidate: &Fact, pattern: &Fact) -> Option<Bindings> {
    if candidate.name != pattern.name {
        return None;
    }

    // A pattern longer than the candidate only matches if every excess
    // position is `*`.
    if pattern.arguments.len() > candidate.arguments.len()
        && !pattern.arguments[candidate.arguments.len()..]
            .iter()
            .all(Argument::is_match_all)
    {
        return None;
    }

    let mut bindings = Bindings::new();
    for (candidate_arg, pattern_arg) in candidate.arguments.iter().zip(&pattern.arguments) {
        match match_position(candidate_arg, pattern_arg) {
            Position::Mismatch => return None,
            Position::Match => {}
            Position::Bind(name, argument) => bindings.insert(name, argument),
            Position::MatchRest => return Some(bindings),
        }
    }

    // A candidate tail is only consumed by a `*`, which would have
    // returned above.
    if candidate.arguments.len() > pattern.arguments.len() {
        return None;
    }

    Some(bindings)
}

fn match_position(candidate: &Argument, pattern: &Argument) -> Position {
    if candidate.is_match_all() || pattern.is_match_all() {
        return Position::MatchRest;
    }

    // A named variable in the pattern always matches; it binds only when
    // the candidate's argument is concrete.
    if let Argument::Variable(VariableArgument::Named(name)) = pattern {
        if candidate.is_variable() {
            return Position::Match;
        }
        return Position::Bind(name.clone(), candidate.clone());
    }

    // `?` on either side consumes one concrete argument.
    if matches!(pattern, Argument::Variable(VariableArgument::MatchOne)) {
        return concrete_or_mismatch(candidate);
    }
    if matches!(candidate, Argument::Variable(VariableArgument::MatchOne)) {
        return concrete_or_mismatch(pattern);
    }

    match (candidate, pattern) {
        (Argument::String(a), Argument::String(b)) => verdict(a.matches(b)),
        (Argument::Numeric(a), Argument::Numeric(b)) => verdict(a.matches(b)),
        _ => Position::Mismatch,
    }
}

fn concrete_or_mismatch(argument: &Argument) -> Position {
    if argument.is_variable() {
        Position::Mismatch
    } else {
        Position::Match
    }
}

fn verdict(matched: bool) -> Position {
    if matched {
        Position::Match
    } else {
        Position::Mismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::NumericOp;
    use crate::tags::Recommendation;

    fn dog_candidate() -> Fact {
        Fact::new("Dog")
            .with_argument(Argument::string("friendly"))
            .with_argument(Argument::labelled("breed", "pug"))
            .with_argument(Argument::numeric("age", NumericOp::Eq, 1))
    }

    #[test]
    fn test_named_variable_binds() {
        let pattern = Fact::new("Dog")
            .with_argument(Argument::variable("x"))
            .with_argument(Argument::labelled("breed", "pug"))
            .with_argument(Argument::numeric("age", NumericOp::Eq, 1));

        let bindings = match_facts(&dog_candidate(), &pattern).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("x"), Some(&Argument::string("friendly")));
    }

    #[test]
    fn test_match_all_consumes_tail() {
        let candidate = Fact::new("Bat")
            .with_argument(Argument::string("black"))
            .with_argument(Argument::numeric("speed", NumericOp::Eq, 10));
        let pattern = Fact::new("Bat").with_argument(Argument::match_all());

        let bindings = match_facts(&candidate, &pattern).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_name_mismatch() {
        let pattern = Fact::new("Cat").with_argument(Argument::match_all());
        assert!(match_facts(&dog_candidate(), &pattern).is_none());
    }

    #[test]
    fn test_pattern_excess_requires_match_all() {
        let candidate = Fact::new("Dog").with_argument(Argument::string("friendly"));

        let strict = Fact::new("Dog")
            .with_argument(Argument::string("friendly"))
            .with_argument(Argument::labelled("breed", "pug"));
        assert!(match_facts(&candidate, &strict).is_none());

        let starred = Fact::new("Dog")
            .with_argument(Argument::string("friendly"))
            .with_argument(Argument::match_all());
        assert!(match_facts(&candidate, &starred).is_some());
    }

    #[test]
    fn test_candidate_excess_rejected_without_star() {
        let pattern = Fact::new("Dog").with_argument(Argument::string("friendly"));
        assert!(match_facts(&dog_candidate(), &pattern).is_none());
    }

    #[test]
    fn test_match_one() {
        let pattern = Fact::new("Dog")
            .with_argument(Argument::match_one())
            .with_argument(Argument::labelled("breed", "pug"))
            .with_argument(Argument::numeric("age", NumericOp::Eq, 1));
        let bindings = match_facts(&dog_candidate(), &pattern).unwrap();
        assert!(bindings.is_empty());

        // `?` refuses a variable on the other side.
        let candidate = Fact::new("P").with_argument(Argument::variable("y"));
        let pattern = Fact::new("P").with_argument(Argument::match_one());
        assert!(match_facts(&candidate, &pattern).is_none());
    }

    #[test]
    fn test_both_sides_variables_match_without_binding() {
        let candidate = Fact::new("P").with_argument(Argument::variable("y"));
        let pattern = Fact::new("P").with_argument(Argument::variable("x"));

        let bindings = match_facts(&candidate, &pattern).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_numeric_bound_in_pattern() {
        let candidate = Fact::new("Tree").with_argument(Argument::numeric(
            "height",
            NumericOp::Eq,
            7,
        ));
        let tall = Fact::new("Tree").with_argument(Argument::numeric("height", NumericOp::Gt, 5));
        let short = Fact::new("Tree").with_argument(Argument::numeric("height", NumericOp::Lt, 5));

        assert!(match_facts(&candidate, &tall).is_some());
        assert!(match_facts(&candidate, &short).is_none());
    }

    #[test]
    fn test_negated_string_in_pattern() {
        let candidate = Fact::new("Dog").with_argument(Argument::string("grumpy"));
        let pattern = Fact::new("Dog").with_argument(Argument::string("friendly").negate());

        assert!(match_facts(&candidate, &pattern).is_some());

        let same = Fact::new("Dog").with_argument(Argument::string("grumpy").negate());
        assert!(match_facts(&candidate, &same).is_none());
    }

    #[test]
    fn test_repeated_variable_keeps_last_binding() {
        let candidate = Fact::new("Pair")
            .with_argument(Argument::string("a"))
            .with_argument(Argument::string("b"));
        let pattern = Fact::new("Pair")
            .with_argument(Argument::variable("x"))
            .with_argument(Argument::variable("x"));

        let bindings = match_facts(&candidate, &pattern).unwrap();
        assert_eq!(bindings.get("x"), Some(&Argument::string("b")));
    }

    #[test]
    fn test_substitute_into_predicate() {
        let mut bindings = Bindings::new();
        bindings.insert("x", Argument::string("friendly"));

        let output = Predicate::Fact(
            Fact::new("Likes")
                .with_argument(Argument::variable("x"))
                .with_argument(Argument::variable("unbound")),
        );
        let substituted = bindings.substitute(output);

        assert_eq!(
            substituted.arguments(),
            &[Argument::string("friendly"), Argument::variable("unbound")]
        );
    }

    #[test]
    fn test_substitute_preserves_recommendation_variant() {
        let mut bindings = Bindings::new();
        bindings.insert("x", Argument::string("high"));

        let output =
            Predicate::Recommendation(Recommendation::new("Alert").with_argument(Argument::variable("x")));
        let substituted = bindings.substitute(output);

        assert!(substituted.is_recommendation());
        assert_eq!(substituted.signature(), "@Alert(high)");
    }

    #[test]
    fn test_merge_prefers_newer_bindings() {
        let mut first = Bindings::new();
        first.insert("x", Argument::string("old"));

        let mut second = Bindings::new();
        second.insert("x", Argument::string("new"));
        second.insert("y", Argument::int(3));

        first.merge(second);
        assert_eq!(first.get("x"), Some(&Argument::string("new")));
        assert_eq!(first.get("y"), Some(&Argument::int(3)));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_bindings_display_is_sorted() {
        let mut bindings = Bindings::new();
        bindings.insert("y", Argument::int(3));
        bindings.insert("x", Argument::string("friendly"));
        assert_eq!(bindings.to_string(), "&x=friendly &y=3");
    }

    #[test]
    fn test_star_matches_empty_tail() {
        let candidate = Fact::new("Bat");
        let pattern = Fact::new("Bat").with_argument(Argument::match_all());
        assert!(match_facts(&candidate, &pattern).is_some());
    }
}
