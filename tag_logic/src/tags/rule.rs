//! Rule definitions - input facts implying output predicates.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::{percent, Fact, Predicate};

/// A production rule: when every input fact is satisfied by working memory,
/// the output predicates are asserted.
///
/// Inputs and outputs are sets; construction canonicalizes them (sorted,
/// deduplicated) so equality, hashing, and display are deterministic. The
/// rule's own confidence is the product of its input facts' confidences,
/// assigned once at construction and never re-derived - activation mutates
/// substituted copies of the outputs, never the rule itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    inputs: Vec<Fact>,
    outputs: Vec<Predicate>,
    confidence: f64,
    age: u64,
}

impl Rule {
    /// Build a rule from input facts and output predicates.
    pub fn new(
        inputs: impl IntoIterator<Item = Fact>,
        outputs: impl IntoIterator<Item = Predicate>,
    ) -> Self {
        let mut inputs: Vec<Fact> = inputs.into_iter().collect();
        inputs.sort();
        inputs.dedup();

        let mut outputs: Vec<Predicate> = outputs.into_iter().collect();
        outputs.sort();
        outputs.dedup();

        let confidence = inputs.iter().map(|fact| fact.confidence).product();

        Self {
            inputs,
            outputs,
            confidence,
            age: 0,
        }
    }

    /// Set the age stamp.
    pub fn with_age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    /// Override the derived confidence, clamped to `[0.0, 1.0]`.
    ///
    /// The displayed text form carries the rule's confidence but not the
    /// per-input confidences, so reading a rule back from text restores
    /// it through this override.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// The canonicalized input facts.
    pub fn inputs(&self) -> &[Fact] {
        &self.inputs
    }

    /// The canonicalized output predicates.
    pub fn outputs(&self) -> &[Predicate] {
        &self.outputs
    }

    /// Product of the input facts' confidences at construction time.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The age stamp.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// The bare `{in1() in2()=>out1()}` form, without the confidence suffix.
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(Fact::signature).collect();
        let outputs: Vec<String> = self.outputs.iter().map(Predicate::signature).collect();
        format!("{{{}=>{}}}", inputs.join(" "), outputs.join(" "))
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        // Canonical order makes positional comparison a set comparison.
        self.inputs == other.inputs && self.outputs == other.outputs
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inputs.hash(state);
        self.outputs.hash(state);
    }
}

impl PartialOrd for Rule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inputs
            .cmp(&other.inputs)
            .then_with(|| self.outputs.cmp(&other.outputs))
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inputs: Vec<String> = self.inputs.iter().map(Fact::signature).collect();
        let outputs: Vec<String> = self.outputs.iter().map(Predicate::signature).collect();
        write!(
            f,
            "{{{}=>{} {}%}}",
            inputs.join(" "),
            outputs.join(" "),
            percent(self.confidence)
        )
    }
}
