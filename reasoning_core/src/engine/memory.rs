//! Working memory - the caller-visible state of a reasoning session.

use serde::{Deserialize, Serialize};
use tag_logic::{Fact, Recommendation, Rule};
use tracing::debug;

/// The four insertion-ordered sets the engine mutates.
///
/// Facts and recommendations only grow during a think run; `remove_fact` is
/// the single shrinking operation. A rule lives in exactly one of the ready
/// and active sets at any time, and once activated never returns to ready
/// within the same session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingMemory {
    ready_rules: Vec<Rule>,
    active_rules: Vec<Rule>,
    facts: Vec<Fact>,
    recommendations: Vec<Recommendation>,
}

impl WorkingMemory {
    /// Create an empty working memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact. Returns whether the set changed.
    pub fn add_fact(&mut self, fact: Fact) -> bool {
        if self.facts.contains(&fact) {
            return false;
        }
        debug!(fact = %fact, "fact added");
        self.facts.push(fact);
        true
    }

    /// Remove a fact. Returns whether the set changed.
    pub fn remove_fact(&mut self, fact: &Fact) -> bool {
        let before = self.facts.len();
        self.facts.retain(|known| known != fact);
        if self.facts.len() != before {
            debug!(fact = %fact, "fact removed");
            return true;
        }
        false
    }

    /// Add a rule to the ready set. Returns whether the set changed; a rule
    /// already ready or already activated is refused.
    pub fn add_rule(&mut self, rule: Rule) -> bool {
        if self.ready_rules.contains(&rule) || self.active_rules.contains(&rule) {
            return false;
        }
        debug!(rule = %rule, "rule added");
        self.ready_rules.push(rule);
        true
    }

    /// Add a recommendation. Returns whether the set changed.
    pub fn add_recommendation(&mut self, recommendation: Recommendation) -> bool {
        if self.recommendations.contains(&recommendation) {
            return false;
        }
        debug!(recommendation = %recommendation, "recommendation added");
        self.recommendations.push(recommendation);
        true
    }

    /// Move a rule from ready to active. Returns false when it is not ready.
    pub fn activate_rule(&mut self, rule: &Rule) -> bool {
        let Some(at) = self.ready_rules.iter().position(|ready| ready == rule) else {
            return false;
        };
        let rule = self.ready_rules.remove(at);
        debug!(rule = %rule, "rule activated");
        self.active_rules.push(rule);
        true
    }

    /// The known facts, in insertion order.
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// The surfaced recommendations, in insertion order.
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Rules waiting to activate.
    pub fn ready_rules(&self) -> &[Rule] {
        &self.ready_rules
    }

    /// Rules that have already activated.
    pub fn active_rules(&self) -> &[Rule] {
        &self.active_rules
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn recommendation_count(&self) -> usize {
        self.recommendations.len()
    }

    /// All rules, ready and active.
    pub fn rule_count(&self) -> usize {
        self.ready_rules.len() + self.active_rules.len()
    }

    /// Everything a rule input can unify against: facts, then the fact
    /// shape of each recommendation.
    pub(crate) fn candidates(&self) -> impl Iterator<Item = &Fact> {
        self.facts
            .iter()
            .chain(self.recommendations.iter().map(Recommendation::fact))
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.ready_rules.clear();
        self.active_rules.clear();
        self.facts.clear();
        self.recommendations.clear();
    }
}
