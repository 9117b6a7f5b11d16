//! Rule-activation engine - working memory driven to quiescence.
//!
//! The engine owns a [`WorkingMemory`] and mutates it through think cycles:
//! - **think_cycle**: one activation pass over the ready rules
//! - **think / think_for**: the fixpoint loop, to quiescence or a cap
//! - **rest**: transitive rule merging
//! - **teach**: rule authoring from marker sentences

mod learn;
mod memory;
mod think;

pub use memory::WorkingMemory;

use serde::{Deserialize, Serialize};
use tag_logic::{Fact, Recommendation, Rule, Tag};

use crate::config::EngineConfig;

/// The production-rule engine pairing a configuration with one owned
/// working memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleEngine {
    config: EngineConfig,
    memory: WorkingMemory,
    /// Think cycles run so far; stamps the age of derived predicates.
    cycle: u64,
}

impl RuleEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            memory: WorkingMemory::new(),
            cycle: 0,
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// The current working memory.
    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    /// Mutable working memory, for callers seeding state in bulk.
    pub fn memory_mut(&mut self) -> &mut WorkingMemory {
        &mut self.memory
    }

    /// Think cycles run since creation or the last reset.
    pub fn cycles_run(&self) -> u64 {
        self.cycle
    }

    /// Add a fact. Returns whether memory changed.
    pub fn add_fact(&mut self, fact: Fact) -> bool {
        self.memory.add_fact(fact)
    }

    /// Remove a fact. Returns whether memory changed.
    pub fn remove_fact(&mut self, fact: &Fact) -> bool {
        self.memory.remove_fact(fact)
    }

    /// Add a rule to the ready set. Returns whether memory changed.
    pub fn add_rule(&mut self, rule: Rule) -> bool {
        self.memory.add_rule(rule)
    }

    /// Add a recommendation. Returns whether memory changed.
    pub fn add_recommendation(&mut self, recommendation: Recommendation) -> bool {
        self.memory.add_recommendation(recommendation)
    }

    /// Dispatch any tag to its set. This is the injection point for
    /// network search results.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        match tag {
            Tag::Fact(fact) => self.add_fact(fact),
            Tag::Rule(rule) => self.add_rule(rule),
            Tag::Recommendation(recommendation) => self.add_recommendation(recommendation),
        }
    }

    /// Discard all memory and the cycle counter, keeping the configuration.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.cycle = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tag_logic::Predicate;

    #[test]
    fn test_add_tag_dispatch() {
        let mut engine = RuleEngine::with_defaults();

        assert!(engine.add_tag(Tag::Fact(Fact::new("A"))));
        assert!(engine.add_tag(Tag::Recommendation(Recommendation::new("X"))));
        assert!(engine.add_tag(Tag::Rule(Rule::new(
            vec![Fact::new("A")],
            vec![Predicate::Fact(Fact::new("B"))],
        ))));

        assert_eq!(engine.memory().fact_count(), 1);
        assert_eq!(engine.memory().recommendation_count(), 1);
        assert_eq!(engine.memory().ready_rules().len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut engine = RuleEngine::with_defaults();
        engine.add_fact(Fact::new("A"));
        engine.add_rule(Rule::new(
            vec![Fact::new("A")],
            vec![Predicate::Fact(Fact::new("B"))],
        ));
        engine.think(false);

        engine.reset();
        assert_eq!(engine.memory().fact_count(), 0);
        assert_eq!(engine.memory().rule_count(), 0);
        assert_eq!(engine.cycles_run(), 0);
    }
}
