//! Think cycles - the fixpoint loop promoting ready rules to active.

use tag_logic::{match_facts, Bindings, Fact, Predicate, Recommendation, Rule};
use tracing::debug;

use super::RuleEngine;

impl RuleEngine {
    /// Run one activation pass.
    ///
    /// Every ready rule whose inputs each unify against at least one fact
    /// or recommendation in memory is promoted to active; its outputs,
    /// with bound variables substituted, are asserted into memory and
    /// returned. Bindings accumulate across all inputs and all matching
    /// candidates, later matches overwriting earlier ones for the same
    /// variable. A predicate derived in this cycle is only visible to
    /// rules from the next cycle on.
    pub fn think_cycle(&mut self) -> Vec<Predicate> {
        self.cycle += 1;

        let mut pending: Vec<(Rule, Bindings)> = Vec::new();
        for rule in self.memory.ready_rules() {
            let mut bindings = Bindings::new();
            let satisfied = rule.inputs().iter().all(|input| {
                let mut matched = false;
                for candidate in self.memory.candidates() {
                    if let Some(found) = match_facts(candidate, input) {
                        bindings.merge(found);
                        matched = true;
                    }
                }
                matched
            });
            if satisfied {
                pending.push((rule.clone(), bindings));
            }
        }

        let mut activated = Vec::new();
        for (rule, bindings) in pending {
            if !self.memory.activate_rule(&rule) {
                continue;
            }
            for output in rule.outputs() {
                let substituted = bindings.substitute(output.clone()).with_age(self.cycle);
                debug!(predicate = %substituted, cycle = self.cycle, "predicate activated");
                match &substituted {
                    Predicate::Fact(fact) => {
                        self.memory.add_fact(fact.clone());
                    }
                    Predicate::Recommendation(recommendation) => {
                        self.memory.add_recommendation(recommendation.clone());
                    }
                }
                activated.push(substituted);
            }
        }
        activated
    }

    /// Think until a cycle activates nothing, then return every
    /// recommendation activated along the way.
    ///
    /// Every productive cycle moves at least one rule out of ready, so a
    /// run quiesces within the ready-rule count; the configured
    /// `max_cycles` is a backstop, never the stopping condition.
    ///
    /// With `generate_rule`, a rule is synthesized from the pre-run fact
    /// snapshot to the full activated set and added to ready; a run that
    /// activates nothing learns nothing.
    pub fn think(&mut self, generate_rule: bool) -> Vec<Recommendation> {
        self.run_cycles(self.config.max_cycles, generate_rule)
    }

    /// Think with a hard cycle cap, stopping early on a quiet cycle.
    pub fn think_for(&mut self, cycles: usize, generate_rule: bool) -> Vec<Recommendation> {
        self.run_cycles(cycles, generate_rule)
    }

    fn run_cycles(&mut self, cap: usize, generate_rule: bool) -> Vec<Recommendation> {
        let snapshot: Vec<Fact> = self.memory.facts().to_vec();
        let mut aggregate: Vec<Predicate> = Vec::new();

        for _ in 0..cap {
            let activated = self.think_cycle();
            if activated.is_empty() {
                break;
            }
            aggregate.extend(activated);
        }

        if generate_rule && !aggregate.is_empty() {
            let rule = Rule::new(snapshot, aggregate.iter().cloned());
            debug!(rule = %rule, "rule generated");
            self.memory.add_rule(rule);
        }

        let mut recommendations: Vec<Recommendation> = Vec::new();
        for predicate in aggregate {
            if let Predicate::Recommendation(recommendation) = predicate {
                if !recommendations.contains(&recommendation) {
                    recommendations.push(recommendation);
                }
            }
        }
        recommendations
    }
}
