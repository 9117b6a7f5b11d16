//! Rule learning - transitive merging and sentence teaching.

use tag_logic::{match_facts, parse_predicate, Predicate, Rule};
use tracing::debug;

use super::RuleEngine;

/// Sentence tokens opening the input side of a taught rule.
const INPUT_MARKERS: [&str; 4] = ["if", "when", "while", "first"];

/// Sentence tokens opening the output side of a taught rule.
const OUTPUT_MARKERS: [&str; 3] = ["then", "next", "do"];

impl RuleEngine {
    /// Merge chained ready rules for up to `cycles` rounds.
    ///
    /// When an output of rule A unifies against an input of rule B, the
    /// merged rule `A.inputs -> B.outputs` joins the ready set. Each round
    /// chains from the previous round's merges, so `A->B` plus `B->C`
    /// yields `A->C` in one round and longer chains in further rounds.
    /// Returns every rule produced; no compatible pair yields an empty
    /// result.
    pub fn rest(&mut self, cycles: usize) -> Vec<Rule> {
        let mut produced: Vec<Rule> = Vec::new();
        let mut frontier: Vec<Rule> = self.memory.ready_rules().to_vec();

        for _ in 0..cycles {
            let known: Vec<Rule> = self.memory.ready_rules().to_vec();
            let mut round: Vec<Rule> = Vec::new();

            for left in &frontier {
                for right in &known {
                    if left == right || !chains_into(left, right) {
                        continue;
                    }
                    let merged = Rule::new(left.inputs().to_vec(), right.outputs().to_vec());
                    if self.memory.add_rule(merged.clone()) {
                        debug!(rule = %merged, "rule merged");
                        round.push(merged);
                    }
                }
            }

            if round.is_empty() {
                break;
            }
            produced.extend(round.iter().cloned());
            frontier = round;
        }

        produced
    }

    /// Author a rule from a marker sentence.
    ///
    /// The first token from {if, when, while, first} opens the input side
    /// and the first from {then, next, do} the output side; whichever
    /// marker comes first, its side runs up to the other marker and the
    /// later side runs to the end of the sentence. Tokens parse through
    /// the tag grammar. Returns false, adding nothing, when a marker is
    /// missing, a side is empty, or a token does not parse.
    pub fn teach(&mut self, sentence: &str) -> bool {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        let marker_at = |markers: &[&str]| {
            tokens
                .iter()
                .position(|token| markers.iter().any(|marker| token.eq_ignore_ascii_case(marker)))
        };
        let (Some(input_at), Some(output_at)) = (marker_at(&INPUT_MARKERS), marker_at(&OUTPUT_MARKERS))
        else {
            return false;
        };

        let (first, second) = if input_at < output_at {
            (input_at, output_at)
        } else {
            (output_at, input_at)
        };
        let first_side = &tokens[first + 1..second];
        let second_side = &tokens[second + 1..];
        let (input_tokens, output_tokens) = if input_at < output_at {
            (first_side, second_side)
        } else {
            (second_side, first_side)
        };

        let Some(inputs) = parse_side(input_tokens) else {
            return false;
        };
        let Some(outputs) = parse_side(output_tokens) else {
            return false;
        };
        if inputs.is_empty() || outputs.is_empty() {
            return false;
        }

        let rule = Rule::new(
            inputs.into_iter().map(|predicate| predicate.as_fact().clone()),
            outputs,
        );
        debug!(rule = %rule, "rule taught");
        self.memory.add_rule(rule)
    }
}

/// True when any output of `left` unifies against any input of `right`.
fn chains_into(left: &Rule, right: &Rule) -> bool {
    left.outputs().iter().any(|output| {
        right
            .inputs()
            .iter()
            .any(|input| match_facts(output.as_fact(), input).is_some())
    })
}

/// Parse one side of a taught sentence; None when any token is malformed.
fn parse_side(tokens: &[&str]) -> Option<Vec<Predicate>> {
    tokens
        .iter()
        .map(|token| parse_predicate(token).ok())
        .collect()
}
