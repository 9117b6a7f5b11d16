//! Belief propagation - relaying updated confidence through the activated
//! part of the network.

use std::collections::{HashSet, VecDeque};
use tag_logic::Tag;
use tracing::trace;

use super::KnowledgeNetwork;

impl KnowledgeNetwork {
    /// Push fresh belief from the seed tags through already-activated
    /// downstream nodes. Each node relays at most once per call, so cycles
    /// terminate. Returns the tags whose belief was updated.
    pub fn propagate(&mut self, seeds: impl IntoIterator<Item = Tag>) -> Vec<Tag> {
        let mut queue: VecDeque<Tag> = seeds.into_iter().collect();
        let mut visited: HashSet<Tag> = HashSet::new();
        let mut updated: Vec<Tag> = Vec::new();

        while let Some(tag) = queue.pop_front() {
            if !visited.insert(tag.clone()) {
                continue;
            }
            let Some((value, edges)) = self
                .node(&tag)
                .filter(|node| node.activated)
                .map(|node| (node.contribution_value(), node.outputs.clone()))
            else {
                continue;
            };
            for edge in edges {
                let Some(downstream) = self.node_mut(&edge.target) else {
                    continue;
                };
                if !downstream.activated {
                    continue;
                }
                downstream.contribute(tag.clone(), value * edge.weight);
                trace!(source = %tag, target = %edge.target, value = value * edge.weight, "belief relayed");
                if !updated.contains(&edge.target) {
                    updated.push(edge.target.clone());
                }
                queue.push_back(edge.target);
            }
        }
        updated
    }
}
