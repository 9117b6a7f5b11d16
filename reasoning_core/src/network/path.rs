//! Best-path reconstruction - the strongest explanatory chain between two
//! tags.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tag_logic::Tag;
use tracing::debug;

use super::KnowledgeNetwork;

/// An explanatory chain from a start tag to a goal tag, with the
/// confidence it delivers at the goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPath {
    /// The chain, start first and goal last.
    pub tags: Vec<Tag>,
    /// The start value attenuated by every edge weight along the chain.
    pub confidence: f64,
}

impl KnowledgeNetwork {
    /// Depth-first search along outgoing edges for the chain from `start`
    /// to `goal` that delivers the highest confidence. A node consumed by
    /// one branch is excluded from every later branch, so each node backs
    /// at most one explanation.
    ///
    /// The winning chain is committed: each hop contributes its attenuated
    /// value to the next node's belief.
    pub fn best_path(&mut self, start: &Tag, goal: &Tag) -> Option<BestPath> {
        if !self.contains(start) {
            return None;
        }
        let mut excluded = HashSet::from([start.clone()]);
        let mut trail = vec![start.clone()];
        let mut best = None;
        self.descend(
            start,
            goal,
            self.evidence_value(start),
            &mut trail,
            &mut excluded,
            &mut best,
        );

        if let Some(found) = &best {
            debug!(
                start = %start,
                goal = %goal,
                confidence = found.confidence,
                hops = found.tags.len() - 1,
                "path committed"
            );
            self.commit_path(found.clone());
        }
        best
    }

    fn descend(
        &self,
        current: &Tag,
        goal: &Tag,
        value: f64,
        trail: &mut Vec<Tag>,
        excluded: &mut HashSet<Tag>,
        best: &mut Option<BestPath>,
    ) {
        let Some(node) = self.node(current) else {
            return;
        };
        for edge in &node.outputs {
            let delivered = value * edge.weight;
            if edge.target == *goal {
                let stronger = best
                    .as_ref()
                    .map_or(true, |found| delivered > found.confidence);
                if stronger {
                    let mut tags = trail.clone();
                    tags.push(goal.clone());
                    *best = Some(BestPath {
                        tags,
                        confidence: delivered,
                    });
                }
                continue;
            }
            if !excluded.insert(edge.target.clone()) {
                continue;
            }
            trail.push(edge.target.clone());
            self.descend(&edge.target, goal, delivered, trail, excluded, best);
            trail.pop();
        }
    }

    /// Write the chain's attenuated values into the beliefs along it, from
    /// the hop after the start down to the goal.
    fn commit_path(&mut self, path: BestPath) {
        let Some(first) = path.tags.first() else {
            return;
        };
        let mut value = self.evidence_value(first);
        for pair in path.tags.windows(2) {
            let weight = self
                .node(&pair[0])
                .and_then(|node| {
                    node.outputs
                        .iter()
                        .find(|edge| edge.target == pair[1])
                        .map(|edge| edge.weight)
                })
                .unwrap_or(0.0);
            value *= weight;
            let id = self.materialize(&pair[1]);
            if let Some(node) = self.node_by_id_mut(id) {
                node.contribute(pair[0].clone(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::KnowledgeNode;
    use tag_logic::Fact;

    fn tag(name: &str) -> Tag {
        Tag::Fact(Fact::new(name))
    }

    #[test]
    fn test_best_path_picks_the_strongest_branch() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(
            KnowledgeNode::new(tag("S"))
                .with_output(tag("M1"), 0.9)
                .with_output(tag("M2"), 0.5),
        );
        network.add_node(KnowledgeNode::new(tag("M1")).with_output(tag("G"), 0.9));
        network.add_node(KnowledgeNode::new(tag("M2")).with_output(tag("G"), 0.5));

        let path = network.best_path(&tag("S"), &tag("G")).unwrap();

        assert_eq!(path.tags, vec![tag("S"), tag("M1"), tag("G")]);
        assert!((path.confidence - 0.81).abs() < 1e-9);
        // The committed chain backs the goal's belief.
        assert!((network.belief_of(&tag("G")).unwrap() - 0.81).abs() < 1e-9);
    }

    #[test]
    fn test_best_path_survives_cycles() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(KnowledgeNode::new(tag("S")).with_output(tag("A"), 1.0));
        network.add_node(
            KnowledgeNode::new(tag("A"))
                .with_output(tag("S"), 1.0)
                .with_output(tag("G"), 0.8),
        );
        network.add_node(KnowledgeNode::new(tag("G")));

        let path = network.best_path(&tag("S"), &tag("G")).unwrap();

        assert_eq!(path.tags, vec![tag("S"), tag("A"), tag("G")]);
        assert!((path.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_best_path_without_a_route() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(KnowledgeNode::new(tag("S")).with_output(tag("A"), 1.0));
        network.add_node(KnowledgeNode::new(tag("A")));
        network.add_node(KnowledgeNode::new(tag("G")));

        assert_eq!(network.best_path(&tag("S"), &tag("G")), None);
        assert_eq!(network.best_path(&tag("Ghost"), &tag("G")), None);
    }

    #[test]
    fn test_branches_do_not_share_nodes() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(
            KnowledgeNode::new(tag("S"))
                .with_output(tag("A"), 1.0)
                .with_output(tag("B"), 1.0),
        );
        network.add_node(KnowledgeNode::new(tag("A")).with_output(tag("B"), 1.0));
        network.add_node(KnowledgeNode::new(tag("B")).with_output(tag("G"), 1.0));

        let path = network.best_path(&tag("S"), &tag("G")).unwrap();

        // The first branch consumes B, so the direct S => B hop cannot
        // offer a second chain through it.
        assert_eq!(path.tags, vec![tag("S"), tag("A"), tag("B"), tag("G")]);
    }

    #[test]
    fn test_best_path_starts_from_node_evidence() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(KnowledgeNode::new(tag("S")).with_output(tag("G"), 1.0));
        network.add_node(KnowledgeNode::new(tag("G")));
        network.node_mut(&tag("S")).unwrap().contribute(tag("X"), 0.5);

        let path = network.best_path(&tag("S"), &tag("G")).unwrap();

        assert!((path.confidence - 0.5).abs() < 1e-9);
        assert!((network.belief_of(&tag("G")).unwrap() - 0.5).abs() < 1e-9);
    }
}
