//! Network searches - direct excitation, forward and backward spreading,
//! and the combined lambda pass.

use tag_logic::Tag;
use tracing::debug;

use super::{Edge, KnowledgeNetwork};

impl KnowledgeNetwork {
    /// Excite one tag's node and, if it fires, push its contribution down
    /// its edges. Returns the downstream tags whose belief changed.
    ///
    /// A node that fails to fire and was already past `age_limit` (or its
    /// own maximum age) before this excitation is evicted instead.
    pub fn direct_search(&mut self, tag: &Tag, strength: u8, age_limit: u64) -> Vec<Tag> {
        self.tick_all();
        self.excite_tag(tag, strength, age_limit)
    }

    /// `direct_search` without the aging pass, for callers that already
    /// aged the network this pass.
    pub(crate) fn excite_tag(&mut self, tag: &Tag, strength: u8, age_limit: u64) -> Vec<Tag> {
        let Some(id) = self.id_of(tag) else {
            return Vec::new();
        };
        let Some(node) = self.node_by_id_mut(id) else {
            return Vec::new();
        };
        let age_before = node.age;
        let max_age = node.max_age;
        node.excite(strength);

        if !node.ready_to_fire() {
            if age_before > age_limit || age_before > max_age {
                self.evict(tag);
            }
            return Vec::new();
        }
        node.fire();
        let input = node.input.clone();
        let value = node.contribution_value();
        let edges = node.outputs.clone();

        debug!(tag = %input, value, "node fired");
        self.mark_active(input.clone());

        let mut changed = Vec::with_capacity(edges.len());
        for Edge { target, weight } in edges {
            let target_id = self.materialize(&target);
            if let Some(downstream) = self.node_by_id_mut(target_id) {
                downstream.contribute(input.clone(), value * weight);
                changed.push(target);
            }
        }
        self.propagate(changed.clone());
        changed
    }

    /// Breadth-first excitation outward from a set of tags. Each hop
    /// excites the previous hop's newly changed tags; `ply` bounds the
    /// number of hops, with 0 meaning unbounded.
    pub fn forward_search(&mut self, tags: &[Tag], ply: usize) -> Vec<Tag> {
        self.tick_all();
        let strength = self.config.excite_strength;
        let age_limit = self.config.age_limit;

        let mut reached: Vec<Tag> = Vec::new();
        let mut frontier: Vec<Tag> = tags.to_vec();
        let mut hops = 0;
        while !frontier.is_empty() && (ply == 0 || hops < ply) {
            let mut next = Vec::new();
            for tag in &frontier {
                for changed in self.excite_tag(tag, strength, age_limit) {
                    if !reached.contains(&changed) {
                        reached.push(changed.clone());
                        next.push(changed);
                    }
                }
            }
            frontier = next;
            hops += 1;
        }
        reached
    }

    /// Abductive pass: find non-activated nodes whose outputs overlap the
    /// frontier by at least `ratio` and infer their inputs as plausible
    /// causes. Inferred inputs become the next frontier; `ply` bounds the
    /// hops, with 0 meaning unbounded.
    ///
    /// Nodes past their maximum age are evicted at the end of the pass;
    /// nodes past `backward_age_limit` are skipped as too stale to argue
    /// from.
    pub fn backward_search(&mut self, tags: &[Tag], ratio: f64, ply: usize) -> Vec<Tag> {
        self.tick_all();
        let stale_limit = self.config.backward_age_limit;

        let mut inferred_all: Vec<Tag> = Vec::new();
        let mut frontier: Vec<Tag> = tags.to_vec();
        let mut expired: Vec<Tag> = Vec::new();
        let mut hops = 0;
        while !frontier.is_empty() && (ply == 0 || hops < ply) {
            let mut ids = self.live_ids();
            ids.sort_by_key(|&id| self.node_by_id(id).map_or(u64::MAX, |node| node.age));

            let mut inferred = Vec::new();
            for id in ids {
                let Some(node) = self.node_by_id(id) else {
                    continue;
                };
                if node.activated {
                    continue;
                }
                if node.age > node.max_age {
                    expired.push(node.input.clone());
                    continue;
                }
                if node.age > stale_limit || node.outputs.is_empty() {
                    continue;
                }
                let matched: Vec<Edge> = node
                    .outputs
                    .iter()
                    .filter(|edge| frontier.contains(&edge.target))
                    .cloned()
                    .collect();
                if (matched.len() as f64) < ratio * node.outputs.len() as f64 {
                    continue;
                }
                let input = node.input.clone();
                let evidence: Vec<(Tag, f64)> = matched
                    .iter()
                    .map(|edge| (edge.target.clone(), self.evidence_value(&edge.target) * edge.weight))
                    .collect();

                if let Some(node) = self.node_by_id_mut(id) {
                    node.activated = true;
                    for (source, value) in evidence {
                        node.contribute(source, value);
                    }
                    node.touch();
                }
                debug!(tag = %input, "node inferred");
                self.mark_active(input.clone());
                inferred.push(input);
            }
            if inferred.is_empty() {
                break;
            }
            self.propagate(inferred.clone());
            inferred_all.extend(inferred.iter().cloned());
            frontier = inferred;
            hops += 1;
        }
        for tag in expired {
            self.evict(&tag);
        }
        inferred_all
    }

    /// Backward pass to gather plausible causes, then a forward pass from
    /// them: explanation followed by consequence.
    pub fn lambda_search(&mut self, tags: &[Tag], ply: usize) -> Vec<Tag> {
        let ratio = self.config.partial_match_ratio;
        let causes = self.backward_search(tags, ratio, ply);
        self.forward_search(&causes, ply)
    }
}
