//! Knowledge network - an associative graph over tags.
//!
//! - `KnowledgeNode` carries activation, firing, and belief state per tag
//! - `KnowledgeNetwork` owns the nodes and keeps a tag index plus the set
//!   of tags activated in the current episode
//! - `direct_search` / `forward_search` / `backward_search` /
//!   `lambda_search` walk the graph and spread belief
//! - `best_path` reconstructs the strongest explanatory chain between two
//!   tags
//!
//! Every public search ages the whole network by one pass; using a node
//! (exciting, inferring, contributing) resets its age, and nodes past
//! their age limit are evicted when a search next touches them.

mod node;
mod path;
mod propagate;
mod search;

pub use node::{ACCURACY_TABLE, Edge, KnowledgeNode};
pub use path::BestPath;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tag_logic::Tag;
use tracing::debug;

use crate::config::NetworkConfig;

/// Stable handle to a node slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

/// Snapshot adapter for tag-keyed maps.
///
/// JSON object keys must be strings and a tag is not one, so these maps
/// go over the wire as sequences of `(key, value)` pairs.
pub(crate) mod tag_map {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;
    use std::hash::Hash;

    pub fn serialize<K, V, S>(map: &HashMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map)
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(Vec::<(K, V)>::deserialize(deserializer)?.into_iter().collect())
    }
}

/// The associative network: a slot arena of nodes with a tag index.
///
/// Slots are never reused, so a `NodeId` stays valid for the lifetime of
/// the network even across evictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNetwork {
    config: NetworkConfig,
    nodes: Vec<Option<KnowledgeNode>>,
    #[serde(with = "tag_map")]
    index: HashMap<Tag, NodeId>,
    active: HashSet<Tag>,
}

impl KnowledgeNetwork {
    /// Create an empty network with the given tuning.
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            index: HashMap::new(),
            active: HashSet::new(),
        }
    }

    /// Create an empty network with default tuning.
    pub fn with_defaults() -> Self {
        Self::new(NetworkConfig::default())
    }

    /// The tuning this network runs with.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Insert a node, replacing any existing node for the same input tag,
    /// and return its handle.
    pub fn add_node(&mut self, node: KnowledgeNode) -> NodeId {
        if let Some(&id) = self.index.get(&node.input) {
            self.nodes[id.0] = Some(node);
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(node.input.clone(), id);
        self.nodes.push(Some(node));
        id
    }

    /// Look up the node for a tag.
    pub fn node(&self, tag: &Tag) -> Option<&KnowledgeNode> {
        self.node_by_id(self.index.get(tag).copied()?)
    }

    /// Look up a node by handle; `None` once it has been evicted.
    pub fn node_by_id(&self, id: NodeId) -> Option<&KnowledgeNode> {
        self.nodes.get(id.0)?.as_ref()
    }

    pub(crate) fn node_by_id_mut(&mut self, id: NodeId) -> Option<&mut KnowledgeNode> {
        self.nodes.get_mut(id.0)?.as_mut()
    }

    pub(crate) fn node_mut(&mut self, tag: &Tag) -> Option<&mut KnowledgeNode> {
        let id = self.index.get(tag).copied()?;
        self.node_by_id_mut(id)
    }

    pub(crate) fn id_of(&self, tag: &Tag) -> Option<NodeId> {
        self.index.get(tag).copied()
    }

    /// Handles of all live nodes.
    pub(crate) fn live_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(at, _)| NodeId(at))
            .collect()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Whether a tag has a live node.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.index.contains_key(tag)
    }

    /// The belief held for a tag, if it has a node.
    pub fn belief_of(&self, tag: &Tag) -> Option<f64> {
        self.node(tag).map(KnowledgeNode::belief)
    }

    /// Tags activated in the current episode.
    pub fn active_tags(&self) -> &HashSet<Tag> {
        &self.active
    }

    pub(crate) fn mark_active(&mut self, tag: Tag) {
        self.active.insert(tag);
    }

    /// Forget which tags are activated without touching the nodes.
    pub fn clear_active(&mut self) {
        self.active.clear();
    }

    /// End the episode: reset activation state on every node and forget
    /// the active set. Node ages and edges survive.
    pub fn clear_episode(&mut self) {
        for slot in self.nodes.iter_mut().flatten() {
            slot.clear_episode();
        }
        self.active.clear();
    }

    /// Drop a node from the network. Its slot stays reserved so other
    /// handles remain valid.
    pub fn evict(&mut self, tag: &Tag) -> bool {
        let Some(id) = self.index.remove(tag) else {
            return false;
        };
        self.nodes[id.0] = None;
        self.active.remove(tag);
        debug!(tag = %tag, "node evicted");
        true
    }

    /// The node for a tag, created with config defaults when missing.
    pub(crate) fn materialize(&mut self, tag: &Tag) -> NodeId {
        if let Some(id) = self.id_of(tag) {
            return id;
        }
        self.add_node(
            KnowledgeNode::new(tag.clone())
                .with_threshold(self.config.default_threshold)
                .with_strength(self.config.default_strength)
                .with_max_age(self.config.default_max_age),
        )
    }

    /// One aging pass over every live node.
    pub(crate) fn tick_all(&mut self) {
        for slot in self.nodes.iter_mut().flatten() {
            slot.tick();
        }
    }

    /// The value a tag argues with: its node's contribution value when a
    /// node exists, otherwise the tag's own confidence.
    pub(crate) fn evidence_value(&self, tag: &Tag) -> f64 {
        match self.node(tag) {
            Some(node) => node.contribution_value(),
            None => tag.confidence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tag_logic::Fact;

    fn tag(name: &str) -> Tag {
        Tag::Fact(Fact::new(name))
    }

    #[test]
    fn test_add_node_is_keyed_by_input_tag() {
        let mut network = KnowledgeNetwork::with_defaults();

        let first = network.add_node(KnowledgeNode::new(tag("A")).with_threshold(2.0));
        let second = network.add_node(KnowledgeNode::new(tag("A")).with_threshold(5.0));

        assert_eq!(first, second);
        assert_eq!(network.node_count(), 1);
        let node = network.node(&tag("A")).unwrap();
        assert!((node.threshold - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_eviction_keeps_other_handles_valid() {
        let mut network = KnowledgeNetwork::with_defaults();
        let a = network.add_node(KnowledgeNode::new(tag("A")));
        let b = network.add_node(KnowledgeNode::new(tag("B")));
        network.mark_active(tag("A"));

        assert!(network.evict(&tag("A")));
        assert!(!network.evict(&tag("A")));

        assert!(!network.contains(&tag("A")));
        assert!(network.node_by_id(a).is_none());
        assert!(!network.active_tags().contains(&tag("A")));
        assert_eq!(network.node_by_id(b).unwrap().input, tag("B"));
        assert_eq!(network.node_count(), 1);
    }

    #[test]
    fn test_materialize_uses_config_defaults() {
        let config = NetworkConfig {
            default_threshold: 3.0,
            default_strength: 0.5,
            default_max_age: 7,
            ..NetworkConfig::default()
        };
        let mut network = KnowledgeNetwork::new(config);

        let id = network.materialize(&tag("A"));
        let node = network.node_by_id(id).unwrap();
        assert!((node.threshold - 3.0).abs() < 1e-9);
        assert!((node.strength - 0.5).abs() < 1e-9);
        assert_eq!(node.max_age, 7);

        // A second materialize returns the same slot.
        assert_eq!(network.materialize(&tag("A")), id);
        assert_eq!(network.node_count(), 1);
    }

    #[test]
    fn test_clear_episode_resets_state_but_keeps_ages() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(KnowledgeNode::new(tag("A")));
        network.node_mut(&tag("A")).unwrap().fire();
        network.node_mut(&tag("A")).unwrap().contribute(tag("X"), 0.5);
        network.mark_active(tag("A"));
        network.tick_all();

        network.clear_episode();

        let node = network.node(&tag("A")).unwrap();
        assert!(!node.fired);
        assert!(!node.activated);
        assert!(node.related_truths().is_empty());
        assert_eq!(node.age, 1);
        assert!(network.active_tags().is_empty());
    }

    #[test]
    fn test_belief_of_unknown_tag() {
        let network = KnowledgeNetwork::with_defaults();
        assert_eq!(network.belief_of(&tag("A")), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut network = KnowledgeNetwork::with_defaults();
        network.add_node(KnowledgeNode::new(tag("Rain")).with_output(tag("WetGrass"), 0.5));
        network.direct_search(&tag("Rain"), 10, 100);

        let json = serde_json::to_string(&network).unwrap();
        let restored: KnowledgeNetwork = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, network);
        assert!((restored.belief_of(&tag("WetGrass")).unwrap() - 0.5).abs() < 1e-9);
        assert!(restored.active_tags().contains(&tag("Rain")));
    }
}
