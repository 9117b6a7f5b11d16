//! Knowledge node - the atomic unit of the associative network.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tag_logic::Tag;

/// Discretized sigmoid response curve. `excite` reads its activation
/// increment here, indexed by an integer input strength 0-10.
pub const ACCURACY_TABLE: [f64; 11] = [
    0.0, 0.59, 0.74, 0.79, 0.84, 0.86, 0.87, 0.88, 0.89, 0.90, 1.0,
];

/// A weighted edge to a downstream tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: Tag,
    /// Contribution multiplier, 0.0-1.0.
    pub weight: f64,
}

/// One unit of the network: an input tag, weighted outgoing edges, and the
/// activation bookkeeping that decides firing.
///
/// `belief` is always the mean of the `related_truths` values and is
/// recomputed on every contribution, which is why both stay private.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    /// The tag this node stands for.
    pub input: Tag,
    /// Weighted downstream edges.
    pub outputs: Vec<Edge>,
    /// Accumulated excitation.
    pub activation: f64,
    /// Firing level compared against activation times strength.
    pub threshold: f64,
    /// Multiplier applied to activation before the threshold comparison.
    pub strength: f64,
    /// Search passes since the node was last used.
    pub age: u64,
    /// Age beyond which a search pass evicts the node.
    pub max_age: u64,
    /// Set when the node fires or is inferred; belief propagation only
    /// crosses activated nodes.
    pub activated: bool,
    /// A node fires at most once per episode.
    pub fired: bool,
    #[serde(with = "super::tag_map")]
    related_truths: HashMap<Tag, f64>,
    belief: f64,
}

impl KnowledgeNode {
    /// Create a node for a tag with default threshold, strength, and
    /// maximum age.
    pub fn new(input: Tag) -> Self {
        Self {
            input,
            outputs: Vec::new(),
            activation: 0.0,
            threshold: 1.0,
            strength: 1.0,
            age: 0,
            max_age: 100,
            activated: false,
            fired: false,
            related_truths: HashMap::new(),
            belief: 0.0,
        }
    }

    /// Add a weighted edge to a downstream tag.
    pub fn with_output(mut self, target: Tag, weight: f64) -> Self {
        self.outputs.push(Edge {
            target,
            weight: weight.clamp(0.0, 1.0),
        });
        self
    }

    /// Set the firing threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the strength multiplier.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Set the eviction age.
    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = max_age;
        self
    }

    /// Raise activation by the accuracy-table entry for `strength` (capped
    /// at index 10) and mark the node used.
    pub fn excite(&mut self, strength: u8) {
        let index = usize::from(strength).min(ACCURACY_TABLE.len() - 1);
        self.activation += ACCURACY_TABLE[index];
        self.age = 0;
    }

    /// Whether the node would fire now: not yet fired this episode, and
    /// activation times strength has reached the threshold.
    pub fn ready_to_fire(&self) -> bool {
        !self.fired && self.activation * self.strength >= self.threshold
    }

    /// Latch the node as fired and activated.
    pub fn fire(&mut self) {
        self.fired = true;
        self.activated = true;
        self.age = 0;
    }

    /// Record a confidence contribution from a source tag, replacing any
    /// earlier contribution from the same source, and recompute belief.
    pub fn contribute(&mut self, source: Tag, confidence: f64) {
        self.related_truths.insert(source, confidence);
        let total: f64 = self.related_truths.values().sum();
        self.belief = total / self.related_truths.len() as f64;
        self.age = 0;
    }

    /// Mean of the recorded contributions; 0.0 with none recorded.
    pub fn belief(&self) -> f64 {
        self.belief
    }

    /// The recorded contributions by source tag.
    pub fn related_truths(&self) -> &HashMap<Tag, f64> {
        &self.related_truths
    }

    /// The value this node passes downstream: its belief once anything has
    /// contributed, otherwise its input tag's own confidence.
    pub fn contribution_value(&self) -> f64 {
        if self.related_truths.is_empty() {
            self.input.confidence()
        } else {
            self.belief
        }
    }

    /// Mark the node used in the current pass.
    pub fn touch(&mut self) {
        self.age = 0;
    }

    /// One idle search pass.
    pub(crate) fn tick(&mut self) {
        self.age += 1;
    }

    /// Whether the node has outlived the given age limit.
    pub fn expired(&self, limit: u64) -> bool {
        self.age > limit
    }

    /// Reset the activation episode: activation, flags, and contributions
    /// go back to zero. Age is kept.
    pub fn clear_episode(&mut self) {
        self.activation = 0.0;
        self.activated = false;
        self.fired = false;
        self.related_truths.clear();
        self.belief = 0.0;
    }
}
