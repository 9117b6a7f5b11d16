//! Configuration module - tunables for the engine and the network.
//!
//! Plain structs with defaults, deserializable from TOML so a deployment can
//! tune reasoning behaviour without code changes. Every section and field is
//! optional in the document; omitted fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Failure to load a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for the rule-activation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard stop on cycles within a single think run. Natural quiescence
    /// lands well below this for any finite rule set.
    pub max_cycles: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_cycles: 1000 }
    }
}

/// Tunables for the knowledge node network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Threshold given to nodes created without an explicit one.
    pub default_threshold: f64,

    /// Strength multiplier given to new nodes.
    pub default_strength: f64,

    /// Age at which an untouched node becomes eligible for eviction.
    pub default_max_age: u64,

    /// Excitation strength (the 0-10 accuracy table index) used when
    /// forward search excites frontier nodes.
    pub excite_strength: u8,

    /// Age limit handed to direct search by forward and lambda search.
    pub age_limit: u64,

    /// Nodes older than this are skipped by backward search.
    pub backward_age_limit: u64,

    /// Fraction of a node's output tags that must already be known for
    /// backward search to infer the node.
    pub partial_match_ratio: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_threshold: 1.0,
            default_strength: 1.0,
            default_max_age: 100,
            excite_strength: 10,
            age_limit: 100,
            backward_age_limit: 100,
            partial_match_ratio: 0.5,
        }
    }
}

/// Top-level configuration pairing the engine and network sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub engine: EngineConfig,
    pub network: NetworkConfig,
}

impl ReasoningConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
