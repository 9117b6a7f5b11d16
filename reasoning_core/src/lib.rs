//! # Reasoning Core (The Synapse)
//!
//! The inference side of the reasoning system. This crate consumes
//! `tag_logic` tags, runs forward-chaining cycles over a working memory,
//! and spreads activation and belief through an associative knowledge
//! network.
//!
//! ## Core Components
//!
//! - **engine**: Forward-chaining rule engine with rule learning and teaching
//! - **network**: Associative knowledge network with activation, belief, and aging
//! - **config**: TOML-backed tuning for the engine and the network
//!
//! ## Design Philosophy
//!
//! - **Deductive and associative**: exact rule matching and fuzzy spreading activation run over the same tags
//! - **Confidence-carrying**: every derived tag keeps a confidence in [0.0, 1.0]
//! - **Forgetful**: network knowledge ages and is evicted unless used

pub mod config;
pub mod engine;
pub mod network;

pub use config::*;
pub use engine::*;
pub use network::*;
