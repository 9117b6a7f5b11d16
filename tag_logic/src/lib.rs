//! # Tag Logic
//!
//! The "Lexicon" crate - contains the typed statement model (facts, rules,
//! recommendations), their argument grammar, and the unification semantics.
//! This crate is the single source of truth for what a statement means and
//! does not contain any reasoning logic.

pub mod argument;
pub mod parse;
pub mod tags;
pub mod unify;

pub use argument::*;
pub use parse::*;
pub use tags::*;
pub use unify::*;
