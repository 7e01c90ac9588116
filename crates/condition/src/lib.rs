//! The condition predicate tree and operator library (§4.2): evaluates a
//! single [`ConditionNode`] against a [`decision_core::Context`] and
//! produces a human-readable descriptor tree alongside the boolean verdict.
//!
//! Every operator here is contractually non-fatal: a type mismatch, a
//! malformed regex, an absent field all degrade to `false` rather than
//! raising. Only [`shape::validate_tree`], run once at rule-load time,
//! raises on malformed input.

#![deny(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod eval;
pub mod node;
pub mod op;
pub mod ops;
pub mod shape;
pub mod values;

pub use descriptor::{Descriptor, EvalOutcome};
pub use error::ConditionError;
pub use eval::evaluate;
pub use node::ConditionNode;
pub use op::Op;
pub use ops::external::{EnrichmentClient, EnrichmentOutcome};
