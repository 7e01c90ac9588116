//! DMN 1.3 decision tables (§4.14-§4.16): XML parsing, the five hit
//! policies, graph-level evaluation in topological order, and an
//! [`Evaluator`](evaluator::Evaluator) adapter so a DMN graph can be used
//! as one more evaluator in an `Agent`.
//!
//! This is a pragmatic subset of the OMG DMN spec, not a conformant
//! implementation: the `feel` crate's expression language, not full FEEL,
//! backs both decision-table input entries and literal-expression logic.

#![deny(unsafe_code)]

pub mod error;
pub mod evaluator_bridge;
pub mod graph_eval;
pub mod hit_policy;
pub mod model;
pub mod validate;
pub mod xml;

pub use error::DmnError;
pub use evaluator_bridge::DmnEvaluator;
pub use graph_eval::evaluate_graph;
pub use hit_policy::evaluate_table;
pub use model::{
    Aggregator, Decision, DecisionGraph, DecisionLogic, DecisionRule, DecisionTable, HitPolicy,
    InputClause, LiteralExpression, OutputClause,
};
pub use validate::validate_graph;
pub use xml::{parse, to_xml};
