//! Validation-time errors for condition nodes. Evaluation itself never
//! raises these; they are surfaced only by schema validation at load time
//! (see the `rules` crate), consistent with the non-fatality contract on
//! the decide path.

use crate::op::Op;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("{path}: field must be non-empty")]
    EmptyField { path: String },
    #[error("{path}: operator {op:?} expects {expected}, got {actual}")]
    ValueShapeMismatch { path: String, op: Op, expected: &'static str, actual: String },
    #[error("{path}: combinator body must be a non-null array")]
    CombinatorShapeMismatch { path: String },
}
